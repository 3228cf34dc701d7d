//! Conversation state machine: feature request, user stories under review,
//! test plan under review, completed.

mod controller;
mod input;
mod outcome;
mod state;
mod types;

pub use controller::WorkflowController;
pub use input::{APPROVAL_KEYWORD, InputClass, is_approval};
pub use outcome::TransitionOutcome;
pub use state::ConversationState;
pub use types::{Stage, TransitionKind};
