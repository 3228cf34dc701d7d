//! Conversational requirements workflow: a feature request becomes user
//! stories written by a Business Analyst agent, then a test plan written by a
//! Software Tester agent, both grounded in a retrieved product corpus and
//! refined on human feedback until approved.

pub mod cli;
pub mod client;
pub mod config;
pub mod corpus;
pub mod error;
pub mod retrieval;
pub mod role;
pub mod tokens;
pub mod workflow;

pub use error::{Result, WeaveError};
pub use workflow::{ConversationState, Stage, TransitionOutcome, WorkflowController};
