//! Role agents: the Business Analyst drafts user stories from a feature request,
//! the Software Tester turns approved stories into a test plan. Both revise their
//! previous output on feedback.

mod agent;
mod config;
mod parsing;
mod prompt;

pub use agent::{GenerationRequest, LlmRoleAgent, RoleAgent};
pub use config::{RoleConfig, RoleKind};
pub use prompt::{INITIAL_PLACEHOLDERS, PromptTemplate, REFINE_PLACEHOLDERS};

#[cfg(test)]
mod tests;
