use std::mem;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_TOP_K;
use crate::error::{Result, WeaveError};
use crate::retrieval::ContextProvider;
use crate::role::RoleAgent;

use super::input::InputClass;
use super::outcome::TransitionOutcome;
use super::state::ConversationState;
use super::types::{Stage, TransitionKind};

/// Drives one conversation from feature request to approved test plan.
///
/// `handle` takes `&mut self`, so a controller never processes two inputs at
/// once. Run several conversations by creating several controllers over the
/// same shared collaborators.
pub struct WorkflowController {
    context: Arc<dyn ContextProvider>,
    analyst: Arc<dyn RoleAgent>,
    tester: Arc<dyn RoleAgent>,
    top_k: usize,
    state: ConversationState,
}

impl WorkflowController {
    pub fn new(
        context: Arc<dyn ContextProvider>,
        analyst: Arc<dyn RoleAgent>,
        tester: Arc<dyn RoleAgent>,
    ) -> Self {
        Self {
            context,
            analyst,
            tester,
            top_k: DEFAULT_TOP_K,
            state: ConversationState::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Drops the current conversation and waits for a new feature request.
    pub fn reset(&mut self) {
        info!(from = %self.stage(), "conversation reset");
        self.state = ConversationState::AwaitingRequest;
    }

    /// The transition `input` would trigger from the current stage.
    pub fn preview(&self, input: &str) -> TransitionKind {
        match (self.stage(), InputClass::classify(input)) {
            (Stage::AwaitingRequest, _) => TransitionKind::StoriesGenerated,
            (Stage::AwaitingStoriesFeedback, InputClass::Approval) => {
                TransitionKind::TestPlanGenerated
            }
            (Stage::AwaitingStoriesFeedback, InputClass::Feedback) => {
                TransitionKind::StoriesRefined
            }
            (Stage::AwaitingTestPlanFeedback, InputClass::Approval) => TransitionKind::Completed,
            (Stage::AwaitingTestPlanFeedback, InputClass::Feedback) => {
                TransitionKind::TestPlanRefined
            }
            (Stage::Completed, _) => TransitionKind::Ignored,
        }
    }

    /// Applies one human input.
    ///
    /// A collaborator failure clears the conversation back to
    /// [`Stage::AwaitingRequest`] before the error is returned. Empty input is
    /// rejected without touching the state.
    pub async fn handle(&mut self, input: &str) -> Result<TransitionOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Err(WeaveError::invalid_argument("input must not be empty"));
        }

        let before = self.stage();
        let planned = self.preview(input);
        if let Some(agent) = self.agent_for(planned) {
            debug!(role = %agent.kind(), transition = %planned, "invoking role agent");
        }

        let state = mem::take(&mut self.state);

        match self.transition(state, input).await {
            Ok((next, outcome)) => {
                self.state = next;
                match &outcome {
                    TransitionOutcome::Ignored => {
                        warn!(stage = %before, "conversation already completed; input ignored");
                    }
                    _ => info!(
                        from = %before,
                        to = %self.stage(),
                        transition = %outcome.kind(),
                        "conversation advanced"
                    ),
                }
                Ok(outcome)
            }
            Err(err) => {
                error!(stage = %before, error = %err, "transition failed; conversation reset");
                self.state = ConversationState::AwaitingRequest;
                Err(err)
            }
        }
    }

    fn agent_for(&self, kind: TransitionKind) -> Option<&dyn RoleAgent> {
        match kind {
            TransitionKind::StoriesGenerated | TransitionKind::StoriesRefined => {
                Some(self.analyst.as_ref())
            }
            TransitionKind::TestPlanGenerated | TransitionKind::TestPlanRefined => {
                Some(self.tester.as_ref())
            }
            TransitionKind::Completed | TransitionKind::Ignored => None,
        }
    }

    async fn transition(
        &self,
        state: ConversationState,
        input: &str,
    ) -> Result<(ConversationState, TransitionOutcome)> {
        match state {
            ConversationState::AwaitingRequest => {
                let context = self.context.retrieve_context(input, self.top_k).await?;
                let stories = self.analyst.generate_initial(&context, input).await?;
                Ok((
                    ConversationState::AwaitingStoriesFeedback {
                        feature_request: input.to_string(),
                        context,
                        stories: stories.clone(),
                    },
                    TransitionOutcome::StoriesGenerated { stories },
                ))
            }
            ConversationState::AwaitingStoriesFeedback {
                feature_request,
                context,
                stories,
            } => match InputClass::classify(input) {
                InputClass::Approval => {
                    let test_plan = self.tester.generate_initial(&context, &stories).await?;
                    Ok((
                        ConversationState::AwaitingTestPlanFeedback {
                            feature_request,
                            context,
                            stories,
                            test_plan: test_plan.clone(),
                        },
                        TransitionOutcome::TestPlanGenerated { test_plan },
                    ))
                }
                InputClass::Feedback => {
                    let stories = self.analyst.refine(&stories, input).await?;
                    Ok((
                        ConversationState::AwaitingStoriesFeedback {
                            feature_request,
                            context,
                            stories: stories.clone(),
                        },
                        TransitionOutcome::StoriesRefined { stories },
                    ))
                }
            },
            ConversationState::AwaitingTestPlanFeedback {
                feature_request,
                context,
                stories,
                test_plan,
            } => match InputClass::classify(input) {
                InputClass::Approval => Ok((
                    ConversationState::Completed {
                        feature_request,
                        context,
                        stories,
                        test_plan: test_plan.clone(),
                    },
                    TransitionOutcome::Completed { test_plan },
                )),
                InputClass::Feedback => {
                    let test_plan = self.tester.refine(&test_plan, input).await?;
                    Ok((
                        ConversationState::AwaitingTestPlanFeedback {
                            feature_request,
                            context,
                            stories,
                            test_plan: test_plan.clone(),
                        },
                        TransitionOutcome::TestPlanRefined { test_plan },
                    ))
                }
            },
            completed @ ConversationState::Completed { .. } => {
                Ok((completed, TransitionOutcome::Ignored))
            }
        }
    }
}
