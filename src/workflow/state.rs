use super::types::Stage;

/// Conversation data; each variant carries exactly the fields valid in its stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    AwaitingRequest,
    AwaitingStoriesFeedback {
        feature_request: String,
        context: String,
        stories: String,
    },
    AwaitingTestPlanFeedback {
        feature_request: String,
        context: String,
        stories: String,
        test_plan: String,
    },
    Completed {
        feature_request: String,
        context: String,
        stories: String,
        test_plan: String,
    },
}

impl ConversationState {
    pub fn stage(&self) -> Stage {
        match self {
            ConversationState::AwaitingRequest => Stage::AwaitingRequest,
            ConversationState::AwaitingStoriesFeedback { .. } => Stage::AwaitingStoriesFeedback,
            ConversationState::AwaitingTestPlanFeedback { .. } => Stage::AwaitingTestPlanFeedback,
            ConversationState::Completed { .. } => Stage::Completed,
        }
    }

    pub fn feature_request(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingRequest => None,
            ConversationState::AwaitingStoriesFeedback {
                feature_request, ..
            }
            | ConversationState::AwaitingTestPlanFeedback {
                feature_request, ..
            }
            | ConversationState::Completed {
                feature_request, ..
            } => Some(feature_request),
        }
    }

    pub fn retrieved_context(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingRequest => None,
            ConversationState::AwaitingStoriesFeedback { context, .. }
            | ConversationState::AwaitingTestPlanFeedback { context, .. }
            | ConversationState::Completed { context, .. } => Some(context),
        }
    }

    pub fn stories_output(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingRequest => None,
            ConversationState::AwaitingStoriesFeedback { stories, .. }
            | ConversationState::AwaitingTestPlanFeedback { stories, .. }
            | ConversationState::Completed { stories, .. } => Some(stories),
        }
    }

    pub fn test_plan_output(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingRequest
            | ConversationState::AwaitingStoriesFeedback { .. } => None,
            ConversationState::AwaitingTestPlanFeedback { test_plan, .. }
            | ConversationState::Completed { test_plan, .. } => Some(test_plan),
        }
    }
}
