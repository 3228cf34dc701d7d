use std::fmt;

/// Where a conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    AwaitingRequest,
    AwaitingStoriesFeedback,
    AwaitingTestPlanFeedback,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::AwaitingRequest => "awaiting-request",
            Stage::AwaitingStoriesFeedback => "awaiting-stories-feedback",
            Stage::AwaitingTestPlanFeedback => "awaiting-test-plan-feedback",
            Stage::Completed => "completed",
        };
        write!(f, "{label}")
    }
}

/// The transition a given input triggers, known before any collaborator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    StoriesGenerated,
    StoriesRefined,
    TestPlanGenerated,
    TestPlanRefined,
    Completed,
    Ignored,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransitionKind::StoriesGenerated => "stories-generated",
            TransitionKind::StoriesRefined => "stories-refined",
            TransitionKind::TestPlanGenerated => "test-plan-generated",
            TransitionKind::TestPlanRefined => "test-plan-refined",
            TransitionKind::Completed => "completed",
            TransitionKind::Ignored => "ignored",
        };
        write!(f, "{label}")
    }
}
