use super::types::TransitionKind;

/// Result of a successful `handle` call, carrying the text to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    StoriesGenerated { stories: String },
    StoriesRefined { stories: String },
    TestPlanGenerated { test_plan: String },
    TestPlanRefined { test_plan: String },
    /// The test plan was approved; carries the final plan.
    Completed { test_plan: String },
    /// Input received after completion; nothing changed.
    Ignored,
}

impl TransitionOutcome {
    pub fn kind(&self) -> TransitionKind {
        match self {
            TransitionOutcome::StoriesGenerated { .. } => TransitionKind::StoriesGenerated,
            TransitionOutcome::StoriesRefined { .. } => TransitionKind::StoriesRefined,
            TransitionOutcome::TestPlanGenerated { .. } => TransitionKind::TestPlanGenerated,
            TransitionOutcome::TestPlanRefined { .. } => TransitionKind::TestPlanRefined,
            TransitionOutcome::Completed { .. } => TransitionKind::Completed,
            TransitionOutcome::Ignored => TransitionKind::Ignored,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            TransitionOutcome::StoriesGenerated { stories }
            | TransitionOutcome::StoriesRefined { stories } => Some(stories),
            TransitionOutcome::TestPlanGenerated { test_plan }
            | TransitionOutcome::TestPlanRefined { test_plan }
            | TransitionOutcome::Completed { test_plan } => Some(test_plan),
            TransitionOutcome::Ignored => None,
        }
    }
}
