use crate::role::RoleKind;
use crate::workflow::{APPROVAL_KEYWORD, TransitionKind, TransitionOutcome};

pub(crate) fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    // Never reveal more than half of the key.
    let visible = (key.chars().count() / 2).min(8);
    let prefix: String = key.chars().take(visible).collect();
    format!("{prefix}***")
}

pub(crate) fn welcome_message(organization: &str) -> String {
    format!("👋 Welcome to weave! Please enter your high-level feature request for {organization}:")
}

/// Line shown before a long-running transition starts.
pub(crate) fn progress_message(kind: TransitionKind, input: &str) -> Option<String> {
    let analyst = RoleKind::Analyst.display_name();
    let tester = RoleKind::Tester.display_name();
    match kind {
        TransitionKind::StoriesGenerated => Some(format!(
            "⏳ {analyst} is generating {}, please wait...",
            RoleKind::Analyst.artifact()
        )),
        TransitionKind::StoriesRefined => Some(format!(
            "⏳ {analyst} is refining the {} based on your feedback \"{input}\", please wait...",
            RoleKind::Analyst.artifact()
        )),
        TransitionKind::TestPlanGenerated => Some(format!(
            "✅ User stories approved.\n⏳ {tester} is generating the {}, please wait...",
            RoleKind::Tester.artifact()
        )),
        TransitionKind::TestPlanRefined => Some(format!(
            "⏳ {tester} is refining the {} based on your feedback \"{input}\", please wait...",
            RoleKind::Tester.artifact()
        )),
        TransitionKind::Completed | TransitionKind::Ignored => None,
    }
}

pub(crate) fn outcome_heading(outcome: &TransitionOutcome) -> &'static str {
    match outcome {
        TransitionOutcome::StoriesGenerated { .. } => "✅ Business Analyst Output (User Stories):",
        TransitionOutcome::StoriesRefined { .. } => {
            "✅ Business Analyst Output (Refined User Stories):"
        }
        TransitionOutcome::TestPlanGenerated { .. } => "✅ Software Tester Output (Test Plan):",
        TransitionOutcome::TestPlanRefined { .. } => {
            "✅ Software Tester Output (Refined Test Plan):"
        }
        TransitionOutcome::Completed { .. } => "✅ Final Approved Test Plan:",
        TransitionOutcome::Ignored => "ℹ️  This conversation is complete.",
    }
}

/// Prompt telling the user what they can type next.
pub(crate) fn next_step_hint(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::StoriesGenerated { .. } | TransitionOutcome::StoriesRefined { .. } => {
            format!(
                "💬 Please provide feedback to refine the user stories or type '{APPROVAL_KEYWORD}' if satisfied."
            )
        }
        TransitionOutcome::TestPlanGenerated { .. } | TransitionOutcome::TestPlanRefined { .. } => {
            format!(
                "💬 Please provide feedback to refine the test plan further or type '{APPROVAL_KEYWORD}' if satisfied."
            )
        }
        TransitionOutcome::Completed { .. } => {
            "🎉 All stages are complete. Type 'new' to start another feature request or 'exit' to quit."
                .to_string()
        }
        TransitionOutcome::Ignored => {
            "💬 Type 'new' to start another feature request or 'exit' to quit.".to_string()
        }
    }
}
