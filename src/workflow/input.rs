/// The reply that moves a stage forward instead of refining it.
pub const APPROVAL_KEYWORD: &str = "approved";

/// How the controller interprets text received while awaiting feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    Approval,
    Feedback,
}

impl InputClass {
    pub fn classify(input: &str) -> Self {
        if is_approval(input) {
            InputClass::Approval
        } else {
            InputClass::Feedback
        }
    }
}

pub fn is_approval(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(APPROVAL_KEYWORD)
}
