use std::fmt;

use crate::error::Result;

use super::prompt::{
    ANALYST_INITIAL_TEMPLATE, ANALYST_REFINE_TEMPLATE, INITIAL_PLACEHOLDERS, PromptTemplate,
    REFINE_PLACEHOLDERS, TESTER_INITIAL_TEMPLATE, TESTER_REFINE_TEMPLATE,
};

/// The two roles taking part in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Analyst,
    Tester,
}

impl RoleKind {
    pub fn display_name(self) -> &'static str {
        match self {
            RoleKind::Analyst => "Business Analyst",
            RoleKind::Tester => "Software Tester",
        }
    }

    /// What the role produces, used in progress and result messages.
    pub fn artifact(self) -> &'static str {
        match self {
            RoleKind::Analyst => "user stories",
            RoleKind::Tester => "test plan",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoleKind::Analyst => "analyst",
            RoleKind::Tester => "tester",
        };
        write!(f, "{label}")
    }
}

/// Immutable parameters shared by every call a role agent makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    kind: RoleKind,
    organization: String,
    initial_template: PromptTemplate,
    refine_template: PromptTemplate,
}

impl RoleConfig {
    pub fn new(
        kind: RoleKind,
        organization: impl Into<String>,
        initial_template: PromptTemplate,
        refine_template: PromptTemplate,
    ) -> Result<Self> {
        initial_template.ensure_placeholders(INITIAL_PLACEHOLDERS)?;
        refine_template.ensure_placeholders(REFINE_PLACEHOLDERS)?;

        Ok(Self {
            kind,
            organization: organization.into(),
            initial_template,
            refine_template,
        })
    }

    /// Business Analyst with the built-in story templates.
    pub fn analyst(organization: impl Into<String>) -> Result<Self> {
        Self::new(
            RoleKind::Analyst,
            organization,
            PromptTemplate::parse(ANALYST_INITIAL_TEMPLATE)?,
            PromptTemplate::parse(ANALYST_REFINE_TEMPLATE)?,
        )
    }

    /// Software Tester with the built-in test plan templates.
    pub fn tester(organization: impl Into<String>) -> Result<Self> {
        Self::new(
            RoleKind::Tester,
            organization,
            PromptTemplate::parse(TESTER_INITIAL_TEMPLATE)?,
            PromptTemplate::parse(TESTER_REFINE_TEMPLATE)?,
        )
    }

    pub fn kind(&self) -> RoleKind {
        self.kind
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn initial_template(&self) -> &PromptTemplate {
        &self.initial_template
    }

    pub fn refine_template(&self) -> &PromptTemplate {
        &self.refine_template
    }
}
