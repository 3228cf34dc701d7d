use crate::error::{Result, WeaveError};

/// Placeholders an initial-generation template may reference.
pub const INITIAL_PLACEHOLDERS: &[&str] = &["organization", "context", "input"];

/// Placeholders a refinement template may reference.
pub const REFINE_PLACEHOLDERS: &[&str] = &["organization", "previous_output", "feedback"];

pub(crate) const ANALYST_INITIAL_TEMPLATE: &str = r#"You are a seasoned Business Analyst at {organization} with deep product knowledge.
Given the product context:
----------------------------------------
{context}
----------------------------------------
And the feature request:
----------------------------------------
{input}
----------------------------------------
Write detailed user stories with acceptance criteria. Follow these rules:
1. Stories describe product functionality only; no documentation or testing tasks.
2. Each story is scoped to fit within a single sprint.
3. Acceptance criteria are written in Gherkin (Given/When/Then) form.

Review the result for gaps or contradictions before answering.

Response format:
Story 1: <user story>
Acceptance Criteria:
- <AC 1.1>
- <AC 1.2>

...

Story n: <user story>
Acceptance Criteria:
- <AC n.1>
- <AC n.2>
"#;

pub(crate) const ANALYST_REFINE_TEMPLATE: &str = r#"You are a seasoned Business Analyst at {organization} with deep product knowledge.
Given the previously written user stories:
----------------------------------------
{previous_output}
----------------------------------------
And the reviewer's feedback on those stories:
----------------------------------------
{feedback}
----------------------------------------
Revise the user stories to address the feedback. Keep exactly the same response format as before.
"#;

pub(crate) const TESTER_INITIAL_TEMPLATE: &str = r#"You are an expert Software Tester at {organization} with subject matter expertise in the product and its features.
Given the product context:
----------------------------------------
{context}
----------------------------------------
And the approved user stories:
----------------------------------------
{input}
----------------------------------------
Write a comprehensive test plan and test strategy for the feature:
1. Cover every acceptance criterion in the stories.
2. Organize test suites by functionality.
3. Focus on customer use cases rather than unit tests.
4. Include corner cases in addition to positive and negative cases.
5. Shift left: prefer API-level tests over end-to-end UI tests.

Return the test plan as a Markdown table with these columns:
- Test Case ID
- Test Case Objective
- Test Case Description with Test Steps
- Test Type (API or UI)
- Expected Result
- Additional Notes (open questions or pending action items)
"#;

pub(crate) const TESTER_REFINE_TEMPLATE: &str = r#"You are an expert Software Tester at {organization} with subject matter expertise in the product and its features.
Given the previously written test plan:
----------------------------------------
{previous_output}
----------------------------------------
And the reviewer's feedback on the test plan:
----------------------------------------
{feedback}
----------------------------------------
Revise the test plan to address the feedback. Keep exactly the same Markdown table columns as before.
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A prompt with `{name}` placeholders; `{{` and `}}` produce literal braces.
///
/// Substituted values are inserted verbatim and never re-scanned, so
/// retrieved text containing braces cannot inject placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_lowercase() || c == '_' => name.push(c),
                            Some(c) => {
                                return Err(WeaveError::configuration(format!(
                                    "invalid character '{c}' in placeholder '{{{name}'"
                                )));
                            }
                            None => {
                                return Err(WeaveError::configuration(format!(
                                    "unclosed placeholder '{{{name}'"
                                )));
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(WeaveError::configuration("empty placeholder '{}'"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(WeaveError::configuration("unmatched '}' in template"));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fails if the template references a placeholder outside `allowed`.
    pub fn ensure_placeholders(&self, allowed: &[&str]) -> Result<()> {
        match self.placeholders().find(|name| !allowed.contains(name)) {
            Some(unknown) => Err(WeaveError::configuration(format!(
                "unknown placeholder '{{{unknown}}}'; expected one of: {}",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            WeaveError::configuration(format!(
                                "no value bound for placeholder '{{{name}}}'"
                            ))
                        })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

impl std::str::FromStr for PromptTemplate {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
