use thiserror::Error;

/// Failures raised by the workflow core.
///
/// Build-time variants (`Configuration`, `EmptyCorpus`, `Embedding` during
/// index construction) are fatal at startup. Runtime variants raised while a
/// conversation transitions reset that conversation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeaveError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("corpus is empty: nothing to index")]
    EmptyCorpus,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("generation failed: {0}")]
    Generation(String),
}

impl WeaveError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WeaveError>;
