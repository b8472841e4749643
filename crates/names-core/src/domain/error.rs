use thiserror::Error;

/// Error taxonomy shared by every subsystem (spec §7).
///
/// `NotFound` / `Validation` / `Conflict` / `Exhaustion` are recoverable
/// and usually handled close to where they're raised. `Storage` and
/// `FatalInit` propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("no questions available: {0}")]
    NoQuestionsAvailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("fatal initialization error: {0}")]
    FatalInit(String),
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CoreError::NotFound(what.into())
    }

    pub fn validation(what: impl Into<String>) -> Self {
        CoreError::Validation(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        CoreError::Conflict(what.into())
    }

    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, CoreError::Conflict(msg) if msg.contains("optimistic"))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
