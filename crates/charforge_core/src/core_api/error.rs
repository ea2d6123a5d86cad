use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    OutOfRange,
    UnknownCatalogId,
    Validation,
    Rejected,
    Io,
    Parse,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_id(kind: &str, id: &str) -> Self {
        Self::new(
            CoreErrorCode::UnknownCatalogId,
            format!("unknown {kind} id '{id}'"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::Validation, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::Rejected, message)
    }
}
