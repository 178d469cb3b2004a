use crate::model::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("{0}")]
    BadParams(String),

    #[error("no active session; log in first")]
    NoSession,

    #[error("a {role} session cannot {action}")]
    Forbidden { role: Role, action: &'static str },

    // Same error for unknown email and wrong password.
    #[error("authentication failed")]
    AuthFailed,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl BoardError {
    pub fn bad_params(message: impl Into<String>) -> Self {
        BoardError::BadParams(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            BoardError::BadParams(_) => "bad_params",
            BoardError::NoSession => "no_session",
            BoardError::Forbidden { .. } => "forbidden",
            BoardError::AuthFailed => "auth_failed",
            BoardError::NotFound { .. } => "not_found",
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
