use agenda_shared::models::ConflictReport;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure taxonomy of the client:
/// - `Transport` — the request never produced a usable response.
/// - `Api` — the backend answered non-2xx with a structured `{error}`.
/// - `Conflict` — 409 with a conflict payload; not fatal, routed back
///   into the assignment flow for a user decision.
/// - `Validation` — rejected client-side before any network call.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("schedule conflict ({})", .0.level)]
    Conflict(ConflictReport),

    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        AppError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}
