use thiserror::Error;

/// Error taxonomy for the engine.
///
/// A missing record is NOT an error: operations that can legitimately find
/// nothing return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected synchronously, before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backend API answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered 2xx but the body did not match the contract.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// 2xx response whose envelope carried no data where data was required.
    #[error("empty response from api: {0}")]
    EmptyResponse(&'static str),

    /// An operation was invoked in a state that does not allow it.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),
}

pub type Result<T> = std::result::Result<T, EngineError>;
