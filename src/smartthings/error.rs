use crate::smartthings::domain::ErrorResponse;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request rejected with status {status}: {message}")]
    Auth { status: StatusCode, message: String },
    #[error("server error with status {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Classifies a non-success response, preferring the message from the SmartThings error envelope.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.error)
            .map(|error| error.to_string())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());

        if status.is_client_error() {
            ApiError::Auth { status, message }
        } else {
            ApiError::Server { status, message }
        }
    }
}
