use checkout_core::error::TransportError;
use thiserror::Error;

/// Shown instead of the raw error when the backend cannot be reached.
pub const CONNECTION_ERROR_MESSAGE: &str = "Ocurrió un problema con la conexión";

/// Errors encountered while talking to the checkout backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("failed to read response body: {0}")]
    Json(#[source] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to build request URL: {0}")]
    Url(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(err) if err.is_connect() || err.is_timeout() => {
                TransportError::Connection(CONNECTION_ERROR_MESSAGE.to_string())
            }
            ApiError::Http(err) => TransportError::Connection(err.to_string()),
            ApiError::Json(err) => TransportError::Decode(err.to_string()),
            ApiError::Decode(err) => TransportError::Decode(err.to_string()),
            ApiError::Api { status, message } => TransportError::Status { status, message },
            ApiError::Url(message) => TransportError::InvalidRequest(message),
        }
    }
}
