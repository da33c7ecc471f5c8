use thiserror::Error;

/// Misuse of the form controller API. These are programmer errors and are
/// expected to be propagated rather than handled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("the field name parameter is required")]
    EmptyFieldName,
    #[error("field '{0}' is not part of the form schema")]
    UnknownField(String),
    #[error("form schema and default values disagree on field '{0}'")]
    SchemaMismatch(String),
    #[error("record cannot be mapped to form values: {0}")]
    Record(String),
    #[error("no tokio runtime is available to run the lookup timer")]
    NoRuntime,
}

/// Failure reported by a backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Connection(String),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Error surfaced at the page boundary when saving fails.
///
/// `display` is the message meant for the user; `source` keeps the underlying
/// transport failure for logs and outer handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("{display}")]
    Submit {
        display: String,
        #[source]
        source: TransportError,
    },
    #[error(transparent)]
    Form(#[from] FormError),
}
