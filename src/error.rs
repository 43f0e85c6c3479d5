use thiserror::Error;

/// SDK-specific errors
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Key import error: {0}")]
    KeyImport(String),

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Envelope came back with a non-200 code. The server message is
    /// surfaced verbatim when it supplied one.
    #[error("{message}")]
    Server { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
