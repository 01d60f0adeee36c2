use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThreadsError>;

#[derive(Debug, Error)]
pub enum ThreadsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl From<reqwest::Error> for ThreadsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ThreadsError::Timeout(err.to_string())
        } else {
            ThreadsError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ThreadsError {
    fn from(err: serde_json::Error) -> Self {
        ThreadsError::Parse(err.to_string())
    }
}
