use thiserror::Error;

pub type Result<T> = std::result::Result<T, GnewsError>;

#[derive(Debug, Error)]
pub enum GnewsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GnewsError {
    fn from(err: reqwest::Error) -> Self {
        GnewsError::Network(err.to_string())
    }
}
