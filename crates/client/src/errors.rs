use thiserror::Error;

use common::media::UploadError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
    /// Non-success response that is not a reported outcome.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self { ClientError::Transport(e.to_string()) }
}
