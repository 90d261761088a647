//! Client error types

use crate::shared::ConfigError;
use thiserror::Error;

/// Errors surfaced by the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("client task has stopped")]
    Stopped,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("login response did not set the auth cookie")]
    MissingCookie,
}

pub type ClientResult<T> = Result<T, ClientError>;
