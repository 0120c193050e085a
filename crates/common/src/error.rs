//! Unified error type for the Kalshi client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An authenticated call was attempted without both an API key and a private key.
    #[error("Auth config error: {0}")]
    AuthConfig(String),

    /// The private key could not be parsed, or the signing primitive rejected it.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Non-2xx response from the API. `body` is the raw response text.
    #[error("Kalshi API error (status={status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response format error: {0}")]
    ResponseFormat(String),

    /// Network-level failure, with the transport's own error kept as the source.
    #[error("HTTP transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status carried by an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
