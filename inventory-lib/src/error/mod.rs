//! Error types

mod api;
mod auth;
mod export;

pub use api::*;
pub use auth::*;
pub use export::*;

use std::time::Duration;

/// Top-level error returned by fallible client and table operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request to the inventory API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Authentication failed or no usable token was available.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Writing an export artifact failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A table or client was configured inconsistently.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Server kept answering 429 after all retries were used.
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimit {
        /// Server-provided wait time, if any.
        retry_after: Option<Duration>,
    },
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status_code(),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }
}
