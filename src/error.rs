//! Error types for pkg-index.

use thiserror::Error;

/// Errors raised by the index server outside of normal request handling.
///
/// Semantic failures (missing dependency, package still required) are not
/// errors; they are reported to the client as `FAIL`. Undecodable request
/// lines are answered with `ERROR` and never surface here.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to listen at {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected response from server: {0:?}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
