use std::path::PathBuf;

use crate::transport::{Method, TransportError};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum PhotoAppError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, timeout, truncated body). Never retried.
    #[error("transport error on {method} {url}: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: TransportError,
    },
    /// The service answered 400 or 500 with an error message.
    #[error("service returned {status} for {url}: {message}")]
    Api {
        /// HTTP status code (400 or 500).
        status: u16,
        /// URL of the failing request.
        url: String,
        /// `message` field of the error body, or the raw body.
        message: String,
    },
    /// Every attempt came back with an unclassified status.
    #[error("gave up on {url} after {attempts} attempts, last status {status}")]
    Exhausted {
        status: u16,
        url: String,
        attempts: u32,
    },
    /// Response body did not match the endpoint schema.
    #[error("decode error: {0}")]
    Decode(String),
    /// A URL could not be built from the base URL and path.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Local check failed before any request was sent.
    #[error("{0}")]
    Precondition(String),
    /// Reading or writing a local asset file failed.
    #[error("local file {}: {source}", .path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Operator console I/O failed.
    #[error("console error: {0}")]
    Io(#[from] std::io::Error),
}
