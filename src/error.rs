// Error type shared by the request builders and the HTTP client. Each
// variant maps onto the exit status curl would report for the same failure,
// so scripts that used to shell out to curl keep working unchanged.

use reqwest::StatusCode;
use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read file '{}': {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid content type '{0}'")]
    ContentType(String),

    #[error("malformed endpoint URL: {0}")]
    InvalidUrl(#[source] reqwest::Error),

    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("operation timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("transfer failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("the requested URL returned error: {0}")]
    HttpStatus(StatusCode),

    #[error("failed writing output: {0}")]
    Output(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl UploadError {
    /// Wrap a file access failure for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Classify an error coming out of reqwest while talking to `url`.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidUrl(err)
        } else if err.is_connect() || connection_refused(&err) {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }

    /// Process exit status for this failure, following curl's numbering.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ReadFile { .. } => 26,
            Self::ContentType(_) => 2,
            Self::InvalidUrl(_) => 3,
            Self::Connect { .. } => 7,
            Self::Timeout(_) => 28,
            Self::Transport(_) => 56,
            Self::HttpStatus(_) => 22,
            Self::Output(_) => 23,
            Self::Json(_) => 1,
        }
    }
}

/// Whether an `io::Error` somewhere under `err` is a refused connection.
fn connection_refused(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = e.source();
    }
    false
}
