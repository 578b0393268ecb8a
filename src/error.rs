use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single GraphQL/HTTP exchange.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// Transport or connection failure (includes timeouts)
    #[error("network_error: {0}")]
    Network(#[source] reqwest::Error),

    /// Any status other than 200
    #[error("http_error: status {0}")]
    Http(StatusCode),

    /// 200 with nothing in the body
    #[error("empty_response")]
    EmptyResponse,

    /// Body present but not JSON
    #[error("json_error: {0}")]
    Json(#[source] serde_json::Error),
}

impl GraphqlError {
    /// Short machine-readable name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            GraphqlError::Network(_) => "network_error",
            GraphqlError::Http(_) => "http_error",
            GraphqlError::EmptyResponse => "empty_response",
            GraphqlError::Json(_) => "json_error",
        }
    }

    /// Status code, for `http_error` only
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GraphqlError::Http(status) => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by listing and downloading.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Request(#[from] GraphqlError),

    #[error("server returned errors: {}", .0.join(", "))]
    Remote(Vec<String>),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("cannot write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
