use std::path::PathBuf;

use thiserror::Error;

/// A single analytics API call that did not produce a payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid request url {0}")]
    Url(String),
}

#[derive(Debug, Error)]
#[error("GET {url} returned malformed JSON: {source}")]
pub struct ParseError {
    pub url: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("snapshot cache {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot cache {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard command configured")]
    Unavailable,
    #[error("clipboard command {command} exited with {status}")]
    Denied { command: String, status: String },
    #[error("clipboard command {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
