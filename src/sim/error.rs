use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use super::topology::NodeId;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Http {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("background request worker disconnected")]
    Disconnected,
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing JSON file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON format, needs 'nodes' and 'links' arrays")]
    MissingArrays,

    #[error("node id {0} appears more than once")]
    DuplicateNode(NodeId),
}
