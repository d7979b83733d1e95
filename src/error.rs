//! Error types for the notifier

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Exchange API error: {0}")]
    Api(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, Error>;
