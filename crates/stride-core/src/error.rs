//! Error types for Stride

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The model answered, but not with JSON
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// A pattern matched text that does not parse as an amount
    #[error("Malformed amount: {0}")]
    MalformedAmount(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("AI backend not configured")]
    AiUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
