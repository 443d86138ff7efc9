use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("send chat request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("parse chat response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no choices returned")]
    NoChoices,
}
