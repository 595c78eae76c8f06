use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnrollError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to parse Slack response: {0}")]
    ParseError(String),

    #[error("Slack socket mode connection failed: {0}")]
    Connection(String),

    #[error("Envelope left unacknowledged: {0}")]
    Unacknowledged(String),
}

impl From<SlackClientError> for UnrollError {
    fn from(error: SlackClientError) -> Self {
        UnrollError::Connection(error.to_string())
    }
}

impl From<reqwest::Error> for UnrollError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            UnrollError::ParseError(error.to_string())
        } else {
            UnrollError::HttpError(error.to_string())
        }
    }
}
