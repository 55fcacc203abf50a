//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::message::FrameError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other backend failure, with the code the backend reported
    #[error("Backend error: {0}")]
    Api(AppError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// Live channel protocol violation or server-side ERROR frame
    #[error("Live channel protocol error: {0}")]
    Protocol(String),

    /// Malformed frame
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(app) => app,
            ClientError::Unauthorized => AppError::not_authenticated(),
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Validation(msg) => AppError::validation(msg),
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            ClientError::Http(e) => AppError::network(e.to_string()),
            ClientError::WebSocket(e) => {
                AppError::with_message(ErrorCode::LiveChannelClosed, e.to_string())
            }
            ClientError::Protocol(msg) => AppError::with_message(ErrorCode::LiveChannelClosed, msg),
            ClientError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        let err: AppError = ClientError::Unauthorized.into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let err: AppError = ClientError::NotFound("order 9".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "order 9");

        let err: AppError =
            ClientError::Api(AppError::new(ErrorCode::OrderAlreadyPaid)).into();
        assert_eq!(err.code, ErrorCode::OrderAlreadyPaid);

        let err: AppError = ClientError::Protocol("ERROR frame".to_string()).into();
        assert_eq!(err.code, ErrorCode::LiveChannelClosed);

        let err: AppError = ClientError::Config("missing".to_string()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
