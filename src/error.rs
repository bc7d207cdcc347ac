//! Error types and result aliases for the PicNGo library.
//!
//! Every failure an analysis request can hit is a variant of [`PicNGoError`].
//! None of them is retried automatically; callers show the message and let the
//! user run the same request again.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PicNGoError {
    #[error("API key is not set. Run `picngo settings set-key <KEY>` to add your OpenAI API key.")]
    MissingCredential,

    #[error("Failed to process the image: {0}")]
    ImageEncodingFailure(String),

    #[error("Network error: {0}")]
    TransportFailure(String),

    #[error("{}", describe_http_error(.status, .message))]
    HttpError { status: u16, message: Option<String> },

    #[error("Unexpected response format from API: {0}")]
    MalformedResponse(String),

    #[error("Could not parse {kind}. Raw: {raw_prefix}")]
    DecodeFailure { kind: &'static str, raw_prefix: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn describe_http_error(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("API error: {}", message),
        None => format!("Server returned HTTP {}. Please verify your API key.", status),
    }
}

pub type Result<T> = std::result::Result<T, PicNGoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_points_to_settings() {
        let err = PicNGoError::MissingCredential;
        assert!(err.to_string().contains("settings set-key"));
    }

    #[test]
    fn test_http_error_with_server_message() {
        let err = PicNGoError::HttpError {
            status: 401,
            message: Some("Invalid API key".to_string()),
        };
        assert_eq!(err.to_string(), "API error: Invalid API key");
    }

    #[test]
    fn test_http_error_without_server_message() {
        let err = PicNGoError::HttpError {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "Server returned HTTP 503. Please verify your API key.");
    }

    #[test]
    fn test_decode_failure_display() {
        let err = PicNGoError::DecodeFailure {
            kind: "food analysis",
            raw_prefix: "not json".to_string(),
        };
        assert_eq!(err.to_string(), "Could not parse food analysis. Raw: not json");
    }

    #[test]
    fn test_transport_failure_display() {
        let err = PicNGoError::TransportFailure("operation timed out".to_string());
        assert_eq!(err.to_string(), "Network error: operation timed out");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PicNGoError = json_err.into();

        match err {
            PicNGoError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PicNGoError = io_err.into();

        match err {
            PicNGoError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }
}
