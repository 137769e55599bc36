use reqwest::StatusCode;
use serde_json::Value;

/// Failure of a request dispatched through the API client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("API error ({status})")]
    Status { status: StatusCode, body: Value },
    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// The `message` field of the error body, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_from_status_body() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "message": "Name is required" }),
        };
        assert_eq!(err.server_message(), Some("Name is required"));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_server_message_missing() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Value::Null,
        };
        assert_eq!(err.server_message(), None);

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.server_message(), None);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: json!({ "message": "jwt expired" }),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "API error (401 Unauthorized)");
    }
}
