use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - session expired, please log in again")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Validation failed: {}", .0.summary())]
    Validation(ErrorBody),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Rejected(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed = ErrorBody::parse(body);
        let describe = |parsed: Option<ErrorBody>| match parsed {
            Some(b) => b.summary(),
            None => Self::truncate_body(body),
        };
        match status.as_u16() {
            400 | 422 => match parsed {
                Some(b) => ApiError::Validation(b),
                None => ApiError::InvalidResponse(format!("Status {}: {}", status, Self::truncate_body(body))),
            },
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(describe(parsed)),
            404 => ApiError::NotFound(describe(parsed)),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(describe(parsed)),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, Self::truncate_body(body))),
        }
    }

    /// Parsed error body for validation failures.
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Validation(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// JSON error body returned by the backend.
///
/// Validation failures come back as a field -> messages map
/// (`{"email": ["..."]}`), sometimes alongside `message`, `errors`,
/// `error` or `non_field_errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody(Value);

impl ErrorBody {
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => Some(Self(value)),
            _ => None,
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// First message attached to `field`, whether it is a list or a string.
    pub fn field(&self, field: &str) -> Option<&str> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Message shown for a failed login or registration: the email error,
    /// then the password error, then `message`, then the first non-field
    /// error.
    pub fn auth_message(&self) -> Option<&str> {
        ["email", "password", "message", "non_field_errors"]
            .iter()
            .find_map(|key| self.field(key).filter(|msg| !msg.is_empty()))
    }

    /// One-line description of every message in the body.
    pub fn summary(&self) -> String {
        let Value::Object(map) = &self.0 else {
            return self.0.to_string();
        };

        let mut parts = Vec::new();
        for (key, value) in map {
            if key == "success" || key == "data" {
                continue;
            }
            let messages = collect_messages(value);
            if messages.is_empty() {
                continue;
            }
            match key.as_str() {
                "message" | "error" | "detail" | "errors" | "non_field_errors" => {
                    parts.push(messages.join("; "))
                }
                _ => parts.push(format!("{}: {}", key, messages.join("; "))),
            }
        }

        if parts.is_empty() {
            "request was rejected".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(collect_messages).collect(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(k, v)| {
                collect_messages(v)
                    .into_iter()
                    .map(move |m| format!("{}: {}", k, m))
            })
            .collect(),
        Value::Null | Value::Bool(_) => vec![],
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, r#"{"success": false, "message": "course not found"}"#),
            ApiError::NotFound(msg) if msg == "course not found"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn test_bad_request_keeps_body() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"email": ["Enter a valid email address."]}"#,
        );
        let body = err.error_body().expect("validation body");
        assert_eq!(body.field("email"), Some("Enter a valid email address."));
    }

    #[test]
    fn test_auth_message_priority() {
        let body = ErrorBody::parse(
            r#"{"non_field_errors": ["bad credentials"], "message": "failed", "password": ["too short"]}"#,
        )
        .unwrap();
        assert_eq!(body.auth_message(), Some("too short"));

        let body = ErrorBody::parse(r#"{"non_field_errors": ["bad credentials"], "message": "failed"}"#).unwrap();
        assert_eq!(body.auth_message(), Some("failed"));

        let body = ErrorBody::parse(r#"{"non_field_errors": ["bad credentials"]}"#).unwrap();
        assert_eq!(body.auth_message(), Some("bad credentials"));

        let body = ErrorBody::parse(r#"{"detail": "nope"}"#).unwrap();
        assert_eq!(body.auth_message(), None);
    }

    #[test]
    fn test_summary_flattens_field_errors() {
        let body = ErrorBody::parse(
            r#"{"success": false, "message": "invalid data", "errors": {"title": ["too short"]}}"#,
        )
        .unwrap();
        let summary = body.summary();
        assert!(summary.contains("invalid data"));
        assert!(summary.contains("title: too short"));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(600);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.contains("600 total bytes"));
    }

    #[test]
    fn test_non_json_body_is_not_parsed() {
        assert!(ErrorBody::parse("<html></html>").is_none());
        assert!(ErrorBody::parse("[1, 2]").is_none());
    }
}
