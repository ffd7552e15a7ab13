//! Errors returned by the inventory API collaborators

use serde::Deserialize;

/// Error value the API uses when an item's SAP code is already taken
pub const DUPLICATE_CODE_ERROR: &str = "DUPLICATE_SAP_CODE";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS)
    Transport(String),
    /// Non-success HTTP status with the server's error detail and, when the
    /// body carried one, its `error` code
    Status {
        status: u16,
        details: String,
        code: Option<String>,
    },
    /// 2xx response whose body reported `success: false`
    Rejected(String),
    /// The response body did not have the expected shape
    Decode(String),
    /// A bearer token is required but none was configured
    MissingToken,
}

impl ApiError {
    /// The server-provided detail text, or a description of the failure
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Transport(msg) | ApiError::Rejected(msg) | ApiError::Decode(msg) => msg,
            ApiError::Status { details, .. } => details,
            ApiError::MissingToken => "not logged in",
        }
    }

    /// True only for the distinguished "identifying code already in use" error
    pub fn is_duplicate_code(&self) -> bool {
        let is_duplicate = |value: &str| value.trim().eq_ignore_ascii_case(DUPLICATE_CODE_ERROR);
        match self {
            ApiError::Status { details, code, .. } => {
                code.as_deref().is_some_and(is_duplicate) || is_duplicate(details.as_str())
            }
            ApiError::Rejected(details) => is_duplicate(details.as_str()),
            _ => false,
        }
    }

    /// Whether a read may be attempted again
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "request failed: {}", msg),
            ApiError::Status { status, details, .. } => write!(f, "HTTP {}: {}", status, details),
            ApiError::Rejected(msg) => write!(f, "rejected by server: {}", msg),
            ApiError::Decode(msg) => write!(f, "unexpected response: {}", msg),
            ApiError::MissingToken => write!(f, "no session token; log in first"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Error body the API sends with failing responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    details: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build an `ApiError` from a failing response's status and body text.
/// The display detail is the first non-blank of `details`, `error` and
/// `message`; `error` is also kept as the code.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = non_blank(parsed.error);
    let details = non_blank(parsed.details)
        .or_else(|| code.clone())
        .or_else(|| non_blank(parsed.message))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("status {}", status)
            } else {
                trimmed.to_string()
            }
        });

    ApiError::Status {
        status,
        details,
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_preferred_over_error() {
        let err = error_from_body(400, r#"{"error":"Bad Request","details":"quantity must be > 0"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                details: "quantity must be > 0".to_string(),
                code: Some("Bad Request".to_string()),
            }
        );
        assert!(!err.is_duplicate_code());
    }

    #[test]
    fn test_duplicate_code_survives_details() {
        let err = error_from_body(
            409,
            r#"{"error":"DUPLICATE_SAP_CODE","details":"SAP code A1 already exists"}"#,
        );
        assert!(err.is_duplicate_code());
        assert_eq!(err.detail(), "SAP code A1 already exists");

        let err = error_from_body(409, r#"{"error":"DUPLICATE_SAP_CODE","details":""}"#);
        assert!(err.is_duplicate_code());
        assert_eq!(err.detail(), "DUPLICATE_SAP_CODE");
    }

    #[test]
    fn test_blank_fields_fall_through_to_message() {
        let err = error_from_body(400, r#"{"error":" ","details":"","message":"brand too long"}"#);
        assert_eq!(err.detail(), "brand too long");
        assert!(!err.is_duplicate_code());
    }

    #[test]
    fn test_error_field_used_without_details() {
        let err = error_from_body(409, r#"{"error":"DUPLICATE_SAP_CODE"}"#);
        assert!(err.is_duplicate_code());
        assert_eq!(err.detail(), "DUPLICATE_SAP_CODE");
    }

    #[test]
    fn test_plain_text_body() {
        let err = error_from_body(502, "Bad gateway");
        assert_eq!(err.detail(), "Bad gateway");
        assert!(err.is_retryable());

        let err = error_from_body(500, "");
        assert_eq!(err.detail(), "status 500");
    }

    #[test]
    fn test_only_the_distinguished_value_is_duplicate() {
        assert!(ApiError::Rejected("duplicate_sap_code".to_string()).is_duplicate_code());
        assert!(
            !ApiError::Status {
                status: 409,
                details: "Conflict".to_string(),
                code: None,
            }
            .is_duplicate_code()
        );
        assert!(!ApiError::Transport(DUPLICATE_CODE_ERROR.to_string()).is_duplicate_code());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = ApiError::Status {
            status: 404,
            details: "not found".to_string(),
            code: None,
        };
        assert!(!err.is_retryable());
        assert!(
            ApiError::Status {
                status: 429,
                details: String::new(),
                code: None,
            }
            .is_retryable()
        );
        assert!(!ApiError::MissingToken.is_retryable());
    }
}
