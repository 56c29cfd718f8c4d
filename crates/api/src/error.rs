//! API error types with HTTP response mapping.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use usecase::AppError;

/// Seconds a client should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "2";

/// The kind of resource a request was about, used for error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Order,
}

impl Resource {
    fn not_found(&self) -> (&'static str, &'static str) {
        match self {
            Resource::User => ("USER_NOT_FOUND", "user not found"),
            Resource::Order => ("ORDER_NOT_FOUND", "order not found"),
        }
    }
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be decoded.
    BadRequest { code: &'static str, message: String },
    /// A lifecycle service rejected or failed the operation.
    Usecase { resource: Resource, error: AppError },
}

impl ApiError {
    /// Malformed JSON payload.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: "INVALID_REQUEST",
            message: message.into(),
        }
    }

    /// Malformed path identifier.
    pub fn invalid_id(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: "INVALID_ID",
            message: message.into(),
        }
    }

    pub fn user(error: AppError) -> Self {
        ApiError::Usecase {
            resource: Resource::User,
            error,
        }
    }

    pub fn order(error: AppError) -> Self {
        ApiError::Usecase {
            resource: Resource::Order,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            ApiError::Usecase { resource, error } => match error {
                AppError::NotFound => {
                    let (code, message) = resource.not_found();
                    (StatusCode::NOT_FOUND, code, message.to_string())
                }
                AppError::Invalid(reason) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", reason),
                AppError::Conflict => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "resource conflict".to_string(),
                ),
                AppError::Unavailable(reason) => {
                    tracing::warn!(%reason, "responding with service unavailable");
                    let body = error_body(
                        "SERVICE_UNAVAILABLE",
                        "service temporarily unavailable",
                    );
                    return (
                        StatusCode::SERVICE_UNAVAILABLE,
                        [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
                        axum::Json(body),
                    )
                        .into_response();
                }
            },
        };

        (status, axum::Json(error_body(code, &message))).into_response()
    }
}

fn error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": { "code": code, "message": message } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::user(AppError::NotFound), StatusCode::NOT_FOUND),
            (
                ApiError::order(AppError::Invalid("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::user(AppError::Conflict), StatusCode::CONFLICT),
            (
                ApiError::order(AppError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::invalid_id("nope"), StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unavailable_sets_retry_after() {
        let response = ApiError::user(AppError::Unavailable("timeout".into())).into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            RETRY_AFTER_SECS
        );
    }

    #[test]
    fn test_not_found_codes_per_resource() {
        assert_eq!(Resource::User.not_found().0, "USER_NOT_FOUND");
        assert_eq!(Resource::Order.not_found().0, "ORDER_NOT_FOUND");
    }
}
