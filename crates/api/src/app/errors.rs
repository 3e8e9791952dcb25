use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shelf_core::{DomainError, ValidationErrors};
use shelf_infra::ServiceError;

use crate::app::dto::ErrorResponse;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        other => {
            // Infrastructure detail stays in the log.
            tracing::error!(error = %other, "request failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(errs) => validation_error(errs),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized(msg) => json_error(StatusCode::UNAUTHORIZED, "unauthorized", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
    }
}

pub fn validation_error(errs: ValidationErrors) -> Response {
    let body = ErrorResponse {
        error: "validation_error".to_string(),
        message: errs.to_string(),
        fields: Some(errs.fields().to_vec()),
    };
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

/// Bodies that are not JSON, or not the expected shape, never reach a handler.
pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: code.to_string(),
        message: message.into(),
        fields: None,
    };
    (status, axum::Json(body)).into_response()
}
