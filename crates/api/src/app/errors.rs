use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::DomainError;
use catalog_products::{ProductError, ValidationErrors};

pub fn product_error_to_response(err: ProductError) -> axum::response::Response {
    match err {
        // Field-level details only exist before the domain mapping.
        ProductError::Validation(errors) => validation_error(&errors),
        other => domain_error_to_response(other.into()),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
        DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        DomainError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
    };
    if !err.is_rejection() {
        tracing::error!(error = %err, "request failed in the store");
    }
    json_error(status, code, err.to_string())
}

pub fn validation_error(errors: &ValidationErrors) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "success": false,
            "error": "validation_error",
            "reason": errors.to_string(),
            "details": errors.errors(),
        })),
    )
        .into_response()
}

/// Body that could not be decoded as the expected JSON payload, including a
/// missing `content-type: application/json`.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        "validation_error",
        rejection.body_text(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "reason": message.into(),
        })),
    )
        .into_response()
}
