use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!("inventory store failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidArgument(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_argument", msg)
        }
        DomainError::ItemNotAllowed(msg) => {
            json_error(StatusCode::BAD_REQUEST, "item_not_allowed", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "nothing found"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse the quantity path segment as a 32-bit integer.
///
/// Non-integers and values outside the `i32` range are caller errors.
pub fn parse_quantity(s: &str) -> Result<i64, axum::response::Response> {
    s.trim().parse::<i32>().map(i64::from).map_err(|_| {
        domain_error_to_response(DomainError::invalid_argument("quantity must be an integer"))
    })
}
