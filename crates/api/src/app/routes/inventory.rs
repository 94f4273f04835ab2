use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockroom_core::DomainError;
use stockroom_inventory::{normalize_segment, require_name};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

// Category and subcategory segments are lower-cased here, before reaching the
// service; the inventory name is passed through untouched.

pub fn router() -> Router {
    Router::new()
        .route("/:name", get(list_inventory).delete(delete_inventory))
        .route("/:name/:category", get(list_category))
        .route("/:name/:category/:subcategory", get(get_item).delete(delete_item))
        .route("/:name/:category/:subcategory/:quantity", post(upsert_item))
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.inventory().find_by_name(&name).await {
        Ok(records) if records.is_empty() => {
            errors::domain_error_to_response(DomainError::not_found())
        }
        Ok(records) => (StatusCode::OK, Json(dto::records_to_json(&records))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path((name, category)): Path<(String, String)>,
) -> axum::response::Response {
    let category = normalize_segment(&category);

    match services.inventory().find_by_name_and_category(&name, &category).await {
        Ok(records) if records.is_empty() => {
            errors::domain_error_to_response(DomainError::not_found())
        }
        Ok(records) => (StatusCode::OK, Json(dto::records_to_json(&records))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((name, category, subcategory)): Path<(String, String, String)>,
) -> axum::response::Response {
    let category = normalize_segment(&category);
    let subcategory = normalize_segment(&subcategory);

    match services.inventory().find_one(&name, &category, &subcategory).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(dto::InventoryRecordResponse::from(&record))).into_response()
        }
        Ok(None) => errors::domain_error_to_response(DomainError::not_found()),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn upsert_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((name, category, subcategory, quantity)): Path<(String, String, String, String)>,
) -> axum::response::Response {
    // Name is checked ahead of the quantity segment, as in the service.
    if let Err(e) = require_name(&name) {
        return errors::domain_error_to_response(e);
    }
    let category = normalize_segment(&category);
    let subcategory = normalize_segment(&subcategory);
    let quantity = match errors::parse_quantity(&quantity) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    match services
        .inventory()
        .upsert(&name, &category, &subcategory, quantity)
        .await
    {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.inventory().delete_by_name(&name).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((name, category, subcategory)): Path<(String, String, String)>,
) -> axum::response::Response {
    let category = normalize_segment(&category);
    let subcategory = normalize_segment(&subcategory);

    match services
        .inventory()
        .delete_one(&name, &category, &subcategory)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
