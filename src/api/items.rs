//! Catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::item::CatalogEntry};

/// List the catalog in shelf order
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "Catalog with available copies", body = Vec<CatalogEntry>)
    )
)]
pub async fn list_items(State(state): State<crate::AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.services.session.list_catalog().await)
}

/// Get one catalog entry
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Catalog entry", body = CatalogEntry),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CatalogEntry>> {
    let item = state.services.session.get_item(id).await?;
    Ok(Json(item))
}
