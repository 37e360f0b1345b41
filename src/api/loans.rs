//! Borrow, return and borrowed-list endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{item::CatalogEntry, loan::LoanSummary},
};

use super::CurrentSession;

/// Borrow request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Selected item; required
    pub item_id: Option<i32>,
    /// Due label to record; the desk default is used when absent
    pub due_label: Option<String>,
}

/// Return request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Selected item; required
    pub item_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub item: CatalogEntry,
    pub due_label: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub item: CatalogEntry,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoansResponse {
    pub loans: Vec<LoanSummary>,
    pub message: String,
}

/// Borrow one copy of an item
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Item borrowed", body = BorrowResponse),
        (status = 400, description = "No item selected", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copy available", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
    body: Option<Json<BorrowRequest>>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    // A missing or unreadable body is treated as no selection
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let outcome = state
        .services
        .session
        .borrow(&session, request.item_id, request.due_label)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: format!("Book '{}' borrowed successfully!", outcome.item.title),
            item: outcome.item,
            due_label: outcome.loan.due_label,
        }),
    ))
}

/// Return one copy of an item
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Item returned", body = ReturnResponse),
        (status = 400, description = "No item selected", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse),
        (
            status = 409,
            description = "Item not in the borrowed list",
            body = crate::error::ErrorResponse
        )
    )
)]
pub async fn return_item(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
    body: Option<Json<ReturnRequest>>,
) -> AppResult<Json<ReturnResponse>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let outcome = state
        .services
        .session
        .return_item(&session, request.item_id)
        .await?;

    Ok(Json(ReturnResponse {
        message: format!("Book '{}' returned successfully!", outcome.item.title),
        item: outcome.item,
    }))
}

/// List the current patron's borrowed items
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed items", body = LoansResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<LoansResponse>> {
    let loans = state.services.session.list_loans(&session).await?;

    let message = if loans.is_empty() {
        "You have not borrowed any books yet.".to_string()
    } else {
        loans
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(Json(LoansResponse { loans, message }))
}
