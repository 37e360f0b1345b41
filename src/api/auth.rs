//! Login, registration and logout endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::patron::PatronShort,
};

use super::CurrentSession;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub patron: PatronShort,
    pub message: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub patron: PatronShort,
    pub message: String,
}

/// Plain notice
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .session
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer".to_string(),
        message: format!("Welcome {}!", outcome.patron.username),
        patron: outcome.patron,
    }))
}

/// Register a new patron. The new patron still has to log in.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Patron registered", body = RegisterResponse),
        (status = 400, description = "Invalid username or password", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let patron = state
        .services
        .session
        .register(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!("User '{}' registered successfully.", patron.username),
            patron,
        }),
    ))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<MessageResponse>> {
    state.services.session.logout(&session).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
