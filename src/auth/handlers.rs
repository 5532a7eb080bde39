// HTTP handlers for authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::auth::models::{AuthenticatedUserView, LoginRequest, RegisterRequest, UserView};
use crate::error::ServiceError;
use crate::AppState;

/// Register a new user
/// POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ServiceError> {
    let Json(request) = payload?;
    request.validate()?;

    debug!("Registering user with email {}", request.email);
    let user = state
        .auth
        .register(&request.email, &request.password, &request.name)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a bearer token
/// POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthenticatedUserView>, ServiceError> {
    let Json(request) = payload?;
    let authenticated = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(authenticated))
}
