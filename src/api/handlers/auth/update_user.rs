//! Profile update endpoint. Non-admins may only update their own row; a
//! self-update reissues the session cookies with the fresh snapshot and a
//! one-day expiry.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use super::{
    cookie,
    error::AuthError,
    state::AuthConfig,
    storage,
    token::SessionPayload,
    types::{Role, UpdateUserRequest, UserResponse},
};

#[utoipa::path(
    put,
    path = "/api/auth/update-user",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid user data"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Cannot update another user's data"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn update_user(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<UpdateUserRequest>>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), AuthError> {
    let Some(current) = cookie::read(&headers, &config) else {
        return Err(AuthError::Unauthorized);
    };
    let Some(Json(request)) = payload else {
        return Err(AuthError::BadRequest("Invalid user data"));
    };
    let update = request.user_data;

    let updating_self = update.id == current.user.id;
    if !updating_self {
        match current.user.user_role {
            Role::Admin => {}
            Role::Innovator | Role::Mentor | Role::Other => {
                return Err(AuthError::Forbidden("Cannot update another user's data"));
            }
        }
    }

    let Some(user) = storage::update_profile(&pool, update.id, &update)
        .await
        .map_err(AuthError::Internal)?
    else {
        return Err(AuthError::BadRequest("Invalid user data"));
    };

    let mut response_headers = HeaderMap::new();
    if updating_self {
        // Refresh the session so the cookie snapshot matches the new profile.
        let session = SessionPayload::new(user.clone(), config.refresh_ttl_seconds());
        cookie::issue(&mut response_headers, &session, &config).map_err(AuthError::Internal)?;
    }

    Ok((StatusCode::OK, response_headers, Json(UserResponse { user })))
}
