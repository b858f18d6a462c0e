//! Session introspection and logout. Both are stateless: the session lives
//! entirely in the cookie, so there is nothing server-side to look up or
//! delete.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::{
    cookie,
    state::AuthConfig,
    types::{LogoutResponse, SessionStatus},
};

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionStatus),
        (status = 401, description = "No active session", body = SessionStatus),
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    config: Extension<Arc<AuthConfig>>,
) -> impl IntoResponse {
    match cookie::read(&headers, &config) {
        Some(payload) => (
            StatusCode::OK,
            Json(SessionStatus {
                authenticated: true,
                user: Some(payload.user),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(SessionStatus {
                authenticated: false,
                user: None,
            }),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse),
    ),
    tag = "auth"
)]
pub async fn logout(config: Extension<Arc<AuthConfig>>) -> impl IntoResponse {
    // Always clear both cookies, whether or not a session was present.
    let mut headers = HeaderMap::new();
    cookie::clear(&mut headers, &config);
    (StatusCode::OK, headers, Json(LogoutResponse { success: true }))
}
