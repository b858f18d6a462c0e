//! Signup endpoint. Creates the user row; signing in stays a separate,
//! explicit step, so no session is issued here.

use axum::{extract::Extension, http::StatusCode, Json};
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{
    error::AuthError,
    storage::{self, SignupOutcome},
    types::{Role, SignupRequest, UserResponse},
};
use crate::api::handlers::{normalize_email, valid_email};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already in use"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    pool: Extension<PgPool>,
    payload: Option<Json<SignupRequest>>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::BadRequest(
            "Name, email, and password are required.",
        ));
    };
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(AuthError::BadRequest(
            "Name, email, and password are required.",
        ));
    }

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return Err(AuthError::BadRequest("Invalid email address."));
    }

    // Fast path for the common duplicate; the unique constraint below closes
    // the remaining race window.
    if storage::email_exists(&pool, &email)
        .await
        .map_err(AuthError::Internal)?
    {
        return Err(AuthError::EmailInUse);
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|err| AuthError::Internal(err.into()))?;
    let role = request.user_role.unwrap_or(Role::Innovator);

    match storage::insert_user(&pool, &request, &email, &password_hash, role)
        .await
        .map_err(AuthError::Internal)?
    {
        SignupOutcome::Created(user) => {
            debug!("user created: {}", user.email);
            Ok((StatusCode::CREATED, Json(UserResponse { user })))
        }
        SignupOutcome::Conflict => Err(AuthError::EmailInUse),
    }
}
