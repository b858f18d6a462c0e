//! OpenAPI document for the served routes, driven by the `#[utoipa::path]`
//! annotations on the handlers. Undocumented routes (`/`, the Swagger UI)
//! stay out on purpose.

use utoipa::OpenApi;

use crate::api::handlers::auth::types::{
    LoginRequest, LogoutResponse, Role, SessionStatus, SignupRequest, UpdateUserRequest,
    UserResponse, UserSnapshot, UserUpdate,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "odrlab",
        description = "ODR Lab platform API: authentication and role-gated access"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::login::login,
        crate::api::handlers::auth::signup::signup,
        crate::api::handlers::auth::session::session,
        crate::api::handlers::auth::session::logout,
        crate::api::handlers::auth::update_user::update_user,
    ),
    components(schemas(
        Role,
        UserSnapshot,
        LoginRequest,
        SignupRequest,
        UpdateUserRequest,
        UserUpdate,
        UserResponse,
        SessionStatus,
        LogoutResponse,
    )),
    tags(
        (name = "auth", description = "Login, signup, session, and profile updates"),
        (name = "health", description = "Service liveness and build info"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_auth_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in [
            "/health",
            "/api/auth/login",
            "/api/auth/signup",
            "/api/auth/session",
            "/api/auth/logout",
            "/api/auth/update-user",
        ] {
            assert!(paths.contains(&path), "missing path: {path}");
        }
    }
}
