//! Route guard: ordered access policy evaluated once per incoming request.
//!
//! Two prefix tables drive the decision: paths requiring any authenticated
//! session, and paths additionally requiring the `ADMIN` role. Anything
//! matching neither table is open. The ordering is fixed and observable:
//! missing/invalid/expired session on a guarded path is 401 before any role
//! check; authenticated but under-privileged on an admin path is 403.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::handlers::auth::{cookie, token::SessionPayload, types::Role, AuthConfig};

/// Prefix tables for guarded routes. Supplied as configuration; defaults
/// match the platform's API surface.
#[derive(Clone, Debug)]
pub struct RoutePolicy {
    protected: Vec<String>,
    admin: Vec<String>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(
            [
                "/api/ideas",
                "/api/meetings",
                "/api/submit-idea",
                "/api/chatbot",
                "/api/odrlabs",
                "/api/admin",
            ],
            ["/api/admin"],
        )
    }
}

/// Outcome of evaluating a request path against the policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    /// Path matches neither table; the guard steps aside.
    Open,
    Granted,
    Unauthorized,
    Forbidden,
}

impl RoutePolicy {
    pub fn new<P, A>(protected: P, admin: A) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            protected: protected.into_iter().map(Into::into).collect(),
            admin: admin.into_iter().map(Into::into).collect(),
        }
    }

    /// Pure decision function; the middleware below only maps its result onto
    /// HTTP responses.
    #[must_use]
    pub fn evaluate(&self, path: &str, session: Option<&SessionPayload>) -> Access {
        let requires_auth = matches_prefix(&self.protected, path);
        let requires_admin = matches_prefix(&self.admin, path);

        if !requires_auth && !requires_admin {
            return Access::Open;
        }

        let Some(session) = session.filter(|s| !s.is_expired()) else {
            return Access::Unauthorized;
        };

        if requires_admin {
            match session.user.user_role {
                Role::Admin => {}
                Role::Innovator | Role::Mentor | Role::Other => return Access::Forbidden,
            }
        }

        Access::Granted
    }
}

fn matches_prefix(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Axum middleware enforcing [`RoutePolicy`] over the whole router. On a
/// granted request the decoded payload is attached to request extensions so
/// handlers do not decode the cookie twice.
pub async fn guard(State(config): State<Arc<AuthConfig>>, mut req: Request, next: Next) -> Response {
    let session = cookie::read(req.headers(), &config);
    match config.policy().evaluate(req.uri().path(), session.as_ref()) {
        Access::Open => next.run(req).await,
        Access::Granted => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        Access::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response(),
        Access::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Insufficient permissions"})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::types::tests::snapshot;

    fn session(role: Role, ttl_seconds: i64) -> SessionPayload {
        SessionPayload::new(snapshot(role), ttl_seconds)
    }

    #[test]
    fn unmatched_paths_are_open() {
        let policy = RoutePolicy::default();
        assert_eq!(policy.evaluate("/", None), Access::Open);
        assert_eq!(policy.evaluate("/health", None), Access::Open);
        assert_eq!(policy.evaluate("/api/auth/login", None), Access::Open);
    }

    #[test]
    fn guarded_path_without_session_is_unauthorized() {
        let policy = RoutePolicy::default();
        assert_eq!(policy.evaluate("/api/ideas", None), Access::Unauthorized);
        assert_eq!(
            policy.evaluate("/api/ideas/42/comments", None),
            Access::Unauthorized
        );
    }

    #[test]
    fn admin_path_without_session_is_unauthorized_not_forbidden() {
        // 401 always wins over 403 when there is no session at all.
        let policy = RoutePolicy::default();
        assert_eq!(policy.evaluate("/api/admin", None), Access::Unauthorized);
    }

    #[test]
    fn admin_path_with_non_admin_session_is_forbidden() {
        let policy = RoutePolicy::default();
        for role in [Role::Innovator, Role::Mentor, Role::Other] {
            assert_eq!(
                policy.evaluate("/api/admin/users", Some(&session(role, 3600))),
                Access::Forbidden,
                "role: {role}"
            );
        }
    }

    #[test]
    fn admin_path_with_admin_session_is_granted() {
        let policy = RoutePolicy::default();
        assert_eq!(
            policy.evaluate("/api/admin/users", Some(&session(Role::Admin, 3600))),
            Access::Granted
        );
    }

    #[test]
    fn protected_path_with_any_session_is_granted() {
        let policy = RoutePolicy::default();
        for role in [Role::Innovator, Role::Mentor, Role::Admin, Role::Other] {
            assert_eq!(
                policy.evaluate("/api/ideas", Some(&session(role, 3600))),
                Access::Granted
            );
        }
    }

    #[test]
    fn expired_session_counts_as_no_session() {
        let policy = RoutePolicy::default();
        assert_eq!(
            policy.evaluate("/api/ideas", Some(&session(Role::Admin, -60))),
            Access::Unauthorized
        );
        assert_eq!(
            policy.evaluate("/api/admin", Some(&session(Role::Admin, -60))),
            Access::Unauthorized
        );
    }

    #[test]
    fn custom_tables_override_defaults() {
        let policy = RoutePolicy::new(["/internal"], ["/internal/ops"]);
        assert_eq!(policy.evaluate("/api/ideas", None), Access::Open);
        assert_eq!(policy.evaluate("/internal", None), Access::Unauthorized);
        assert_eq!(
            policy.evaluate("/internal/ops", Some(&session(Role::Mentor, 3600))),
            Access::Forbidden
        );
    }
}
