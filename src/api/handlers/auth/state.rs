//! Auth configuration shared by the handlers and the route guard.

use secrecy::{ExposeSecret, SecretString};

use crate::api::guard::RoutePolicy;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_secret: SecretString,
    session_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    policy: RoutePolicy,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String, session_secret: SecretString) -> Self {
        Self {
            frontend_base_url,
            session_secret,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            policy: RoutePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_route_policy(mut self, policy: RoutePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Cookie lifetime at login.
    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Shorter cookie lifetime when a session is reissued by a profile update.
    #[must_use]
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    #[must_use]
    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// Key material for the session HMAC.
    pub(crate) fn signing_key(&self) -> &[u8] {
        self.session_secret.expose_secret().as_bytes()
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}
