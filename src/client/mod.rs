//! Client-side auth context.
//!
//! Holds the session cookie and a cached copy of the signed-in user for one
//! application instance; construct it once and pass it by reference. The
//! cached snapshot exists for rendering decisions only. `refresh()` re-reads
//! the session endpoint, which is the source of truth; nothing here is an
//! authorization boundary.

use anyhow::{bail, Context, Result};
use reqwest::{
    header::{COOKIE, SET_COOKIE},
    StatusCode,
};
use serde_json::json;

use crate::api::handlers::auth::cookie::SESSION_COOKIE_NAME;
use crate::api::handlers::auth::types::{SessionStatus, UserResponse, UserSnapshot};

pub struct AuthContext {
    base_url: String,
    http: reqwest::Client,
    session_cookie: Option<String>,
    user: Option<UserSnapshot>,
}

impl AuthContext {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session_cookie: None,
            user: None,
        })
    }

    /// Locally cached user. May be stale; call [`refresh`](Self::refresh)
    /// before trusting it for anything beyond rendering.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserSnapshot> {
        self.user.as_ref()
    }

    /// Sign in and capture the session cookie from the response.
    ///
    /// # Errors
    /// Returns an error on transport failure or any non-200 status.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserSnapshot> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .context("login request failed")?;

        if response.status() != StatusCode::OK {
            bail!("login failed: {}", response.status());
        }

        self.session_cookie = extract_set_cookie(response.headers(), SESSION_COOKIE_NAME);
        let body: UserResponse = response.json().await.context("invalid login response")?;
        self.user = Some(body.user.clone());
        Ok(body.user)
    }

    /// Re-read the session endpoint and replace the cached snapshot with
    /// whatever the server says, including "no session".
    ///
    /// # Errors
    /// Returns an error on transport failure or an unexpected status; only a
    /// definitive 401 clears the cache, so a server outage never reads as
    /// "signed out".
    pub async fn refresh(&mut self) -> Result<Option<&UserSnapshot>> {
        let mut request = self
            .http
            .get(format!("{}/api/auth/session", self.base_url));
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
        }
        let response = request.send().await.context("session request failed")?;

        match response.status() {
            StatusCode::OK => {
                let status: SessionStatus =
                    response.json().await.context("invalid session response")?;
                self.user = status.user;
            }
            StatusCode::UNAUTHORIZED => self.user = None,
            status => bail!("session check failed: {status}"),
        }
        Ok(self.user.as_ref())
    }

    /// Clear the server session and the local mirror. Safe to call twice.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn logout(&mut self) -> Result<()> {
        let mut request = self
            .http
            .post(format!("{}/api/auth/logout", self.base_url));
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
        }
        request.send().await.context("logout request failed")?;
        self.session_cookie = None;
        self.user = None;
        Ok(())
    }
}

/// Pull a named cookie value out of `Set-Cookie` response headers. A cleared
/// cookie (empty value) reads as `None`.
fn extract_set_cookie(headers: &reqwest::header::HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(SET_COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        let Some(pair) = value.split(';').next() else {
            continue;
        };
        let mut parts = pair.splitn(2, '=');
        if parts.next().map(str::trim) == Some(name) {
            let cookie = parts.next().unwrap_or_default().trim();
            if !cookie.is_empty() {
                return Some(cookie.to_string());
            }
        }
    }
    None
}
