//! Cookie gateway: binds session tokens to HTTP cookie semantics.
//!
//! Two cookies travel together and are always written or cleared as a pair:
//! `session` is the authoritative signed token, `HttpOnly` so page scripts
//! cannot read it; `currentUser` mirrors just the user snapshot for
//! optimistic rendering and is never consulted for authorization.

use anyhow::{Context, Result};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use base64ct::{Base64UrlUnpadded, Encoding};

use super::state::AuthConfig;
use super::token::{self, SessionPayload};

pub const SESSION_COOKIE_NAME: &str = "session";
pub const MIRROR_COOKIE_NAME: &str = "currentUser";

/// Set both cookies for a freshly minted payload. `Max-Age` is derived from
/// the payload itself so the cookie and the embedded expiry cannot diverge.
pub fn issue(headers: &mut HeaderMap, payload: &SessionPayload, config: &AuthConfig) -> Result<()> {
    let token = token::encode(payload, config.signing_key())?;
    let snapshot =
        serde_json::to_vec(&payload.user).context("failed to serialize user snapshot")?;
    let mirror = Base64UrlUnpadded::encode_string(&snapshot);
    let max_age = payload.ttl_seconds();
    let secure = config.session_cookie_secure();

    headers.append(
        SET_COOKIE,
        set_cookie(SESSION_COOKIE_NAME, &token, max_age, true, secure)
            .context("failed to build session cookie")?,
    );
    headers.append(
        SET_COOKIE,
        set_cookie(MIRROR_COOKIE_NAME, &mirror, max_age, false, secure)
            .context("failed to build mirror cookie")?,
    );

    Ok(())
}

/// Extract and verify the session cookie. Missing, malformed, forged, and
/// expired cookies all read as `None`; callers never learn which it was.
#[must_use]
pub fn read(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionPayload> {
    let value = extract_cookie(headers, SESSION_COOKIE_NAME)?;
    token::decode(&value, config.signing_key()).filter(|payload| !payload.is_expired())
}

/// Delete both cookies. Clearing an absent cookie is not an error.
pub fn clear(headers: &mut HeaderMap, config: &AuthConfig) {
    let secure = config.session_cookie_secure();
    for name in [SESSION_COOKIE_NAME, MIRROR_COOKIE_NAME] {
        // HttpOnly on the deletion marker matches the cookie being deleted.
        let http_only = name == SESSION_COOKIE_NAME;
        if let Ok(value) = set_cookie(name, "", 0, http_only, secure) {
            headers.append(SET_COOKIE, value);
        }
    }
}

fn set_cookie(
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie.push_str(&format!("; SameSite=Lax; Max-Age={max_age}"));
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::types::{tests::snapshot, Role};
    use super::*;
    use secrecy::SecretString;

    fn config(frontend: &str) -> AuthConfig {
        AuthConfig::new(frontend.to_string(), SecretString::from("cookie-test-key"))
    }

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }

    /// Turn the Set-Cookie pairs from `issue` into a request Cookie header.
    fn as_request(headers: &HeaderMap) -> HeaderMap {
        let pairs: Vec<String> = set_cookies(headers)
            .iter()
            .filter_map(|c| c.split(';').next().map(str::to_string))
            .collect();
        let mut request = HeaderMap::new();
        request.insert(COOKIE, pairs.join("; ").parse().unwrap());
        request
    }

    #[test]
    fn issue_writes_both_cookies_with_attributes() -> anyhow::Result<()> {
        let config = config("https://odrlab.dev");
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let mut headers = HeaderMap::new();
        issue(&mut headers, &payload, &config)?;

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("session="));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("SameSite=Lax"));
        assert!(cookies[0].contains("Max-Age=3600"));
        assert!(cookies[0].contains("Secure"));
        assert!(cookies[1].starts_with("currentUser="));
        assert!(!cookies[1].contains("HttpOnly"));
        assert!(cookies[1].contains("Max-Age=3600"));
        Ok(())
    }

    #[test]
    fn secure_flag_absent_for_plain_http_frontend() -> anyhow::Result<()> {
        let config = config("http://localhost:3000");
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let mut headers = HeaderMap::new();
        issue(&mut headers, &payload, &config)?;
        assert!(set_cookies(&headers).iter().all(|c| !c.contains("Secure")));
        Ok(())
    }

    #[test]
    fn read_round_trips_issued_cookie() -> anyhow::Result<()> {
        let config = config("https://odrlab.dev");
        let payload = SessionPayload::new(snapshot(Role::Mentor), 3600);
        let mut headers = HeaderMap::new();
        issue(&mut headers, &payload, &config)?;

        let request = as_request(&headers);
        assert_eq!(read(&request, &config), Some(payload));
        Ok(())
    }

    #[test]
    fn read_rejects_expired_session() -> anyhow::Result<()> {
        let config = config("https://odrlab.dev");
        let payload = SessionPayload::new(snapshot(Role::Mentor), -60);
        let token = token::encode(&payload, config.signing_key())?;
        let mut request = HeaderMap::new();
        request.insert(COOKIE, format!("session={token}").parse()?);
        assert_eq!(read(&request, &config), None);
        Ok(())
    }

    #[test]
    fn read_ignores_mirror_cookie() -> anyhow::Result<()> {
        // An attacker-controlled mirror cookie alone must not authenticate.
        let config = config("https://odrlab.dev");
        let snapshot = serde_json::to_vec(&snapshot(Role::Admin))?;
        let mirror = Base64UrlUnpadded::encode_string(&snapshot);
        let mut request = HeaderMap::new();
        request.insert(COOKIE, format!("currentUser={mirror}").parse()?);
        assert_eq!(read(&request, &config), None);
        Ok(())
    }

    #[test]
    fn mirror_cookie_decodes_to_snapshot_without_secrets() -> anyhow::Result<()> {
        let config = config("https://odrlab.dev");
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let mut headers = HeaderMap::new();
        issue(&mut headers, &payload, &config)?;

        let mirror = set_cookies(&headers)[1]
            .trim_start_matches("currentUser=")
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let json = Base64UrlUnpadded::decode_vec(&mirror).expect("mirror is base64url");
        let value: serde_json::Value = serde_json::from_slice(&json)?;
        assert_eq!(
            value.get("email").and_then(serde_json::Value::as_str),
            Some(payload.user.email.as_str())
        );
        assert!(value.get("password").is_none());
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() {
        let config = config("https://odrlab.dev");
        let mut first = HeaderMap::new();
        clear(&mut first, &config);
        let mut second = HeaderMap::new();
        clear(&mut second, &config);

        assert_eq!(set_cookies(&first), set_cookies(&second));
        let cookies = set_cookies(&first);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
        assert!(cookies[0].starts_with("session="));
        assert!(cookies[1].starts_with("currentUser="));
    }
}
