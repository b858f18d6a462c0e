//! Session token codec.
//!
//! A session is a pure value: the user snapshot plus issued-at and expiry
//! timestamps, reconstructed from the cookie on every request and never
//! persisted server-side. The transport form is `base64url(json)` followed by
//! `.` and a base64url HMAC-SHA256 over the body, keyed by a server-held
//! secret. The platform's earlier incarnation shipped the same JSON unsigned;
//! such legacy cookies fail the MAC check and read as "no session".

use anyhow::{anyhow, Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::types::UserSnapshot;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: UserSnapshot,
    pub iat: DateTime<Utc>,
    pub exp: DateTime<Utc>,
}

impl SessionPayload {
    /// Mint a payload expiring `ttl_seconds` from now.
    #[must_use]
    pub fn new(user: UserSnapshot, ttl_seconds: i64) -> Self {
        let iat = Utc::now();
        Self {
            user,
            iat,
            exp: iat + Duration::seconds(ttl_seconds),
        }
    }

    /// An expired payload is treated as absent everywhere.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now()
    }

    /// Total payload lifetime (`exp - iat`) in seconds, clamped at zero; not
    /// the time remaining. Drives the cookie `Max-Age` so the cookie and the
    /// payload cannot disagree on lifetime.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        (self.exp - self.iat).num_seconds().max(0)
    }
}

/// Serialize and sign a payload into the cookie value.
pub fn encode(payload: &SessionPayload, key: &[u8]) -> Result<String> {
    let json = serde_json::to_vec(payload).context("failed to serialize session payload")?;
    let body = Base64UrlUnpadded::encode_string(&json);
    let mac = sign(key, body.as_bytes())?;
    Ok(format!("{body}.{}", Base64UrlUnpadded::encode_string(&mac)))
}

/// Inverse of [`encode`]. Returns `None` for anything malformed, forged, or
/// signed under a different key; callers treat that as "no session". Total
/// over arbitrary client input.
#[must_use]
pub fn decode(token: &str, key: &[u8]) -> Option<SessionPayload> {
    let (body, mac_b64) = token.split_once('.')?;
    let mac = Base64UrlUnpadded::decode_vec(mac_b64).ok()?;
    let mut hmac = HmacSha256::new_from_slice(key).ok()?;
    hmac.update(body.as_bytes());
    // Constant-time comparison.
    hmac.verify_slice(&mac).ok()?;
    let json = Base64UrlUnpadded::decode_vec(body).ok()?;
    serde_json::from_slice(&json).ok()
}

fn sign(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("invalid signing key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::super::types::{tests::snapshot, Role};
    use super::*;

    const KEY: &[u8] = b"unit-test-signing-key";

    #[test]
    fn round_trip() -> Result<()> {
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let token = encode(&payload, KEY)?;
        assert_eq!(decode(&token, KEY), Some(payload));
        Ok(())
    }

    #[test]
    fn tampered_body_is_rejected() -> Result<()> {
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let token = encode(&payload, KEY)?;
        // Flip a character in the signed body.
        let mut chars: Vec<char> = token.chars().collect();
        chars[5] = if chars[5] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();
        assert_eq!(decode(&tampered, KEY), None);
        Ok(())
    }

    #[test]
    fn foreign_key_is_rejected() -> Result<()> {
        let payload = SessionPayload::new(snapshot(Role::Admin), 3600);
        let token = encode(&payload, b"some-other-key")?;
        assert_eq!(decode(&token, KEY), None);
        Ok(())
    }

    #[test]
    fn legacy_unsigned_cookie_is_rejected() -> Result<()> {
        // The old platform stored bare base64 JSON with no MAC.
        let payload = SessionPayload::new(snapshot(Role::Admin), 3600);
        let unsigned = Base64UrlUnpadded::encode_string(&serde_json::to_vec(&payload)?);
        assert_eq!(decode(&unsigned, KEY), None);
        Ok(())
    }

    #[test]
    fn garbage_inputs_decode_to_none() {
        for input in ["", ".", "..", "not-a-token", "a.b", "%%%.%%%"] {
            assert_eq!(decode(input, KEY), None, "input: {input:?}");
        }
    }

    #[test]
    fn valid_mac_over_non_json_body_is_rejected() -> Result<()> {
        let body = Base64UrlUnpadded::encode_string(b"not json at all");
        let mac = sign(KEY, body.as_bytes())?;
        let token = format!("{body}.{}", Base64UrlUnpadded::encode_string(&mac));
        assert_eq!(decode(&token, KEY), None);
        Ok(())
    }

    #[test]
    fn expiry_semantics() {
        let live = SessionPayload::new(snapshot(Role::Innovator), 3600);
        assert!(!live.is_expired());
        assert_eq!(live.ttl_seconds(), 3600);

        let expired = SessionPayload::new(snapshot(Role::Innovator), -60);
        assert!(expired.is_expired());
        assert_eq!(expired.ttl_seconds(), 0);
    }

    #[test]
    fn ttl_is_total_lifetime_not_time_remaining() {
        // Shift a one-hour payload ten minutes into the past; its lifetime
        // stays one hour even though less time remains until expiry.
        let mut payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        payload.iat -= Duration::seconds(600);
        payload.exp -= Duration::seconds(600);
        assert_eq!(payload.ttl_seconds(), 3600);
    }

    #[test]
    fn timestamps_serialize_as_iso8601() -> Result<()> {
        let payload = SessionPayload::new(snapshot(Role::Innovator), 3600);
        let value = serde_json::to_value(&payload)?;
        let exp = value
            .get("exp")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        assert!(exp.contains('T'), "exp should be ISO-8601, got {exp}");
        Ok(())
    }
}
