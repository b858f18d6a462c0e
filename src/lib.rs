//! # ODR Lab platform API
//!
//! `odrlab` is the backend for the ODR Lab platform, where innovators,
//! mentors, and admins collaborate on dispute-resolution ideas. This crate
//! covers the authentication and authorization slice:
//!
//! - **Sessions** are stateless signed cookies: the payload (user snapshot +
//!   issued-at + expiry) is serialized, signed with HMAC-SHA256 under a
//!   server-held secret, and reconstructed from the cookie on every request.
//!   Nothing is persisted server-side; logout deletes the cookie.
//! - Two cookies are always written together: `session` (`HttpOnly`, the
//!   authoritative signed token) and `currentUser` (browser-readable mirror
//!   of the user snapshot, for optimistic rendering only).
//! - **Roles** (`INNOVATOR`, `MENTOR`, `ADMIN`, `OTHER`) are a closed enum;
//!   route prefixes requiring authentication or the `ADMIN` role are gated
//!   by a middleware evaluated once per request, 401 before 403.
//! - Login and signup verify against a PostgreSQL user store with bcrypt
//!   password hashes. Unknown email and wrong password are deliberately
//!   indistinguishable to the caller.

pub mod api;
pub mod cli;
pub mod client;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
