//! Authentication and session handling.
//!
//! Flow overview: login verifies credentials against the user store, mints a
//! signed [`token::SessionPayload`], and sets the cookie pair through
//! [`cookie`]. Every later request reconstructs the session from the cookie;
//! the route guard in [`crate::api::guard`] consumes the same codec. Logout
//! deletes the cookies; there is no server-side session state to revoke.

pub mod cookie;
pub mod error;
pub mod login;
pub mod session;
pub mod signup;
pub mod state;
pub mod token;
pub mod types;
pub mod update_user;

pub(crate) mod storage;

pub use self::error::AuthError;
pub use self::state::AuthConfig;
