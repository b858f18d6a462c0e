//! Request/response types for the auth endpoints.
//!
//! JSON field names are camelCase (`userRole`, `contactNumber`, ...) to match
//! the platform's existing wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Platform roles. Closed set; every gate matches on it exhaustively so a new
/// role is a compile-time-checked change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Innovator,
    Mentor,
    Admin,
    Other,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Innovator => "INNOVATOR",
            Self::Mentor => "MENTOR",
            Self::Admin => "ADMIN",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INNOVATOR" => Ok(Self::Innovator),
            "MENTOR" => Ok(Self::Mentor),
            "ADMIN" => Ok(Self::Admin),
            "OTHER" => Ok(Self::Other),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subset of a user row safe to send to the client. The password hash never
/// appears here by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_role: Role,
    pub mentor_approved: bool,
    pub contact_number: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub odr_lab_usage: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_role: Option<Role>,
    pub contact_number: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub odr_lab_usage: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_data: UserUpdate,
}

/// Profile fields a user may change about themself. Role, email, and password
/// are deliberately absent; those move through other flows.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub id: Uuid,
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub odr_lab_usage: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub user: UserSnapshot,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSnapshot>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LogoutResponse {
    pub success: bool,
}
