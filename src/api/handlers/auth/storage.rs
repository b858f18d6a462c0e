//! Database access for the user store.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{Role, SignupRequest, UserSnapshot, UserUpdate};

const SNAPSHOT_COLUMNS: &str = "id, name, email, user_role, mentor_approved, contact_number, \
     city, country, institution, highest_education, odr_lab_usage, created_at";

/// Row needed to verify a login attempt. The hash stays in this module; only
/// the snapshot ever leaves.
pub(super) struct CredentialRecord {
    pub(super) password_hash: String,
    pub(super) user: UserSnapshot,
}

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(UserSnapshot),
    Conflict,
}

fn snapshot_from_row(row: &PgRow) -> Result<UserSnapshot> {
    let role: String = row.get("user_role");
    Ok(UserSnapshot {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        // Unknown role strings are a data bug, not a client error.
        user_role: role.parse::<Role>().context("invalid role in user row")?,
        mentor_approved: row.get("mentor_approved"),
        contact_number: row.get("contact_number"),
        city: row.get("city"),
        country: row.get("country"),
        institution: row.get("institution"),
        highest_education: row.get("highest_education"),
        odr_lab_usage: row.get("odr_lab_usage"),
        created_at: row.get("created_at"),
    })
}

/// Look up a user by normalized email for credential verification.
pub(super) async fn lookup_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>> {
    let query = format!("SELECT password_hash, {SNAPSHOT_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    row.map(|row| {
        Ok(CredentialRecord {
            password_hash: row.get("password_hash"),
            user: snapshot_from_row(&row)?,
        })
    })
    .transpose()
}

/// Pre-check for signup. Racing signups are resolved by the unique constraint
/// in [`insert_user`]; this only exists to give the common case a clean 409.
pub(super) async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "SELECT 1 FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check email existence")?;
    Ok(row.is_some())
}

pub(super) async fn insert_user(
    pool: &PgPool,
    request: &SignupRequest,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<SignupOutcome> {
    let query = format!(
        "INSERT INTO users \
             (name, email, password_hash, user_role, contact_number, city, country, \
              institution, highest_education, odr_lab_usage) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {SNAPSHOT_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(&request.name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(&request.contact_number)
        .bind(&request.city)
        .bind(&request.country)
        .bind(&request.institution)
        .bind(&request.highest_education)
        .bind(&request.odr_lab_usage)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(snapshot_from_row(&row)?)),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Apply a profile update; absent fields keep their current value. Returns
/// `None` when the row no longer exists.
pub(super) async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &UserUpdate,
) -> Result<Option<UserSnapshot>> {
    let query = format!(
        "UPDATE users SET \
             name = COALESCE($2, name), \
             contact_number = COALESCE($3, contact_number), \
             city = COALESCE($4, city), \
             country = COALESCE($5, country), \
             institution = COALESCE($6, institution), \
             highest_education = COALESCE($7, highest_education), \
             odr_lab_usage = COALESCE($8, odr_lab_usage) \
         WHERE id = $1 \
         RETURNING {SNAPSHOT_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(&update.name)
        .bind(&update.contact_number)
        .bind(&update.city)
        .bind(&update.country)
        .bind(&update.institution)
        .bind(&update.highest_education)
        .bind(&update.odr_lab_usage)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update user profile")?;

    row.as_ref().map(snapshot_from_row).transpose()
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
