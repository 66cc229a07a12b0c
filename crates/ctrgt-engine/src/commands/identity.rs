//! User registration and authentication
//!
//! Plaintext passwords only ever exist inside `Sensitive` and are handed
//! straight to the `CredentialHasher`. Stored credentials never leave this
//! module: every record returned to a caller is redacted first.

#![allow(clippy::result_large_err)]

use crate::commands::elapsed_ms;
use crate::commands::records::create_impl;
use ctrgt_core::credentials::CredentialHasher;
use ctrgt_core::errors::{invalid_credentials, ExError, ExErrorKind, RecordError};
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_core::registry::{EntityRegistry, USERNAME_FIELD, USER_ACTIVE_FIELD, USER_GROUP_FIELD};
use ctrgt_core::{log_op_end, log_op_error, log_op_start};
use ctrgt_core_types::Sensitive;
use ctrgt_store::errors::Result;
use ctrgt_store::RecordRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_USER_GROUP: &str = "standard";

/// New account details
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: Sensitive<String>,
    #[serde(default)]
    pub user_group: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, password: impl Into<Sensitive<String>>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_group: None,
            is_active: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.user_group = Some(group.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

/// The caller-safe view of a freshly registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub user_group: String,
    pub is_active: bool,
}

/// Register a user with a hashed credential
///
/// ## Errors
///
/// - `Validation`: empty password, or a username that is empty or has
///   leading/trailing whitespace
/// - `Conflict`: username (or email) already taken
/// - `Persistence`: database error
pub fn user_register(
    conn: &Connection,
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    request: RegisterRequest,
) -> Result<PublicUser> {
    log_op_start!("user_register", username = request.username.as_str());
    let start = Instant::now();
    let username = request.username.clone();

    let user = register_impl(conn, registry, hasher, request).map_err(|e| {
        log_op_error!(
            "user_register",
            &e,
            duration_ms = elapsed_ms(start),
            username = username.as_str()
        );
        e
    })?;

    log_op_end!(
        "user_register",
        duration_ms = elapsed_ms(start),
        username = username.as_str(),
        user_id = user.id
    );
    Ok(user)
}

fn register_impl(
    conn: &Connection,
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    request: RegisterRequest,
) -> Result<PublicUser> {
    let users = registry.users();
    let credential_field = users.credential_field.ok_or_else(|| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("user_register")
            .with_collection(users.name)
            .with_message("users collection declares no credential field")
    })?;

    let username = request.username.as_str();
    if username.trim().is_empty() {
        return Err(missing(USERNAME_FIELD));
    }
    // Login matches names exactly
    if username.trim() != username {
        return Err(RecordError::UntrimmedValue {
            field: USERNAME_FIELD.to_string(),
        }
        .into());
    }
    if request.password.expose().is_empty() {
        return Err(missing("password"));
    }

    let user_group = request
        .user_group
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_GROUP.to_string());
    let is_active = request.is_active.unwrap_or(true);

    let fields = Record::new()
        .with(USERNAME_FIELD, username)
        .with(credential_field, hasher.hash(request.password.expose())?)
        .with(USER_GROUP_FIELD, user_group.as_str())
        .with(USER_ACTIVE_FIELD, is_active);

    let created = create_impl(conn, users, fields)?;
    let id = created
        .get(ID_FIELD)
        .and_then(FieldValue::as_integer)
        .ok_or_else(|| {
            ExError::new(ExErrorKind::Persistence)
                .with_op("user_register")
                .with_collection(users.name)
                .with_message("storage did not assign an integer id")
        })?;

    Ok(PublicUser {
        id,
        username: username.to_string(),
        user_group,
        is_active,
    })
}

fn missing(field: &str) -> ExError {
    RecordError::MissingField {
        field: field.to_string(),
    }
    .into()
}

/// Check a username/password pair
///
/// Unknown users and wrong passwords fail identically.
///
/// ## Returns
///
/// The user's record without the credential column
///
/// ## Errors
///
/// - `Auth`: invalid credentials
/// - `Persistence`: database error
pub fn user_authenticate(
    conn: &Connection,
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    username: &str,
    password: &Sensitive<String>,
) -> Result<Record> {
    log_op_start!("user_authenticate", username = username);
    let start = Instant::now();

    let user = authenticate_impl(conn, registry, hasher, username, password).map_err(|e| {
        log_op_error!(
            "user_authenticate",
            &e,
            duration_ms = elapsed_ms(start),
            username = username
        );
        e
    })?;

    log_op_end!(
        "user_authenticate",
        duration_ms = elapsed_ms(start),
        username = username
    );
    Ok(user)
}

fn authenticate_impl(
    conn: &Connection,
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    username: &str,
    password: &Sensitive<String>,
) -> Result<Record> {
    let users = registry.users();
    let Some(credential_field) = users.credential_field else {
        return Err(invalid_credentials());
    };

    let mut user = RecordRepo::find_by(conn, users, USERNAME_FIELD, &FieldValue::from(username))?
        .ok_or_else(invalid_credentials)?;

    let verified = user
        .get(credential_field)
        .and_then(FieldValue::as_str)
        .is_some_and(|token| hasher.verify(password.expose(), token));
    if !verified {
        return Err(invalid_credentials());
    }

    users.redact(&mut user);
    Ok(user)
}
