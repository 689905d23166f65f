//! Authentication models

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Names accepted by [`User::field`] and [`User::set_field`]
pub const USER_FIELDS: &[&str] = &[
    "id",
    "email",
    "hashed_password",
    "session_id",
    "reset_token",
];

/// User account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login email, unique across the store
    pub email: String,
    /// bcrypt hash of the password
    pub hashed_password: String,
    /// Session currently bound to this account, if logged in
    #[serde(default)]
    pub session_id: Option<String>,
    /// Outstanding password reset token
    #[serde(default)]
    pub reset_token: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the record was last changed
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            hashed_password,
            session_id: None,
            reset_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read a field by column name.
    ///
    /// Returns `Ok(None)` for an unset optional field and
    /// [`Error::UnknownField`] for a name that is not a column.
    pub fn field(&self, name: &str) -> Result<Option<&str>> {
        match name {
            "id" => Ok(Some(&self.id)),
            "email" => Ok(Some(&self.email)),
            "hashed_password" => Ok(Some(&self.hashed_password)),
            "session_id" => Ok(self.session_id.as_deref()),
            "reset_token" => Ok(self.reset_token.as_deref()),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }

    /// Write a field by column name. `id` is immutable and the required
    /// columns cannot be cleared.
    pub fn set_field(&mut self, name: &str, value: Option<String>) -> Result<()> {
        match (name, value) {
            ("email", Some(v)) => self.email = v,
            ("hashed_password", Some(v)) => self.hashed_password = v,
            ("session_id", v) => self.session_id = v,
            ("reset_token", v) => self.reset_token = v,
            ("id" | "email" | "hashed_password", _) => {
                return Err(Error::InvalidField(name.to_string()))
            }
            (other, _) => return Err(Error::UnknownField(other.to_string())),
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether every `(field, value)` pair matches this record
    pub fn matches(&self, criteria: &[(&str, &str)]) -> Result<bool> {
        for (name, expected) in criteria {
            if self.field(name)? != Some(*expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Registration / login form
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Password reset request form
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequestForm {
    #[serde(default)]
    pub email: Option<String>,
}

/// Password update form
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePasswordForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// User information in responses; never carries the password hash
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
