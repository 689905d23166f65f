//! HTTP Basic authentication

use super::base::authorization_header;
use super::models::User;
use super::password::PasswordHasher;
use super::request::AuthRequest;
use crate::error::Result;
use crate::store::UserStore;
use base64::{engine::general_purpose::STANDARD, Engine};

const BASIC_PREFIX: &str = "Basic ";

/// Base64 part of a `Basic` authorization header
pub fn extract_base64_authorization_header(header: &str) -> Option<&str> {
    header.strip_prefix(BASIC_PREFIX)
}

/// Decode base64 into UTF-8 text; malformed input yields `None`
pub fn decode_base64_authorization_header(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Split `email:password` at the first colon
pub fn extract_user_credentials(decoded: &str) -> Option<(String, String)> {
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

/// Email and password carried by a `Basic` authorization header
pub fn decode_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = extract_base64_authorization_header(header)?;
    let decoded = decode_base64_authorization_header(encoded)?;
    extract_user_credentials(&decoded)
}

/// Authenticates requests carrying `Authorization: Basic ...`
#[derive(Clone)]
pub struct BasicAuth {
    users: UserStore,
    hasher: PasswordHasher,
}

impl BasicAuth {
    pub fn new(users: UserStore, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// First user with `email` whose stored hash accepts `password`
    pub async fn user_object_from_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let candidates = self.users.find_all(&[("email", email)]).await?;
        Ok(candidates
            .into_iter()
            .find(|user| self.hasher.verify(password, &user.hashed_password)))
    }

    /// User identified by the request's Basic credentials
    pub async fn current_user<R: AuthRequest + ?Sized>(&self, request: Option<&R>) -> Result<Option<User>> {
        let Some(header) = authorization_header(request) else {
            return Ok(None);
        };
        let Some((email, password)) = decode_basic_credentials(&header) else {
            return Ok(None);
        };
        self.user_object_from_credentials(&email, &password).await
    }
}
