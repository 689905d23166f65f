//! Session management

use super::base::session_cookie;
use super::models::User;
use super::policy::ExpirationPolicy;
use super::request::AuthRequest;
use crate::error::Result;
use crate::store::{SessionStore, UserStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session ID, also the cookie value
    pub id: String,
    /// User owning this session
    pub user_id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a random v4 token
    pub fn new(user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Whether a user id is acceptable as a session owner
fn is_well_formed_id(user_id: &str) -> bool {
    !user_id.is_empty() && !user_id.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Cookie based session authenticator.
///
/// The store decides where sessions live and the policy decides when they
/// lapse; a session is either active or destroyed, and an expired session
/// is destroyed the first time it is looked up.
#[derive(Clone)]
pub struct SessionAuth<S> {
    store: S,
    policy: ExpirationPolicy,
    cookie_name: String,
    users: UserStore,
}

impl<S: SessionStore> SessionAuth<S> {
    pub fn new(
        store: S,
        policy: ExpirationPolicy,
        cookie_name: impl Into<String>,
        users: UserStore,
    ) -> Self {
        Self {
            store,
            policy,
            cookie_name: cookie_name.into(),
            users,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> ExpirationPolicy {
        self.policy
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Open a session for `user_id` and return its token
    pub async fn create_session(&self, user_id: Option<&str>) -> Result<Option<String>> {
        let Some(user_id) = user_id.filter(|id| is_well_formed_id(id)) else {
            return Ok(None);
        };

        let stored = self.store.insert(Session::new(user_id.to_string())).await?;
        tracing::debug!("Created session for user {}", stored.user_id);
        Ok(Some(stored.id))
    }

    /// User id owning a live session.
    ///
    /// An expired session is removed from the store and reported as absent.
    pub async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Result<Option<String>> {
        let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let Some(session) = self.store.get(session_id).await? else {
            return Ok(None);
        };

        if self.policy.is_expired(Utc::now(), session.created_at) {
            self.store.remove(session_id).await?;
            tracing::debug!("Session for user {} expired", session.user_id);
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    /// Destroy the session named by the request's cookie; `true` if one was removed
    pub async fn destroy_session<R: AuthRequest + ?Sized>(&self, request: Option<&R>) -> Result<bool> {
        let Some(session_id) = session_cookie(request, &self.cookie_name) else {
            return Ok(false);
        };
        let removed = self.store.remove(&session_id).await?;
        if removed {
            tracing::debug!("Destroyed session");
        }
        Ok(removed)
    }

    /// Destroy a session by token; `true` if one was removed
    pub async fn revoke(&self, session_id: &str) -> Result<bool> {
        let removed = self.store.remove(session_id).await?;
        if removed {
            tracing::debug!("Revoked session");
        }
        Ok(removed)
    }

    /// User bound to the request's session cookie
    pub async fn current_user<R: AuthRequest + ?Sized>(&self, request: Option<&R>) -> Result<Option<User>> {
        let cookie = session_cookie(request, &self.cookie_name);
        let Some(user_id) = self.user_id_for_session_id(cookie.as_deref()).await? else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id).await)
    }
}
