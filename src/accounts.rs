//! Account lifecycle: registration, login checks, password reset

use crate::auth::{PasswordHasher, User};
use crate::error::{Error, Result};
use crate::store::UserStore;
use uuid::Uuid;

/// Account operations on top of the user store
#[derive(Clone)]
pub struct Accounts {
    users: UserStore,
    hasher: PasswordHasher,
}

impl Accounts {
    pub fn new(users: UserStore, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn hasher(&self) -> PasswordHasher {
        self.hasher
    }

    /// Register a new user; fails with [`Error::UserAlreadyExists`] on a taken email
    pub async fn register_user(&self, email: &str, password: &str) -> Result<User> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(Error::UserAlreadyExists(email.to_string()));
        }
        let hashed = self.hasher.hash(password)?;
        // Racing registrations are settled under the store's write lock
        let user = self
            .users
            .insert_unique(User::new(email.to_string(), hashed))
            .await?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.find_by(&[("email", email)]).await
    }

    /// Whether `password` is correct for the account registered under `email`
    pub async fn valid_login(&self, email: &str, password: &str) -> Result<bool> {
        Ok(self
            .find_user_by_email(email)
            .await?
            .is_some_and(|user| self.hasher.verify(password, &user.hashed_password)))
    }

    /// Record `session_id` as the user's current session
    pub async fn attach_session(&self, user_id: &str, session_id: &str) -> Result<()> {
        self.users
            .update(user_id, &[("session_id", Some(session_id.to_string()))])
            .await
    }

    /// Clear the user's current session
    pub async fn detach_session(&self, user_id: &str) -> Result<()> {
        self.users.update(user_id, &[("session_id", None)]).await
    }

    /// User whose current session is `session_id`
    pub async fn get_user_from_session_id(&self, session_id: Option<&str>) -> Result<Option<User>> {
        match session_id.filter(|id| !id.is_empty()) {
            Some(session_id) => self.users.find_by(&[("session_id", session_id)]).await,
            None => Ok(None),
        }
    }

    /// Issue a single-use password reset token for `email`
    pub async fn get_reset_password_token(&self, email: &str) -> Result<String> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or(Error::UserNotFound)?;
        let token = Uuid::new_v4().to_string();
        self.users
            .update(&user.id, &[("reset_token", Some(token.clone()))])
            .await?;
        Ok(token)
    }

    /// Replace the password of the user holding `reset_token` and burn the token
    pub async fn update_password(&self, reset_token: &str, password: &str) -> Result<()> {
        if reset_token.is_empty() {
            return Err(Error::InvalidResetToken);
        }
        let user = self
            .users
            .find_by(&[("reset_token", reset_token)])
            .await?
            .ok_or(Error::InvalidResetToken)?;
        let hashed = self.hasher.hash(password)?;
        self.users
            .update(
                &user.id,
                &[("hashed_password", Some(hashed)), ("reset_token", None)],
            )
            .await?;
        tracing::info!("Password updated for user {}", user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> Accounts {
        Accounts::new(UserStore::in_memory(), PasswordHasher::new(4))
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let accounts = accounts();
        let user = accounts.register_user("a@x.com", "pw1").await.unwrap();
        assert_ne!(user.hashed_password, "pw1");

        let err = accounts.register_user("a@x.com", "other").await.unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists(email) if email == "a@x.com"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_registrations_keep_email_unique() {
        let accounts = accounts();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let accounts = accounts.clone();
                tokio::spawn(async move { accounts.register_user("a@x.com", "pw").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(Error::UserAlreadyExists(_)) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        let matching = accounts.users().find_all(&[("email", "a@x.com")]).await.unwrap();
        assert_eq!(matching.len(), 1);
    }

    #[tokio::test]
    async fn test_valid_login() {
        let accounts = accounts();
        accounts.register_user("a@x.com", "pw1").await.unwrap();

        assert!(accounts.valid_login("a@x.com", "pw1").await.unwrap());
        assert!(!accounts.valid_login("a@x.com", "wrong").await.unwrap());
        assert!(!accounts.valid_login("nobody@x.com", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_pointer() {
        let accounts = accounts();
        let user = accounts.register_user("a@x.com", "pw1").await.unwrap();

        accounts.attach_session(&user.id, "sess-1").await.unwrap();
        let found = accounts.get_user_from_session_id(Some("sess-1")).await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        accounts.detach_session(&user.id).await.unwrap();
        assert!(accounts
            .get_user_from_session_id(Some("sess-1"))
            .await
            .unwrap()
            .is_none());
        assert!(accounts.get_user_from_session_id(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let accounts = accounts();
        accounts.register_user("a@x.com", "old").await.unwrap();

        let token = accounts.get_reset_password_token("a@x.com").await.unwrap();
        accounts.update_password(&token, "new").await.unwrap();

        assert!(accounts.valid_login("a@x.com", "new").await.unwrap());
        assert!(!accounts.valid_login("a@x.com", "old").await.unwrap());

        // Tokens are single use
        assert!(matches!(
            accounts.update_password(&token, "again").await,
            Err(Error::InvalidResetToken)
        ));
    }

    #[tokio::test]
    async fn test_reset_token_unknown_email() {
        let accounts = accounts();
        assert!(matches!(
            accounts.get_reset_password_token("nobody@x.com").await,
            Err(Error::UserNotFound)
        ));
        assert!(matches!(
            accounts.update_password("", "pw").await,
            Err(Error::InvalidResetToken)
        ));
    }
}
