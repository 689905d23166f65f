//! User record store

use crate::auth::User;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Users held in memory, optionally mirrored to a JSON file.
///
/// Clones share the same table.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
    path: Option<PathBuf>,
}

impl UserStore {
    /// An empty store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load users from `path`, starting empty when the file is missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let users = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            users: Arc::new(RwLock::new(users)),
            path: Some(path),
        })
    }

    /// Fetch a user by id
    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// First user matching every `(field, value)` pair
    pub async fn find_by(&self, criteria: &[(&str, &str)]) -> Result<Option<User>> {
        let users = self.users.read().await;
        for user in users.iter() {
            if user.matches(criteria)? {
                return Ok(Some(user.clone()));
            }
        }
        Ok(None)
    }

    /// All users matching every `(field, value)` pair
    pub async fn find_all(&self, criteria: &[(&str, &str)]) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut found = Vec::new();
        for user in users.iter() {
            if user.matches(criteria)? {
                found.push(user.clone());
            }
        }
        Ok(found)
    }

    /// Create and store a new user record
    pub async fn add(&self, email: &str, hashed_password: &str) -> Result<User> {
        self.put(User::new(email.to_string(), hashed_password.to_string()))
            .await
    }

    /// Insert `user` unless its email is already taken.
    ///
    /// The check and the insert happen under one write lock.
    pub async fn insert_unique(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::UserAlreadyExists(user.email));
        }
        users.push(user.clone());
        self.persist(&users).await?;
        Ok(user)
    }

    /// Insert or replace a user record by id
    pub async fn put(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.persist(&users).await?;
        Ok(user)
    }

    /// Delete a user; `true` if a record existed
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.persist(&users).await?;
        Ok(true)
    }

    /// Apply named field changes to one user.
    ///
    /// Every change is validated before any is applied, so an unknown
    /// field leaves the record untouched.
    pub async fn update(&self, id: &str, changes: &[(&str, Option<String>)]) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(Error::UserNotFound)?;

        let mut updated = user.clone();
        for (name, value) in changes {
            updated.set_field(name, value.clone())?;
        }
        *user = updated;

        self.persist(&users).await
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    async fn persist(&self, users: &[User]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec_pretty(users)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}
