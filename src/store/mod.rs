//! Persistence for users and sessions

mod file;
mod memory;
mod postgres;
mod users;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use postgres::PostgresSessionStore;
pub use users::UserStore;

use crate::auth::Session;
use crate::config::{SessionStorage, StorageConfig};
use crate::error::{Error, Result};
use std::future::Future;

/// Keyed storage for session records.
///
/// Each call is independent; implementations need no multi-call atomicity
/// because a session is addressed by a single unique token.
pub trait SessionStore: Send + Sync {
    /// Store a session and return the stored record
    fn insert(&self, session: Session) -> impl Future<Output = Result<Session>> + Send;

    /// Look up a session by token
    fn get(&self, session_id: &str) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Delete a session; `true` if a record existed
    fn remove(&self, session_id: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// Session store selected at startup from configuration
#[derive(Clone)]
pub enum SessionBackend {
    Memory(MemorySessionStore),
    File(FileSessionStore),
    Postgres(PostgresSessionStore),
}

impl SessionBackend {
    /// Open the store described by `config`
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        match config.sessions {
            SessionStorage::Memory => Ok(SessionBackend::Memory(MemorySessionStore::new())),
            SessionStorage::File => {
                let store = FileSessionStore::open(&config.sessions_file).await?;
                tracing::info!("Sessions stored in {}", store.path().display());
                Ok(SessionBackend::File(store))
            }
            SessionStorage::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    Error::Config("storage.database_url is required for postgres sessions".into())
                })?;
                Ok(SessionBackend::Postgres(PostgresSessionStore::connect(url).await?))
            }
        }
    }

    /// Whether records outlive the process
    pub fn is_durable(&self) -> bool {
        !matches!(self, SessionBackend::Memory(_))
    }
}

impl SessionStore for SessionBackend {
    async fn insert(&self, session: Session) -> Result<Session> {
        match self {
            SessionBackend::Memory(store) => store.insert(session).await,
            SessionBackend::File(store) => store.insert(session).await,
            SessionBackend::Postgres(store) => store.insert(session).await,
        }
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        match self {
            SessionBackend::Memory(store) => store.get(session_id).await,
            SessionBackend::File(store) => store.get(session_id).await,
            SessionBackend::Postgres(store) => store.get(session_id).await,
        }
    }

    async fn remove(&self, session_id: &str) -> Result<bool> {
        match self {
            SessionBackend::Memory(store) => store.remove(session_id).await,
            SessionBackend::File(store) => store.remove(session_id).await,
            SessionBackend::Postgres(store) => store.remove(session_id).await,
        }
    }
}
