//! JSON file backed session store

use super::SessionStore;
use crate::auth::Session;
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Sessions kept in memory and rewritten to a JSON file on every change,
/// so they survive a restart.
#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl FileSessionStore {
    /// Load the store from `path`, starting empty when the file is missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sessions = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => {
                let records: Vec<Session> = serde_json::from_slice(&bytes)?;
                records.into_iter().map(|s| (s.id.clone(), s)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Loaded {} sessions from {}", sessions.len(), path.display());

        Ok(Self {
            path,
            sessions: Arc::new(Mutex::new(sessions)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, sessions: &HashMap<String, Session>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut records: Vec<&Session> = sessions.values().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let content = serde_json::to_vec_pretty(&records)?;

        // Readers only ever see a complete file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    async fn insert(&self, session: Session) -> Result<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.clone(), session.clone());
        self.persist(&sessions).await?;
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.lock().await.get(session_id).cloned())
    }

    async fn remove(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(session_id).is_none() {
            return Ok(false);
        }
        self.persist(&sessions).await?;
        Ok(true)
    }
}
