//! PostgreSQL backed session store

use super::SessionStore;
use crate::auth::Session;
use crate::error::Result;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls, Row};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS user_sessions (
    session_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

/// Sessions stored one row per token in `user_sessions`
#[derive(Clone)]
pub struct PostgresSessionStore {
    client: Arc<Client>,
}

impl PostgresSessionStore {
    /// Connect and make sure the sessions table exists
    pub async fn connect(conn_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(conn_string, NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        client.batch_execute(CREATE_TABLE).await?;
        tracing::info!("Connected to PostgreSQL session store");

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

fn session_from_row(row: &Row) -> Session {
    Session {
        id: row.get("session_id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}

impl SessionStore for PostgresSessionStore {
    async fn insert(&self, session: Session) -> Result<Session> {
        let row = self
            .client
            .query_one(
                "INSERT INTO user_sessions (session_id, user_id, created_at)
                 VALUES ($1, $2, $3)
                 RETURNING session_id, user_id, created_at",
                &[&session.id, &session.user_id, &session.created_at],
            )
            .await?;
        Ok(session_from_row(&row))
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        let row = self
            .client
            .query_opt(
                "SELECT session_id, user_id, created_at FROM user_sessions WHERE session_id = $1",
                &[&session_id],
            )
            .await?;
        Ok(row.as_ref().map(session_from_row))
    }

    async fn remove(&self, session_id: &str) -> Result<bool> {
        let deleted = self
            .client
            .execute(
                "DELETE FROM user_sessions WHERE session_id = $1",
                &[&session_id],
            )
            .await?;
        Ok(deleted > 0)
    }
}
