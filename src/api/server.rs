//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::accounts::Accounts;
use crate::auth::{self, Authenticator, BasicAuth, ExpirationPolicy, PasswordHasher, SessionAuth};
use crate::config::{AuthType, Config};
use crate::error::Result;
use crate::store::{MemorySessionStore, SessionBackend, UserStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub accounts: Accounts,
    /// Sessions issued by the login endpoints
    pub sessions: SessionAuth<SessionBackend>,
    /// Guard for `/api/v1`; `None` leaves it open
    pub authenticator: Option<Authenticator>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Open the stores and wire the authenticators described by `config`
    pub async fn from_config(config: Config) -> Result<Self> {
        let users = match &config.storage.users_file {
            Some(path) => UserStore::open(path).await?,
            None => UserStore::in_memory(),
        };
        let hasher = PasswordHasher::new(config.hashing.cost);
        let auth_type = config.auth.auth_type;

        let backend = match auth_type {
            AuthType::SessionDbAuth => SessionBackend::open(&config.storage).await?,
            _ => SessionBackend::Memory(MemorySessionStore::new()),
        };
        let policy = match auth_type {
            AuthType::SessionAuth => ExpirationPolicy::Never,
            _ => ExpirationPolicy::from_secs(config.auth.session_duration),
        };
        let sessions = SessionAuth::new(backend, policy, &config.auth.session_name, users.clone());
        if auth_type.uses_sessions() {
            tracing::info!(
                "Auth type {:?}, durable sessions: {}, expiry: {:?}",
                auth_type,
                sessions.store().is_durable(),
                sessions.policy()
            );
        } else {
            tracing::info!("Auth type {:?}", auth_type);
        }
        tracing::debug!("bcrypt cost {}", hasher.cost());

        let authenticator = match auth_type {
            AuthType::None => None,
            AuthType::BasicAuth => Some(Authenticator::Basic(BasicAuth::new(users.clone(), hasher))),
            _ => Some(Authenticator::Session(sessions.clone())),
        };

        Ok(Self {
            config,
            accounts: Accounts::new(users, hasher),
            sessions,
            authenticator,
        })
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(config).await?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let api_v1 = Router::new()
        .route("/api/v1/status", get(routes::status))
        .route("/api/v1/unauthorized", get(routes::unauthorized))
        .route("/api/v1/forbidden", get(routes::forbidden))
        .route("/api/v1/auth_session/login", post(routes::session_login))
        .route(
            "/api/v1/auth_session/logout",
            axum::routing::delete(routes::session_logout),
        )
        .route("/api/v1/users/me", get(routes::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(routes::index))
        .route("/users", post(routes::register))
        .route("/sessions", post(routes::login).delete(routes::logout))
        .route("/profile", get(routes::profile))
        .route(
            "/reset_password",
            post(routes::get_reset_password_token).put(routes::update_password),
        )
        .merge(api_v1)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
