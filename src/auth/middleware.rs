//! Authentication middleware and extractors

use super::base::{authorization_header, requires_auth, session_cookie};
use super::basic::BasicAuth;
use super::models::User;
use super::session::SessionAuth;
use crate::api::SharedState;
use crate::error::{Error, Result};
use crate::store::SessionBackend;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// The authenticator guarding `/api/v1`
#[derive(Clone)]
pub enum Authenticator {
    Basic(BasicAuth),
    Session(SessionAuth<SessionBackend>),
}

impl Authenticator {
    /// User identified by the request headers
    pub async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>> {
        match self {
            Authenticator::Basic(auth) => auth.current_user(Some(headers)).await,
            Authenticator::Session(auth) => auth.current_user(Some(headers)).await,
        }
    }

    /// Name of the session cookie, for session authenticators
    pub fn cookie_name(&self) -> Option<&str> {
        match self {
            Authenticator::Basic(_) => None,
            Authenticator::Session(auth) => Some(auth.cookie_name()),
        }
    }
}

fn reject(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("Error");
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Middleware resolving the current user for protected paths.
///
/// Requests carrying neither an `Authorization` header nor the session
/// cookie get 401; credentials that resolve to no user get 403. On success
/// the [`User`] is stored in the request extensions.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let Some(authenticator) = &state.authenticator else {
        return Ok(next.run(req).await);
    };
    if !requires_auth(req.uri().path(), state.config.auth.excluded_paths.as_slice()) {
        return Ok(next.run(req).await);
    }

    let headers = req.headers();
    let has_header = authorization_header(Some(headers)).is_some();
    let has_cookie = authenticator
        .cookie_name()
        .and_then(|name| session_cookie(Some(headers), name))
        .is_some();
    if !has_header && !has_cookie {
        return Ok(reject(StatusCode::UNAUTHORIZED));
    }

    let Some(user) = authenticator.current_user(headers).await? else {
        tracing::debug!("Rejected credentials for {}", req.uri().path());
        return Ok(reject(StatusCode::FORBIDDEN));
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// User attached by [`require_auth`], if any
pub fn extract_user_from_request(req: &Request) -> Option<&User> {
    req.extensions().get::<User>()
}
