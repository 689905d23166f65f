//! API route handlers

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde_json::json;

use super::server::SharedState;
use crate::auth::models::{CredentialsForm, ResetRequestForm, UpdatePasswordForm};
use crate::auth::{extract_user_from_request, session_cookie, User, UserInfo};
use crate::error::{Error, Result};

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn set_cookie(name: &str, token: &str) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{}={}; Path=/; HttpOnly", name, token),
    )]
}

/// Open a session for `user`, mirror it on the user row, and return the token.
///
/// A user holds one live session; the token recorded on the row is revoked
/// before the new one is issued.
async fn open_session(state: &SharedState, user: &User) -> Result<Option<String>> {
    let previous = state
        .accounts
        .users()
        .get(&user.id)
        .await
        .and_then(|row| row.session_id);
    if let Some(previous) = previous {
        state.sessions.revoke(&previous).await?;
    }

    let Some(token) = state.sessions.create_session(Some(&user.id)).await? else {
        return Ok(None);
    };
    state.accounts.attach_session(&user.id, &token).await?;
    Ok(Some(token))
}

/// Clear the row pointer of whoever holds `token`, if anyone still does
async fn release_session(state: &SharedState, token: &str) -> Result<()> {
    if let Some(owner) = state.accounts.get_user_from_session_id(Some(token)).await? {
        state.accounts.detach_session(&owner.id).await?;
    }
    Ok(())
}

// Public routes

pub async fn index() -> impl IntoResponse {
    Json(json!({ "message": "Bienvenue" }))
}

pub async fn register(
    State(state): State<SharedState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let Some(email) = form.email.filter(|e| !e.is_empty()) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "email missing"));
    };
    let Some(password) = form.password.filter(|p| !p.is_empty()) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "password missing"));
    };

    match state.accounts.register_user(&email, &password).await {
        Ok(_) => Ok(Json(json!({ "email": email, "message": "user created" })).into_response()),
        Err(Error::UserAlreadyExists(_)) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "email already registered" })),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn login(
    State(state): State<SharedState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    if !state.accounts.valid_login(&email, &password).await? {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    let Some(user) = state.accounts.find_user_by_email(&email).await? else {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    };
    let Some(token) = open_session(&state, &user).await? else {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    tracing::info!("User {} logged in", user.id);
    Ok((
        set_cookie(state.sessions.cookie_name(), &token),
        Json(json!({ "email": email, "message": "logged in" })),
    )
        .into_response())
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    let Some(token) = session_cookie(Some(&headers), state.sessions.cookie_name()) else {
        return Ok(error_response(StatusCode::FORBIDDEN, "Forbidden"));
    };
    let Some(user) = state.sessions.current_user(Some(&headers)).await? else {
        return Ok(error_response(StatusCode::FORBIDDEN, "Forbidden"));
    };
    state.sessions.destroy_session(Some(&headers)).await?;
    release_session(&state, &token).await?;

    tracing::info!("User {} logged out", user.id);
    Ok(Redirect::to("/").into_response())
}

pub async fn profile(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    match state.sessions.current_user(Some(&headers)).await? {
        Some(user) => Ok(Json(json!({ "email": user.email })).into_response()),
        None => Ok(error_response(StatusCode::FORBIDDEN, "Forbidden")),
    }
}

pub async fn get_reset_password_token(
    State(state): State<SharedState>,
    Form(form): Form<ResetRequestForm>,
) -> Result<Response> {
    let email = form.email.unwrap_or_default();
    let token = state.accounts.get_reset_password_token(&email).await?;
    Ok(Json(json!({ "email": email, "reset_token": token })).into_response())
}

pub async fn update_password(
    State(state): State<SharedState>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Response> {
    let (Some(token), Some(password)) = (form.reset_token, form.new_password) else {
        return Ok(error_response(StatusCode::FORBIDDEN, "Forbidden"));
    };
    state.accounts.update_password(&token, &password).await?;
    Ok(Json(json!({ "email": form.email, "message": "Password updated" })).into_response())
}

// API v1 routes

pub async fn status() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

pub async fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

pub async fn forbidden() -> Response {
    error_response(StatusCode::FORBIDDEN, "Forbidden")
}

pub async fn session_login(
    State(state): State<SharedState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let Some(email) = form.email.filter(|e| !e.is_empty()) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "email missing"));
    };
    let Some(password) = form.password.filter(|p| !p.is_empty()) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "password missing"));
    };

    let candidates = state.accounts.users().find_all(&[("email", email.as_str())]).await?;
    if candidates.is_empty() {
        return Ok(error_response(StatusCode::NOT_FOUND, "no user found for this email"));
    }

    let hasher = state.accounts.hasher();
    let Some(user) = candidates
        .into_iter()
        .find(|user| hasher.verify(&password, &user.hashed_password))
    else {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "wrong password"));
    };
    let Some(token) = open_session(&state, &user).await? else {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "wrong password"));
    };

    Ok((
        set_cookie(state.sessions.cookie_name(), &token),
        Json(UserInfo::from(user)),
    )
        .into_response())
}

pub async fn session_logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let token = session_cookie(Some(&headers), state.sessions.cookie_name());
    if !state.sessions.destroy_session(Some(&headers)).await? {
        return Ok(error_response(StatusCode::NOT_FOUND, "Not found"));
    }
    if let Some(token) = token {
        release_session(&state, &token).await?;
    }
    Ok(Json(json!({})).into_response())
}

pub async fn me(req: Request) -> Response {
    match extract_user_from_request(&req) {
        Some(user) => Json(UserInfo::from(user.clone())).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Not found"),
    }
}
