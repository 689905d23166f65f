//! Authentication integration tests
//! Exercises the public auth API against real stores

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use gatehouse::auth::{
    authorization_header, decode_basic_credentials, requires_auth, session_cookie,
    session_expired, BasicAuth, ExpirationPolicy, PasswordHasher, Session, SessionAuth,
};
use gatehouse::store::{FileSessionStore, MemorySessionStore, SessionStore, UserStore};
use gatehouse::Accounts;
use tempfile::TempDir;

fn cookie_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
    headers
}

fn basic_headers(credentials: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = format!("Basic {}", STANDARD.encode(credentials));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    headers
}

#[test]
fn test_requires_auth_exclusions() {
    let excluded: &[&str] = &["/api/v1/status/", "/api/v1/stat*"];

    assert!(requires_auth("", excluded));
    assert!(requires_auth("/api/v1/status", &[] as &[&str]));
    assert!(!requires_auth("/api/v1/status", excluded));
    assert!(!requires_auth("/api/v1/status/", excluded));
    assert!(!requires_auth("/api/v1/stats", excluded));
    assert!(requires_auth("/api/v1/users", excluded));
}

#[test]
fn test_header_and_cookie_lookup() {
    assert_eq!(authorization_header::<HeaderMap>(None), None);

    let headers = basic_headers("a:b");
    assert_eq!(
        authorization_header(Some(&headers)).as_deref(),
        Some("Basic YTpi")
    );

    let headers = cookie_headers("theme=dark; session_id=abc");
    assert_eq!(
        session_cookie(Some(&headers), "session_id").as_deref(),
        Some("abc")
    );
    assert_eq!(session_cookie(Some(&headers), "missing"), None);
}

#[test]
fn test_decode_basic_credentials() {
    let header = format!("Basic {}", STANDARD.encode("bob@hbtn.io:a:b:c"));
    assert_eq!(
        decode_basic_credentials(&header),
        Some(("bob@hbtn.io".to_string(), "a:b:c".to_string()))
    );

    assert_eq!(decode_basic_credentials("Basic !!!not-base64"), None);
    assert_eq!(decode_basic_credentials("Bearer abc"), None);
    let no_colon = format!("Basic {}", STANDARD.encode("no-colon"));
    assert_eq!(decode_basic_credentials(&no_colon), None);
}

#[test]
fn test_session_expired_boundaries() {
    let now = Utc::now();
    assert!(session_expired(now, now - Duration::seconds(6), 5));
    assert!(!session_expired(now, now - Duration::seconds(5), 5));
    assert!(!session_expired(now, now - Duration::days(365), 0));
}

#[tokio::test]
async fn test_basic_auth_resolves_user() {
    let users = UserStore::in_memory();
    let hasher = PasswordHasher::new(4);
    let accounts = Accounts::new(users.clone(), hasher);
    accounts.register_user("bob@hbtn.io", "H0lberton").await.unwrap();

    let auth = BasicAuth::new(users, hasher);
    let user = auth
        .current_user(Some(&basic_headers("bob@hbtn.io:H0lberton")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "bob@hbtn.io");

    assert!(auth
        .current_user(Some(&basic_headers("bob@hbtn.io:wrong")))
        .await
        .unwrap()
        .is_none());
    assert!(auth.current_user::<HeaderMap>(None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_lifecycle_in_memory() {
    let users = UserStore::in_memory();
    let user = users.add("s@x.com", "hash").await.unwrap();
    let auth = SessionAuth::new(
        MemorySessionStore::new(),
        ExpirationPolicy::Never,
        "session_id",
        users,
    );

    assert_eq!(auth.create_session(None).await.unwrap(), None);
    let token = auth.create_session(Some(&user.id)).await.unwrap().unwrap();
    let other = auth.create_session(Some(&user.id)).await.unwrap().unwrap();
    assert_ne!(token, other);

    let headers = cookie_headers(&format!("session_id={}", token));
    let current = auth.current_user(Some(&headers)).await.unwrap().unwrap();
    assert_eq!(current.id, user.id);

    assert!(auth.destroy_session(Some(&headers)).await.unwrap());
    assert!(!auth.destroy_session(Some(&headers)).await.unwrap());
    assert!(auth.current_user(Some(&headers)).await.unwrap().is_none());

    // Sibling sessions are untouched
    assert_eq!(
        auth.user_id_for_session_id(Some(&other)).await.unwrap(),
        Some(user.id)
    );
}

#[tokio::test]
async fn test_expired_session_is_purged() {
    let store = MemorySessionStore::new();
    let auth = SessionAuth::new(
        store.clone(),
        ExpirationPolicy::from_secs(5),
        "session_id",
        UserStore::in_memory(),
    );

    let mut stale = Session::new("u1".to_string());
    stale.created_at = Utc::now() - Duration::seconds(60);
    let stale = store.insert(stale).await.unwrap();

    assert_eq!(auth.user_id_for_session_id(Some(&stale.id)).await.unwrap(), None);
    assert!(store.get(&stale.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_sessions_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.json");

    let token = {
        let auth = SessionAuth::new(
            FileSessionStore::open(&path).await.unwrap(),
            ExpirationPolicy::Never,
            "session_id",
            UserStore::in_memory(),
        );
        auth.create_session(Some("u1")).await.unwrap().unwrap()
    };

    let reopened = FileSessionStore::open(&path).await.unwrap();
    let session = reopened.get(&token).await.unwrap().unwrap();
    assert_eq!(session.user_id, "u1");
    assert!(reopened.remove(&token).await.unwrap());

    let again = FileSessionStore::open(&path).await.unwrap();
    assert!(again.get(&token).await.unwrap().is_none());
}
