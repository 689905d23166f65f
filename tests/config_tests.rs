//! Configuration, error mapping and log redaction tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use gatehouse::config::{loader, resolve_config, AuthType, SessionStorage};
use gatehouse::logging::{filter_datum, record_line, Redactor, PII_FIELDS, REDACTION};
use gatehouse::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(loader::CONFIG_FILENAME);
    fs::write(
        &path,
        r#"
[auth]
auth_type = "session_db_auth"

[storage]
sessions = "postgres"
database_url = "host=${GATEHOUSE_TEST_DB_HOST:-localhost} user=postgres"
"#,
    )
    .unwrap();

    let config = loader::load_config_from_path(&path).unwrap();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.auth.auth_type, AuthType::SessionDbAuth);
    assert_eq!(config.auth.session_name, "session_id");
    assert_eq!(config.auth.session_duration, 0);
    assert!(config
        .auth
        .excluded_paths
        .contains(&"/api/v1/auth_session/login/".to_string()));
    assert_eq!(config.storage.sessions, SessionStorage::Postgres);
    assert_eq!(
        config.storage.database_url.as_deref(),
        Some("host=localhost user=postgres")
    );
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = resolve_config(Some(dir.path().join("absent.toml").as_path()));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_invalid_toml_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(loader::CONFIG_FILENAME);
    fs::write(&path, "[auth\nauth_type = ").unwrap();
    assert!(matches!(
        loader::load_config_from_path(&path),
        Err(Error::TomlParse(_))
    ));
}

// The only test in this binary that touches these variables
#[test]
fn test_environment_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(loader::CONFIG_FILENAME);
    fs::write(&path, "[auth]\nauth_type = \"basic_auth\"\n").unwrap();

    std::env::set_var("AUTH_TYPE", "session_exp_auth");
    std::env::set_var("SESSION_NAME", "sid");
    std::env::set_var("SESSION_DURATION", "not-a-number");
    let config = resolve_config(Some(path.as_path())).unwrap();
    assert_eq!(config.auth.auth_type, AuthType::SessionExpAuth);
    assert_eq!(config.auth.session_name, "sid");
    assert_eq!(config.auth.session_duration, 0);

    std::env::set_var("SESSION_DURATION", "30");
    assert_eq!(resolve_config(Some(path.as_path())).unwrap().auth.session_duration, 30);

    std::env::set_var("AUTH_TYPE", "kerberos");
    assert!(matches!(resolve_config(Some(path.as_path())), Err(Error::Config(_))));

    std::env::remove_var("AUTH_TYPE");
    std::env::remove_var("SESSION_NAME");
    std::env::remove_var("SESSION_DURATION");
}

#[test]
fn test_error_status_codes() {
    assert_eq!(
        Error::UserAlreadyExists("a@x.com".into()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(Error::UserNotFound.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(Error::InvalidResetToken.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
        Error::Other("boom".into()).into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_user_record_redaction() {
    let line = record_line(&[
        ("name", "Bob"),
        ("email", "bob@dylan.com"),
        ("ip", "10.0.0.1"),
        ("password", "hunter2"),
    ]);
    let redacted = filter_datum(PII_FIELDS, REDACTION, &line, ";");

    assert_eq!(
        redacted,
        "name=***; email=***; ip=10.0.0.1; password=***;"
    );
}

#[test]
fn test_redactor_with_custom_separator() {
    let redactor = Redactor::new(&["ssn"], "xxx", "|").unwrap();
    assert_eq!(
        redactor.redact("ssn=123-45-6789|phone=555|"),
        "ssn=xxx|phone=555|"
    );
    assert_eq!(redactor.redact("no fields here"), "no fields here");
}
