//! Gatehouse - user authentication for a small web service
//!
//! This is the library interface for Gatehouse: password hashing, HTTP
//! Basic and cookie session authentication, the user/session stores they
//! read from, PII-redacting logging, and the HTTP API built on top.

pub mod accounts;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;

pub use accounts::Accounts;
pub use config::Config;
pub use error::Error;
