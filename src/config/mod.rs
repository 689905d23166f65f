//! Configuration management for Gatehouse

pub mod loader;
mod schema;

pub use loader::{load_config, resolve_config, save_config};
pub use schema::*;
