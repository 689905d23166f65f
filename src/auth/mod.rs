//! Authentication and session management

pub mod base;
pub mod basic;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod request;
pub mod session;

pub use base::{authorization_header, requires_auth, session_cookie};
pub use basic::{decode_basic_credentials, BasicAuth};
pub use middleware::{extract_user_from_request, require_auth, Authenticator};
pub use models::{User, UserInfo};
pub use password::PasswordHasher;
pub use policy::{session_expired, ExpirationPolicy};
pub use request::AuthRequest;
pub use session::{Session, SessionAuth};
