//! Path exclusion and credential extraction shared by all authenticators

use super::request::AuthRequest;

/// Trailing marker that turns an excluded path into a prefix pattern
pub const WILDCARD: char = '*';

/// Whether `path` needs authentication given the public `excluded_paths`.
///
/// A path is public when it, or it with a trailing slash, is listed
/// verbatim, or when it starts with the prefix of an entry ending in `*`.
pub fn requires_auth<S: AsRef<str>>(path: &str, excluded_paths: &[S]) -> bool {
    if path.is_empty() || excluded_paths.is_empty() {
        return true;
    }

    let with_slash = format!("{}/", path);
    for excluded in excluded_paths.iter().map(AsRef::as_ref) {
        if excluded == path || excluded == with_slash {
            return false;
        }
        if let Some(prefix) = excluded.strip_suffix(WILDCARD) {
            if path.starts_with(prefix) {
                return false;
            }
        }
    }
    true
}

/// Value of the `Authorization` header
pub fn authorization_header<R: AuthRequest + ?Sized>(request: Option<&R>) -> Option<String> {
    request?.header("authorization").map(str::to_string)
}

/// Value of the session cookie
pub fn session_cookie<R: AuthRequest + ?Sized>(
    request: Option<&R>,
    cookie_name: &str,
) -> Option<String> {
    request?.cookie(cookie_name)
}
