//! Session expiration policy

use chrono::{DateTime, Utc};

/// How long a session stays valid after it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationPolicy {
    /// Sessions live until they are destroyed explicitly
    #[default]
    Never,
    /// Sessions expire once more than this many seconds have elapsed
    After(i64),
}

impl ExpirationPolicy {
    /// Build a policy from a configured duration; `<= 0` disables expiry
    pub fn from_secs(duration: i64) -> Self {
        if duration <= 0 {
            ExpirationPolicy::Never
        } else {
            ExpirationPolicy::After(duration)
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, created_at: DateTime<Utc>) -> bool {
        match *self {
            ExpirationPolicy::Never => false,
            ExpirationPolicy::After(duration) => session_expired(now, created_at, duration),
        }
    }
}

/// Whether a session created at `created_at` has outlived `duration` seconds.
///
/// Elapsed time is truncated to whole seconds; a session is still valid at
/// exactly `duration` seconds. `duration <= 0` never expires.
pub fn session_expired(now: DateTime<Utc>, created_at: DateTime<Utc>, duration: i64) -> bool {
    if duration <= 0 {
        return false;
    }
    now.signed_duration_since(created_at).num_seconds() > duration
}
