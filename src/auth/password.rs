//! Password hashing

use crate::error::Result;

/// Salted bcrypt hashing with a configurable cost factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hashed: &str) -> bool {
        bcrypt::verify(password, hashed).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(4);
        let hashed = hasher.hash("MyAmazingPassw0rd").unwrap();

        assert_ne!(hashed, "MyAmazingPassw0rd");
        assert!(hasher.verify("MyAmazingPassw0rd", &hashed));
        assert!(!hasher.verify("wrong", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new(4);
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_garbage_hash() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("pw", "not-a-bcrypt-hash"));
    }
}
