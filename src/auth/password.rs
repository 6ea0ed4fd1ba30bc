use crate::error::ApiError;

/// bcrypt work factor, matching the original deployment's cost of 10.
const COST: u32 = 10;

/// One-way hash of a plaintext password. A hashing failure is fatal to the
/// calling operation and surfaces as an internal error. The plaintext is
/// never logged.
pub fn hash(plaintext: &str) -> Result<String, ApiError> {
    bcrypt::hash(plaintext, COST).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::unexpected()
    })
}

/// Check a plaintext password against a stored digest. Never fails: a
/// malformed digest counts as a mismatch.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_matching_password() {
        let digest = hash("123456").unwrap();
        assert!(verify("123456", &digest));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash("123456").unwrap();
        assert!(!verify("654321", &digest));
    }

    #[test]
    fn verify_returns_false_for_malformed_digest() {
        assert!(!verify("123456", "not-a-bcrypt-digest"));
        assert!(!verify("123456", ""));
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let digest = hash("hunter2-plaintext").unwrap();
        assert!(!digest.contains("hunter2"));
    }
}
