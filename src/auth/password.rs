//! Credential Hashing
//! Mission: One-way password hashing and verification with bcrypt

use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use rand::Rng;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password. bcrypt salts per call, so two hashes of the
/// same input never compare equal as strings.
pub fn hash_password(plain: &str, cost: u32) -> Result<String> {
    hash(plain, cost).context("Failed to hash password")
}

/// Check a plaintext password against a stored digest.
pub fn verify_password(plain: &str, digest: &str) -> Result<bool> {
    verify(plain, digest).context("Failed to verify password")
}

/// Generate a 6-digit verification code for out-of-band email confirmation.
pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4; // keep the test suite fast

    #[test]
    fn test_hash_round_trip() {
        let digest = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(digest, "secret1");
        assert!(verify_password("secret1", &digest).unwrap());
        assert!(!verify_password("secret2", &digest).unwrap());
    }

    #[test]
    fn test_same_password_different_digests() {
        let a = hash_password("secret1", TEST_COST).unwrap();
        let b = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verification_code_shape() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_verification_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_verification_code()).collect();
        // 50 draws from 900k values colliding down to 1 would mean a
        // broken RNG.
        assert!(codes.len() > 1);
    }
}
