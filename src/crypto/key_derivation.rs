//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Backups written by every version of the application use the same fixed
//! parameters, so a key derived here matches one derived by any other
//! implementation of the backup format.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{BudgetError, BudgetResult};

/// Length of the random salt stored at the front of every backup
pub const SALT_LEN: usize = 16;

/// Length of the derived AES-256 key
pub const KEY_LEN: usize = 32;

/// PBKDF2 round count. Changing it breaks every existing backup.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A derived encryption key, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes
    pub fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Turns a password and salt into a symmetric key
pub trait KeyDerivation: Send + Sync {
    fn derive(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> BudgetResult<DerivedKey>;
}

/// PBKDF2 with HMAC-SHA256 and [`PBKDF2_ITERATIONS`] rounds
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2Sha256;

impl KeyDerivation for Pbkdf2Sha256 {
    fn derive(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> BudgetResult<DerivedKey> {
        if password.is_empty() {
            return Err(BudgetError::Encryption(
                "Password must not be empty".to_string(),
            ));
        }

        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
        let derived = DerivedKey::from_bytes(key);
        key.zeroize();
        Ok(derived)
    }
}

/// Derive a key with the production parameters
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> BudgetResult<DerivedKey> {
    Pbkdf2Sha256.derive(password.as_bytes(), salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() {
        let key = derive_key("test_passphrase", &[7u8; SALT_LEN]).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_same_passphrase_same_key() {
        let salt = [1u8; SALT_LEN];
        let key1 = derive_key("test_passphrase", &salt).unwrap();
        let key2 = derive_key("test_passphrase", &salt).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = [1u8; SALT_LEN];
        let key1 = derive_key("passphrase1", &salt).unwrap();
        let key2 = derive_key("passphrase2", &salt).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_passphrase", &[1u8; SALT_LEN]).unwrap();
        let key2 = derive_key("same_passphrase", &[2u8; SALT_LEN]).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_matches_direct_pbkdf2() {
        let salt = *b"0123456789abcdef";
        let key = derive_key("hunter2", &salt).unwrap();

        let mut expected = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(b"hunter2", &salt, 100_000, &mut expected);
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key("", &[0u8; SALT_LEN]);
        assert!(matches!(result, Err(BudgetError::Encryption(_))));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = DerivedKey::from_bytes([0xAB; KEY_LEN]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
