//! AES-256-GCM encryption/decryption
//!
//! Thin wrapper over `aes-gcm` that works on raw bytes with a caller-supplied
//! nonce. The 16-byte authentication tag is appended to the ciphertext and is
//! never handled separately.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::{BudgetError, BudgetResult};

use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext, returning `ciphertext || tag`
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> BudgetResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| BudgetError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| BudgetError::Encryption(format!("Encryption failed: {}", e)))
}

/// Verify the tag and decrypt `ciphertext || tag`
///
/// Any failure, including a tag mismatch, is reported as
/// [`BudgetError::Decryption`].
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> BudgetResult<Zeroizing<Vec<u8>>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| BudgetError::Decryption)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| BudgetError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::KEY_LEN;

    fn test_key(byte: u8) -> DerivedKey {
        DerivedKey::from_bytes([byte; KEY_LEN])
    }

    #[test]
    fn test_seal_open() {
        let key = test_key(1);
        let nonce = [9u8; NONCE_LEN];
        let plaintext = b"Hello, World!";

        let sealed = seal(&key, &nonce, plaintext).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + TAG_LEN);

        let opened = open(&key, &nonce, &sealed).unwrap();
        assert_eq!(plaintext, opened.as_slice());
    }

    #[test]
    fn test_wrong_key_fails() {
        let nonce = [9u8; NONCE_LEN];
        let sealed = seal(&test_key(1), &nonce, b"Hello, World!").unwrap();

        let result = open(&test_key(2), &nonce, &sealed);
        assert!(matches!(result, Err(BudgetError::Decryption)));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let key = test_key(1);
        let sealed = seal(&key, &[1u8; NONCE_LEN], b"Hello, World!").unwrap();

        let result = open(&key, &[2u8; NONCE_LEN], &sealed);
        assert!(matches!(result, Err(BudgetError::Decryption)));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let key = test_key(1);
        let nonce = [9u8; NONCE_LEN];
        let mut sealed = seal(&key, &nonce, b"Hello, World!").unwrap();

        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;

        assert!(open(&key, &nonce, &sealed).is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let key = test_key(3);
        let nonce = [0u8; NONCE_LEN];

        let sealed = seal(&key, &nonce, b"").unwrap();
        assert_eq!(sealed.len(), TAG_LEN);

        let opened = open(&key, &nonce, &sealed).unwrap();
        assert!(opened.is_empty());
    }
}
