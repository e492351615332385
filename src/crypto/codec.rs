//! Password-protected backup blobs
//!
//! A backup is `salt (16) || nonce (12) || ciphertext || tag (16)`, encoded as
//! a single line of padded standard base64. The key is PBKDF2-HMAC-SHA256 over
//! the password and salt; the cipher is AES-256-GCM. Salt and nonce are drawn
//! fresh for every backup.
//!
//! Every way a blob can fail to open (bad base64, short buffer, wrong password,
//! flipped bit, unparseable plaintext) surfaces as the same
//! [`BudgetError::Decryption`].

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{BudgetError, BudgetResult};

use super::encryption::{self, NONCE_LEN, TAG_LEN};
use super::key_derivation::{KeyDerivation, Pbkdf2Sha256, SALT_LEN};
use super::random::{OsRandom, RandomSource};

/// Bytes in front of the ciphertext
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Smallest buffer that can hold a header and an authenticated ciphertext
pub const MIN_BLOB_LEN: usize = HEADER_LEN + TAG_LEN;

/// Encodes snapshots into backup blobs and back
#[derive(Debug, Clone, Default)]
pub struct BackupCodec<R = OsRandom, K = Pbkdf2Sha256> {
    random: R,
    kdf: K,
}

impl BackupCodec {
    /// Codec backed by the OS random source and the production KDF
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RandomSource, K: KeyDerivation> BackupCodec<R, K> {
    /// Assemble a codec from explicit capabilities
    pub fn with_parts(random: R, kdf: K) -> Self {
        Self { random, kdf }
    }

    /// Serialize `snapshot` and encrypt it into base64 text
    pub fn encrypt<T>(&self, snapshot: &T, password: &str) -> BudgetResult<String>
    where
        T: Serialize + ?Sized,
    {
        let plaintext = Zeroizing::new(serde_json::to_vec(snapshot).map_err(|e| {
            BudgetError::Encryption(format!("Snapshot is not serializable: {}", e))
        })?);

        let buffer = self.seal(&plaintext, password)?;
        Ok(STANDARD.encode(buffer))
    }

    /// Decode, authenticate and parse a blob produced by [`Self::encrypt`]
    pub fn decrypt<T>(&self, encoded: &str, password: &str) -> BudgetResult<T>
    where
        T: DeserializeOwned,
    {
        let buffer = STANDARD
            .decode(encoded.trim())
            .map_err(|_| BudgetError::Decryption)?;

        let plaintext = self.open(&buffer, password)?;
        serde_json::from_slice(&plaintext).map_err(|_| BudgetError::Decryption)
    }

    /// Encrypt raw bytes into the framed binary layout
    pub fn seal(&self, plaintext: &[u8], password: &str) -> BudgetResult<Vec<u8>> {
        if password.is_empty() {
            return Err(BudgetError::Encryption(
                "Password must not be empty".to_string(),
            ));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        self.random.fill(&mut salt)?;
        self.random.fill(&mut nonce)?;

        let key = self.kdf.derive(password.as_bytes(), &salt)?;
        let ciphertext = encryption::seal(&key, &nonce, plaintext)?;

        let mut buffer = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        buffer.extend_from_slice(&salt);
        buffer.extend_from_slice(&nonce);
        buffer.extend_from_slice(&ciphertext);

        debug!(bytes = buffer.len(), "sealed backup blob");
        Ok(buffer)
    }

    /// Split a framed buffer, re-derive the key and decrypt
    pub fn open(&self, buffer: &[u8], password: &str) -> BudgetResult<Zeroizing<Vec<u8>>> {
        // Short buffers are rejected before any KDF or cipher work.
        if password.is_empty() || buffer.len() < MIN_BLOB_LEN {
            return Err(BudgetError::Decryption);
        }

        let (salt, rest) = buffer.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        let salt: &[u8; SALT_LEN] = salt.try_into().map_err(|_| BudgetError::Decryption)?;
        let nonce: &[u8; NONCE_LEN] = nonce.try_into().map_err(|_| BudgetError::Decryption)?;

        let key = self
            .kdf
            .derive(password.as_bytes(), salt)
            .map_err(|_| BudgetError::Decryption)?;

        encryption::open(&key, nonce, ciphertext)
    }
}

/// Encrypt a snapshot with the production codec
pub fn encrypt<T>(snapshot: &T, password: &str) -> BudgetResult<String>
where
    T: Serialize + ?Sized,
{
    BackupCodec::new().encrypt(snapshot, password)
}

/// Decrypt a snapshot with the production codec
pub fn decrypt<T>(encoded: &str, password: &str) -> BudgetResult<T>
where
    T: DeserializeOwned,
{
    BackupCodec::new().decrypt(encoded, password)
}
