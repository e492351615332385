//! Cryptographic functions for BudgetVault
//!
//! Provides the backup codec: PBKDF2-HMAC-SHA256 key derivation, AES-256-GCM
//! authenticated encryption, and the `salt || nonce || ciphertext` framing
//! carried as base64 text.

pub mod codec;
pub mod encryption;
pub mod key_derivation;
pub mod random;
pub mod secure_memory;

pub use codec::{decrypt, encrypt, BackupCodec, HEADER_LEN, MIN_BLOB_LEN};
pub use encryption::{NONCE_LEN, TAG_LEN};
pub use key_derivation::{
    derive_key, DerivedKey, KeyDerivation, Pbkdf2Sha256, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN,
};
pub use random::{OsRandom, RandomSource, SeededRandom};
pub use secure_memory::SecureString;
