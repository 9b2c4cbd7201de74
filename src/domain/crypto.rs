//! Reversible field encryption for PII columns.
//!
//! Email, first name and last name are stored as AES-256-GCM ciphertext,
//! base64-encoded with the nonce prepended. A failed encrypt or decrypt is
//! a `Processing` error that aborts the whole read/write.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::FIELD_KEY_LENGTH;
use crate::errors::{AppError, AppResult};

const NONCE_LENGTH: usize = 12;

/// AES-256-GCM cipher over individual string fields.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    pub fn new(key: &[u8; FIELD_KEY_LENGTH]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt one field. `label` names the field in the error message
    /// without leaking its value.
    pub fn encrypt(&self, plaintext: &str, label: &str) -> AppResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AppError::processing(format!("An error occurred while encrypting {}", label)))?;

        let mut combined = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    /// Decrypt one field previously produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, encoded: &str, label: &str) -> AppResult<String> {
        let combined = STANDARD.decode(encoded).map_err(|_| {
            AppError::processing(format!("An error occurred while decrypting {}", label))
        })?;
        if combined.len() < NONCE_LENGTH {
            return Err(AppError::processing(format!(
                "An error occurred while decrypting {}",
                label
            )));
        }

        let (nonce, ciphertext) = combined.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| {
                AppError::processing(format!("An error occurred while decrypting {}", label))
            })?;

        String::from_utf8(plaintext).map_err(|_| {
            AppError::processing(format!("An error occurred while decrypting {}", label))
        })
    }
}
