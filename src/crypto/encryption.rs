//! AES-256-GCM sealing of a single credential value.
//!
//! Each stored value is sealed under its own per-entry key with a nonce
//! drawn fresh on every write. The sealed form is what the file backend
//! writes into the entry's `value` field:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::errors::{CrewKeyError, Result};

const NONCE_LEN: usize = 12;

fn cipher_for(entry_key: &[u8]) -> Option<Aes256Gcm> {
    Aes256Gcm::new_from_slice(entry_key).ok()
}

/// Seal a credential value under `entry_key`.
pub fn seal_value(entry_key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher_for(entry_key)
        .ok_or_else(|| CrewKeyError::EncryptionFailed("entry key must be 32 bytes".into()))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let body = cipher
        .encrypt(&nonce, value)
        .map_err(|e| CrewKeyError::EncryptionFailed(format!("sealing value failed: {e}")))?;

    let mut sealed = nonce.to_vec();
    sealed.extend_from_slice(&body);
    Ok(sealed)
}

/// Recover a value sealed by [`seal_value`].
///
/// A short blob, a wrong key and a flipped bit all come back as the same
/// `DecryptionFailed`.
pub fn open_value(entry_key: &[u8], sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if sealed.len() < NONCE_LEN {
        return Err(CrewKeyError::DecryptionFailed);
    }
    let (nonce, body) = sealed.split_at(NONCE_LEN);
    let cipher = cipher_for(entry_key).ok_or(CrewKeyError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map(Zeroizing::new)
        .map_err(|_| CrewKeyError::DecryptionFailed)
}
