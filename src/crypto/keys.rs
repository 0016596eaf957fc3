//! Sub-key derivation using HKDF-SHA256.
//!
//! From the master key we derive an independent encryption key for each
//! storage key, plus a dedicated HMAC key for file integrity.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{CrewKeyError, Result};

const KEY_LEN: usize = 32;

/// Derive the encryption key for one storage key.
///
/// `info` is `"crewkey-entry:<storage_key>"`, binding each ciphertext to
/// the slot it was written to.
pub fn derive_entry_key(master_key: &[u8], storage_key: &str) -> Result<[u8; KEY_LEN]> {
    let info = format!("crewkey-entry:{storage_key}");
    hkdf_derive(master_key, info.as_bytes())
}

/// Derive the HMAC key used to authenticate the whole credential file.
pub fn derive_hmac_key(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, b"crewkey-file-hmac")
}

/// HKDF-SHA256 expand only; the master key already came out of Argon2id.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| CrewKeyError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master key that zeroes its memory on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn derive_entry_key(&self, storage_key: &str) -> Result<[u8; KEY_LEN]> {
        derive_entry_key(&self.bytes, storage_key)
    }

    pub fn derive_hmac_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_hmac_key(&self.bytes)
    }
}
