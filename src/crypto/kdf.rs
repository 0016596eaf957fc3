//! Argon2id stretching of the credential-file passphrase.
//!
//! A file records the parameters it was created with in its header, so
//! the values in `.crewkey.toml` only matter for new files.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{CrewKeyError, Result};

const SALT_LEN: usize = 32;

/// AES-256 key size.
const KEY_LEN: usize = 32;

/// Floor for `memory_kib` (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id cost parameters stored in every credential file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    pub iterations: u32,
    /// Lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject costs below the floor rather than weakening the file.
    pub fn check(&self) -> Result<()> {
        let problem = if self.memory_kib < MIN_MEMORY_KIB {
            format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )
        } else if self.iterations == 0 {
            "Argon2 iterations must be at least 1".to_string()
        } else if self.parallelism == 0 {
            "Argon2 parallelism must be at least 1".to_string()
        } else {
            return Ok(());
        };
        Err(CrewKeyError::KeyDerivationFailed(problem))
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CrewKeyError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Stretch the file passphrase into the 32-byte master key.
///
/// Slow by construction; the file backend calls this from `spawn_blocking`.
pub fn derive_master_key(
    passphrase: &[u8],
    salt: &[u8],
    params: &Argon2Params,
) -> Result<[u8; KEY_LEN]> {
    params.check()?;

    let mut key = [0u8; KEY_LEN];
    params
        .hasher()?
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| CrewKeyError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;
    Ok(key)
}

/// Fresh salt for a new credential file.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheapest() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn reopening_with_the_same_passphrase_yields_the_same_key() {
        let salt = [1u8; SALT_LEN];
        let first = derive_master_key(b"crew passphrase", &salt, &cheapest()).unwrap();
        let again = derive_master_key(b"crew passphrase", &salt, &cheapest()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn each_file_salt_gives_its_own_key() {
        let a = derive_master_key(b"crew passphrase", &[1u8; SALT_LEN], &cheapest()).unwrap();
        let b = derive_master_key(b"crew passphrase", &[2u8; SALT_LEN], &cheapest()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn another_passphrase_gives_another_key() {
        let salt = [3u8; SALT_LEN];
        let a = derive_master_key(b"crew passphrase", &salt, &cheapest()).unwrap();
        let b = derive_master_key(b"crew passphrasf", &salt, &cheapest()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn costs_below_the_floor_are_refused() {
        let low_memory = Argon2Params {
            memory_kib: 1024,
            ..cheapest()
        };
        let no_iterations = Argon2Params {
            iterations: 0,
            ..cheapest()
        };
        let no_lanes = Argon2Params {
            parallelism: 0,
            ..cheapest()
        };
        for params in [low_memory, no_iterations, no_lanes] {
            assert!(params.check().is_err());
            assert!(derive_master_key(b"pw", &[0u8; SALT_LEN], &params).is_err());
        }
        assert!(Argon2Params::default().check().is_ok());
    }

    #[test]
    fn new_files_get_distinct_salts() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
