//! Crypto used by the encrypted credential file: Argon2id turns the
//! passphrase into a master key, HKDF splits that into per-entry and HMAC
//! keys, and AES-256-GCM seals each value.

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{open_value, seal_value};
pub use kdf::{derive_master_key, generate_salt, Argon2Params};
pub use keys::{derive_entry_key, derive_hmac_key, MasterKey};
