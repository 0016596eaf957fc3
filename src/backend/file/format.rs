//! Binary layout of the encrypted credential file.
//!
//! ```text
//! [CKEY: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][entries JSON][HMAC-SHA256: 32 bytes]
//! ```
//!
//! - **Magic** (`CKEY`): identifies the file.
//! - **Header JSON**: serialized `FileHeader` (salt, KDF params).
//! - **Entries JSON**: serialized `Vec<StoredEntry>`, each value being
//!   `nonce || AES-256-GCM ciphertext`.
//! - **HMAC-SHA256**: computed over header + entries bytes exactly as
//!   written, and verified over the bytes exactly as read.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::crypto::Argon2Params;
use crate::errors::{CrewKeyError, Result};

const MAGIC: &[u8; 4] = b"CKEY";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

const HMAC_LEN: usize = 32;

/// 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

/// Metadata at the start of the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHeader {
    pub version: u8,

    /// Argon2id salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    pub created_at: DateTime<Utc>,

    /// KDF parameters the file was sealed with.
    pub argon2_params: Argon2Params,
}

/// One encrypted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Backend storage key, e.g. `credential.llm-provider-a`.
    pub key: String,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub value: Vec<u8>,

    pub updated_at: DateTime<Utc>,
}

/// Parsed file plus the raw sections the HMAC covers.
pub struct RawFile {
    pub header: FileHeader,
    pub entries: Vec<StoredEntry>,
    pub header_bytes: Vec<u8>,
    pub entries_bytes: Vec<u8>,
    pub stored_hmac: Vec<u8>,
}

/// Serialize header + entries and append the HMAC tag.
pub fn encode(header: &FileHeader, entries: &[StoredEntry], hmac_key: &[u8]) -> Result<Vec<u8>> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| CrewKeyError::SerializationError(format!("header: {e}")))?;
    let entries_bytes = serde_json::to_vec(entries)
        .map_err(|e| CrewKeyError::SerializationError(format!("entries: {e}")))?;

    let hmac_tag = compute_hmac(hmac_key, &header_bytes, &entries_bytes)?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        CrewKeyError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let total = PREFIX_LEN + header_bytes.len() + entries_bytes.len() + HMAC_LEN;
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(MAGIC);
    buf.push(CURRENT_VERSION);
    buf.extend_from_slice(&header_len.to_le_bytes());
    buf.extend_from_slice(&header_bytes);
    buf.extend_from_slice(&entries_bytes);
    buf.extend_from_slice(&hmac_tag);
    Ok(buf)
}

/// Split a file into its sections and deserialize them.
///
/// Nothing here is trusted until the caller has run [`verify_hmac`] over
/// `header_bytes` and `entries_bytes`.
pub fn decode(data: &[u8]) -> Result<RawFile> {
    if data.len() < PREFIX_LEN + HMAC_LEN {
        return Err(CrewKeyError::InvalidStoreFormat(
            "file too small to be a credential file".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CrewKeyError::InvalidStoreFormat(
            "missing CKEY magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(CrewKeyError::InvalidStoreFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| CrewKeyError::InvalidStoreFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        CrewKeyError::InvalidStoreFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN + header_len;
    if header_end + HMAC_LEN > data.len() {
        return Err(CrewKeyError::InvalidStoreFormat(
            "header length exceeds file size".into(),
        ));
    }

    let header_bytes = data[PREFIX_LEN..header_end].to_vec();
    let entries_end = data.len() - HMAC_LEN;
    let entries_bytes = data[header_end..entries_end].to_vec();
    let stored_hmac = data[entries_end..].to_vec();

    let header: FileHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| CrewKeyError::InvalidStoreFormat(format!("header JSON: {e}")))?;

    let entries: Vec<StoredEntry> = serde_json::from_slice(&entries_bytes)
        .map_err(|e| CrewKeyError::InvalidStoreFormat(format!("entries JSON: {e}")))?;

    Ok(RawFile {
        header,
        entries,
        header_bytes,
        entries_bytes,
        stored_hmac,
    })
}

pub fn compute_hmac(hmac_key: &[u8], header_bytes: &[u8], entries_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CrewKeyError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(entries_bytes);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time HMAC check (`Mac::verify_slice`).
pub fn verify_hmac(
    hmac_key: &[u8],
    header_bytes: &[u8],
    entries_bytes: &[u8],
    expected_hmac: &[u8],
) -> Result<()> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CrewKeyError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(entries_bytes);

    mac.verify_slice(expected_hmac)
        .map_err(|_| CrewKeyError::HmacMismatch)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
