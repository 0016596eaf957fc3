//! Passphrase-protected credential file.
//!
//! For hosts with no usable OS keyring (headless Linux, CI containers).
//! Values are encrypted one by one with keys derived from an Argon2id
//! master key; the whole file carries an HMAC that is checked before
//! anything is decrypted. Every mutation rewrites the file atomically.

pub mod format;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use zeroize::{Zeroize, Zeroizing};

use self::format::{FileHeader, StoredEntry, CURRENT_VERSION};
use super::{validate_key, BackendError, SecureBackend};
use crate::crypto::{
    derive_master_key, generate_salt, open_value, seal_value, Argon2Params, MasterKey,
};
use crate::errors::{CrewKeyError, Result};

/// Default file name inside the data directory.
pub const FILE_NAME: &str = "credentials.ckv";

struct FileState {
    header: FileHeader,
    entries: BTreeMap<String, StoredEntry>,
    master_key: MasterKey,
}

pub struct EncryptedFileBackend {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl EncryptedFileBackend {
    /// Create a new, empty credential file at `path`.
    ///
    /// Fails if the file already exists.
    pub async fn create(
        path: &Path,
        passphrase: Zeroizing<String>,
        argon2_params: Argon2Params,
    ) -> Result<Self> {
        if tokio::fs::try_exists(path).await? {
            return Err(CrewKeyError::CommandFailed(format!(
                "credential file already exists at {}",
                path.display()
            )));
        }

        let salt = generate_salt();
        let master_key = derive_key(passphrase, salt.to_vec(), argon2_params).await?;

        let header = FileHeader {
            version: CURRENT_VERSION,
            salt: salt.to_vec(),
            created_at: Utc::now(),
            argon2_params,
        };

        let state = FileState {
            header,
            entries: BTreeMap::new(),
            master_key,
        };
        persist(path, &state).await?;

        tracing::debug!(path = %path.display(), "created credential file");
        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    /// Open an existing credential file, verifying its HMAC.
    ///
    /// A wrong passphrase and a tampered file both surface as
    /// `HmacMismatch`.
    pub async fn open(path: &Path, passphrase: Zeroizing<String>) -> Result<Self> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CrewKeyError::StoreFileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let raw = format::decode(&data)?;
        let master_key =
            derive_key(passphrase, raw.header.salt.clone(), raw.header.argon2_params).await?;

        let mut hmac_key = master_key.derive_hmac_key()?;
        let verified = format::verify_hmac(
            &hmac_key,
            &raw.header_bytes,
            &raw.entries_bytes,
            &raw.stored_hmac,
        );
        hmac_key.zeroize();
        verified?;

        let entries = raw
            .entries
            .into_iter()
            .map(|e| (e.key.clone(), e))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(FileState {
                header: raw.header,
                entries,
                master_key,
            }),
        })
    }

    /// Open `path` if it exists, otherwise create it.
    pub async fn open_or_create(
        path: &Path,
        passphrase: Zeroizing<String>,
        argon2_params: Argon2Params,
    ) -> Result<Self> {
        if tokio::fs::try_exists(path).await? {
            Self::open(path, passphrase).await
        } else {
            Self::create(path, passphrase, argon2_params).await
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries.
    pub async fn entry_count(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}

/// Argon2id is deliberately slow; keep it off the async workers.
async fn derive_key(
    passphrase: Zeroizing<String>,
    salt: Vec<u8>,
    params: Argon2Params,
) -> Result<MasterKey> {
    let mut bytes = tokio::task::spawn_blocking(move || {
        derive_master_key(passphrase.as_bytes(), &salt, &params)
    })
    .await
    .map_err(|e| CrewKeyError::KeyDerivationFailed(format!("key derivation task failed: {e}")))??;

    let key = MasterKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Write the whole file via temp file + rename so readers never observe
/// a half-written state.
async fn persist(path: &Path, state: &FileState) -> Result<()> {
    let entries: Vec<StoredEntry> = state.entries.values().cloned().collect();

    let mut hmac_key = state.master_key.derive_hmac_key()?;
    let encoded = format::encode(&state.header, &entries, &hmac_key);
    hmac_key.zeroize();
    let buf = encoded?;

    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    tokio::fs::write(&tmp_path, &buf).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

fn to_backend(e: CrewKeyError) -> BackendError {
    match e {
        CrewKeyError::DecryptionFailed | CrewKeyError::HmacMismatch => {
            BackendError::Corrupted(e.to_string())
        }
        other => BackendError::Io(other.to_string()),
    }
}

#[async_trait]
impl SecureBackend for EncryptedFileBackend {
    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), BackendError> {
        validate_key(key)?;
        let mut state = self.state.lock().await;

        let mut entry_key = state.master_key.derive_entry_key(key).map_err(to_backend)?;
        let sealed = seal_value(&entry_key, value.as_bytes());
        entry_key.zeroize();
        let sealed = sealed.map_err(to_backend)?;

        let entry = StoredEntry {
            key: key.to_string(),
            value: sealed,
            updated_at: Utc::now(),
        };
        let previous = state.entries.insert(key.to_string(), entry);

        if let Err(e) = persist(&self.path, &state).await {
            // Keep memory in step with disk.
            match previous {
                Some(p) => state.entries.insert(key.to_string(), p),
                None => state.entries.remove(key),
            };
            return Err(to_backend(e));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> std::result::Result<Zeroizing<String>, BackendError> {
        validate_key(key)?;
        let state = self.state.lock().await;

        let entry = state
            .entries
            .get(key)
            .ok_or_else(|| BackendError::NotFound(key.to_string()))?;

        let mut entry_key = state.master_key.derive_entry_key(key).map_err(to_backend)?;
        let plaintext = open_value(&entry_key, &entry.value);
        entry_key.zeroize();
        let mut plaintext = plaintext.map_err(to_backend)?;

        String::from_utf8(std::mem::take(&mut *plaintext)).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            BackendError::Corrupted(format!("value under '{key}' is not valid UTF-8"))
        })
    }

    async fn remove(&self, key: &str) -> std::result::Result<bool, BackendError> {
        validate_key(key)?;
        let mut state = self.state.lock().await;

        let Some(previous) = state.entries.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = persist(&self.path, &state).await {
            state.entries.insert(key.to_string(), previous);
            return Err(to_backend(e));
        }
        Ok(true)
    }

    async fn contains(&self, key: &str) -> std::result::Result<bool, BackendError> {
        validate_key(key)?;
        Ok(self.state.lock().await.entries.contains_key(key))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
