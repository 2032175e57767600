//! Token storage.
//!
//! The [`TokenStore`] is the single holder of the current [`Credential`].
//! The transport reads it synchronously before every request; the login,
//! refresh and logout flows are its only writers.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fs2::FileExt;
use tracing::{debug, warn};

use super::tokens::Credential;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Key the access token is persisted under.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Holder of the current credential.
///
/// Implementations must not block on I/O in [`TokenStore::get`]; it is
/// called before every outgoing request. No expiry tracking happens here:
/// an expired token is only discovered when the backend answers 401.
pub trait TokenStore: Send + Sync {
    /// Returns the current credential, or `None` when unauthenticated.
    fn get(&self) -> Option<Credential>;

    /// Replace the current credential.
    fn set(&self, credential: Credential);

    /// Remove the current credential.
    fn clear(&self);
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self) -> Option<Credential> {
        (**self).get()
    }

    fn set(&self, credential: Credential) {
        (**self).set(credential)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

fn read_slot(slot: &RwLock<Option<Credential>>) -> RwLockReadGuard<'_, Option<Credential>> {
    slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_slot(slot: &RwLock<Option<Credential>>) -> RwLockWriteGuard<'_, Option<Credential>> {
    slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Credential> {
        read_slot(&self.slot).clone()
    }

    fn set(&self, credential: Credential) {
        *write_slot(&self.slot) = Some(credential);
    }

    fn clear(&self) {
        *write_slot(&self.slot) = None;
    }
}

/// A store persisted to a JSON file, surviving process restarts.
///
/// The file is read once when the store is opened and rewritten on every
/// change. Reads are served from memory. Write failures are logged and do
/// not affect the in-memory credential.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    slot: RwLock<Option<Credential>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any credential already persisted.
    ///
    /// A missing file means no credential. An unreadable or malformed file is
    /// logged and treated the same way.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let credential = load(&path);
        debug!(path = %path.display(), authenticated = credential.is_some(), "Opened token store");
        Self {
            path,
            slot: RwLock::new(credential),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, credential: Option<&Credential>) {
        let result = match credential {
            Some(credential) => write_file(&self.path, credential),
            None => remove_file(&self.path),
        };

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist token store");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Credential> {
        read_slot(&self.slot).clone()
    }

    fn set(&self, credential: Credential) {
        let mut slot = write_slot(&self.slot);
        self.persist(Some(&credential));
        *slot = Some(credential);
    }

    fn clear(&self) {
        let mut slot = write_slot(&self.slot);
        self.persist(None);
        *slot = None;
    }
}

fn load(path: &Path) -> Option<Credential> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read token store");
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(credential) => Some(credential),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed token store");
            None
        }
    }
}

fn write_file(path: &Path, credential: &Credential) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(credential)?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?;

    file.lock_exclusive()?;
    let written = rewrite(&mut file, json.as_bytes());
    file.unlock()?;
    written?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn rewrite(file: &mut File, contents: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.write_all(contents)?;
    file.sync_data()
}

fn remove_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
