//! File-backed token store
//!
//! Persists the session token as a small JSON document:
//!
//! ```json
//! { "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..." }
//! ```
//!
//! The file is written with 0600 permissions on Unix and removed when the
//! session ends. A missing file means no session.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lexi_core::{DomainError, DomainResult, SessionToken, TokenStore};

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: SessionToken,
}

/// Token store persisted to a single file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cache: RwLock<Option<SessionToken>>,
}

impl FileTokenStore {
    /// Open a store at `path`, loading any token already saved there
    pub fn open(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        let token = read_token(&path)?;
        debug!(path = %path.display(), has_token = token.is_some(), "Opened token file");
        Ok(Self {
            path,
            cache: RwLock::new(token),
        })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, picking up changes made by other processes
    pub fn reload(&self) -> DomainResult<Option<SessionToken>> {
        let token = read_token(&self.path)?;
        *self.cache.write() = token.clone();
        Ok(token)
    }

    fn write_file(&self, token: &SessionToken) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_vec_pretty(&TokenFile {
            token: token.clone(),
        })
        .map_err(|e| DomainError::Storage(e.to_string()))?;

        // Write next to the target then rename, so readers never observe a
        // half-written file
        let tmp = self.path.with_extension("tmp");
        match fs::remove_file(&tmp) {
            Ok(()) => debug!(path = %tmp.display(), "Removed stale temporary token file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut file = owner_only().open(&tmp)?;
        file.write_all(&contents)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Options for a new file readable only by its owner from the moment it
/// exists
fn owner_only() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn read_token(path: &Path) -> DomainResult<Option<SessionToken>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let file: TokenFile = serde_json::from_slice(&contents).map_err(|e| {
        DomainError::CorruptedStorage(format!("{}: {e}", path.display()))
    })?;
    Ok(Some(file.token))
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> DomainResult<Option<SessionToken>> {
        Ok(self.cache.read().clone())
    }

    fn save(&self, token: &SessionToken) -> DomainResult<()> {
        let mut cache = self.cache.write();
        self.write_file(token)?;
        *cache = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        let mut cache = self.cache.write();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *cache = None;
        Ok(())
    }
}
