//! Durable session storage
//!
//! The session store is the only state that survives the authorization
//! redirect: the in-flight verifier is written before the user leaves and
//! read back by a later process once the provider redirects home.

use super::pkce::{CodeVerifier, PkceError};
use super::token::{BearerToken, TokenPair};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

const VERIFIER_KEY: &str = "verifier";
const TOKENS_KEY: &str = "tokens";

/// Key-value storage scoped to one user profile
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value and return what was stored
    fn remove(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// In-process store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().remove(key))
    }
}

/// JSON-file backed store
///
/// All entries live in a single file that is replaced on every mutation:
/// the new map is written to a private temp file beside it and renamed over
/// the old one. The lock only serialises access within this process.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `~/.encore/session.json`
    pub fn default_location() -> Result<Self, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::Io("Cannot find home directory".into()))?;
        Ok(Self::new(home.join(".encore").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Entries a mutation starts from.
    ///
    /// An unparseable file yields an empty map and `true`, so the caller
    /// overwrites it instead of failing on every write.
    fn load_for_update(&self) -> Result<(HashMap<String, String>, bool), StoreError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Serialization(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session file is corrupt, starting from an empty session"
                );
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(parent)?;
        }

        let content = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let temp_path = self.temp_path();
        write_private(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            StoreError::Io(e.to_string())
        })
    }

    /// `<file>.<pid>.tmp` in the same directory, so the rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let (mut entries, _) = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        let (mut entries, corrupt) = self.load_for_update()?;
        let removed = entries.remove(key);
        if removed.is_some() || corrupt {
            self.persist(&entries)?;
        }
        Ok(removed)
    }
}

/// Create `path` afresh with owner-only permissions and write `content`
fn write_private(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(StoreError::Io(e.to_string())),
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| StoreError::Io(e.to_string()))?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| StoreError::Io(e.to_string()))
}

fn create_private_dir(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        if !path.exists() {
            std::fs::DirBuilder::new()
                .recursive(true)
                .mode(0o700)
                .create(path)
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
    }

    #[cfg(not(unix))]
    {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    Ok(())
}

/// Session-level view over a [`KeyValueStore`]
///
/// Holds at most one in-flight verifier and at most one token pair.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persist the verifier for the login attempt in flight, replacing any stale one
    pub fn save_verifier(&self, verifier: &CodeVerifier) -> Result<(), StoreError> {
        self.backend.set(VERIFIER_KEY, verifier.as_str())
    }

    /// Remove and return the in-flight verifier.
    ///
    /// A second call returns `None` until a new login saves another verifier.
    pub fn take_verifier(&self) -> Result<Option<CodeVerifier>, StoreError> {
        match self.backend.remove(VERIFIER_KEY)? {
            Some(raw) => CodeVerifier::from_string(raw)
                .map(Some)
                .map_err(|e: PkceError| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Whether a verifier is waiting for an exchange
    pub fn has_verifier(&self) -> Result<bool, StoreError> {
        Ok(self.backend.get(VERIFIER_KEY)?.is_some())
    }

    /// Persist the token pair; saving the same pair twice is harmless
    pub fn save_tokens(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(pair).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set(TOKENS_KEY, &raw)
    }

    /// Stored token pair, if any
    pub fn tokens(&self) -> Result<Option<TokenPair>, StoreError> {
        match self.backend.get(TOKENS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Access token of the stored pair, if any
    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.tokens()?.map(|pair| pair.access_token))
    }

    /// Bearer credential for collaborators, `None` while anonymous
    pub fn bearer(&self) -> Result<Option<BearerToken>, StoreError> {
        Ok(self.tokens()?.map(|pair| pair.bearer()))
    }

    /// Drop the token pair and any in-flight verifier
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(TOKENS_KEY)?;
        self.backend.remove(VERIFIER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn verifier(c: char) -> CodeVerifier {
        CodeVerifier::from_string(c.to_string().repeat(43)).unwrap()
    }

    #[test]
    fn test_take_verifier_consumes() {
        let store = SessionStore::in_memory();
        store.save_verifier(&verifier('a')).unwrap();

        assert!(store.has_verifier().unwrap());
        assert_eq!(store.take_verifier().unwrap(), Some(verifier('a')));
        assert_eq!(store.take_verifier().unwrap(), None);
        assert!(!store.has_verifier().unwrap());
    }

    #[test]
    fn test_new_login_overwrites_stale_verifier() {
        let store = SessionStore::in_memory();
        store.save_verifier(&verifier('a')).unwrap();
        store.save_verifier(&verifier('b')).unwrap();

        assert_eq!(store.take_verifier().unwrap(), Some(verifier('b')));
        assert_eq!(store.take_verifier().unwrap(), None);
    }

    #[test]
    fn test_tokens_roundtrip_and_clear() {
        let store = SessionStore::in_memory();
        assert_eq!(store.access_token().unwrap(), None);

        let pair = TokenPair::new("T", Some("R".to_string()));
        store.save_tokens(&pair).unwrap();
        store.save_tokens(&pair).unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("T"));
        assert_eq!(store.tokens().unwrap(), Some(pair));

        store.clear().unwrap();
        assert_eq!(store.access_token().unwrap(), None);
        assert!(store.bearer().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_verifier_is_still_consumed() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(VERIFIER_KEY, "too-short").unwrap();
        let store = SessionStore::new(backend);

        assert!(store.take_verifier().is_err());
        assert_eq!(store.take_verifier().unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        let first = SessionStore::new(Arc::new(FileStore::new(&path)));
        first.save_verifier(&verifier('v')).unwrap();
        drop(first);

        let second = SessionStore::new(Arc::new(FileStore::new(&path)));
        assert_eq!(second.take_verifier().unwrap(), Some(verifier('v')));

        let third = SessionStore::new(Arc::new(FileStore::new(&path)));
        assert_eq!(third.take_verifier().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("private").join("session.json"));
        store.set("k", "v").unwrap();

        let file_mode = std::fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        let dir_mode = std::fs::metadata(store.path().parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, r#"{"tokens": "{\"acc"#).unwrap();
        let store = SessionStore::new(Arc::new(FileStore::new(&path)));

        assert!(store.tokens().is_err());
        store.save_verifier(&verifier('v')).unwrap();

        assert_eq!(store.take_verifier().unwrap(), Some(verifier('v')));
        assert_eq!(store.tokens().unwrap(), None);
    }

    #[test]
    fn test_clear_repairs_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let store = SessionStore::new(Arc::new(FileStore::new(&path)));

        store.clear().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let entries: HashMap<String, String> = serde_json::from_str(&content).unwrap();
        assert!(entries.is_empty());
        assert_eq!(store.access_token().unwrap(), None);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("session.json"));
        store.set("k", "v").unwrap();
        store.set("k", "w").unwrap();

        let names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_tightens_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::new(&path).set("tokens", "secret").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_file_store_remove_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("session.json"));

        assert_eq!(store.remove("absent").unwrap(), None);
        assert!(!store.path().exists());
    }
}
