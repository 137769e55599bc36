use crate::domain::StoreError;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Key of the persisted session token slot.
pub const TOKEN_KEY: &str = "token";

/// A single persisted slot holding the current session token.
pub trait TokenStore: std::fmt::Debug {
    fn load(&self) -> Option<String>;
    fn save(&mut self, token: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.clone()
    }

    fn save(&mut self, token: &str) -> Result<(), StoreError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.token = None;
        Ok(())
    }
}

/// Token slot inside a JSON key/value file, e.g. `{"token": "abc"}`.
///
/// Other keys in the file are left alone on write.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match self.read_entries() {
            Ok(entries) => entries.get(TOKEN_KEY).and_then(Value::as_str).map(str::to_string),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable token store");
                None
            }
        }
    }

    fn save(&mut self, token: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let mut store = MemoryTokenStore::new();
        assert!(store.load().is_none());

        store.save("abc").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileTokenStore::new(&path);
        store.save("token-1").unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.load().as_deref(), Some("token-1"));

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "token-1");
    }

    #[test]
    fn test_file_store_clear_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": "abc", "theme": "dark"}"#).unwrap();

        let mut store = FileTokenStore::new(&path);
        store.clear().unwrap();

        assert!(store.load().is_none());
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get("token").is_none());
    }

    #[test]
    fn test_file_store_clear_without_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileTokenStore::new(&path);
        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileTokenStore::new(&path);
        assert!(store.load().is_none());

        store.save("fresh").unwrap();
        assert_eq!(store.load().as_deref(), Some("fresh"));
    }
}
