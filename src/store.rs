//! JSON document store backing every Proago module.
//!
//! One pretty-printed JSON file per logical store, addressed by a stable key.
//! Reads never fail: a missing file, an IO error, or a parse error all fall
//! back to the caller-supplied default. Writes replace the whole document.
//! Concurrent writers race via last-write-wins; accepted limitation for the
//! single-operator deployment model.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Current on-disk schema version. Documents written by earlier revisions of
/// the CRM were bare arrays/objects without an envelope; `get` migrates those.
const SCHEMA_VERSION: u32 = 1;

/// Canonical store keys. Earlier revisions of the original reached the same
/// logical store under several drifting names; these are the only ones used.
pub mod keys {
    pub const CANDIDATES: &str = "candidates";
    pub const RECRUITERS: &str = "recruiters";
    pub const PLANNING: &str = "planning";
    pub const HISTORY: &str = "history";
    pub const SETTINGS: &str = "settings";
    pub const AUDIT: &str = "audit";
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

#[derive(Clone)]
pub struct Store {
    root: Arc<PathBuf>,
}

impl Store {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create data directory {}", root.display()))?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("proago.{key}.json"))
    }

    /// Read a document, falling back to `default` on any failure.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return default,
        };

        if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(&raw) {
            return envelope.data;
        }

        // Legacy document without a version envelope.
        match serde_json::from_str::<T>(&raw) {
            Ok(data) => data,
            Err(err) => {
                warn!("store '{key}' unreadable, using default: {err}");
                default
            }
        }
    }

    /// Write a document wholesale under the version envelope.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            data: value,
        };
        let serialized = serde_json::to_string_pretty(&envelope)?;
        let path = self.path_for(key);
        fs::write(&path, serialized)
            .with_context(|| format!("failed to write store '{key}' to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> Store {
        let dir = std::env::temp_dir().join(format!("proago-store-{tag}-{}", uuid::Uuid::new_v4()));
        Store::new(dir).unwrap()
    }

    #[test]
    fn missing_key_returns_default() {
        let store = temp_store("missing");
        let value: Vec<String> = store.get("candidates", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn round_trips_through_envelope() {
        let store = temp_store("roundtrip");
        store.set("candidates", &vec![1u32, 2, 3]).unwrap();
        let value: Vec<u32> = store.get("candidates", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn accepts_legacy_document_without_envelope() {
        let store = temp_store("legacy");
        let path = store.root().join("proago.candidates.json");
        fs::write(&path, "[10, 20]").unwrap();
        let value: Vec<u32> = store.get("candidates", Vec::new());
        assert_eq!(value, vec![10, 20]);
    }

    #[test]
    fn corrupt_document_returns_default() {
        let store = temp_store("corrupt");
        let path = store.root().join("proago.candidates.json");
        fs::write(&path, "{not json").unwrap();
        let value: Vec<u32> = store.get("candidates", vec![7]);
        assert_eq!(value, vec![7]);
    }
}
