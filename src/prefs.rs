//! Preference persistence
//!
//! Expiring name/value store backed by a JSON file in the platform config
//! directory. Each entry carries its own TTL in days; expired entries read
//! back as absent.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Preference store errors
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One stored value with its expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PrefEntry {
    value: String,
    /// Unix timestamp (seconds) after which the entry is treated as absent
    expires_at: u64,
}

/// Expiring name/value store persisted as JSON
#[derive(Debug)]
pub struct PreferenceStore {
    entries: HashMap<String, PrefEntry>,
    /// `None` for throwaway in-memory stores
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// Store location under the platform config directory
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("stereopane");
            p.push("preferences.json");
            p
        })
    }

    /// Load the store from the config directory. Missing or unreadable files
    /// yield an empty store; persistence is best-effort.
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => {
                log::warn!("Could not find config directory, preferences will not persist");
                Self::in_memory()
            }
        }
    }

    /// Load the store from an explicit file path
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Malformed preference store {:?}: {}", path, e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Create a store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            entries: HashMap::new(),
            path: None,
        }
    }

    /// Current unix time in seconds
    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Read one named value. Returns the empty string when the entry is
    /// absent or expired.
    pub fn get(&self, name: &str) -> String {
        match self.entries.get(name) {
            Some(entry) if Self::now_secs() < entry.expires_at => entry.value.clone(),
            _ => String::new(),
        }
    }

    /// Write one named value with an expiry of `ttl_days` from now and
    /// persist the store. Save failures are logged, not surfaced.
    pub fn set(&mut self, name: &str, value: &str, ttl_days: i64) {
        let expires_at = (Self::now_secs() as i64)
            .saturating_add(ttl_days.saturating_mul(86_400))
            .max(0) as u64;
        self.entries.insert(
            name.to_string(),
            PrefEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        self.prune_expired();
        if let Err(e) = self.save() {
            log::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Self::now_secs();
        self.entries.values().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune_expired(&mut self) {
        let now = Self::now_secs();
        self.entries.retain(|_, e| e.expires_at > now);
    }

    /// Write the store to its backing file, creating parent directories as
    /// needed. In-memory stores are a no-op.
    pub fn save(&self) -> Result<(), PrefsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Parse a pixel dimension string ("44", "44px") into an integer.
/// The empty string and non-numeric junk parse to 0.
pub fn parse_px(value: &str) -> i32 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("stereopane-prefs-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_set_then_get() {
        let mut store = PreferenceStore::in_memory();
        store.set("eyeSeparation", "44", 365);
        assert_eq!(store.get("eyeSeparation"), "44");
    }

    #[test]
    fn test_absent_reads_empty() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.get("eyeSeparation"), "");
    }

    #[test]
    fn test_expired_entry_reads_absent() {
        let mut store = PreferenceStore::in_memory();
        store.set("eyeSeparation", "44", 0);
        assert_eq!(store.get("eyeSeparation"), "");
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut store = PreferenceStore::in_memory();
        store.set("eyeSeparation", "44", 365);
        store.set("eyeSeparation", "46", 365);
        assert_eq!(store.get("eyeSeparation"), "46");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_store_path();
        let mut store = PreferenceStore::open(&path);
        store.set("eyeSeparation", "52", 365);

        let reloaded = PreferenceStore::open(&path);
        assert_eq!(reloaded.get("eyeSeparation"), "52");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let path = temp_store_path();
        fs::write(&path, "not json at all").unwrap();

        let store = PreferenceStore::open(&path);
        assert_eq!(store.get("anything"), "");
        assert!(store.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px(""), 0);
        assert_eq!(parse_px("44"), 44);
        assert_eq!(parse_px("44px"), 44);
        assert_eq!(parse_px(" 12px "), 12);
        assert_eq!(parse_px("-8"), -8);
        assert_eq!(parse_px("junk"), 0);
    }
}
