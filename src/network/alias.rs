//! Hardware address -> user label mapping, optionally mirrored to a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::canonical_mac;
use crate::error::Result;

/// Shared alias table. Clones refer to the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct AliasStore {
    data: Arc<Mutex<BTreeMap<String, String>>>,
    path: Option<PathBuf>,
}

impl AliasStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Loaded {} aliases from {}", data.len(), path.display());

        Ok(Self {
            data: Arc::new(Mutex::new(data)),
            path: Some(path),
        })
    }

    pub fn set(&self, hw_address: &str, label: &str) -> bool {
        let mut data = self.data.lock();
        data.insert(canonical_mac(hw_address), label.to_string());
        self.save(&data);
        true
    }

    /// Returns the label for `hw_address`, or an empty string if none is set.
    pub fn get(&self, hw_address: &str) -> String {
        self.data
            .lock()
            .get(&canonical_mac(hw_address))
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        let mut data = self.data.lock();
        data.clear();
        self.save(&data);
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Point-in-time copy of every alias.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.lock().clone()
    }

    fn save(&self, data: &BTreeMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        let written = serde_json::to_string_pretty(data)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(path, json));
        if let Err(e) = written {
            tracing::warn!("Failed to persist aliases to {}: {}", path.display(), e);
        }
    }
}
