//! Result handoff between the analysis and results screens
//!
//! A narrow key/value contract over session-scoped storage: the analysis
//! screen writes the serialized result once, the results screen reads it once
//! and the key is removed on read.

use crate::models::AnalysisResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use voxear_common::{Error, Result};

/// Storage key holding the serialized result
pub const RESULT_KEY: &str = "analysisResult";

/// Session-scoped string key/value storage
pub trait SessionStorage: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn get_item(&self, key: &str) -> Option<String>;
    fn remove_item(&self, key: &str);
}

/// In-process storage that lives as long as the workflow session
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map of strings.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn remove_item(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// One-shot carrier of the analysis result
#[derive(Clone)]
pub struct ResultHandoff {
    storage: Arc<dyn SessionStorage>,
}

impl ResultHandoff {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Handoff backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Serialize and write the result
    pub fn store(&self, result: &AnalysisResult) -> Result<()> {
        let json = serde_json::to_string(result)?;
        self.storage
            .set_item(RESULT_KEY, &json)
            .map_err(|e| Error::Storage(format!("Store {RESULT_KEY}: {e}")))?;
        tracing::debug!(key = RESULT_KEY, bytes = json.len(), "Analysis result stored");
        Ok(())
    }

    /// Read and clear the stored result
    ///
    /// Returns `None` when nothing was stored or the stored value is not a
    /// valid result; either way the caller redirects to selection.
    pub fn load(&self) -> Option<AnalysisResult> {
        let raw = self.storage.get_item(RESULT_KEY)?;
        self.storage.remove_item(RESULT_KEY);

        match serde_json::from_str::<AnalysisResult>(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored analysis result");
                None
            }
        }
    }
}
