//! Shared session state: the file selected for the current run
//!
//! Created when the workflow starts and passed explicitly to each screen.
//! Selection is the only writer, the analysis screen the only reader.

use crate::models::SessionFile;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holder for at most one selected file
#[derive(Clone, Default)]
pub struct SessionState {
    file: Arc<RwLock<Option<SessionFile>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected file (`None` clears it)
    pub async fn set_file(&self, file: Option<SessionFile>) {
        let mut slot = self.file.write().await;
        match (&*slot, &file) {
            (Some(old), Some(new)) => {
                tracing::debug!(old = %old.name(), new = %new.name(), "Replacing session file")
            }
            (_, Some(new)) => tracing::debug!(file = %new.name(), "Session file set"),
            (Some(_), None) => tracing::debug!("Session file cleared"),
            (None, None) => {}
        }
        *slot = file;
    }

    /// Currently selected file, if any
    pub async fn get_file(&self) -> Option<SessionFile> {
        self.file.read().await.clone()
    }

    /// Remove and return the selected file
    pub async fn take_file(&self) -> Option<SessionFile> {
        self.file.write().await.take()
    }

    /// Drop the selected file
    pub async fn clear(&self) {
        self.set_file(None).await;
    }

    pub async fn has_file(&self) -> bool {
        self.file.read().await.is_some()
    }
}
