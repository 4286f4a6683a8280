//! File selection screen ("Upload")
//!
//! Holds at most one pending file. Analyze is only available once a file is
//! pending; it hands the file to the session and moves to the analysis
//! screen. Reset discards the pending file.

use crate::error::{FlowError, FlowResult};
use crate::models::{format_size, SessionFile};
use crate::navigation::Navigator;
use crate::session::SessionState;
use std::path::Path;
use voxear_common::events::ScreenId;

/// Extensions accepted when the content type cannot be sniffed
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

/// Summary shown once a file is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCard {
    pub name: String,
    pub size: String,
}

/// Selection screen state
#[derive(Debug, Default)]
pub struct SelectionScreen {
    pending: Option<SessionFile>,
}

impl SelectionScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and make it the pending file
    ///
    /// A rejected file leaves the previous selection untouched.
    pub fn choose(&mut self, path: &Path) -> FlowResult<&SessionFile> {
        let file = load_file(path)?;
        tracing::info!(
            file = %file.name(),
            size = file.size(),
            mime = ?file.mime_type(),
            "File selected"
        );
        Ok(self.pending.insert(file))
    }

    /// Use an already-loaded file
    pub fn choose_file(&mut self, file: SessionFile) -> FlowResult<&SessionFile> {
        let file = accept(file)?;
        Ok(self.pending.insert(file))
    }

    /// Discard the pending file
    pub fn reset(&mut self) {
        if let Some(file) = self.pending.take() {
            tracing::debug!(file = %file.name(), "Selection reset");
        }
    }

    pub fn pending(&self) -> Option<&SessionFile> {
        self.pending.as_ref()
    }

    /// Name and size of the pending file
    pub fn file_card(&self) -> Option<FileCard> {
        self.pending.as_ref().map(|f| FileCard {
            name: f.name().to_string(),
            size: format_size(f.size()),
        })
    }

    /// Whether the analyze action is available
    pub fn can_analyze(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand the pending file to the session and go to the analysis screen
    ///
    /// Returns `false` (and does nothing) when no file is pending.
    pub async fn analyze(&mut self, session: &SessionState, navigator: &mut Navigator) -> bool {
        let Some(file) = self.pending.take() else {
            tracing::debug!("Analyze requested without a selected file");
            return false;
        };
        session.set_file(Some(file)).await;
        navigator.navigate(ScreenId::Analysis);
        true
    }
}

/// Read a file from disk into a [`SessionFile`]
pub fn load_file(path: &Path) -> FlowResult<SessionFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    accept(SessionFile::new(name, bytes))
}

fn accept(file: SessionFile) -> FlowResult<SessionFile> {
    Ok(match validate_video(&file)? {
        Some(mime) => file.with_mime_type(mime),
        None => file,
    })
}

/// Accept only video content
///
/// Sniffed content decides when it is recognized; otherwise the extension
/// must be a known video container. Returns the sniffed MIME type.
fn validate_video(file: &SessionFile) -> FlowResult<Option<String>> {
    if file.size() == 0 {
        return Err(FlowError::InvalidSelection(format!(
            "{} is empty",
            file.name()
        )));
    }

    match infer::get(file.bytes()) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Video => {
            Ok(Some(kind.mime_type().to_string()))
        }
        Some(kind) => Err(FlowError::InvalidSelection(format!(
            "{} is not a video ({})",
            file.name(),
            kind.mime_type()
        ))),
        None if has_video_extension(file.name()) => Ok(file.mime_type().map(str::to_string)),
        None => Err(FlowError::InvalidSelection(format!(
            "{} is not a recognized video file",
            file.name()
        ))),
    }
}

fn has_video_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.as_str()))
}
