//! The media file selected for one workflow run

use bytes::Bytes;
use std::fmt;

/// Media file held for the duration of one workflow run
///
/// Cloning is cheap; the raw bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionFile {
    name: String,
    mime_type: Option<String>,
    bytes: Bytes,
}

impl SessionFile {
    /// Create a session file from raw bytes
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Attach the detected MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Detected MIME type, if known
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Raw contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the contents, for upload bodies
    pub fn contents(&self) -> Bytes {
        self.bytes.clone()
    }
}

// Raw bytes stay out of logs.
impl fmt::Debug for SessionFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFile")
            .field("name", &self.name)
            .field("size", &self.size())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Format bytes for human-readable display
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_matches_bytes() {
        let file = SessionFile::new("clip.mp4", vec![0u8; 2048]);
        assert_eq!(file.size(), 2048);
        assert_eq!(file.name(), "clip.mp4");
        assert!(file.mime_type().is_none());
    }

    #[test]
    fn test_contents_share_the_buffer() {
        let file = SessionFile::new("clip.mp4", vec![3u8; 4096]);
        let copy = file.clone();

        assert_eq!(file.contents().as_ptr(), file.bytes().as_ptr());
        assert_eq!(copy.contents().as_ptr(), file.bytes().as_ptr());
        assert_eq!(file.contents().len(), 4096);
    }

    #[test]
    fn test_debug_omits_contents() {
        let file = SessionFile::new("clip.mp4", vec![7u8; 16]).with_mime_type("video/mp4");
        let debug = format!("{:?}", file);
        assert!(debug.contains("clip.mp4"));
        assert!(debug.contains("video/mp4"));
        assert!(!debug.contains("bytes"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
