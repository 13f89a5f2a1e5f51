//! Attached product documents
//!
//! Only metadata is kept: the form never uploads or stores file contents.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::LeadError;

/// Upper bound for an attached document (5 MiB)
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// MIME types accepted for the attached document
pub const ACCEPTED_FILE_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Extensions offered by the file picker
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// A file chosen by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Attachment {
    pub fn new(file_name: &str, mime_type: &str, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
            path: None,
        }
    }

    /// Read the metadata of a file on disk; the MIME type is derived from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LeadError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| LeadError::Attachment {
            path: path.display().to_string(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(LeadError::Attachment {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(mime_for_extension)
            .unwrap_or("application/octet-stream");

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            size_bytes: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_FILE_TYPES.contains(&self.mime_type.as_str())
    }

    pub fn is_within_size_limit(&self) -> bool {
        self.size_bytes <= MAX_FILE_SIZE
    }

    /// Human readable size, e.g. "1.5 MB"
    pub fn display_size(&self) -> String {
        const KB: f64 = 1024.0;
        let size = self.size_bytes as f64;
        if size >= KB * KB {
            format!("{:.1} MB", size / (KB * KB))
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

/// Map a file extension to a MIME type
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_mime_mapping_covers_accepted_extensions() {
        for ext in ACCEPTED_EXTENSIONS {
            assert!(ACCEPTED_FILE_TYPES.contains(&mime_for_extension(ext)), "{}", ext);
        }
        assert_eq!(mime_for_extension("PDF"), "application/pdf");
        assert_eq!(mime_for_extension("gif"), "image/gif");
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mill-certificate.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.file_name, "mill-certificate.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.size_bytes, 2048);
        assert_eq!(attachment.display_size(), "2.0 KB");
        assert!(attachment.is_accepted_type());
        assert!(attachment.is_within_size_limit());
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Attachment::from_path(dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(LeadError::Attachment { .. })));
    }

    #[test]
    fn test_from_path_rejects_directory() {
        let dir = TempDir::new().unwrap();
        assert!(Attachment::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_size_limit_boundary() {
        assert!(Attachment::new("a.pdf", "application/pdf", MAX_FILE_SIZE).is_within_size_limit());
        assert!(!Attachment::new("a.pdf", "application/pdf", MAX_FILE_SIZE + 1).is_within_size_limit());
    }
}
