//! Input artifact wrapper handed to the format dispatcher.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::DescriptorError;

/// Raw content of a firmware descriptor artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorContent {
    /// UTF-8 text (structured config, keymap DSL, C source).
    Text(String),
    /// Opaque bytes (compiled firmware images).
    Binary(Vec<u8>),
}

/// A firmware descriptor artifact: a file name plus its raw content.
///
/// Descriptors are immutable once constructed. The dispatcher picks an
/// extractor from the file extension alone, so the extension carries the
/// format contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareDescriptor {
    /// Original file name, including its extension.
    pub file_name: String,
    /// Raw descriptor content.
    pub content: DescriptorContent,
}

impl FirmwareDescriptor {
    /// Creates a descriptor from in-memory text.
    #[must_use]
    pub fn from_text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: DescriptorContent::Text(text.into()),
        }
    }

    /// Creates a descriptor from in-memory bytes.
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content: DescriptorContent::Binary(bytes),
        }
    }

    /// Reads a descriptor from disk.
    ///
    /// This is the only I/O the parsing subsystem performs. Binary
    /// extensions keep their raw bytes; everything else is decoded as text,
    /// lossily, so stray bytes never fail the read.
    pub fn from_path(path: &Path) -> Result<Self, DescriptorError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = fs::read(path)?;

        let descriptor = match extension_of(&file_name).as_deref() {
            Some("hex" | "uf2") => Self::from_bytes(file_name, bytes),
            _ => Self::from_text(file_name, String::from_utf8_lossy(&bytes).into_owned()),
        };

        Ok(descriptor)
    }

    /// Returns the lower-cased final file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }

    /// Returns the file name without its final extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(idx) if idx > 0 => &self.file_name[..idx],
            _ => &self.file_name,
        }
    }

    /// Returns the text content, if this descriptor is textual.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            DescriptorContent::Text(text) => Some(text),
            DescriptorContent::Binary(_) => None,
        }
    }
}

/// Extracts the lower-cased extension from a bare file name.
fn extension_of(file_name: &str) -> Option<String> {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
            Some(file_name[idx + 1..].to_lowercase())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_is_lowercased() {
        let descriptor = FirmwareDescriptor::from_bytes("FIRMWARE.UF2", vec![0x55, 0x46]);
        assert_eq!(descriptor.extension().as_deref(), Some("uf2"));
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(FirmwareDescriptor::from_text("corne", "").extension(), None);
        assert_eq!(
            FirmwareDescriptor::from_text(".hidden", "").extension(),
            None
        );
        assert_eq!(
            FirmwareDescriptor::from_text("trailing.", "").extension(),
            None
        );
        assert_eq!(
            FirmwareDescriptor::from_text("a.b.json", "")
                .extension()
                .as_deref(),
            Some("json")
        );
    }

    #[test]
    fn test_stem_strips_final_extension() {
        assert_eq!(FirmwareDescriptor::from_text("corne.keymap", "").stem(), "corne");
        assert_eq!(FirmwareDescriptor::from_text("a.b.json", "").stem(), "a.b");
        assert_eq!(FirmwareDescriptor::from_text("corne", "").stem(), "corne");
        assert_eq!(FirmwareDescriptor::from_text(".hidden", "").stem(), ".hidden");
    }

    #[test]
    fn test_from_path_reads_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("board.json");
        fs::write(&path, r#"{"name": "board"}"#).unwrap();

        let descriptor = FirmwareDescriptor::from_path(&path).unwrap();
        assert_eq!(descriptor.file_name, "board.json");
        assert_eq!(descriptor.text(), Some(r#"{"name": "board"}"#));
    }

    #[test]
    fn test_from_path_keeps_binary_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("firmware.uf2");
        fs::write(&path, [0x55, 0x46, 0x32, 0x0a, 0xff]).unwrap();

        let descriptor = FirmwareDescriptor::from_path(&path).unwrap();
        assert_eq!(
            descriptor.content,
            DescriptorContent::Binary(vec![0x55, 0x46, 0x32, 0x0a, 0xff])
        );
        assert_eq!(descriptor.text(), None);
    }

    #[test]
    fn test_from_path_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");

        let err = FirmwareDescriptor::from_path(&missing).unwrap_err();
        assert!(matches!(err, DescriptorError::Read(_)));
    }
}
