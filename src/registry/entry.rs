//! Record types produced by the scan/register pipeline.
//!
//! An `IconSource` is one discovered file; an `IconEntry` is its canonical
//! registered form, shared by every artifact emitter in a run.

use std::path::PathBuf;

use serde::Serialize;

/// The file extension recognized as an icon source.
pub const ICON_EXTENSION: &str = ".svg";

/// A single discovered icon file.
///
/// Immutable; produced by the scanner, consumed exactly once by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    /// Bare file name, e.g. `sword-01.svg`. Sole basis for generated names.
    pub file_name: String,
    /// Full path to the file on disk.
    pub path: PathBuf,
}

impl IconSource {
    pub fn new(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
        }
    }

    /// The file name with the icon extension stripped, e.g. `sword-01`.
    pub fn base_name(&self) -> &str {
        self.file_name
            .strip_suffix(ICON_EXTENSION)
            .unwrap_or(&self.file_name)
    }
}

/// The canonical per-icon record.
///
/// Created once by the registry, read (never mutated) by every emitter for
/// the duration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    /// File name with its extension stripped.
    pub base_name: String,
    /// `base_name`, suffixed `-k` for the k-th later occurrence of the same
    /// base name (1-indexed). Pairwise unique across a run.
    pub deduped_name: String,
    /// Assigned scalar value in the private use area.
    pub codepoint: u32,
    /// The owning source file.
    pub source: IconSource,
}

impl IconEntry {
    /// The codepoint as a character, when it is a valid scalar value.
    pub fn scalar(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

/// Serializable view of an entry for machine-readable listings.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub name: &'a str,
    pub codepoint: String,
    pub file: String,
}

impl<'a> EntryView<'a> {
    pub fn from_entry(entry: &'a IconEntry) -> Self {
        Self {
            name: &entry.deduped_name,
            codepoint: format!("{:04x}", entry.codepoint),
            file: entry.source.path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_extension() {
        let source = IconSource::new("sword-01.svg", "icons/sword-01.svg");
        assert_eq!(source.base_name(), "sword-01");
    }

    #[test]
    fn test_base_name_without_extension() {
        let source = IconSource::new("README", "icons/README");
        assert_eq!(source.base_name(), "README");
    }

    #[test]
    fn test_base_name_only_final_extension() {
        let source = IconSource::new("shield.min.svg", "shield.min.svg");
        assert_eq!(source.base_name(), "shield.min");
    }

    #[test]
    fn test_scalar_conversion() {
        let entry = IconEntry {
            base_name: "axe".to_string(),
            deduped_name: "axe".to_string(),
            codepoint: 0xE900,
            source: IconSource::new("axe.svg", "axe.svg"),
        };
        assert_eq!(entry.scalar(), Some('\u{e900}'));
    }

    #[test]
    fn test_entry_view() {
        let entry = IconEntry {
            base_name: "axe".to_string(),
            deduped_name: "axe-1".to_string(),
            codepoint: 0xE901,
            source: IconSource::new("axe.svg", "nested/axe.svg"),
        };
        let view = EntryView::from_entry(&entry);
        assert_eq!(view.name, "axe-1");
        assert_eq!(view.codepoint, "e901");
    }
}
