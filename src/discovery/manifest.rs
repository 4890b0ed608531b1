//! Project manifest (iconforge.yaml) parsing.
//!
//! The manifest defines project configuration including source paths,
//! output settings, font naming and the codepoint base.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::registry::DEFAULT_FIRST_CODEPOINT;

/// Project manifest loaded from iconforge.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Source directories to scan for icons.
    /// Defaults to current directory if empty.
    pub sources: Vec<String>,

    /// Output directory for generated artifacts.
    pub output: PathBuf,

    /// Font family name used in the font, the stylesheet and code bindings.
    pub font_name: String,

    /// CSS class prefix, e.g. `icon` for `.icon-sword`.
    pub class_prefix: String,

    /// First codepoint to assign, as a hex literal string (e.g. "0xE900").
    pub first_codepoint: Option<String>,

    /// Language keys to generate code bindings for.
    pub languages: Vec<String>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            output: PathBuf::from("dist"),
            font_name: "Icons".to_string(),
            class_prefix: "icon".to_string(),
            first_codepoint: None,
            languages: vec![],
            excludes: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from an iconforge.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IconError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| IconError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check iconforge.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Get effective source paths, defaulting to current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// The configured first codepoint, parsed, or the pipeline default.
    pub fn effective_first_codepoint(&self) -> Result<u32> {
        match &self.first_codepoint {
            Some(s) => parse_codepoint(s),
            None => Ok(DEFAULT_FIRST_CODEPOINT),
        }
    }
}

/// Parse a codepoint from a hex literal like "0xE900", "E900" or "e900".
pub fn parse_codepoint(s: &str) -> Result<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix("U+"))
        .unwrap_or(s);

    let value = u32::from_str_radix(digits, 16).map_err(|_| IconError::Parse {
        message: format!("Invalid codepoint: {}", s),
        help: Some("Expected a hex value like 0xE900".to_string()),
    })?;

    if char::from_u32(value).is_none() {
        return Err(IconError::Parse {
            message: format!("Codepoint {} is not a Unicode scalar value", s),
            help: None,
        });
    }

    Ok(value)
}

/// Simple glob pattern matching for exclude rules.
///
/// Supports `*.ext` suffixes, `dir/*` prefixes and `**/dir/*` anywhere-in-path
/// forms; anything else matches as a substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir))
                || path.contains(&format!("/{}/", dir));
        }
        return path.contains(suffix) || path.ends_with(suffix);
    }

    if pattern.starts_with('*') && !pattern.contains('/') {
        return path.ends_with(&pattern[1..]);
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix))
            || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}
