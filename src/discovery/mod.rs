//! File discovery for icon projects.
//!
//! This module handles finding all icon source files under a project
//! directory, either using convention-based discovery or an
//! `iconforge.yaml` manifest.
//!
//! # Example
//!
//! ```ignore
//! use iconforge::discovery::discover;
//!
//! let result = discover("./my-icons")?;
//! println!("Found {} icons", result.sources.len());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::IconSource;

pub use manifest::{parse_codepoint, Manifest};
pub use scanner::{scan_directory, scan_sources};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "iconforge.yaml";

/// Result of discovering icons in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no iconforge.yaml found).
    pub manifest: Manifest,

    /// Whether an iconforge.yaml manifest was found.
    pub has_manifest: bool,

    /// Discovered icon sources, in pipeline order.
    pub sources: Vec<IconSource>,
}

/// Discover icons in a project directory.
///
/// Looks for an `iconforge.yaml` manifest in the root directory. If found,
/// scans the manifest's source paths; otherwise scans the whole tree.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let source_paths = manifest.effective_sources();
    let sources = scan_sources(&source_paths, &root, &manifest)?;

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        sources,
    })
}
