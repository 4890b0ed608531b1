//! Init command implementation.
//!
//! Generates an `iconforge.yaml` manifest from a scanned icon tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{discover, MANIFEST_FILENAME};
use crate::error::{IconError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a project by generating an iconforge.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing iconforge.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(IconError::Write {
            path: manifest_path,
            message: format!("{} already exists (use --force to overwrite)", MANIFEST_FILENAME),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let discovery = discover(&args.path)?;

    // Collect unique parent directories (relative to project root).
    let mut source_dirs = BTreeSet::new();
    for source in &discovery.sources {
        if let Some(parent) = source.path.parent() {
            let relative = parent.strip_prefix(&discovery.root).unwrap_or(parent);
            let dir = if relative == std::path::Path::new("") {
                ".".to_string()
            } else {
                format!("{}/", relative.display())
            };
            source_dirs.insert(dir);
        }
    }

    // Build YAML manually for clean formatting.
    let mut yaml = String::new();
    if !(source_dirs.is_empty() || (source_dirs.len() == 1 && source_dirs.contains("."))) {
        yaml.push_str("sources:\n");
        for dir in &source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }
    yaml.push_str("output: dist\n");
    yaml.push_str("font_name: Icons\n");
    yaml.push_str("class_prefix: icon\n");

    fs::write(&manifest_path, &yaml).map_err(|e| IconError::Write {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(discovery.sources.len(), "icon", "icons")
        ),
    );

    Ok(())
}
