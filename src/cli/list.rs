//! List command implementation.
//!
//! Discovers icons, runs them through a registry and prints the resulting
//! name/codepoint inventory.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::discover;
use crate::emit::{identifier, DartStub, LanguageStub};
use crate::error::{IconError, Result};
use crate::output::Printer;
use crate::registry::{EntryView, IconRegistry};

/// List discovered icons with their assigned codepoints
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Source directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub source: PathBuf,

    /// Print the inventory as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Show the code identifier each icon would get
    #[arg(long)]
    pub identifiers: bool,
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let discovery = discover(&args.source)?;
    let first_codepoint = discovery.manifest.effective_first_codepoint()?;

    let mut registry = IconRegistry::new(first_codepoint);
    let entries = registry.register_all(discovery.sources);

    if args.json {
        let views: Vec<EntryView> = entries.iter().map(EntryView::from_entry).collect();
        let json = serde_json::to_string_pretty(&views).map_err(|e| IconError::Write {
            path: PathBuf::from("<stdout>"),
            message: format!("Failed to serialize inventory: {}", e),
        })?;
        println!("{}", json);
        return Ok(());
    }

    for entry in &entries {
        let label = format!("U+{:04X}", entry.codepoint);
        if args.identifiers {
            let ident = identifier(&entry.deduped_name, DartStub.reserved_words());
            printer.info(
                &label,
                &format!("{} {}", entry.deduped_name, printer.dim(&ident)),
            );
        } else {
            printer.info(&label, &entry.deduped_name);
        }
    }

    printer.success(
        "Listed",
        &crate::output::plural(entries.len(), "icon", "icons"),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_runs_over_icon_tree() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sword.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("axe.svg"), "<svg/>").unwrap();

        let args = ListArgs {
            source: dir.path().to_path_buf(),
            json: false,
            identifiers: true,
        };
        run(args, &Printer::new()).unwrap();
    }

    #[test]
    fn test_list_missing_source_fails() {
        let args = ListArgs {
            source: PathBuf::from("/nonexistent"),
            json: false,
            identifiers: false,
        };
        assert!(run(args, &Printer::new()).is_err());
    }
}
