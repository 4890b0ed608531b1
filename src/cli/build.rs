//! Build command implementation.
//!
//! The orchestrator: wires scanner → registry → emitters. Scan and
//! registration failures abort the whole run before any artifact exists;
//! emitter failures are reported per artifact and do not block siblings.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{discover, parse_codepoint};
use crate::emit::{CodeEmitter, Emitter, FontEmitter, StubRegistry, StylesheetEmitter};
use crate::error::{IconError, Result};
use crate::output::{display_path, plural, Printer};
use crate::registry::IconRegistry;

/// Build the font, stylesheet and code artifacts from an icon tree
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Source directory containing icons (default: current directory)
    #[arg(default_value = ".")]
    pub source: PathBuf,

    /// Output directory (default: manifest setting or "dist")
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Font family name
    #[arg(long)]
    pub font_name: Option<String>,

    /// CSS class prefix
    #[arg(long)]
    pub class_prefix: Option<String>,

    /// First codepoint to assign, as hex (e.g. 0xE900)
    #[arg(long)]
    pub first_codepoint: Option<String>,

    /// Generate code bindings for a language (repeatable)
    #[arg(long = "language", short = 'l')]
    pub languages: Vec<String>,

    /// Skip the font artifacts
    #[arg(long)]
    pub no_font: bool,

    /// Skip the stylesheet artifact
    #[arg(long)]
    pub no_stylesheet: bool,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let discovery = discover(&args.source)?;
    let manifest = &discovery.manifest;

    // CLI flags override manifest settings.
    let font_name = args
        .font_name
        .clone()
        .unwrap_or_else(|| manifest.font_name.clone());
    let class_prefix = args
        .class_prefix
        .clone()
        .unwrap_or_else(|| manifest.class_prefix.clone());
    let first_codepoint = match &args.first_codepoint {
        Some(value) => parse_codepoint(value)?,
        None => manifest.effective_first_codepoint()?,
    };
    let languages = if args.languages.is_empty() {
        manifest.languages.clone()
    } else {
        args.languages.clone()
    };

    // Resolve language keys before any output exists, so an unknown key
    // cannot leave a half-written artifact set behind.
    let stubs = StubRegistry::with_builtins();
    let mut code_stubs = Vec::new();
    for key in &languages {
        code_stubs.push(stubs.get(key)?);
    }

    let output = args.output.clone().unwrap_or_else(|| manifest.output.clone());

    printer.status(
        "Scanning",
        &format!(
            "{} ({} found)",
            display_path(&args.source),
            plural(discovery.sources.len(), "icon", "icons")
        ),
    );

    let mut registry = IconRegistry::new(first_codepoint);
    let entries = registry.register_all(discovery.sources);

    fs::create_dir_all(&output).map_err(|e| IconError::Io {
        path: output.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut emitters: Vec<Box<dyn Emitter + '_>> = Vec::new();
    if !args.no_font {
        emitters.push(Box::new(FontEmitter::new(font_name.as_str())));
    }
    if !args.no_stylesheet {
        emitters.push(Box::new(StylesheetEmitter::new(
            font_name.as_str(),
            class_prefix.as_str(),
        )));
    }
    for stub in code_stubs {
        emitters.push(Box::new(CodeEmitter::new(stub, font_name.as_str())));
    }

    // Emitters own disjoint destinations: one failing must not block the
    // rest, but any failure fails the run.
    let mut first_error = None;
    for emitter in &emitters {
        match emitter.emit(&entries, &output) {
            Ok(paths) => {
                for path in paths {
                    printer.status("Generated", &display_path(&path));
                }
            }
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", emitter.artifact(), e));
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    printer.success(
        "Finished",
        &format!(
            "{} in {}",
            plural(entries.len(), "icon", "icons"),
            display_path(&output)
        ),
    );

    Ok(())
}
