//! Font artifact emitter.
//!
//! Streams every entry's glyph bytes into the container builder, writes the
//! finalized SVG font document, then hands the document to the binary
//! compiler and writes the TrueType file alongside it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IconError, Result};
use crate::font::{FontCompiler, GlyphSink, SvgFontWriter, TrueTypeCompiler};
use crate::registry::IconEntry;

use super::Emitter;

/// Emits the combined vector font and its compiled binary form.
pub struct FontEmitter {
    font_name: String,
    compiler: Box<dyn FontCompiler>,
}

impl FontEmitter {
    /// Emitter with the production TrueType compiler.
    pub fn new(font_name: impl Into<String>) -> Self {
        Self::with_compiler(font_name, Box::new(TrueTypeCompiler))
    }

    /// Emitter with a custom binary compiler.
    pub fn with_compiler(font_name: impl Into<String>, compiler: Box<dyn FontCompiler>) -> Self {
        Self {
            font_name: font_name.into(),
            compiler,
        }
    }

    /// Feed every entry through the container builder and finalize.
    pub fn build_document(&self, entries: &[IconEntry]) -> Result<String> {
        let mut sink = SvgFontWriter::new(self.font_name.as_str());

        for entry in entries {
            let bytes = fs::read(&entry.source.path).map_err(|e| IconError::Io {
                path: entry.source.path.clone(),
                message: format!("Failed to read glyph source: {}", e),
            })?;
            sink.write_glyph(&entry.deduped_name, entry.codepoint, &bytes)?;
        }

        sink.finish()
    }
}

impl Emitter for FontEmitter {
    fn artifact(&self) -> String {
        "font".to_string()
    }

    fn emit(&self, entries: &[IconEntry], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let document = self.build_document(entries)?;

        let svg_path = out_dir.join(format!("{}.svg", self.font_name));
        fs::write(&svg_path, &document).map_err(|e| IconError::Write {
            path: svg_path.clone(),
            message: e.to_string(),
        })?;

        let binary = self.compiler.compile(&document)?;
        // An empty blob after a non-empty entry sequence means the
        // intermediate document was lost somewhere; never write it out.
        if binary.is_empty() && !entries.is_empty() {
            return Err(IconError::FontBuild {
                message: "compiled font is empty".to_string(),
                help: None,
            });
        }

        let ttf_path = out_dir.join(format!("{}.ttf", self.font_name));
        fs::write(&ttf_path, &binary).map_err(|e| IconError::Write {
            path: ttf_path.clone(),
            message: e.to_string(),
        })?;

        Ok(vec![svg_path, ttf_path])
    }
}
