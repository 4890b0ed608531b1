//! Artifact emitters.
//!
//! Every emitter consumes the same ordered, read-only `IconEntry` sequence
//! and streams exactly one artifact to its own destination. Emitters never
//! see each other and never touch registry state, so a failure in one
//! cannot corrupt a sibling artifact.

mod code;
mod font;
mod stubs;
mod stylesheet;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::IconEntry;

pub use code::{identifier, CodeEmitter};
pub use font::FontEmitter;
pub use stubs::{DartStub, LanguageStub, StubRegistry};
pub use stylesheet::StylesheetEmitter;

/// One artifact producer.
///
/// `emit` visits the entries in the supplied order and returns the paths it
/// wrote. Implementations must treat the entries as read-only so that
/// emitters for different artifacts may run over the same sequence.
pub trait Emitter {
    /// Short artifact label for status reporting, e.g. `stylesheet`.
    fn artifact(&self) -> String;

    /// Write the artifact into `out_dir`.
    fn emit(&self, entries: &[IconEntry], out_dir: &Path) -> Result<Vec<PathBuf>>;
}
