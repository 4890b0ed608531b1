//! iconforge - Icon font pipeline generator
//!
//! A library for turning a directory tree of SVG icons into a consistent
//! set of derived artifacts: a combined SVG font, a compiled TrueType font,
//! a stylesheet and per-language code bindings. One registry assigns every
//! icon its deduplicated name and codepoint; every emitter reads the same
//! entry sequence, so the artifacts always agree.

pub mod cli;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod font;
pub mod output;
pub mod registry;

pub use discovery::{discover, parse_codepoint, DiscoveryResult, Manifest};
pub use emit::{
    identifier, CodeEmitter, DartStub, Emitter, FontEmitter, LanguageStub, StubRegistry,
    StylesheetEmitter,
};
pub use error::{IconError, Result};
pub use font::{FontCompiler, GlyphSink, SvgFontWriter, TrueTypeCompiler};
pub use registry::{IconEntry, IconRegistry, IconSource, DEFAULT_FIRST_CODEPOINT};
