//! Font container construction and binary compilation.
//!
//! The artifact emitters treat both halves as opaque collaborators: a
//! `GlyphSink` accepts `(name, codepoint, bytes)` tuples and finalizes into
//! a container document, and a `FontCompiler` turns that document into a
//! binary font blob. The production implementations here emit an SVG font
//! container and a minimal static TrueType font.

mod compiler;
mod container;
mod outline;

pub use compiler::{FontCompiler, TrueTypeCompiler};
pub use container::{GlyphSink, SvgFontWriter, ASCENT, DESCENT, UNITS_PER_EM};
pub use outline::{Outline, Point, Segment, Subpath};
