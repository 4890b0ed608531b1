//! Icon registry: name deduplication and codepoint assignment.
//!
//! The registry consumes the scanner's ordered sources and produces one
//! canonical `IconEntry` per source. All artifact emitters in a run read the
//! same entry sequence, so generated names and codepoints line up across the
//! font, the stylesheet and the code bindings.
//!
//! # Example
//!
//! ```ignore
//! use iconforge::registry::{IconRegistry, DEFAULT_FIRST_CODEPOINT};
//!
//! let mut registry = IconRegistry::new(DEFAULT_FIRST_CODEPOINT);
//! let entries = registry.register_all(sources);
//! ```

mod entry;

use std::collections::HashMap;

pub use entry::{EntryView, IconEntry, IconSource, ICON_EXTENSION};

/// Default first codepoint, in the Basic Multilingual Plane private use area.
///
/// Pipeline-wide: every emitter in a run sees codepoints assigned from the
/// same counter, starting here unless the manifest or CLI overrides it.
pub const DEFAULT_FIRST_CODEPOINT: u32 = 0xE900;

/// Assigns deduplicated names and codepoints to icon sources.
///
/// One instance per pipeline run. State is append-only: a tally of base-name
/// occurrences and the next codepoint to hand out. `register` must be called
/// exactly once per source, in scan order.
#[derive(Debug)]
pub struct IconRegistry {
    tally: HashMap<String, usize>,
    next_codepoint: u32,
}

impl IconRegistry {
    /// Create a fresh registry starting at the given codepoint.
    pub fn new(first_codepoint: u32) -> Self {
        Self {
            tally: HashMap::new(),
            next_codepoint: first_codepoint,
        }
    }

    /// Register one source, producing its canonical entry.
    ///
    /// The first occurrence of a base name keeps it; the k-th later
    /// occurrence gets `-k` (1-indexed). Codepoints increase by exactly one
    /// per call, in call order.
    pub fn register(&mut self, source: IconSource) -> IconEntry {
        let base_name = source.base_name().to_string();

        let seen = self.tally.entry(base_name.clone()).or_insert(0);
        let deduped_name = if *seen == 0 {
            base_name.clone()
        } else {
            format!("{}-{}", base_name, seen)
        };
        *seen += 1;

        let codepoint = self.next_codepoint;
        self.next_codepoint += 1;

        IconEntry {
            base_name,
            deduped_name,
            codepoint,
            source,
        }
    }

    /// Register every source in order, preserving that order.
    pub fn register_all(
        &mut self,
        sources: impl IntoIterator<Item = IconSource>,
    ) -> Vec<IconEntry> {
        sources.into_iter().map(|s| self.register(s)).collect()
    }

    /// The codepoint the next `register` call would assign.
    pub fn next_codepoint(&self) -> u32 {
        self.next_codepoint
    }

    /// Number of entries registered so far.
    pub fn len(&self) -> usize {
        self.tally.values().sum()
    }

    /// Check whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_CODEPOINT)
    }
}
