//! Source-code artifact emitter.
//!
//! Streams one generated source file per target language: a header, one
//! constant per icon binding a language-safe identifier to its codepoint,
//! and a footer. Identifier derivation lives here because only code
//! emitters need it; the font and stylesheet artifacts key on the deduped
//! name directly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IconError, Result};
use crate::registry::IconEntry;

use super::stubs::LanguageStub;
use super::Emitter;

/// Emits one generated source file via a language stub.
pub struct CodeEmitter<'a> {
    stub: &'a dyn LanguageStub,
    font_name: String,
}

impl<'a> CodeEmitter<'a> {
    pub fn new(stub: &'a dyn LanguageStub, font_name: impl Into<String>) -> Self {
        Self {
            stub,
            font_name: font_name.into(),
        }
    }

    /// Render the whole source file as a string.
    pub fn render(&self, entries: &[IconEntry]) -> String {
        let mut out = self.stub.header(&self.font_name);
        for entry in entries {
            let identifier = identifier(&entry.deduped_name, self.stub.reserved_words());
            out.push_str(&self.stub.entry_line(&identifier, entry.codepoint));
        }
        out.push_str(&self.stub.footer());
        out
    }
}

impl Emitter for CodeEmitter<'_> {
    fn artifact(&self) -> String {
        format!("{} code", self.stub.key())
    }

    fn emit(&self, entries: &[IconEntry], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(self.stub.file_name());
        fs::write(&path, self.render(entries)).map_err(|e| IconError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(vec![path])
    }
}

/// Derive a language-safe identifier from a deduped icon name.
///
/// A leading digit is replaced by its spelled-out English word, kebab-case
/// becomes camelCase (digits included), and a reserved-word collision is
/// broken with a trailing underscore.
pub fn identifier(deduped_name: &str, reserved: &[&str]) -> String {
    let spelled = spell_leading_digit(deduped_name);
    let camel = camel_case(&spelled);
    if reserved.contains(&camel.as_str()) {
        format!("{}_", camel)
    } else {
        camel
    }
}

fn spell_leading_digit(name: &str) -> String {
    let Some(first) = name.chars().next() else {
        return String::new();
    };
    let word = match first {
        '0' => "zero",
        '1' => "one",
        '2' => "two",
        '3' => "three",
        '4' => "four",
        '5' => "five",
        '6' => "six",
        '7' => "seven",
        '8' => "eight",
        '9' => "nine",
        _ => return name.to_string(),
    };
    format!("{}{}", word, &name[1..])
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::stubs::DartStub;
    use crate::registry::{IconRegistry, IconSource};
    use tempfile::tempdir;

    fn entries(names: &[&str]) -> Vec<IconEntry> {
        let mut registry = IconRegistry::new(0xE900);
        names
            .iter()
            .map(|n| registry.register(IconSource::new(format!("{}.svg", n), format!("{}.svg", n))))
            .collect()
    }

    #[test]
    fn test_identifier_kebab_to_camel() {
        assert_eq!(identifier("sword-01", &[]), "sword01");
        assert_eq!(identifier("fire-shield-east", &[]), "fireShieldEast");
    }

    #[test]
    fn test_identifier_leading_digit_spelled_out() {
        assert_eq!(identifier("3d-model", &[]), "threedModel");
        assert_eq!(identifier("8-ball", &[]), "eightBall");
    }

    #[test]
    fn test_identifier_digit_after_hyphen_passes_through() {
        // Dedup suffixes camel-case onto the name.
        assert_eq!(identifier("axe-1", &[]), "axe1");
    }

    #[test]
    fn test_identifier_reserved_word_escaped() {
        assert_eq!(identifier("switch", &["switch"]), "switch_");
        // The escaped form no longer collides.
        assert_ne!(identifier("switch", &["switch"]), "switch");
    }

    #[test]
    fn test_identifier_plain_name_untouched() {
        assert_eq!(identifier("anvil", DartStub.reserved_words()), "anvil");
    }

    #[test]
    fn test_render_orders_and_frames_entries() {
        let emitter = CodeEmitter::new(&DartStub, "GameIcons");
        let rendered = emitter.render(&entries(&["sword", "3d-glasses", "class"]));

        insta::assert_snapshot!(rendered, @r"
        // Generated by iconforge. Do not edit by hand.
        import 'package:flutter/widgets.dart';

        class GameIcons {
          GameIcons._();

          static const String _fontFamily = 'GameIcons';

          static const IconData sword = IconData(0xe900, fontFamily: _fontFamily);
          static const IconData threedGlasses = IconData(0xe901, fontFamily: _fontFamily);
          static const IconData class_ = IconData(0xe902, fontFamily: _fontFamily);
        }
        ");
    }

    #[test]
    fn test_render_reproducible() {
        let emitter = CodeEmitter::new(&DartStub, "Icons");
        let first = emitter.render(&entries(&["axe", "axe", "bow"]));
        let second = emitter.render(&entries(&["axe", "axe", "bow"]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_writes_stub_file_name() {
        let dir = tempdir().unwrap();
        let emitter = CodeEmitter::new(&DartStub, "Icons");
        let written = emitter.emit(&entries(&["sword"]), dir.path()).unwrap();

        assert_eq!(written, vec![dir.path().join("icons.dart")]);
        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("IconData sword"));
    }
}
