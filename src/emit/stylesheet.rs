//! Stylesheet artifact emitter.
//!
//! Writes one CSS file: a font-face and base-class preamble, then one rule
//! per icon binding a class token to its codepoint via an escaped content
//! character reference.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IconError, Result};
use crate::registry::IconEntry;

use super::Emitter;

/// Emits the per-icon stylesheet.
pub struct StylesheetEmitter {
    font_name: String,
    class_prefix: String,
}

impl StylesheetEmitter {
    pub fn new(font_name: impl Into<String>, class_prefix: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            class_prefix: class_prefix.into(),
        }
    }

    /// Render the whole stylesheet as a string.
    pub fn render(&self, entries: &[IconEntry]) -> String {
        let mut out = format!(
            "@font-face {{\n\
             \x20 font-family: '{font}';\n\
             \x20 src: url('{font}.ttf') format('truetype'),\n\
             \x20      url('{font}.svg') format('svg');\n\
             \x20 font-weight: normal;\n\
             \x20 font-style: normal;\n\
             }}\n\
             \n\
             .{prefix} {{\n\
             \x20 font-family: '{font}';\n\
             \x20 display: inline-block;\n\
             \x20 font-style: normal;\n\
             \x20 font-weight: normal;\n\
             \x20 line-height: 1;\n\
             }}\n\
             \n",
            font = self.font_name,
            prefix = self.class_prefix
        );

        for entry in entries {
            out.push_str(&format!(
                ".{}-{}::before {{ content: '\\{:x}'; }}\n",
                self.class_prefix,
                class_token(&entry.deduped_name),
                entry.codepoint
            ));
        }

        out
    }
}

impl Emitter for StylesheetEmitter {
    fn artifact(&self) -> String {
        "stylesheet".to_string()
    }

    fn emit(&self, entries: &[IconEntry], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(format!("{}.css", self.font_name));
        fs::write(&path, self.render(entries)).map_err(|e| IconError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(vec![path])
    }
}

/// Reduce a deduped name to a CSS-class-safe token.
///
/// ASCII letters, digits, hyphens and underscores pass through; anything
/// else becomes a hyphen.
fn class_token(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{IconRegistry, IconSource};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn entries(names: &[&str]) -> Vec<IconEntry> {
        let mut registry = IconRegistry::new(0xE900);
        names
            .iter()
            .map(|n| registry.register(IconSource::new(format!("{}.svg", n), format!("{}.svg", n))))
            .collect()
    }

    #[test]
    fn test_render_preamble_and_rules() {
        let emitter = StylesheetEmitter::new("GameIcons", "gi");
        let css = emitter.render(&entries(&["sword", "sword", "shield"]));

        insta::assert_snapshot!(css, @r"
        @font-face {
          font-family: 'GameIcons';
          src: url('GameIcons.ttf') format('truetype'),
               url('GameIcons.svg') format('svg');
          font-weight: normal;
          font-style: normal;
        }

        .gi {
          font-family: 'GameIcons';
          display: inline-block;
          font-style: normal;
          font-weight: normal;
          line-height: 1;
        }

        .gi-sword::before { content: '\e900'; }
        .gi-sword-1::before { content: '\e901'; }
        .gi-shield::before { content: '\e902'; }
        ");
    }

    #[test]
    fn test_render_preamble_written_once() {
        let emitter = StylesheetEmitter::new("Icons", "icon");
        let css = emitter.render(&entries(&["a", "b", "c"]));
        assert_eq!(css.matches("@font-face").count(), 1);
    }

    #[test]
    fn test_rules_follow_entry_order() {
        let emitter = StylesheetEmitter::new("Icons", "icon");
        let css = emitter.render(&entries(&["zebra", "axe"]));
        let zebra = css.find(".icon-zebra").unwrap();
        let axe = css.find(".icon-axe").unwrap();
        assert!(zebra < axe);
    }

    #[test]
    fn test_class_token_sanitizes() {
        assert_eq!(class_token("sword-01"), "sword-01");
        assert_eq!(class_token("sword_2"), "sword_2");
        assert_eq!(class_token("weird icon!"), "weird-icon-");
    }

    #[test]
    fn test_render_reproducible() {
        let emitter = StylesheetEmitter::new("Icons", "icon");
        let names = ["axe", "axe", "bow"];
        assert_eq!(
            emitter.render(&entries(&names)),
            emitter.render(&entries(&names))
        );
    }

    #[test]
    fn test_emit_writes_css_file() {
        let dir = tempdir().unwrap();
        let emitter = StylesheetEmitter::new("Icons", "icon");
        let written = emitter.emit(&entries(&["sword"]), dir.path()).unwrap();

        assert_eq!(written, vec![dir.path().join("Icons.css")]);
        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains(".icon-sword::before { content: '\\e900'; }"));
    }
}
