//! Language stub registry for code generation.
//!
//! Each stub describes how one target language spells an icon-constant
//! file: its file name, header/footer framing, per-icon line and the
//! reserved words that identifiers must not collide with. New languages
//! register alongside the builtins without touching the dispatcher.

use crate::error::{IconError, Result};

/// A code-generation target language.
pub trait LanguageStub {
    /// The key used to select this stub (e.g. `dart`).
    fn key(&self) -> &'static str;

    /// Name of the generated source file.
    fn file_name(&self) -> &'static str;

    /// Reserved words identifiers must be disambiguated from.
    fn reserved_words(&self) -> &'static [&'static str];

    /// Everything written before the first icon line.
    fn header(&self, font_name: &str) -> String;

    /// One line binding an identifier to a codepoint.
    fn entry_line(&self, identifier: &str, codepoint: u32) -> String;

    /// Everything written after the last icon line.
    fn footer(&self) -> String;
}

/// Registry of available language stubs.
pub struct StubRegistry {
    stubs: Vec<Box<dyn LanguageStub>>,
}

impl StubRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { stubs: Vec::new() }
    }

    /// A registry with the builtin stubs.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DartStub));
        registry
    }

    /// Add a stub. A later registration shadows an earlier one for the
    /// same key.
    pub fn register(&mut self, stub: Box<dyn LanguageStub>) {
        self.stubs.insert(0, stub);
    }

    /// Look up a stub by language key.
    pub fn get(&self, key: &str) -> Result<&dyn LanguageStub> {
        self.stubs
            .iter()
            .find(|s| s.key() == key)
            .map(|s| s.as_ref())
            .ok_or_else(|| IconError::UnsupportedLanguage {
                key: key.to_string(),
                help: Some(format!("Supported languages: {}", self.keys().join(", "))),
            })
    }

    /// All registered language keys.
    pub fn keys(&self) -> Vec<&'static str> {
        self.stubs.iter().map(|s| s.key()).collect()
    }
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Flutter `IconData` bindings.
pub struct DartStub;

impl LanguageStub for DartStub {
    fn key(&self) -> &'static str {
        "dart"
    }

    fn file_name(&self) -> &'static str {
        "icons.dart"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        DART_RESERVED
    }

    fn header(&self, font_name: &str) -> String {
        let class = pascal_case(font_name);
        format!(
            "// Generated by iconforge. Do not edit by hand.\n\
             import 'package:flutter/widgets.dart';\n\
             \n\
             class {class} {{\n\
             \x20 {class}._();\n\
             \n\
             \x20 static const String _fontFamily = '{font_name}';\n\
             \n"
        )
    }

    fn entry_line(&self, identifier: &str, codepoint: u32) -> String {
        format!(
            "  static const IconData {} = IconData(0x{:x}, fontFamily: _fontFamily);\n",
            identifier, codepoint
        )
    }

    fn footer(&self) -> String {
        "}\n".to_string()
    }
}

const DART_RESERVED: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "base", "break", "case", "catch", "class",
    "const", "continue", "covariant", "default", "deferred", "do", "dynamic", "else", "enum",
    "export", "extends", "extension", "external", "factory", "false", "final", "finally", "for",
    "get", "hide", "if", "implements", "import", "in", "interface", "is", "late", "library",
    "mixin", "new", "null", "on", "operator", "part", "required", "rethrow", "return", "sealed",
    "set", "show", "static", "super", "switch", "sync", "this", "throw", "true", "try", "typedef",
    "var", "void", "when", "while", "with", "yield",
];

/// Upper-camel-case a font name for use as a type name.
fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper {
                out.push(c.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        } else {
            upper = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dart_stub() {
        let registry = StubRegistry::with_builtins();
        let stub = registry.get("dart").unwrap();
        assert_eq!(stub.file_name(), "icons.dart");
        assert!(stub.reserved_words().contains(&"class"));
    }

    #[test]
    fn test_unknown_key_is_typed_error() {
        let registry = StubRegistry::with_builtins();
        let result = registry.get("cobol");
        assert!(matches!(
            result,
            Err(IconError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_registered_stub_shadows_builtin() {
        struct Alt;
        impl LanguageStub for Alt {
            fn key(&self) -> &'static str {
                "dart"
            }
            fn file_name(&self) -> &'static str {
                "alt.dart"
            }
            fn reserved_words(&self) -> &'static [&'static str] {
                &[]
            }
            fn header(&self, _: &str) -> String {
                String::new()
            }
            fn entry_line(&self, _: &str, _: u32) -> String {
                String::new()
            }
            fn footer(&self) -> String {
                String::new()
            }
        }

        let mut registry = StubRegistry::with_builtins();
        registry.register(Box::new(Alt));
        assert_eq!(registry.get("dart").unwrap().file_name(), "alt.dart");
    }

    #[test]
    fn test_dart_header_class_name() {
        let header = DartStub.header("game icons");
        assert!(header.contains("class GameIcons {"));
        assert!(header.contains("_fontFamily = 'game icons'"));
    }

    #[test]
    fn test_dart_entry_line_hex() {
        let line = DartStub.entry_line("sword", 0xE900);
        assert_eq!(
            line,
            "  static const IconData sword = IconData(0xe900, fontFamily: _fontFamily);\n"
        );
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("game-icons"), "GameIcons");
        assert_eq!(pascal_case("Icons"), "Icons");
    }
}
