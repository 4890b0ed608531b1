//! SVG font container construction.
//!
//! `GlyphSink` is the feed-then-finalize protocol the font emitter talks to:
//! glyphs go in one at a time as `(name, codepoint, bytes)`, and `finish`
//! produces the container document. `SvgFontWriter` is the production sink,
//! emitting an SVG font document with one `<glyph>` element per icon.
//!
//! Glyph bytes are treated as opaque up to the minimum needed to lift the
//! outline: the `viewBox` of the root element and the `d` attribute of each
//! `<path>` element. A glyph with no outline data is rejected.

use crate::error::{IconError, Result};

use super::outline::Outline;

/// Feed-then-finalize builder for a font container document.
pub trait GlyphSink {
    /// Add one glyph. Rejects glyphs the container cannot represent.
    fn write_glyph(&mut self, name: &str, codepoint: u32, bytes: &[u8]) -> Result<()>;

    /// Finalize the container into its document form.
    fn finish(self) -> Result<String>;
}

/// Em square height of the generated font.
pub const UNITS_PER_EM: f32 = 512.0;
/// Baseline offset from the top of the em square.
pub const ASCENT: f32 = 448.0;
/// Descender depth (negative, below the baseline).
pub const DESCENT: f32 = -64.0;

struct GlyphRecord {
    name: String,
    codepoint: u32,
    advance: f32,
    path_data: String,
}

/// Production `GlyphSink` writing an SVG font document.
pub struct SvgFontWriter {
    font_name: String,
    glyphs: Vec<GlyphRecord>,
}

impl SvgFontWriter {
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            glyphs: Vec::new(),
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl GlyphSink for SvgFontWriter {
    fn write_glyph(&mut self, name: &str, codepoint: u32, bytes: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(bytes).map_err(|_| IconError::FontBuild {
            message: format!("glyph '{}' is not valid UTF-8", name),
            help: None,
        })?;

        let view_box = extract_view_box(text).unwrap_or([0.0, 0.0, 512.0, 512.0]);
        let path_data = extract_path_data(text);
        if path_data.is_empty() {
            return Err(IconError::FontBuild {
                message: format!("glyph '{}' contains no outline path data", name),
                help: Some("Icons must contain at least one <path> element".to_string()),
            });
        }

        let mut outline = Outline::default();
        for data in &path_data {
            let parsed = Outline::parse(data).map_err(|e| IconError::FontBuild {
                message: format!("glyph '{}' has malformed path data: {}", name, e),
                help: None,
            })?;
            outline.extend(parsed);
        }

        // Map the icon's viewBox to the em square, flipping into the
        // y-up coordinate system fonts use.
        let [min_x, min_y, width, height] = view_box;
        let scale = UNITS_PER_EM / height.max(1.0);
        outline.scale_translate(
            scale,
            -scale,
            -min_x * scale,
            ASCENT + min_y * scale,
        );

        self.glyphs.push(GlyphRecord {
            name: name.to_string(),
            codepoint,
            advance: width * scale,
            path_data: outline.to_path_data(),
        });

        Ok(())
    }

    fn finish(self) -> Result<String> {
        let mut doc = String::new();
        doc.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
        doc.push_str(
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
        );
        doc.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n");
        doc.push_str("<defs>\n");
        doc.push_str(&format!(
            "<font id=\"{}\" horiz-adv-x=\"{}\">\n",
            xml_escape(&self.font_name),
            UNITS_PER_EM
        ));
        doc.push_str(&format!(
            "<font-face font-family=\"{}\" units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\"/>\n",
            xml_escape(&self.font_name),
            UNITS_PER_EM,
            ASCENT,
            DESCENT
        ));
        doc.push_str(&format!(
            "<missing-glyph horiz-adv-x=\"{}\"/>\n",
            UNITS_PER_EM
        ));

        for glyph in &self.glyphs {
            doc.push_str(&format!(
                "<glyph glyph-name=\"{}\" unicode=\"&#x{:x};\" horiz-adv-x=\"{:.0}\" d=\"{}\"/>\n",
                xml_escape(&glyph.name),
                glyph.codepoint,
                glyph.advance,
                glyph.path_data
            ));
        }

        doc.push_str("</font>\n</defs>\n</svg>\n");
        Ok(doc)
    }
}

/// Extract the root `viewBox` as `[min-x, min-y, width, height]`.
fn extract_view_box(text: &str) -> Option<[f32; 4]> {
    let value = find_attr(text, "viewBox")?;
    let mut parts = value
        .split([' ', ',', '\t', '\n'])
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f32>());

    let mut next = || parts.next()?.ok();
    Some([next()?, next()?, next()?, next()?])
}

/// Extract the `d` attribute of every `<path>` element, in document order.
fn extract_path_data(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("<path") {
        let tag_rest = &rest[start..];
        let end = tag_rest.find('>').unwrap_or(tag_rest.len());
        let tag = &tag_rest[..end];
        if let Some(d) = find_attr(tag, "d") {
            result.push(d);
        }
        rest = &tag_rest[end..];
    }

    result
}

/// Find an attribute's raw value inside a tag, tolerating either quote style.
pub(super) fn find_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = tag.as_bytes();
    let mut search_from = 0;

    while let Some(found) = tag[search_from..].find(name) {
        let at = search_from + found;
        search_from = at + name.len();

        // Must be a standalone attribute name, not a suffix of another.
        if at > 0 && !matches!(bytes[at - 1], b' ' | b'\t' | b'\n' | b'\r') {
            continue;
        }

        let after = &tag[at + name.len()..];
        let after = after.trim_start();
        let Some(after) = after.strip_prefix('=') else {
            continue;
        };
        let after = after.trim_start();

        let quote = after.chars().next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value = &after[1..];
        let close = value.find(quote)?;
        return Some(&value[..close]);
    }

    None
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str =
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 512 512"><path d="M0 0 L512 0 L512 512 L0 512 Z"/></svg>"#;

    #[test]
    fn test_write_glyph_and_finish() {
        let mut writer = SvgFontWriter::new("Icons");
        writer
            .write_glyph("sword", 0xE900, SQUARE.as_bytes())
            .unwrap();
        assert_eq!(writer.glyph_count(), 1);

        let doc = writer.finish().unwrap();
        assert!(doc.contains("font-family=\"Icons\""));
        assert!(doc.contains("glyph-name=\"sword\""));
        assert!(doc.contains("unicode=\"&#xe900;\""));
    }

    #[test]
    fn test_glyph_order_preserved() {
        let mut writer = SvgFontWriter::new("Icons");
        writer
            .write_glyph("zebra", 0xE900, SQUARE.as_bytes())
            .unwrap();
        writer
            .write_glyph("axe", 0xE901, SQUARE.as_bytes())
            .unwrap();

        let doc = writer.finish().unwrap();
        let zebra = doc.find("glyph-name=\"zebra\"").unwrap();
        let axe = doc.find("glyph-name=\"axe\"").unwrap();
        assert!(zebra < axe);
    }

    #[test]
    fn test_rejects_glyph_without_path() {
        let mut writer = SvgFontWriter::new("Icons");
        let result = writer.write_glyph("empty", 0xE900, b"<svg viewBox=\"0 0 16 16\"></svg>");
        assert!(matches!(result, Err(IconError::FontBuild { .. })));
    }

    #[test]
    fn test_rejects_malformed_path_data() {
        let mut writer = SvgFontWriter::new("Icons");
        let bad = br#"<svg viewBox="0 0 16 16"><path d="M0 0 X9"/></svg>"#;
        let result = writer.write_glyph("bad", 0xE900, bad);
        assert!(matches!(result, Err(IconError::FontBuild { .. })));
    }

    #[test]
    fn test_viewbox_scaled_to_em_square() {
        let small = br#"<svg viewBox="0 0 16 16"><path d="M0 0 L16 0 L16 16 L0 16 Z"/></svg>"#;
        let mut writer = SvgFontWriter::new("Icons");
        writer.write_glyph("dot", 0xE900, small).unwrap();

        let doc = writer.finish().unwrap();
        // 16-unit viewBox maps to the 512-unit em square.
        assert!(doc.contains("horiz-adv-x=\"512\" d=\""));
        assert!(doc.contains("M0 448"));
    }

    #[test]
    fn test_escapes_names() {
        let mut writer = SvgFontWriter::new("Fancy \"Icons\" & Co");
        writer
            .write_glyph("a&b", 0xE900, SQUARE.as_bytes())
            .unwrap();
        let doc = writer.finish().unwrap();
        assert!(doc.contains("font-family=\"Fancy &quot;Icons&quot; &amp; Co\""));
        assert!(doc.contains("glyph-name=\"a&amp;b\""));
    }

    #[test]
    fn test_find_attr_quote_styles() {
        assert_eq!(find_attr("<path d='M0 0'", "d"), Some("M0 0"));
        assert_eq!(find_attr("<path d=\"M1 1\"", "d"), Some("M1 1"));
        assert_eq!(find_attr("<path data-d=\"x\"", "d"), None);
        assert_eq!(find_attr("<path stroke=\"red\"", "d"), None);
    }

    #[test]
    fn test_extract_multiple_paths() {
        let two = r#"<svg><path d="M0 0 L1 0 L1 1 Z"/><path d="M2 2 L3 2 L3 3 Z"/></svg>"#;
        assert_eq!(extract_path_data(two).len(), 2);
    }
}
