//! Binary font compilation.
//!
//! `FontCompiler` turns a finished container document into a binary font
//! blob. The production implementation compiles the SVG font document into a
//! minimal static TrueType font: outlines are flattened to straight segments
//! and the classic table set (cmap, glyf, head, hhea, hmtx, loca, maxp,
//! name, post) is emitted by hand, since the crate ecosystem has no
//! SVG-font-to-TrueType compiler to delegate to.

use crate::error::{IconError, Result};

use super::container::find_attr;
use super::outline::Outline;

/// Compiles a vector font container document into a binary font.
pub trait FontCompiler {
    fn compile(&self, document: &str) -> Result<Vec<u8>>;
}

/// Production compiler emitting a static TrueType (sfnt) font.
#[derive(Debug, Default)]
pub struct TrueTypeCompiler;

impl FontCompiler for TrueTypeCompiler {
    fn compile(&self, document: &str) -> Result<Vec<u8>> {
        let doc = parse_document(document)?;
        build_font(&doc)
    }
}

// --- Container document model ---

struct DocGlyph {
    codepoint: u32,
    advance: u16,
    /// Flattened closed contours, in font units.
    contours: Vec<Vec<(i16, i16)>>,
}

struct FontDoc {
    family: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    glyphs: Vec<DocGlyph>,
}

fn parse_document(document: &str) -> Result<FontDoc> {
    let face = element(document, "<font-face").ok_or_else(|| IconError::FontBuild {
        message: "container document has no font-face element".to_string(),
        help: None,
    })?;

    let family = find_attr(face, "font-family").unwrap_or("Icons").to_string();
    let units_per_em = attr_number(face, "units-per-em").unwrap_or(512.0) as u16;
    let ascent = attr_number(face, "ascent").unwrap_or(448.0) as i16;
    let descent = attr_number(face, "descent").unwrap_or(-64.0) as i16;

    let mut glyphs = Vec::new();
    let mut rest = document;
    while let Some(start) = rest.find("<glyph") {
        let tag_rest = &rest[start..];
        let end = tag_rest.find('>').unwrap_or(tag_rest.len());
        let tag = &tag_rest[..end];
        rest = &tag_rest[end..];

        let Some(unicode) = find_attr(tag, "unicode") else {
            continue;
        };
        let codepoint = parse_unicode_attr(unicode).ok_or_else(|| IconError::FontBuild {
            message: format!("glyph has unparseable unicode attribute '{}'", unicode),
            help: None,
        })?;

        let advance = find_attr(tag, "horiz-adv-x")
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(units_per_em as f32) as u16;

        let contours = match find_attr(tag, "d") {
            Some(d) => Outline::parse(d)?
                .flatten()
                .into_iter()
                .map(|contour| {
                    contour
                        .into_iter()
                        .map(|p| (round_coord(p.x), round_coord(p.y)))
                        .collect()
                })
                .collect(),
            None => Vec::new(),
        };

        glyphs.push(DocGlyph {
            codepoint,
            advance,
            contours,
        });
    }

    Ok(FontDoc {
        family,
        units_per_em,
        ascent,
        descent,
        glyphs,
    })
}

/// Slice out an element's opening tag, from `<name` up to (not including) `>`.
fn element<'a>(document: &'a str, open: &str) -> Option<&'a str> {
    let start = document.find(open)?;
    let rest = &document[start..];
    let end = rest.find('>')?;
    Some(&rest[..end])
}

fn attr_number(tag: &str, name: &str) -> Option<f32> {
    find_attr(tag, name)?.parse().ok()
}

/// Parse a `unicode` attribute: either a character reference (`&#xe900;`,
/// `&#59648;`) or a literal character.
fn parse_unicode_attr(value: &str) -> Option<u32> {
    if let Some(hex) = value
        .strip_prefix("&#x")
        .or_else(|| value.strip_prefix("&#X"))
    {
        return u32::from_str_radix(hex.trim_end_matches(';'), 16).ok();
    }
    if let Some(dec) = value.strip_prefix("&#") {
        return dec.trim_end_matches(';').parse().ok();
    }
    value.chars().next().map(|c| c as u32)
}

fn round_coord(v: f32) -> i16 {
    v.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

// --- sfnt assembly ---

/// Big-endian byte buffer.
#[derive(Default)]
struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    fn u8(&mut self, v: u8) {
        self.bytes.push(v);
    }
    fn u16(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }
    fn i16(&mut self, v: i16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }
    fn u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }
    fn i64(&mut self, v: i64) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }
    fn pad4(&mut self) {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }
}

/// Wrapping sum of big-endian u32 words, the sfnt table checksum.
fn checksum(bytes: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in bytes.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

fn build_font(doc: &FontDoc) -> Result<Vec<u8>> {
    // Glyph 0 is .notdef (empty); icon glyphs follow in document order.
    let num_glyphs = doc.glyphs.len() + 1;
    if num_glyphs > u16::MAX as usize {
        return Err(IconError::FontBuild {
            message: format!("too many glyphs for a single font: {}", num_glyphs),
            help: None,
        });
    }

    // glyf + loca
    let mut glyf = Buffer::default();
    let mut loca: Vec<u32> = vec![0];
    let mut max_points = 0u16;
    let mut max_contours = 0u16;
    let mut global_bbox: Option<(i16, i16, i16, i16)> = None;

    // .notdef has no outline; its loca entry spans zero bytes.
    loca.push(glyf.bytes.len() as u32);

    for glyph in &doc.glyphs {
        if !glyph.contours.is_empty() {
            let (bbox, points) = write_simple_glyph(&mut glyf, &glyph.contours);
            max_points = max_points.max(points);
            max_contours = max_contours.max(glyph.contours.len() as u16);
            global_bbox = Some(match global_bbox {
                None => bbox,
                Some((x0, y0, x1, y1)) => (
                    x0.min(bbox.0),
                    y0.min(bbox.1),
                    x1.max(bbox.2),
                    y1.max(bbox.3),
                ),
            });
            glyf.pad4();
        }
        loca.push(glyf.bytes.len() as u32);
    }

    let (x_min, y_min, x_max, y_max) = global_bbox.unwrap_or((0, 0, 0, 0));

    let mut loca_table = Buffer::default();
    for offset in &loca {
        loca_table.u32(*offset);
    }

    // cmap
    let mut mappings: Vec<(u32, u16)> = doc
        .glyphs
        .iter()
        .enumerate()
        .map(|(i, g)| (g.codepoint, (i + 1) as u16))
        .collect();
    mappings.sort();
    let cmap = build_cmap(&mappings)?;

    // hmtx
    let mut hmtx = Buffer::default();
    let notdef_advance = doc.units_per_em / 2;
    hmtx.u16(notdef_advance);
    hmtx.i16(0);
    for glyph in &doc.glyphs {
        let lsb = glyph
            .contours
            .iter()
            .flatten()
            .map(|&(x, _)| x)
            .min()
            .unwrap_or(0);
        hmtx.u16(glyph.advance);
        hmtx.i16(lsb);
    }

    // hhea
    let advance_width_max = doc
        .glyphs
        .iter()
        .map(|g| g.advance)
        .max()
        .unwrap_or(notdef_advance)
        .max(notdef_advance);
    let mut hhea = Buffer::default();
    hhea.u32(0x0001_0000);
    hhea.i16(doc.ascent);
    hhea.i16(doc.descent);
    hhea.i16(0); // lineGap
    hhea.u16(advance_width_max);
    hhea.i16(x_min); // minLeftSideBearing
    hhea.i16(0); // minRightSideBearing
    hhea.i16(x_max); // xMaxExtent
    hhea.i16(1); // caretSlopeRise
    hhea.i16(0); // caretSlopeRun
    hhea.i16(0); // caretOffset
    for _ in 0..4 {
        hhea.i16(0);
    }
    hhea.i16(0); // metricDataFormat
    hhea.u16(num_glyphs as u16); // numberOfHMetrics

    // maxp
    let mut maxp = Buffer::default();
    maxp.u32(0x0001_0000);
    maxp.u16(num_glyphs as u16);
    maxp.u16(max_points);
    maxp.u16(max_contours);
    maxp.u16(0); // maxCompositePoints
    maxp.u16(0); // maxCompositeContours
    maxp.u16(2); // maxZones
    maxp.u16(0); // maxTwilightPoints
    maxp.u16(0); // maxStorage
    maxp.u16(0); // maxFunctionDefs
    maxp.u16(0); // maxInstructionDefs
    maxp.u16(0); // maxStackElements
    maxp.u16(0); // maxSizeOfInstructions
    maxp.u16(0); // maxComponentElements
    maxp.u16(0); // maxComponentDepth

    // head
    let mut head = Buffer::default();
    head.u32(0x0001_0000); // version
    head.u32(0x0001_0000); // fontRevision
    head.u32(0); // checkSumAdjustment, patched after assembly
    head.u32(0x5F0F_3CF5); // magicNumber
    head.u16(0x0003); // flags: baseline at y=0, lsb at x=0
    head.u16(doc.units_per_em);
    head.i64(0); // created
    head.i64(0); // modified
    head.i16(x_min);
    head.i16(y_min);
    head.i16(x_max);
    head.i16(y_max);
    head.u16(0); // macStyle
    head.u16(8); // lowestRecPPEM
    head.i16(2); // fontDirectionHint
    head.i16(1); // indexToLocFormat: long
    head.i16(0); // glyphDataFormat

    let name = build_name(&doc.family);
    let post = build_post();

    // Directory order is tag order.
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", cmap),
        (b"glyf", glyf.bytes),
        (b"head", head.bytes),
        (b"hhea", hhea.bytes),
        (b"hmtx", hmtx.bytes),
        (b"loca", loca_table.bytes),
        (b"maxp", maxp.bytes),
        (b"name", name),
        (b"post", post),
    ];

    Ok(assemble(tables))
}

/// Emit one simple glyph; returns its bbox and point count.
fn write_simple_glyph(
    glyf: &mut Buffer,
    contours: &[Vec<(i16, i16)>],
) -> ((i16, i16, i16, i16), u16) {
    let points: Vec<(i16, i16)> = contours.iter().flatten().copied().collect();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    glyf.i16(contours.len() as i16);
    glyf.i16(x_min);
    glyf.i16(y_min);
    glyf.i16(x_max);
    glyf.i16(y_max);

    let mut end = 0usize;
    for contour in contours {
        end += contour.len();
        glyf.u16((end - 1) as u16);
    }

    glyf.u16(0); // instructionLength

    // One flag byte per point: on-curve, full-width signed coordinates.
    for _ in &points {
        glyf.u8(0x01);
    }

    let mut prev = 0i16;
    for &(x, _) in &points {
        glyf.i16(x.wrapping_sub(prev));
        prev = x;
    }
    prev = 0;
    for &(_, y) in &points {
        glyf.i16(y.wrapping_sub(prev));
        prev = y;
    }

    ((x_min, y_min, x_max, y_max), points.len() as u16)
}

/// Build a format 4 cmap from sorted (codepoint, glyph id) pairs.
fn build_cmap(mappings: &[(u32, u16)]) -> Result<Vec<u8>> {
    if let Some(&(cp, _)) = mappings.iter().find(|&&(cp, _)| cp > 0xFFFF) {
        return Err(IconError::FontBuild {
            message: format!(
                "codepoint U+{:X} is outside the Basic Multilingual Plane",
                cp
            ),
            help: Some("Choose a first codepoint at or below 0xF000".to_string()),
        });
    }

    // Group consecutive codepoints with consecutive glyph ids.
    struct Segment {
        start: u16,
        end: u16,
        first_gid: u16,
    }
    let mut segments: Vec<Segment> = Vec::new();
    for &(cp, gid) in mappings {
        let cp = cp as u16;
        match segments.last_mut() {
            Some(seg)
                if cp == seg.end.wrapping_add(1)
                    && gid == seg.first_gid.wrapping_add(cp.wrapping_sub(seg.start)) =>
            {
                seg.end = cp;
            }
            _ => segments.push(Segment {
                start: cp,
                end: cp,
                first_gid: gid,
            }),
        }
    }

    let seg_count = (segments.len() + 1) as u16; // plus terminator
    let floor_log2 = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 * (1 << floor_log2);
    let entry_selector = floor_log2;
    let range_shift = 2 * seg_count - search_range;
    let subtable_length = 16 + 8 * seg_count as u32;

    let mut buf = Buffer::default();
    // Table header: version 0, one encoding record (Windows BMP).
    buf.u16(0);
    buf.u16(1);
    buf.u16(3); // platform: Windows
    buf.u16(1); // encoding: Unicode BMP
    buf.u32(12); // subtable offset

    buf.u16(4); // format
    buf.u16(subtable_length as u16);
    buf.u16(0); // language
    buf.u16(seg_count * 2);
    buf.u16(search_range);
    buf.u16(entry_selector);
    buf.u16(range_shift);

    for seg in &segments {
        buf.u16(seg.end);
    }
    buf.u16(0xFFFF);
    buf.u16(0); // reservedPad
    for seg in &segments {
        buf.u16(seg.start);
    }
    buf.u16(0xFFFF);
    for seg in &segments {
        buf.u16(seg.first_gid.wrapping_sub(seg.start));
    }
    buf.u16(1); // terminator idDelta maps 0xFFFF to glyph 0
    for _ in 0..seg_count {
        buf.u16(0); // idRangeOffset
    }

    Ok(buf.bytes)
}

fn build_name(family: &str) -> Vec<u8> {
    let subfamily = "Regular";
    let full = format!("{} {}", family, subfamily);
    let postscript: String = family.chars().filter(|c| !c.is_whitespace()).collect();

    let entries: [(u16, &str); 4] = [
        (1, family),
        (2, subfamily),
        (4, full.as_str()),
        (6, postscript.as_str()),
    ];

    let mut strings = Buffer::default();
    let mut records = Buffer::default();
    for (id, value) in entries {
        let offset = strings.bytes.len() as u16;
        for unit in value.encode_utf16() {
            strings.u16(unit);
        }
        let length = strings.bytes.len() as u16 - offset;
        records.u16(3); // platform: Windows
        records.u16(1); // encoding: Unicode BMP
        records.u16(0x0409); // language: en-US
        records.u16(id);
        records.u16(length);
        records.u16(offset);
    }

    let mut buf = Buffer::default();
    buf.u16(0); // format
    buf.u16(entries.len() as u16);
    buf.u16(6 + 12 * entries.len() as u16); // stringOffset
    buf.bytes.extend_from_slice(&records.bytes);
    buf.bytes.extend_from_slice(&strings.bytes);
    buf.bytes
}

fn build_post() -> Vec<u8> {
    let mut buf = Buffer::default();
    buf.u32(0x0003_0000); // version 3: no glyph names
    buf.u32(0); // italicAngle
    buf.i16(-75); // underlinePosition
    buf.i16(50); // underlineThickness
    buf.u32(0); // isFixedPitch
    for _ in 0..4 {
        buf.u32(0); // memory usage hints
    }
    buf.bytes
}

/// Lay out the table directory and table data, then patch the whole-font
/// checksum adjustment into head.
fn assemble(tables: Vec<(&[u8; 4], Vec<u8>)>) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let floor_log2 = 15 - num_tables.leading_zeros() as u16;
    let search_range = 16 * (1 << floor_log2);
    let entry_selector = floor_log2;
    let range_shift = num_tables * 16 - search_range;

    let mut font = Buffer::default();
    font.u32(0x0001_0000); // sfnt version: TrueType outlines
    font.u16(num_tables);
    font.u16(search_range);
    font.u16(entry_selector);
    font.u16(range_shift);

    let mut offset = 12 + 16 * tables.len();
    let mut head_offset = None;
    for (tag, data) in &tables {
        if *tag == b"head" {
            head_offset = Some(offset);
        }
        font.bytes.extend_from_slice(*tag);
        font.u32(checksum(data));
        font.u32(offset as u32);
        font.u32(data.len() as u32);
        offset += data.len().div_ceil(4) * 4;
    }

    for (_, data) in &tables {
        font.bytes.extend_from_slice(data);
        font.pad4();
    }

    if let Some(at) = head_offset {
        let adjustment = 0xB1B0_AFBAu32.wrapping_sub(checksum(&font.bytes));
        font.bytes[at + 8..at + 12].copy_from_slice(&adjustment.to_be_bytes());
    }

    font.bytes
}
