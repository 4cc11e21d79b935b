//! Glyph source table and extraction of it from C array declarations.

use std::borrow::Cow;

use log::{debug, warn};
use regex::Regex;

use crate::error::ScaleError;
use crate::glyph::{Glyph, GLYPH_BYTES};

/// A flat table of 8x8 glyphs, 8 bytes per glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSource {
    bytes: Vec<u8>,
}

impl GlyphSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        GlyphSource { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of complete glyphs in the table.
    pub fn glyph_count(&self) -> usize {
        self.bytes.len() / GLYPH_BYTES
    }

    /// The glyph whose first row is at byte `offset`, if it lies fully inside.
    pub fn glyph_at(&self, offset: usize) -> Option<Glyph> {
        let end = offset.checked_add(GLYPH_BYTES)?;
        let rows = self.bytes.get(offset..end)?;
        Glyph::try_from(rows).ok()
    }
}

lazy_static::lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").unwrap();
    static ref ARRAY_END: Regex = Regex::new(r"\}\s*;").unwrap();
    static ref BYTE_LITERAL: Regex = Regex::new(
        r"^(?:\(\s*(?:unsigned\s+)?char\s*\)\s*)?(?:0[xX]([0-9A-Fa-f]+)|0[bB]([01]+)|(\d+))[uU]?$"
    )
    .unwrap();
}

/// Extract `array_name` from C source text such as
/// `static unsigned char name[] = { 0xFF, 0b1010, 12, ... };`.
///
/// Comments are ignored. Every element must be a hex (`0x`), binary (`0b`)
/// or decimal literal that fits in a byte, optionally with a `u` suffix or
/// an `(unsigned char)` cast.
pub fn parse_c_array(text: &str, array_name: &str) -> Result<GlyphSource, ScaleError> {
    let text = strip_comments(text);
    let body = find_array_body(&text, array_name)?;

    let mut bytes = Vec::new();
    for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value = parse_literal(token).ok_or_else(|| {
            ScaleError::MalformedSource(format!(
                "'{token}' in {array_name} is not a byte literal"
            ))
        })?;
        bytes.push(value);
    }

    if bytes.is_empty() {
        return Err(ScaleError::MalformedSource(format!(
            "{array_name} has no elements"
        )));
    }
    if bytes.len() % GLYPH_BYTES != 0 {
        warn!(
            "{} has {} bytes, the last {} do not form a complete glyph",
            array_name,
            bytes.len(),
            bytes.len() % GLYPH_BYTES
        );
    }
    debug!(
        "found {} bytes ({} glyphs) in {}",
        bytes.len(),
        bytes.len() / GLYPH_BYTES,
        array_name
    );

    Ok(GlyphSource::new(bytes))
}

/// Locate `unsigned char <name>[] = { ... };` and return the text between
/// the braces.
fn find_array_body<'a>(text: &'a str, array_name: &str) -> Result<&'a str, ScaleError> {
    let declaration = Regex::new(&format!(
        r"\bunsigned\s+char\s+{}\s*\[\s*\d*\s*\]\s*=\s*\{{",
        regex::escape(array_name)
    ))
    .map_err(|e| ScaleError::MalformedSource(format!("bad array name {array_name}: {e}")))?;

    let head = declaration.find(text).ok_or_else(|| {
        ScaleError::MalformedSource(format!("could not find {array_name} array"))
    })?;
    let rest = &text[head.end()..];
    let end = ARRAY_END.find(rest).ok_or_else(|| {
        ScaleError::MalformedSource(format!("{array_name} array is not terminated by '}};'"))
    })?;
    Ok(&rest[..end.start()])
}

/// Replace `// ...` and `/* ... */` comments with a space.
fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT.replace_all(text, " ")
}

/// Decimal literals are read as decimal even with a leading zero.
fn parse_literal(token: &str) -> Option<u8> {
    let caps = BYTE_LITERAL.captures(token)?;
    let value = if let Some(hex) = caps.get(1) {
        u32::from_str_radix(hex.as_str(), 16).ok()?
    } else if let Some(bin) = caps.get(2) {
        u32::from_str_radix(bin.as_str(), 2).ok()?
    } else {
        caps.get(3)?.as_str().parse::<u32>().ok()?
    };
    u8::try_from(value).ok()
}

// --- Built-in glyph sources ---

/// The 8x8 art the built-in `duplicator` catalog indexes into.
pub fn duplicator_font() -> GlyphSource {
    parse_c_array(
        include_str!("../fonts/duplicator_font.h"),
        "duplicator_graphics",
    )
    .expect("built-in duplicator_font.h should be valid")
}

/// Glyph source bundled with a built-in catalog.
pub fn builtin_source(catalog_name: &str) -> Option<GlyphSource> {
    match catalog_name {
        "duplicator" => Some(duplicator_font()),
        _ => None,
    }
}
