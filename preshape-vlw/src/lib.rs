//! VLW smooth-font binary serializer.
//!
//! VLW is the fixed-layout glyph-bitmap format consumed by the device
//! renderer (TFT_eSPI smooth fonts). Everything is big-endian:
//!
//! - Header: 6 × u32 — glyph count, version (0x0B), point size,
//!   reserved 0, ascent, descent
//! - Metrics table: per glyph 7 × i32 — codepoint, height, width,
//!   advance, dY, dX, reserved 0
//! - Bitmap payload: per glyph, width × height 8-bit alpha bytes
//! - Footer: length-prefixed NUL-terminated ASCII name, written twice,
//!   then one trailer byte
//!
//! Glyphs are written in ascending codepoint order regardless of input
//! order; the device renderer binary-searches the metrics table and
//! relies on that ordering.

use thiserror::Error;

/// Format version constant written to the header.
pub const VLW_VERSION: u32 = 0x0B;

/// Header size in bytes (6 big-endian u32 fields).
pub const HEADER_LEN: usize = 24;

/// Per-glyph metrics record size in bytes (7 big-endian i32 fields).
pub const GLYPH_RECORD_LEN: usize = 28;

/// Errors produced by [`serialize`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VlwError {
    /// Two glyph records share a codepoint; a caller bug, fatal.
    #[error("duplicate glyph for codepoint U+{0:04X}")]
    DuplicateCodepoint(u32),
}

/// One glyph record ready for serialization.
///
/// A missing glyph carries zero width/height/offsets, its configured
/// fallback advance and an empty bitmap.
#[derive(Debug, Clone)]
pub struct VlwGlyph {
    pub codepoint: u32,
    pub width: u32,
    pub height: u32,
    pub advance: i32,
    /// Baseline distance from the bitmap's top row.
    pub dy: i32,
    /// Bitmap left offset from the pen origin.
    pub dx: i32,
    /// `width * height` alpha bytes, row-major; empty for missing glyphs.
    pub alpha: Vec<u8>,
}

impl VlwGlyph {
    /// Placeholder for a character the font has no ink for.
    pub fn missing(codepoint: u32, fallback_advance: i32) -> Self {
        Self {
            codepoint,
            width: 0,
            height: 0,
            advance: fallback_advance,
            dy: 0,
            dx: 0,
            alpha: Vec::new(),
        }
    }

    /// True for the zero-metrics placeholder.
    pub fn is_missing(&self) -> bool {
        self.alpha.is_empty()
    }
}

/// Font-wide scalars written to the header and footer.
#[derive(Debug, Clone)]
pub struct FontInfo {
    pub point_size: u32,
    pub ascent: u32,
    pub descent: u32,
    /// ASCII font name for the footer; non-ASCII bytes are replaced.
    pub label: String,
}

/// Serialize glyphs into a VLW blob.
///
/// Sorts by codepoint (stable) and fails on duplicates. The blob is
/// assembled fully in memory so a failure never leaves partial output.
pub fn serialize(glyphs: &[VlwGlyph], info: &FontInfo) -> Result<Vec<u8>, VlwError> {
    let mut sorted: Vec<&VlwGlyph> = glyphs.iter().collect();
    sorted.sort_by_key(|g| g.codepoint);
    for pair in sorted.windows(2) {
        if pair[0].codepoint == pair[1].codepoint {
            return Err(VlwError::DuplicateCodepoint(pair[0].codepoint));
        }
    }

    let bitmap_len: usize = sorted.iter().map(|g| g.alpha.len()).sum();
    let name = sanitize_label(&info.label);
    let mut data = Vec::with_capacity(
        HEADER_LEN + sorted.len() * GLYPH_RECORD_LEN + bitmap_len + 2 * (name.len() + 2) + 1,
    );

    // Header
    data.extend_from_slice(&(sorted.len() as u32).to_be_bytes());
    data.extend_from_slice(&VLW_VERSION.to_be_bytes());
    data.extend_from_slice(&info.point_size.to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&info.ascent.to_be_bytes());
    data.extend_from_slice(&info.descent.to_be_bytes());

    // Metrics table
    for g in &sorted {
        data.extend_from_slice(&(g.codepoint as i32).to_be_bytes());
        data.extend_from_slice(&(g.height as i32).to_be_bytes());
        data.extend_from_slice(&(g.width as i32).to_be_bytes());
        data.extend_from_slice(&g.advance.to_be_bytes());
        data.extend_from_slice(&g.dy.to_be_bytes());
        data.extend_from_slice(&g.dx.to_be_bytes());
        data.extend_from_slice(&0i32.to_be_bytes());
    }

    // Bitmap payload
    for g in &sorted {
        data.extend_from_slice(&g.alpha);
    }

    // Footer: the name field is duplicated, then one trailer byte.
    for _ in 0..2 {
        data.push(name.len() as u8);
        data.extend_from_slice(&name);
        data.push(0);
    }
    data.push(1);

    Ok(data)
}

/// Total serialized size for the given glyphs and label, in bytes.
pub fn serialized_len(glyphs: &[VlwGlyph], label: &str) -> usize {
    let bitmap_len: usize = glyphs.iter().map(|g| g.alpha.len()).sum();
    let name_len = sanitize_label(label).len();
    HEADER_LEN + glyphs.len() * GLYPH_RECORD_LEN + bitmap_len + 2 * (name_len + 2) + 1
}

/// Replace non-ASCII label bytes with `?` and cap at the u8 length
/// prefix, keeping the prefix in sync with the written bytes.
fn sanitize_label(label: &str) -> Vec<u8> {
    if !label.is_ascii() {
        log::warn!("font label {label:?} contains non-ASCII characters, replaced with '?'");
    }
    let mut out: Vec<u8> = label
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect();
    if out.len() > u8::MAX as usize {
        log::warn!("font label {label:?} longer than 255 bytes, truncated");
        out.truncate(u8::MAX as usize);
    }
    out
}
