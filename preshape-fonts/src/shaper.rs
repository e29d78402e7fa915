//! Cluster text shaping using HarfBuzz via rustybuzz.
//!
//! A PUA slot renders its original multi-codepoint cluster text, so the
//! compiler needs real OpenType shaping exactly once per slot: the
//! shaper turns `"क्ष"` into the conjunct glyph sequence the renderer
//! on the device can never produce itself.

use std::str::FromStr;

use rustybuzz::{Face, Feature, GlyphBuffer, Language, Script, UnicodeBuffer};

/// A single shaped glyph with positioning information, in font units.
#[derive(Debug, Clone, Copy)]
pub struct ShapedGlyph {
    /// Glyph ID from the font
    pub glyph_id: u32,
    /// Horizontal advance width
    pub x_advance: i32,
    /// Horizontal offset from the current pen position
    pub x_offset: i32,
    /// Vertical offset from the baseline
    pub y_offset: i32,
}

/// Options for text shaping.
#[derive(Debug, Clone)]
pub struct ShapingOptions {
    /// Enable standard ligatures (liga/clig)
    pub enable_ligatures: bool,
    /// Enable kerning adjustments
    pub enable_kerning: bool,
    /// Script hint (e.g. "deva" for Devanagari)
    pub script: Option<String>,
    /// Language hint (e.g. "hi" for Hindi)
    pub language: Option<String>,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        Self {
            enable_ligatures: true,
            enable_kerning: true,
            script: None,
            language: None,
        }
    }
}

impl ShapingOptions {
    /// Options tuned for Devanagari cluster text.
    pub fn devanagari() -> Self {
        Self {
            script: Some("deva".to_string()),
            language: Some("hi".to_string()),
            ..Self::default()
        }
    }
}

/// Result of shaping one display text.
#[derive(Debug, Clone)]
pub struct ShapedRun {
    /// The shaped glyphs, in visual order
    pub glyphs: Vec<ShapedGlyph>,
    /// Total advance width in font units
    pub total_advance: i32,
    /// Design units per em, for scaling to pixels
    pub units_per_em: u16,
}

/// Shapes display text against one face.
///
/// Stateless apart from the options; every distinct codepoint in a
/// compilation is shaped exactly once, so no result caching is kept.
#[derive(Debug, Clone)]
pub struct ClusterShaper {
    options: ShapingOptions,
}

impl ClusterShaper {
    pub fn new(options: ShapingOptions) -> Self {
        Self { options }
    }

    /// Shape `text` and return positioned glyphs in font units.
    ///
    /// Returns `None` when the bytes are not a parseable face (the
    /// loader normally guarantees they are).
    pub fn shape(&self, text: &str, font_data: &[u8]) -> Option<ShapedRun> {
        let face = Face::from_slice(font_data, 0)?;
        let units_per_em = face.units_per_em() as u16;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(rustybuzz::Direction::LeftToRight);

        if let Some(ref script_str) = self.options.script
            && let Ok(script) = Script::from_str(script_str)
        {
            buffer.set_script(script);
        }
        if let Some(ref lang_str) = self.options.language
            && let Ok(lang) = Language::from_str(lang_str)
        {
            buffer.set_language(lang);
        }

        let features = self.build_features();
        let glyph_buffer = rustybuzz::shape(&face, &features, buffer);
        let glyphs = extract_shaped_glyphs(&glyph_buffer);
        let total_advance = glyphs.iter().map(|g| g.x_advance).sum();

        Some(ShapedRun {
            glyphs,
            total_advance,
            units_per_em,
        })
    }

    /// Build the OpenType feature list from the options.
    fn build_features(&self) -> Vec<Feature> {
        let mut features = Vec::new();

        if self.options.enable_ligatures {
            // Standard ligatures (liga): fi, fl, ffi, ffl
            if let Ok(feat) = Feature::from_str("liga") {
                features.push(feat);
            }
            // Contextual ligatures (clig)
            if let Ok(feat) = Feature::from_str("clig") {
                features.push(feat);
            }
        }

        // Kerning adjustments (kern)
        if self.options.enable_kerning
            && let Ok(feat) = Feature::from_str("kern")
        {
            features.push(feat);
        }

        // Glyph composition/decomposition (ccmp) - required for proper
        // conjunct formation in complex scripts
        if let Ok(feat) = Feature::from_str("ccmp") {
            features.push(feat);
        }

        // Localized forms (locl) - language-specific glyph variants
        if let Ok(feat) = Feature::from_str("locl") {
            features.push(feat);
        }

        features
    }
}

/// Extract shaped glyphs from the HarfBuzz glyph buffer.
fn extract_shaped_glyphs(buffer: &GlyphBuffer) -> Vec<ShapedGlyph> {
    let glyph_infos = buffer.glyph_infos();
    let glyph_positions = buffer.glyph_positions();

    glyph_infos
        .iter()
        .zip(glyph_positions.iter())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id,
            x_advance: pos.x_advance,
            x_offset: pos.x_offset,
            y_offset: pos.y_offset,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = ShapingOptions::default();
        assert!(opts.enable_ligatures);
        assert!(opts.enable_kerning);
        assert!(opts.script.is_none());
        assert!(opts.language.is_none());
    }

    #[test]
    fn devanagari_options_carry_script_hint() {
        let opts = ShapingOptions::devanagari();
        assert_eq!(opts.script.as_deref(), Some("deva"));
        assert_eq!(opts.language.as_deref(), Some("hi"));
    }

    #[test]
    fn invalid_font_data_yields_none() {
        let shaper = ClusterShaper::new(ShapingOptions::default());
        assert!(shaper.shape("abc", &[0u8; 64]).is_none());
    }
}
