//! Glyph rasterization: shaped cluster text to one tight alpha bitmap.

use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

use crate::loader::FontData;
use crate::shaper::{ClusterShaper, ShapingOptions};

/// Font-wide vertical metrics at the configured point size.
#[derive(Debug, Clone, Copy)]
pub struct VerticalMetrics {
    pub ascent: u32,
    pub descent: u32,
}

/// One rasterized output glyph.
///
/// Offsets are signed pixels relative to the pen origin (`dx`) and the
/// baseline (`dy` = distance from the baseline down to the bitmap's top
/// row, positive when the ink sits above the baseline). The bitmap is
/// `width * height` 8-bit alpha bytes, row-major.
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    pub advance: i32,
    pub dx: i32,
    pub dy: i32,
    pub alpha: Vec<u8>,
}

/// Rasterizes display text with one font at one point size.
///
/// Shaping positions the cluster's glyphs (conjunct forms, matra
/// reordering) the way a full renderer would; each glyph's alpha mask
/// is then composited at its shaped pen position and the union ink box
/// becomes the output bitmap.
pub struct GlyphRasterizer {
    font: FontData,
    shaper: ClusterShaper,
    context: ScaleContext,
    size: f32,
}

impl GlyphRasterizer {
    pub fn new(font: FontData, size: f32, options: ShapingOptions) -> Self {
        Self {
            font,
            shaper: ClusterShaper::new(options),
            context: ScaleContext::new(),
            size,
        }
    }

    /// Ascent/descent scaled to the point size, rounded to pixels.
    pub fn vertical_metrics(&self) -> VerticalMetrics {
        let m = self.font.font_ref.metrics(&[]);
        let scale = if m.units_per_em > 0 {
            self.size / m.units_per_em as f32
        } else {
            1.0
        };
        VerticalMetrics {
            ascent: (m.ascent * scale).round().max(0.0) as u32,
            descent: (m.descent * scale).round().max(0.0) as u32,
        }
    }

    /// Rasterize `display_text` and extract the tight ink bounding box.
    ///
    /// Returns `None` when the font has no rendering for the text:
    /// either some codepoint is absent from the character map, or
    /// compositing produces no inked pixel (the caller emits the
    /// missing-glyph placeholder in both cases).
    pub fn rasterize(&mut self, display_text: &str) -> Option<RasterizedGlyph> {
        let charmap = self.font.font_ref.charmap();
        for c in display_text.chars() {
            if charmap.map(c) == 0 {
                log::debug!("codepoint U+{:04X} not in font character map", c as u32);
                return None;
            }
        }

        let run = self.shaper.shape(display_text, &self.font.data)?;
        if run.units_per_em == 0 {
            return None;
        }
        let scale = self.size / run.units_per_em as f32;

        let mut scaler = self
            .context
            .builder(self.font.font_ref)
            .size(self.size)
            .hint(false)
            .build();

        // Composite pass 1: rasterize each shaped glyph and record its
        // placement relative to the pen origin (x right, y down from
        // the baseline).
        struct PlacedMask {
            x0: i32,
            y0: i32,
            width: u32,
            height: u32,
            data: Vec<u8>,
        }
        let mut masks: Vec<PlacedMask> = Vec::new();
        let mut pen_x = 0.0f32;

        for glyph in &run.glyphs {
            let image = Render::new(&[Source::Outline])
                .format(Format::Alpha)
                .render(&mut scaler, glyph.glyph_id as u16);
            if let Some(image) = image
                && image.placement.width > 0
                && image.placement.height > 0
            {
                let origin_x = (pen_x + glyph.x_offset as f32 * scale).round() as i32;
                let top_above_baseline =
                    (glyph.y_offset as f32 * scale).round() as i32 + image.placement.top;
                masks.push(PlacedMask {
                    x0: origin_x + image.placement.left,
                    y0: -top_above_baseline,
                    width: image.placement.width,
                    height: image.placement.height,
                    data: image.data,
                });
            }
            pen_x += glyph.x_advance as f32 * scale;
        }

        if masks.is_empty() {
            return None;
        }

        // Union ink box.
        let min_x = masks.iter().map(|m| m.x0).min().unwrap_or(0);
        let min_y = masks.iter().map(|m| m.y0).min().unwrap_or(0);
        let max_x = masks
            .iter()
            .map(|m| m.x0 + m.width as i32)
            .max()
            .unwrap_or(0);
        let max_y = masks
            .iter()
            .map(|m| m.y0 + m.height as i32)
            .max()
            .unwrap_or(0);
        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;

        // Composite pass 2: max-blend every mask into the union canvas.
        let mut alpha = vec![0u8; (width * height) as usize];
        for mask in &masks {
            let ox = (mask.x0 - min_x) as usize;
            let oy = (mask.y0 - min_y) as usize;
            for row in 0..mask.height as usize {
                for col in 0..mask.width as usize {
                    let src = mask.data[row * mask.width as usize + col];
                    let dst = &mut alpha[(oy + row) * width as usize + ox + col];
                    *dst = (*dst).max(src);
                }
            }
        }

        let dx = min_x;
        let dy = -min_y;
        let shaped_advance = (run.total_advance as f32 * scale).round() as i32;
        // Never let the advance truncate visible ink.
        let advance = shaped_advance.max(width as i32 + dx.max(0));

        Some(RasterizedGlyph {
            width,
            height,
            advance,
            dx,
            dy,
            alpha,
        })
    }
}
