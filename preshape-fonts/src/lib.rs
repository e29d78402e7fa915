//! Font loading, cluster shaping and glyph rasterization for preshape.
//!
//! This crate provides:
//! - Font resolution from a file path or a system family name (fontdb)
//! - HarfBuzz-based shaping of multi-codepoint cluster text via rustybuzz
//! - Alpha-mask rasterization via swash, composited at shaped pen
//!   positions into one tight-bbox bitmap per output glyph
//!
//! The compiler hands each final codepoint's display text (the original
//! multi-scalar cluster for PUA slots, the character itself otherwise)
//! to [`GlyphRasterizer::rasterize`] and gets back pixel metrics plus a
//! row-major width×height alpha bitmap, or `None` when the font has no
//! ink for the text.

mod loader;
mod raster;
mod shaper;

pub use loader::{FontData, FontSource, load_font};
pub use raster::{GlyphRasterizer, RasterizedGlyph, VerticalMetrics};
pub use shaper::{ClusterShaper, ShapedGlyph, ShapedRun, ShapingOptions};
