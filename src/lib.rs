//! preshape - complex-script pre-shaping and embedded VLW font compiler.
//!
//! Embedded displays driven by TFT_eSPI-style renderers draw glyphs one
//! codepoint at a time and cannot perform OpenType shaping, which makes
//! conjunct-heavy scripts such as Devanagari come out wrong. preshape
//! compiles a (language, point size) pair in one batch run:
//!
//! 1. Segments the corpus into orthographic clusters
//!    ([`preshape_script`]),
//! 2. Assigns each conjunct cluster a stable Private Use Area codepoint
//!    and persists the mapping for the vocabulary rewrite step,
//! 3. Rasterizes the full character set - printable ASCII, simple
//!    script characters and the PUA slots rendered as their original
//!    cluster text ([`preshape_fonts`]),
//! 4. Serializes everything into a VLW font file ([`preshape_vlw`]).

pub mod cli;
pub mod compiler;
pub mod config;
pub mod debug;
pub mod pua_map;
