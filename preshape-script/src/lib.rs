//! Orthographic cluster segmentation and PUA allocation for preshape.
//!
//! Complex scripts such as Devanagari build conjuncts from consonant +
//! halant + consonant sequences that a glyph-by-glyph embedded renderer
//! draws incorrectly. This crate provides:
//! - Codepoint classification against fixed per-script Unicode tables
//! - Greedy left-to-right segmentation of text into orthographic clusters
//! - A Private Use Area allocator that gives each conjunct cluster a
//!   stable synthetic codepoint starting at U+E000
//!
//! All of it is pure logic with no I/O; the compiler in the root crate
//! wires it to font rasterization and serialization.

mod classify;
mod cluster;
mod pua;

pub use classify::{ScriptClass, ScriptTables};
pub use cluster::{Cluster, segment};
pub use pua::{PUA_FIRST, PUA_LAST, PuaAllocator, PuaError};
