//! The batch compilation pipeline.
//!
//! One invocation processes one (language, point size) pair start to
//! finish: corpus → clusters → PUA table → rasterized glyphs → VLW
//! file, synchronously and single-threaded. Fatal errors (PUA capacity,
//! duplicate codepoints) abort before anything is written; recoverable
//! conditions (missing glyphs, label sanitization) are logged and
//! counted in the summary.

use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result};
use unicode_normalization::UnicodeNormalization;

use preshape_fonts::{GlyphRasterizer, ShapingOptions, load_font};
use preshape_script::{PUA_FIRST, PUA_LAST, PuaAllocator, ScriptTables, segment};
use preshape_vlw::{FontInfo, VlwGlyph};

use crate::config::{CharacterSetPolicy, JobConfig};
use crate::pua_map;

/// Printable ASCII range always included in the character set. Space is
/// left out; the device renderer advances without a glyph for it.
const ASCII_FIRST: u32 = 0x21;
const ASCII_LAST: u32 = 0x7E;

/// Outcome of a completed compilation.
#[derive(Debug)]
pub struct CompileSummary {
    pub glyph_count: usize,
    pub pua_count: usize,
    pub missing_count: usize,
    pub font_bytes: usize,
}

/// One final codepoint and the text it is drawn as: the character
/// itself, or the original cluster text for a PUA slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CharEntry {
    codepoint: char,
    display: String,
}

impl CharEntry {
    fn plain(c: char) -> Self {
        Self {
            codepoint: c,
            display: c.to_string(),
        }
    }
}

/// Script tables for a language, if it needs cluster pre-shaping.
fn script_tables(language: &str) -> Option<ScriptTables> {
    match language.to_ascii_lowercase().as_str() {
        "hindi" | "marathi" | "nepali" | "sanskrit" => Some(ScriptTables::devanagari()),
        _ => None,
    }
}

/// Compile one job end to end.
pub fn compile(config: &JobConfig) -> Result<CompileSummary> {
    config.validate()?;

    let corpus = load_corpus(config)?;
    let tables = script_tables(&config.language);
    if tables.is_none() {
        log::info!(
            "Language '{}' has no cluster tables; compiling without pre-shaping",
            config.language
        );
    }

    // Seed the allocator from a previous run so existing clusters keep
    // their codepoints even when the corpus grew or was reordered.
    let mut allocator = if config.map_out.exists() {
        let entries = pua_map::load_map(&config.map_out)?;
        log::info!(
            "Seeded {} existing PUA assignments from {}",
            entries.len(),
            config.map_out.display()
        );
        PuaAllocator::with_entries(entries)
    } else {
        PuaAllocator::new()
    };

    let charset = build_character_set(&corpus, tables.as_ref(), &config.charset, &mut allocator)?;
    log::info!(
        "Character set: {} entries ({} PUA clusters)",
        charset.len(),
        allocator.len()
    );

    // Rasterize every entry with the configured outline font.
    let font = load_font(&config.font_source())?;
    let options = if tables.is_some() {
        ShapingOptions::devanagari()
    } else {
        ShapingOptions::default()
    };
    let mut rasterizer = GlyphRasterizer::new(font, config.point_size as f32, options);
    let metrics = rasterizer.vertical_metrics();
    let fallback_advance = (config.point_size / 4) as i32;

    let mut glyphs = Vec::with_capacity(charset.len());
    let mut missing_count = 0;
    for entry in &charset {
        let codepoint = entry.codepoint as u32;
        match rasterizer.rasterize(&entry.display) {
            Some(g) => glyphs.push(VlwGlyph {
                codepoint,
                width: g.width,
                height: g.height,
                advance: g.advance,
                dy: g.dy,
                dx: g.dx,
                alpha: g.alpha,
            }),
            None => {
                log::warn!(
                    "No glyph for U+{codepoint:04X} ({:?}); writing placeholder",
                    entry.display
                );
                missing_count += 1;
                glyphs.push(VlwGlyph::missing(codepoint, fallback_advance));
            }
        }
    }

    // Serialize fully in memory, then write: a fatal error can never
    // leave a partial font file behind.
    let info = FontInfo {
        point_size: config.point_size,
        ascent: metrics.ascent,
        descent: metrics.descent,
        label: config.label(),
    };
    let data = preshape_vlw::serialize(&glyphs, &info)?;

    if let Some(parent) = config.font_out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(&config.font_out, &data)
        .with_context(|| format!("writing font file {}", config.font_out.display()))?;
    log::info!(
        "Wrote {} ({} glyphs, {} bytes, ascent {}, descent {})",
        config.font_out.display(),
        glyphs.len(),
        data.len(),
        metrics.ascent,
        metrics.descent
    );

    pua_map::write_map(&config.map_out, allocator.entries())?;

    if missing_count > 0 {
        log::warn!("{missing_count} character(s) missing from the font, written as placeholders");
    }

    Ok(CompileSummary {
        glyph_count: glyphs.len(),
        pua_count: allocator.len(),
        missing_count,
        font_bytes: data.len(),
    })
}

/// Read the corpus files in configured order, NFC-normalized.
fn load_corpus(config: &JobConfig) -> Result<String> {
    let mut corpus = String::new();
    for path in &config.inputs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading corpus file {}", path.display()))?;
        corpus.extend(text.nfc());
        corpus.push('\n');
    }
    Ok(corpus)
}

/// Assemble the ordered character set: printable ASCII, then the
/// policy's non-ASCII characters in first-encounter order, then the
/// PUA slots in allocation order (interning new clusters as a side
/// effect of the corpus scan).
fn build_character_set(
    corpus: &str,
    tables: Option<&ScriptTables>,
    policy: &CharacterSetPolicy,
    allocator: &mut PuaAllocator,
) -> Result<Vec<CharEntry>> {
    let mut entries: Vec<CharEntry> = (ASCII_FIRST..=ASCII_LAST)
        .filter_map(char::from_u32)
        .map(CharEntry::plain)
        .collect();
    let mut seen: HashSet<char> = entries.iter().map(|e| e.codepoint).collect();

    let mut push_simple = |c: char, entries: &mut Vec<CharEntry>, allocator: &PuaAllocator| {
        if (c as u32) <= ASCII_LAST || !seen.insert(c) {
            return;
        }
        if (PUA_FIRST..=PUA_LAST).contains(&(c as u32)) {
            // A PUA scalar in the corpus means the text was already
            // rewritten by an earlier run; its glyph comes from the
            // seeded mapping, or cannot be rendered at all.
            if allocator.text_for(c).is_none() {
                log::warn!(
                    "corpus contains PUA codepoint U+{:04X} with no known cluster text",
                    c as u32
                );
            }
            return;
        }
        entries.push(CharEntry::plain(c));
    };

    match tables {
        Some(tables) => {
            for cluster in segment(corpus, tables) {
                if cluster.needs_shaping() {
                    allocator.intern(cluster.text())?;
                } else if *policy == CharacterSetPolicy::Extract {
                    for c in cluster.text().chars() {
                        push_simple(c, &mut entries, allocator);
                    }
                }
            }
        }
        None => {
            if *policy == CharacterSetPolicy::Extract {
                for c in corpus.chars() {
                    push_simple(c, &mut entries, allocator);
                }
            }
        }
    }

    if let CharacterSetPolicy::Fixed { chars } = policy {
        for c in chars.chars() {
            push_simple(c, &mut entries, allocator);
        }
    }

    for (codepoint, text) in allocator.entries() {
        entries.push(CharEntry {
            codepoint: *codepoint,
            display: text.clone(),
        });
    }

    Ok(entries)
}
