//! End-to-end tests for the compilation pipeline.
//!
//! Rasterization needs a real outline font. The repo ships none, so
//! these tests resolve one from the host system and skip with a notice
//! when the environment has no usable font.

use std::fs;
use std::path::PathBuf;

use preshape::compiler::compile;
use preshape::config::{CharacterSetPolicy, JobConfig};
use preshape::pua_map;
use preshape_fonts::{FontSource, load_font};
use preshape_vlw::{GLYPH_RECORD_LEN, HEADER_LEN, VLW_VERSION};

fn system_font_available() -> bool {
    match load_font(&FontSource::Default) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("skipping compiler test, no system font: {e}");
            false
        }
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn write_corpus(dir: &std::path::Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn job(dir: &std::path::Path, inputs: Vec<PathBuf>) -> JobConfig {
    JobConfig {
        language: "hindi".to_string(),
        point_size: 24,
        inputs,
        font_out: dir.join("font.vlw"),
        map_out: dir.join("pua_map.csv"),
        ..JobConfig::default()
    }
}

#[test]
fn compile_devanagari_corpus_end_to_end() {
    if !system_font_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path(), "beginner.txt", "क्षत्र\nराम\n");
    let config = job(dir.path(), vec![corpus]);

    let summary = compile(&config).unwrap();

    // Two conjunct clusters, first-encounter order.
    assert_eq!(summary.pua_count, 2);
    let map = pua_map::load_map(&config.map_out).unwrap();
    assert_eq!(
        map,
        vec![
            ('\u{E000}', "क्ष".to_string()),
            ('\u{E001}', "त्र".to_string()),
        ]
    );

    let data = fs::read(&config.font_out).unwrap();
    let glyph_count = read_u32(&data, 0) as usize;
    assert_eq!(glyph_count, summary.glyph_count);
    assert_eq!(read_u32(&data, 4), VLW_VERSION);
    assert_eq!(read_u32(&data, 8), 24, "point size");
    assert_eq!(read_u32(&data, 12), 0, "reserved");

    // Metrics records are codepoint-ascending and account for the
    // whole bitmap payload.
    let mut prev = 0u32;
    let mut bitmap_len = 0usize;
    for i in 0..glyph_count {
        let rec = HEADER_LEN + i * GLYPH_RECORD_LEN;
        let cp = read_u32(&data, rec);
        assert!(cp > prev || i == 0, "codepoints must ascend");
        prev = cp;
        let height = read_u32(&data, rec + 4) as usize;
        let width = read_u32(&data, rec + 8) as usize;
        bitmap_len += width * height;
    }
    let footer_len = 2 * (config.label().len() + 2) + 1;
    assert_eq!(
        data.len(),
        HEADER_LEN + glyph_count * GLYPH_RECORD_LEN + bitmap_len + footer_len
    );
}

#[test]
fn reordered_corpus_keeps_existing_assignments() {
    if !system_font_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let first = write_corpus(dir.path(), "a.txt", "क्षत्र\n");
    let config = job(dir.path(), vec![first]);
    compile(&config).unwrap();
    let before = pua_map::load_map(&config.map_out).unwrap();

    // Re-run with the clusters in the opposite encounter order plus a
    // new conjunct; the persisted map must seed the allocator.
    let second = write_corpus(dir.path(), "a.txt", "त्रक्ष द्ध\n");
    let config = job(dir.path(), vec![second]);
    compile(&config).unwrap();
    let after = pua_map::load_map(&config.map_out).unwrap();

    assert_eq!(&after[..2], &before[..]);
    assert_eq!(after[2], ('\u{E002}', "द्ध".to_string()));
}

#[test]
fn latin_language_compiles_without_pua() {
    if !system_font_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path(), "vocab.txt", "mañana añejo\n");
    let config = JobConfig {
        language: "spanish".to_string(),
        point_size: 20,
        charset: CharacterSetPolicy::Fixed {
            chars: "ñáéíóú".to_string(),
        },
        inputs: vec![corpus],
        font_out: dir.path().join("font.vlw"),
        map_out: dir.path().join("pua_map.csv"),
        ..JobConfig::default()
    };

    let summary = compile(&config).unwrap();
    assert_eq!(summary.pua_count, 0);
    // 94 printable ASCII plus the six fixed characters.
    assert_eq!(summary.glyph_count, 94 + 6);
    assert!(pua_map::load_map(&config.map_out).unwrap().is_empty());
}

#[test]
fn missing_corpus_file_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = job(dir.path(), vec![dir.path().join("nonexistent.txt")]);
    assert!(compile(&config).is_err());
    assert!(!config.font_out.exists(), "no partial output on failure");
    assert!(!config.map_out.exists());
}
