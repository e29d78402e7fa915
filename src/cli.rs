//! Command-line interface for preshape.
//!
//! A run is described by an optional YAML job file; every field can
//! also be set or overridden from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::config::{CharacterSetPolicy, JobConfig};
use crate::debug;

/// preshape - compile vocabulary text into an embedded VLW font
#[derive(Parser)]
#[command(name = "preshape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Job configuration file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Language to compile (selects script tables and default label)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Glyph rasterization size in points
    #[arg(long, value_name = "POINTS")]
    pub size: Option<u32>,

    /// ASCII font name for the file footer
    #[arg(long, value_name = "NAME")]
    pub label: Option<String>,

    /// Font family name resolved via the system font database
    #[arg(long, value_name = "FAMILY")]
    pub font_family: Option<String>,

    /// TTF/OTF font file (takes precedence over --font-family)
    #[arg(long, value_name = "FILE")]
    pub font_file: Option<PathBuf>,

    /// Corpus text file; repeat in tier order
    #[arg(long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Fixed extra characters beyond printable ASCII (default:
    /// extract non-ASCII characters from the corpus)
    #[arg(long, value_name = "CHARS")]
    pub chars: Option<String>,

    /// Output path for the VLW font file
    #[arg(long, value_name = "FILE")]
    pub font_out: Option<PathBuf>,

    /// Output path for the PUA mapping CSV
    #[arg(long, value_name = "FILE")]
    pub map_out: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Parse arguments into a validated job configuration plus the
/// requested log level.
pub fn process_cli() -> Result<(JobConfig, Option<LevelFilter>)> {
    let cli = Cli::parse();
    let log_level = cli.log_level.as_deref().map(debug::parse_level);

    let mut config = match cli.config {
        Some(ref path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };

    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(size) = cli.size {
        config.point_size = size;
    }
    if let Some(label) = cli.label {
        config.label = Some(label);
    }
    if let Some(family) = cli.font_family {
        config.font_family = Some(family);
    }
    if let Some(file) = cli.font_file {
        config.font_file = Some(file);
    }
    if !cli.inputs.is_empty() {
        config.inputs = cli.inputs;
    }
    if let Some(chars) = cli.chars {
        config.charset = CharacterSetPolicy::Fixed { chars };
    }
    if let Some(font_out) = cli.font_out {
        config.font_out = font_out;
    }
    if let Some(map_out) = cli.map_out {
        config.map_out = map_out;
    }

    config.validate()?;
    Ok((config, log_level))
}
