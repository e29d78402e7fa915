//! Job configuration for one compilation run.
//!
//! A run is configured from an optional YAML file plus CLI overrides;
//! every field has a default so a minimal invocation only needs input
//! files and a font.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml_ng as serde_yaml;

use preshape_fonts::FontSource;

/// How the non-ASCII part of the character set is chosen.
///
/// Tagged variant instead of a magic string so a config typo fails at
/// parse time rather than silently selecting the wrong code path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CharacterSetPolicy {
    /// A fixed list of extra characters beyond printable ASCII
    /// (accented Latin sets are small enough to spell out).
    Fixed { chars: String },
    /// Extract every non-ASCII character from the corpus itself
    /// (open-ended scripts: Devanagari, Arabic, CJK, ...).
    #[default]
    Extract,
}

/// Configuration for one (language, point size) compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Language being compiled; selects the script tables and the
    /// default font label.
    #[serde(default = "defaults::language")]
    pub language: String,

    /// Glyph rasterization size in points.
    #[serde(default = "defaults::point_size")]
    pub point_size: u32,

    /// ASCII font name written to the VLW footer
    /// (default: "{language}Font").
    #[serde(default)]
    pub label: Option<String>,

    /// Font family name resolved through the system font database.
    #[serde(default)]
    pub font_family: Option<String>,

    /// TTF/OTF file path; takes precedence over `font_family`.
    #[serde(default)]
    pub font_file: Option<PathBuf>,

    /// Non-ASCII character set policy.
    #[serde(default)]
    pub charset: CharacterSetPolicy,

    /// Corpus text files, scanned in this order. The order is part of
    /// the PUA allocation contract, so keep tiers listed consistently
    /// across runs.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Output path for the VLW font file.
    #[serde(default = "defaults::font_out")]
    pub font_out: PathBuf,

    /// Output path for the PUA mapping CSV. Loaded first when it
    /// already exists so existing assignments survive corpus changes.
    #[serde(default = "defaults::map_out")]
    pub map_out: PathBuf,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            language: defaults::language(),
            point_size: defaults::point_size(),
            label: None,
            font_family: None,
            font_file: None,
            charset: CharacterSetPolicy::default(),
            inputs: Vec::new(),
            font_out: defaults::font_out(),
            map_out: defaults::map_out(),
        }
    }
}

impl JobConfig {
    /// Load a job configuration from a YAML file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: JobConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.point_size > 0, "point_size must be positive");
        anyhow::ensure!(
            !self.inputs.is_empty(),
            "at least one corpus input file is required"
        );
        Ok(())
    }

    /// The footer label, defaulted from the language name.
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("{}Font", self.language))
    }

    /// Which outline font the rasterizer should use.
    pub fn font_source(&self) -> FontSource {
        if let Some(ref path) = self.font_file {
            FontSource::File(path.clone())
        } else if let Some(ref family) = self.font_family {
            FontSource::Family(family.clone())
        } else {
            FontSource::Default
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn language() -> String {
        "hindi".to_string()
    }

    pub fn point_size() -> u32 {
        26
    }

    pub fn font_out() -> PathBuf {
        PathBuf::from("data/font.vlw")
    }

    pub fn map_out() -> PathBuf {
        PathBuf::from("data/pua_map.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml_ng as serde_yaml;

    #[test]
    fn minimal_yaml_gets_defaults() {
        let config: JobConfig = serde_yaml::from_str("inputs: [vocab.txt]").unwrap();
        assert_eq!(config.language, "hindi");
        assert_eq!(config.point_size, 26);
        assert_eq!(config.charset, CharacterSetPolicy::Extract);
        assert_eq!(config.label(), "hindiFont");
        assert!(matches!(config.font_source(), FontSource::Default));
    }

    #[test]
    fn fixed_charset_policy_parses() {
        let yaml = "inputs: [a.txt]\ncharset:\n  policy: fixed\n  chars: \"áéíóú\"\n";
        let config: JobConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.charset,
            CharacterSetPolicy::Fixed {
                chars: "áéíóú".to_string()
            }
        );
    }

    #[test]
    fn unknown_charset_policy_is_a_parse_error() {
        let yaml = "inputs: [a.txt]\ncharset:\n  policy: auto\n";
        assert!(serde_yaml::from_str::<JobConfig>(yaml).is_err());
    }

    #[test]
    fn font_file_takes_precedence_over_family() {
        let config = JobConfig {
            font_family: Some("DejaVu Sans".to_string()),
            font_file: Some(PathBuf::from("/fonts/x.ttf")),
            ..JobConfig::default()
        };
        assert!(matches!(config.font_source(), FontSource::File(_)));
    }

    #[test]
    fn validation_requires_inputs() {
        let config = JobConfig::default();
        assert!(config.validate().is_err());
    }
}
