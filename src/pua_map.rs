//! Persistence of the PUA mapping as a tabular CSV file.
//!
//! Consumed by the vocabulary rewrite step (which substitutes cluster
//! text with PUA codepoints in the stored vocabulary) and read back by
//! this compiler to keep assignments stable across runs. Format, one
//! row per slot in codepoint order:
//!
//! ```text
//! pua_codepoint,cluster_text,cluster_codes
//! U+E000,क्ष,U+0915 U+094D U+0937
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

const HEADER: &str = "pua_codepoint,cluster_text,cluster_codes";

/// Write the mapping to `path`, creating parent directories.
pub fn write_map(path: &Path, entries: &[(char, String)]) -> Result<()> {
    let mut out = String::with_capacity(entries.len() * 32 + HEADER.len() + 1);
    out.push_str(HEADER);
    out.push('\n');
    for (cp, text) in entries {
        let codes: Vec<String> = text.chars().map(|c| format!("U+{:04X}", c as u32)).collect();
        out.push_str(&format!(
            "U+{:04X},{},{}\n",
            *cp as u32,
            text,
            codes.join(" ")
        ));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, out).with_context(|| format!("writing PUA map {}", path.display()))?;
    log::info!("Wrote {} PUA assignments to {}", entries.len(), path.display());
    Ok(())
}

/// Load a previously written mapping.
pub fn load_map(path: &Path) -> Result<Vec<(char, String)>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading PUA map {}", path.display()))?;
    let mut entries = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        if lineno == 0 || line.is_empty() {
            // Header row; tolerate trailing blank lines.
            continue;
        }
        let mut fields = line.splitn(3, ',');
        let (Some(code), Some(text)) = (fields.next(), fields.next()) else {
            return Err(anyhow!(
                "{}:{}: malformed PUA map row",
                path.display(),
                lineno + 1
            ));
        };
        let cp = parse_codepoint(code).ok_or_else(|| {
            anyhow!(
                "{}:{}: bad codepoint field {code:?}",
                path.display(),
                lineno + 1
            )
        })?;
        // The third column (constituent codes) is derived; ignore it.
        entries.push((cp, text.to_string()));
    }
    Ok(entries)
}

/// Parse a "U+XXXX" field to a scalar.
fn parse_codepoint(field: &str) -> Option<char> {
    let hex = field.strip_prefix("U+")?;
    let value = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(value)
}
