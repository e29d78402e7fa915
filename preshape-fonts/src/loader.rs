//! Font data ownership and outline-font resolution.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use fontdb::{Database, Family, Query};
use swash::FontRef;

/// Families tried in order when no font is configured.
///
/// Broad-coverage sans faces that ship with common desktop installs;
/// DejaVu and Noto both carry full Devanagari tables.
const DEFAULT_FAMILIES: &[&str] = &[
    "Noto Sans Devanagari",
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
];

/// Stores font data with lifetime management.
///
/// This struct owns the font data bytes and provides a `FontRef` that can be used
/// for glyph lookups and rasterization. The `FontRef` is guaranteed to be valid
/// for the lifetime of this struct.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF)
    pub data: Arc<Vec<u8>>,
    /// Swash font reference for glyph operations
    pub font_ref: FontRef<'static>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData from bytes with a specific face index.
    ///
    /// Needed for TrueType Collection (.ttc) files where multiple font
    /// faces share the same data but have different face indices.
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let data_arc = Arc::new(data);

        // SAFETY: We ensure the data outlives the FontRef by storing it in an Arc.
        // The FontRef will never outlive the FontData struct because they are stored
        // together and dropped together.
        let font_ref = unsafe {
            let bytes = data_arc.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            FontRef::from_index(static_bytes, face_index)?
        };

        Some(FontData {
            data: data_arc,
            font_ref,
        })
    }
}

/// Which outline-font resource to compile with.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// A TTF/OTF file on disk.
    File(PathBuf),
    /// A family name resolved through the system font database.
    Family(String),
    /// First hit from [`DEFAULT_FAMILIES`].
    Default,
}

/// Resolve a font source to owned font data.
pub fn load_font(source: &FontSource) -> Result<FontData> {
    match source {
        FontSource::File(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading font file {}", path.display()))?;
            FontData::new(data)
                .ok_or_else(|| anyhow!("{} is not a parseable font file", path.display()))
        }
        FontSource::Family(name) => {
            let mut db = Database::new();
            db.load_system_fonts();
            log::info!("Loaded {} system fonts", db.len());
            load_family(&db, name)
                .ok_or_else(|| anyhow!("font family '{name}' not found on this system"))
        }
        FontSource::Default => {
            let mut db = Database::new();
            db.load_system_fonts();
            log::info!("Loaded {} system fonts", db.len());
            for name in DEFAULT_FAMILIES {
                if let Some(font) = load_family(&db, name) {
                    log::info!("Using default font family: {name}");
                    return Ok(font);
                }
            }
            Err(anyhow!(
                "no usable default font found; configure a font family or file"
            ))
        }
    }
}

/// Query the database for a family and copy out its face data.
fn load_family(db: &Database, family: &str) -> Option<FontData> {
    let query = Query {
        families: &[Family::Name(family)],
        ..Query::default()
    };
    let id = db.query(&query)?;
    let font = db.with_face_data(id, |data, face_index| {
        FontData::new_with_index(data.to_vec(), face_index as usize)
    })??;
    log::debug!("Loaded font family '{family}' ({} bytes)", font.data.len());
    Some(font)
}
