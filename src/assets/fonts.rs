use std::path::{Path, PathBuf};
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{ReelError, ReelResult};

/// Where a loaded font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The configured font file (directly or found by file name among system fonts).
    Preferred(PathBuf),
    /// A system sans-serif substitute.
    System,
}

/// Raw font bytes ready for shaping and rasterization.
#[derive(Clone)]
pub struct LoadedFont {
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    pub family: String,
    pub origin: FontOrigin,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("origin", &self.origin)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Font used for captions.
#[derive(Clone, Debug)]
pub enum FontFace {
    Loaded(LoadedFont),
    /// No usable font at all: layout uses fixed advances and glyphs are not drawn.
    Builtin,
}

/// Resolve the caption font: preferred file, then system sans-serif, then built-in metrics.
///
/// Never fails; every fallback step is logged.
pub fn resolve_font(preferred: Option<&Path>) -> FontFace {
    let mut system: Option<fontdb::Database> = None;

    if let Some(path) = preferred {
        match load_preferred(path, &mut system) {
            Ok(font) => {
                tracing::debug!(family = %font.family, "using preferred font");
                return FontFace::Loaded(font);
            }
            Err(e) => {
                tracing::warn!(font = %path.display(), error = %e, "preferred font unavailable; falling back");
            }
        }
    }

    let db = system.get_or_insert_with(system_db);
    match load_system_sans(db) {
        Some(font) => {
            tracing::info!(family = %font.family, "using system fallback font");
            FontFace::Loaded(font)
        }
        None => {
            tracing::warn!("no usable system font found; captions will not be drawn");
            FontFace::Builtin
        }
    }
}

fn system_db() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    db
}

fn load_preferred(path: &Path, system: &mut Option<fontdb::Database>) -> ReelResult<LoadedFont> {
    if path.is_file() {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let family = first_family(&bytes).ok_or_else(|| {
            ReelError::validation(format!("'{}' is not a usable font file", path.display()))
        })?;
        return Ok(LoadedFont {
            bytes: Arc::new(bytes),
            index: 0,
            family,
            origin: FontOrigin::Preferred(path.to_path_buf()),
        });
    }

    // Bare names such as `arial.ttf` are looked up among installed fonts by file name.
    let wanted = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReelError::validation("font path has no file name"))?;
    let db = system.get_or_insert_with(system_db);
    let id = db
        .faces()
        .find(|face| {
            let file = match &face.source {
                fontdb::Source::File(p) => Some(p.as_path()),
                fontdb::Source::SharedFile(p, _) => Some(p.as_path()),
                _ => None,
            };
            file.and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(wanted))
        })
        .map(|face| face.id)
        .ok_or_else(|| {
            ReelError::validation(format!("font '{}' not found", path.display()))
        })?;

    face_to_font(db, id, FontOrigin::Preferred(path.to_path_buf())).ok_or_else(|| {
        ReelError::validation(format!("font '{}' could not be loaded", path.display()))
    })
}

fn load_system_sans(db: &fontdb::Database) -> Option<LoadedFont> {
    let families = [fontdb::Family::SansSerif];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    face_to_font(db, id, FontOrigin::System)
}

fn face_to_font(db: &fontdb::Database, id: fontdb::ID, origin: FontOrigin) -> Option<LoadedFont> {
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    Some(LoadedFont {
        bytes: Arc::new(bytes),
        index,
        family,
        origin,
    })
}

fn first_family(bytes: &[u8]) -> Option<String> {
    let mut db = fontdb::Database::new();
    db.load_font_data(bytes.to_vec());
    db.faces()
        .next()
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
