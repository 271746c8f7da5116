use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale};
use anyhow::{Context, Result};
use gc_core::traits::FontMetrics;

/// Emplacements usuels d'une police monospace, sondés quand l'utilisateur
/// n'a pas fourni `--font`.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/firacode/FiraCode-Regular.ttf",
];

/// Charge les bytes d'une police : chemin explicite d'abord, sinon les
/// emplacements usuels. `None` si rien n'est trouvé — l'appelant retombe
/// sur le ratio approximatif et désactive l'export.
#[must_use]
pub fn load_font_bytes(explicit: Option<&Path>) -> Option<(PathBuf, Vec<u8>)> {
    let candidates: Vec<PathBuf> = explicit.map_or_else(
        || FONT_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
        |p| vec![p.to_path_buf()],
    );

    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Police chargée : {}", path.display());
                return Some((path, bytes));
            }
            Err(e) if explicit.is_some() => {
                log::warn!("Police illisible {} : {e}", path.display());
            }
            Err(_) => {}
        }
    }
    log::info!("Aucune police trouvée — ratio d'avance approximatif, export désactivé");
    None
}

/// Provider de métriques réelles : mesure l'avance du glyphe 'M' dans la
/// police chargée. La famille demandée est ignorée — une seule police est
/// chargée à la fois, et le fallback 0.6 couvre son absence.
pub struct GlyphMetrics {
    font: FontVec,
}

impl GlyphMetrics {
    /// Parse la police depuis ses bytes.
    ///
    /// # Errors
    /// Returns an error if the data is not a valid font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        Ok(Self { font })
    }
}

impl FontMetrics for GlyphMetrics {
    fn advance_width(&self, _family: &str, reference_size: f32) -> f32 {
        let scale = PxScale::from(reference_size);
        let gid = self.font.glyph_id('M');
        self.font.h_advance_unscaled(gid) * scale.x / self.font.height_unscaled()
    }
}
