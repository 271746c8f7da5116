use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use gc_core::frame::{FrameBuffer, GlyphGrid};

use crate::rasterizer::Rasterizer;

/// Rasterise la grille courante et l'écrit en PNG horodaté dans
/// `out_dir`. Fonction pure de (grille, couleurs, taille de police) —
/// aucune dépendance à l'état du pipeline.
///
/// # Errors
/// Échoue si la grille est vide, la police invalide, ou l'écriture
/// impossible. L'appelant affiche l'erreur sans jamais interrompre les
/// ticks suivants.
pub fn snapshot_to_png(
    grid: &GlyphGrid,
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
    font_size: f32,
    font_data: &[u8],
    out_dir: &Path,
) -> Result<PathBuf> {
    if grid.is_empty() {
        bail!("Grille vide — rien à exporter");
    }

    let rasterizer = Rasterizer::new(font_data, font_size.max(4.0))?;
    let (w, h) = rasterizer.target_dimensions(grid);
    let mut fb = FrameBuffer::new(w, h);
    rasterizer.render_into(grid, fg, bg, &mut fb);

    let img = image::RgbaImage::from_raw(w, h, fb.data)
        .context("Buffer rasterisé de taille inattendue")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Impossible de créer {}", out_dir.display()))?;
    let name = format!(
        "glyphcam_{}.png",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = out_dir.join(name);
    img.save(&path)
        .with_context(|| format!("Écriture PNG {}", path.display()))?;

    log::info!("Snapshot exporté : {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_refuses_export() {
        let dir = tempfile::tempdir().unwrap();
        let grid = GlyphGrid::empty();
        let result = snapshot_to_png(
            &grid,
            (255, 255, 255),
            (0, 0, 0),
            16.0,
            &[0u8; 8],
            dir.path(),
        );
        assert!(result.is_err());
    }
}
