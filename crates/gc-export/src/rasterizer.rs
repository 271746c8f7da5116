use std::collections::HashMap;

use ab_glyph::{Font, FontRef, PxScale, point};
use gc_core::frame::{FrameBuffer, GlyphGrid};
use rayon::prelude::*;

/// Rasterise une `GlyphGrid` en pixels RGBA. Atlas alpha pré-calculé à
/// l'init pour éliminer tout coût de rasterisation par frame.
///
/// L'encre et le fond sont uniformes : la grille ne porte que des
/// caractères, les couleurs viennent du descripteur de style.
pub struct Rasterizer {
    cell_width: u32,
    cell_height: u32,
    /// Alpha 1D par caractère (taille = cell_width × cell_height).
    glyph_cache: HashMap<char, Vec<u8>>,
    /// Glyphe vide partagé pour les caractères hors atlas.
    empty_glyph: Vec<u8>,
}

impl Rasterizer {
    /// Construit l'atlas pour l'ASCII imprimable et les blocs Unicode
    /// utilisés par les rampes built-in.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn new(font_data: &[u8], scale_px: f32) -> anyhow::Result<Self> {
        let font = FontRef::try_from_slice(font_data)?;
        let scale = PxScale::from(scale_px);

        let v_advance = font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        let cell_height = ((v_advance * scale.y / font.height_unscaled()).ceil() as u32).max(1);

        let m_glyph = font.glyph_id('M');
        let h_advance = font.h_advance_unscaled(m_glyph);
        let cell_width = ((h_advance * scale.x / font.height_unscaled()).ceil() as u32).max(1);

        let mut rasterizer = Self {
            cell_width,
            cell_height,
            glyph_cache: HashMap::new(),
            empty_glyph: vec![0u8; (cell_width * cell_height) as usize],
        };

        rasterizer.cache_range(&font, scale, 32..=126);
        // Blocs et ombres Unicode (rampes Blocks/Minimal)
        rasterizer.cache_range(&font, scale, 0x2580..=0x259F);

        Ok(rasterizer)
    }

    fn cache_range(&mut self, font: &FontRef, scale: PxScale, range: std::ops::RangeInclusive<u32>) {
        for codepoint in range {
            let Some(ch) = std::char::from_u32(codepoint) else {
                continue;
            };
            // Les caractères absents de la police (glyph_id 0 = .notdef)
            // restent hors atlas et se rendent vides.
            let gid = font.glyph_id(ch);
            if gid.0 == 0 {
                continue;
            }

            let mut buffer = vec![0u8; (self.cell_width * self.cell_height) as usize];
            let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
            let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));

            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                #[allow(clippy::cast_possible_wrap)]
                outline.draw(|x, y, v| {
                    let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
                    let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
                    if px < self.cell_width && py < self.cell_height {
                        let idx = (py * self.cell_width + px) as usize;
                        if idx < buffer.len() {
                            buffer[idx] = (v * 255.0).round() as u8;
                        }
                    }
                });
            }
            self.glyph_cache.insert(ch, buffer);
        }
    }

    /// Dimensions du buffer de sortie pour une grille donnée.
    #[must_use]
    pub fn target_dimensions(&self, grid: &GlyphGrid) -> (u32, u32) {
        (
            grid.cols as u32 * self.cell_width,
            grid.rows as u32 * self.cell_height,
        )
    }

    /// Rendu de la grille dans le FrameBuffer, encre/fond uniformes.
    /// Parallélisé par bande de lignes de cellules.
    pub fn render_into(
        &self,
        grid: &GlyphGrid,
        fg: (u8, u8, u8),
        bg: (u8, u8, u8),
        fb: &mut FrameBuffer,
    ) {
        let (expected_w, expected_h) = self.target_dimensions(grid);
        if fb.width != expected_w || fb.height != expected_h {
            log::error!(
                "Dimensions rasterizer : fb={}×{} attendu={}×{}",
                fb.width,
                fb.height,
                expected_w,
                expected_h
            );
            return;
        }
        if grid.is_empty() {
            return;
        }

        let empty_glyph = &self.empty_glyph;
        let stride = (expected_w * 4) as usize;
        let band_size = stride * self.cell_height as usize;

        fb.data
            .par_chunks_exact_mut(band_size)
            .enumerate()
            .for_each(|(gy, band)| {
                for gx in 0..grid.cols {
                    let ch = grid.get(gx, gy);
                    let alpha_map = self.glyph_cache.get(&ch).unwrap_or(empty_glyph);
                    let cx_start = gx * self.cell_width as usize;

                    for cy in 0..(self.cell_height as usize) {
                        let fb_y_offset = cy * stride;
                        for cx in 0..(self.cell_width as usize) {
                            let alpha = alpha_map[cy * self.cell_width as usize + cx];
                            let alpha_f = f32::from(alpha) / 255.0;

                            let r =
                                (f32::from(fg.0) * alpha_f + f32::from(bg.0) * (1.0 - alpha_f))
                                    as u8;
                            let g =
                                (f32::from(fg.1) * alpha_f + f32::from(bg.1) * (1.0 - alpha_f))
                                    as u8;
                            let b =
                                (f32::from(fg.2) * alpha_f + f32::from(bg.2) * (1.0 - alpha_f))
                                    as u8;

                            let px_idx = fb_y_offset + (cx_start + cx) * 4;
                            band[px_idx] = r;
                            band[px_idx + 1] = g;
                            band[px_idx + 2] = b;
                            band[px_idx + 3] = 255;
                        }
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_data_is_an_error() {
        assert!(Rasterizer::new(&[0u8; 32], 16.0).is_err());
    }
}
