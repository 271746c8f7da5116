use gc_core::config::RenderConfig;
use gc_core::error::ConvertError;
use gc_core::frame::{FrameBuffer, GlyphGrid};
use gc_core::ramp::RampLut;

use crate::adjust;

/// Dimensions de la grille pour une frame et un pas donnés.
///
/// # Example
/// ```
/// use gc_glyph::convert::grid_dims;
/// assert_eq!(grid_dims(12, 12, 6), (2, 2));
/// assert_eq!(grid_dims(10, 4, 6), (1, 0)); // dégénéré mais valide
/// ```
#[must_use]
pub fn grid_dims(frame_w: u32, frame_h: u32, sample_step: u32) -> (usize, usize) {
    let step = sample_step.max(1);
    ((frame_w / step) as usize, (frame_h / step) as usize)
}

/// Convertisseur frame→grille. Garde la LUT de rampe en cache et la
/// reconstruit uniquement quand la rampe change.
///
/// # Example
/// ```
/// use gc_core::config::RenderConfig;
/// use gc_core::frame::{FrameBuffer, GlyphGrid};
/// use gc_glyph::convert::Converter;
///
/// let mut converter = Converter::new(" .:#@");
/// let frame = FrameBuffer::new(16, 16);
/// let mut grid = GlyphGrid::empty();
/// let config = RenderConfig::default();
/// converter.convert_into(&frame, &config, &mut grid).unwrap();
/// assert_eq!((grid.cols, grid.rows), (2, 2));
/// ```
pub struct Converter {
    lut: RampLut,
    current_ramp: String,
}

impl Converter {
    /// Create a converter for the given ramp.
    #[must_use]
    pub fn new(ramp: &str) -> Self {
        Self {
            lut: RampLut::new(ramp),
            current_ramp: ramp.to_string(),
        }
    }

    /// Rebuild the LUT if the ramp has changed.
    pub fn update_if_needed(&mut self, ramp: &str) {
        if self.current_ramp != ramp {
            self.lut = RampLut::new(ramp);
            self.current_ramp = ramp.to_string();
        }
    }

    /// Convertit une frame en grille de glyphes sous la config active.
    ///
    /// Échantillonnage au plus proche : la cellule (x, y) lit le pixel
    /// `(x·step, y·step)` — colonne miroir `width-1-x·step` si `mirror` —
    /// applique la chaîne d'ajustement, calcule la luminance BT.601,
    /// l'inverse éventuellement, et indexe la rampe.
    ///
    /// La grille est redimensionnée puis chaque cellule écrasée; le
    /// buffer est réutilisé mais l'observateur ne voit le résultat
    /// qu'après le retour — jamais de grille partielle. Hot path :
    /// O(cellules), aucune allocation par pixel.
    ///
    /// # Errors
    /// [`ConvertError::DegenerateFrame`] si la frame n'a aucun pixel —
    /// l'appelant saute le tick au lieu d'émettre une grille malformée.
    /// Un `sample_step` plus grand qu'une dimension produit une grille
    /// vide 0×N ou N×0, résultat dégénéré mais valide (pas une erreur).
    pub fn convert_into(
        &mut self,
        frame: &FrameBuffer,
        config: &RenderConfig,
        grid: &mut GlyphGrid,
    ) -> Result<(), ConvertError> {
        if frame.is_degenerate() {
            return Err(ConvertError::DegenerateFrame);
        }

        self.update_if_needed(&config.glyph_ramp);

        let step = config.sample_step.max(1);
        let (cols, rows) = grid_dims(frame.width, frame.height, step);
        grid.resize(cols, rows);
        if grid.is_empty() {
            return Ok(());
        }

        let neutral_adjust = !config.grayscale
            && (config.contrast - 100.0).abs() < f32::EPSILON
            && (config.brightness - 100.0).abs() < f32::EPSILON
            && (config.saturation - 100.0).abs() < f32::EPSILON;

        for y in 0..rows {
            let sy = y as u32 * step;
            for x in 0..cols {
                let sx = if config.mirror {
                    frame.width - 1 - x as u32 * step
                } else {
                    x as u32 * step
                };

                let (r, g, b, _) = frame.pixel(sx, sy);
                let (r, g, b) = if neutral_adjust {
                    (r, g, b)
                } else {
                    adjust::apply_chain(r, g, b, config)
                };

                let mut lum = adjust::luminance(r, g, b);
                if config.invert {
                    lum = 255 - lum;
                }

                grid.set(x, y, self.lut.map(lum));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame unie d'une seule couleur RGBA.
    fn solid_frame(w: u32, h: u32, rgba: (u8, u8, u8, u8)) -> FrameBuffer {
        let mut frame = FrameBuffer::new(w, h);
        for px in frame.data.chunks_exact_mut(4) {
            px[0] = rgba.0;
            px[1] = rgba.1;
            px[2] = rgba.2;
            px[3] = rgba.3;
        }
        frame
    }

    fn set_pixel(frame: &mut FrameBuffer, x: u32, y: u32, rgba: (u8, u8, u8, u8)) {
        let idx = ((y * frame.width + x) * 4) as usize;
        frame.data[idx] = rgba.0;
        frame.data[idx + 1] = rgba.1;
        frame.data[idx + 2] = rgba.2;
        frame.data[idx + 3] = rgba.3;
    }

    #[test]
    fn two_by_two_scenario() {
        // Source 12×12, pas 6 → grille 2×2; blanc en haut-gauche, noir
        // ailleurs, rampe " #" : rangée 0 = "# ", rangée 1 = "  ".
        let mut frame = solid_frame(12, 12, (0, 0, 0, 255));
        set_pixel(&mut frame, 0, 0, (255, 255, 255, 255));

        let mut config = RenderConfig::default();
        config.try_set_ramp(" #").unwrap();
        config.sample_step = 6;

        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::empty();
        converter.convert_into(&frame, &config, &mut grid).unwrap();

        assert_eq!((grid.cols, grid.rows), (2, 2));
        assert_eq!(grid.to_text(), "# \n  \n");
    }

    #[test]
    fn extremes_hit_ramp_ends() {
        let ramp = " .:#@";
        let mut config = RenderConfig::default();
        config.try_set_ramp(ramp).unwrap();
        config.sample_step = 1;
        let mut converter = Converter::new(ramp);
        let mut grid = GlyphGrid::empty();

        let white = solid_frame(4, 4, (255, 255, 255, 255));
        converter.convert_into(&white, &config, &mut grid).unwrap();
        assert!(grid.cells.iter().all(|&c| c == '@'));

        let black = solid_frame(4, 4, (0, 0, 0, 255));
        converter.convert_into(&black, &config, &mut grid).unwrap();
        assert!(grid.cells.iter().all(|&c| c == ' '));
    }

    #[test]
    fn invert_swaps_extremes() {
        let ramp = " .:#@";
        let mut config = RenderConfig::default();
        config.try_set_ramp(ramp).unwrap();
        config.sample_step = 1;
        config.invert = true;
        let mut converter = Converter::new(ramp);
        let mut grid = GlyphGrid::empty();

        let white = solid_frame(4, 4, (255, 255, 255, 255));
        converter.convert_into(&white, &config, &mut grid).unwrap();
        assert!(grid.cells.iter().all(|&c| c == ' '));

        let black = solid_frame(4, 4, (0, 0, 0, 255));
        converter.convert_into(&black, &config, &mut grid).unwrap();
        assert!(grid.cells.iter().all(|&c| c == '@'));
    }

    #[test]
    fn grid_dims_follow_floor_division() {
        for (w, h, step) in [(640, 480, 8), (641, 481, 8), (12, 12, 5), (100, 7, 7)] {
            let frame = solid_frame(w, h, (10, 10, 10, 255));
            let config = RenderConfig {
                sample_step: step,
                ..RenderConfig::default()
            };
            let mut converter = Converter::new(&config.glyph_ramp);
            let mut grid = GlyphGrid::empty();
            converter.convert_into(&frame, &config, &mut grid).unwrap();
            assert_eq!(grid.cols, (w / step) as usize);
            assert_eq!(grid.rows, (h / step) as usize);
        }
    }

    #[test]
    fn ramp_index_always_in_bounds() {
        // Gradient complet, chaque rampe : l'index émis reste dans la rampe.
        let mut frame = FrameBuffer::new(16, 16);
        for y in 0..16u32 {
            for x in 0..16u32 {
                let v = (y * 16 + x) as u8;
                set_pixel(&mut frame, x, y, (v, v.wrapping_mul(3), 255 - v, 255));
            }
        }
        for ramp in gc_core::ramp::RAMP_PRESETS {
            let chars: Vec<char> = ramp.chars().collect();
            let mut config = RenderConfig::default();
            config.try_set_ramp(ramp).unwrap();
            config.sample_step = 1;
            let mut converter = Converter::new(ramp);
            let mut grid = GlyphGrid::empty();
            converter.convert_into(&frame, &config, &mut grid).unwrap();
            assert!(grid.cells.iter().all(|c| chars.contains(c)));
        }
    }

    #[test]
    fn degenerate_frame_is_an_error() {
        let frame = FrameBuffer::new(0, 0);
        let config = RenderConfig {
            sample_step: 1,
            ..RenderConfig::default()
        };
        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::empty();
        assert_eq!(
            converter.convert_into(&frame, &config, &mut grid),
            Err(ConvertError::DegenerateFrame)
        );
    }

    #[test]
    fn oversized_step_yields_valid_empty_grid() {
        let frame = solid_frame(4, 4, (128, 128, 128, 255));
        let config = RenderConfig {
            sample_step: 64,
            ..RenderConfig::default()
        };
        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::new(3, 3);
        converter.convert_into(&frame, &config, &mut grid).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.to_text(), "");
    }

    #[test]
    fn mirror_flips_columns() {
        // Moitié gauche blanche, moitié droite noire.
        let mut frame = solid_frame(8, 4, (0, 0, 0, 255));
        for y in 0..4 {
            for x in 0..4 {
                set_pixel(&mut frame, x, y, (255, 255, 255, 255));
            }
        }
        let mut config = RenderConfig::default();
        config.try_set_ramp(" #").unwrap();
        config.sample_step = 4;

        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::empty();
        converter.convert_into(&frame, &config, &mut grid).unwrap();
        assert_eq!(grid.to_text(), "# \n");

        config.mirror = true;
        converter.convert_into(&frame, &config, &mut grid).unwrap();
        assert_eq!(grid.to_text(), " #\n");
    }

    #[test]
    fn ramp_change_refreshes_lut() {
        let frame = solid_frame(4, 4, (255, 255, 255, 255));
        let mut config = RenderConfig::default();
        config.try_set_ramp(" #").unwrap();
        config.sample_step = 1;
        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::empty();
        converter.convert_into(&frame, &config, &mut grid).unwrap();
        assert_eq!(grid.get(0, 0), '#');

        config.try_set_ramp(" .@").unwrap();
        converter.convert_into(&frame, &config, &mut grid).unwrap();
        assert_eq!(grid.get(0, 0), '@');
    }

    #[test]
    fn full_rewrite_leaves_no_stale_cells() {
        let mut config = RenderConfig::default();
        config.try_set_ramp(" #").unwrap();
        config.sample_step = 1;
        let mut converter = Converter::new(&config.glyph_ramp);
        let mut grid = GlyphGrid::empty();

        let white = solid_frame(4, 4, (255, 255, 255, 255));
        converter.convert_into(&white, &config, &mut grid).unwrap();
        let black = solid_frame(4, 4, (0, 0, 0, 255));
        converter.convert_into(&black, &config, &mut grid).unwrap();
        assert!(grid.cells.iter().all(|&c| c == ' '));
    }
}
