use gc_core::config::{
    FONT_SIZE_MAX, FONT_SIZE_MIN, GlyphGeometry, LETTER_SPACING_MAX, LETTER_SPACING_MIN,
    LINE_HEIGHT_MAX, LINE_HEIGHT_MIN, SizeLocks,
};

/// Seuils de suppression : un recalcul dont toutes les dimensions
/// résolues bougent moins que ça est un no-op (anti-oscillation quand
/// l'auto-fit est chaîné à un observer de resize).
pub const EPS_FONT_SIZE: f32 = 0.1;
pub const EPS_LETTER_SPACING: f32 = 0.01;
pub const EPS_LINE_HEIGHT: f32 = 0.01;

/// Zone d'affichage cible, en pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Largeur en px.
    pub w: f32,
    /// Hauteur en px.
    pub h: f32,
}

impl Viewport {
    /// Viewport depuis des dimensions entières.
    #[must_use]
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w: w as f32,
            h: h as f32,
        }
    }
}

/// Largeur d'une cellule : avance naturelle + interlettrage.
///
/// L'avance naturelle d'un glyphe vaut `font_size × aspect`,
/// l'interlettrage `letter_spacing × font_size` (em).
#[inline]
#[must_use]
pub fn cell_width(geometry: &GlyphGeometry, aspect: f32) -> f32 {
    geometry.font_size * aspect + geometry.letter_spacing * geometry.font_size
}

/// Hauteur d'une cellule : `font_size × line_height`.
#[inline]
#[must_use]
pub fn cell_height(geometry: &GlyphGeometry) -> f32 {
    geometry.font_size * geometry.line_height
}

/// Résout {font_size, letter_spacing, line_height} pour que `cols`
/// colonnes couvrent exactement `viewport.w` et `rows` lignes exactement
/// `viewport.h` — ni débordement ni letterbox — en tenant fixes les
/// dimensions verrouillées par l'utilisateur.
///
/// Politique par combinaison de verrous :
/// - `letter_spacing` verrouillé → `font_size` résolu sur la largeur,
///   `font_size = w / (cols × (aspect + letter_spacing))`, puis
///   `line_height` sur la hauteur si libre.
/// - sinon → `font_size` résolu sur la hauteur (l'interligne reste tel
///   quel, la hauteur de cellule dérive de la taille seule), puis
///   `letter_spacing` sur la largeur si libre.
/// - `font_size` verrouillé → seules les deux autres se résolvent,
///   chacune si libre.
/// - tout verrouillé → aucun changement (débordement accepté).
///
/// Chaque dimension est clampée sitôt résolue, sans re-résolution
/// itérative; un clamp peut donc laisser un résidu de débordement ou de
/// letterbox, accepté. Les dimensions suivantes se résolvent contre la
/// taille clampée (visible par l'appelant).
///
/// Suppression epsilon : si toutes les valeurs résolues diffèrent des
/// courantes de moins de (0.1 px, 0.01 em, 0.01), la géométrie d'entrée
/// est retournée inchangée — l'appel est un no-op, donc idempotent.
///
/// # Example
/// ```
/// use gc_core::config::{GlyphGeometry, SizeLocks};
/// use gc_glyph::autofit::{Viewport, autofit, cell_height, cell_width};
///
/// let geom = GlyphGeometry::default();
/// let fitted = autofit(107, 80, Viewport::new(1280, 720), &geom, 0.6, SizeLocks::default());
/// assert!((107.0 * cell_width(&fitted, 0.6) - 1280.0).abs() < 1.0);
/// assert!((80.0 * cell_height(&fitted) - 720.0).abs() < 1.0);
/// ```
#[must_use]
pub fn autofit(
    cols: usize,
    rows: usize,
    viewport: Viewport,
    geometry: &GlyphGeometry,
    aspect: f32,
    locks: SizeLocks,
) -> GlyphGeometry {
    if locks.all() || cols == 0 || rows == 0 || viewport.w <= 0.0 || viewport.h <= 0.0 {
        return geometry.clone();
    }

    let cols_f = cols as f32;
    let rows_f = rows as f32;

    let mut font_size = geometry.font_size;
    let mut letter_spacing = geometry.letter_spacing;
    let mut line_height = geometry.line_height;

    if !locks.font_size {
        font_size = if locks.letter_spacing {
            // Ajustement horizontal : cols × font_size × (aspect + ls) = w.
            let denom = cols_f * (aspect + letter_spacing);
            if denom.abs() > f32::EPSILON {
                viewport.w / denom
            } else {
                font_size
            }
        } else {
            // Ajustement vertical : rows × font_size × line_height = h.
            viewport.h / (rows_f * line_height)
        };
        font_size = font_size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
    }

    if !locks.letter_spacing {
        // cols × (font_size × aspect + ls × font_size) = w.
        letter_spacing = viewport.w / (cols_f * font_size) - aspect;
        letter_spacing = letter_spacing.clamp(LETTER_SPACING_MIN, LETTER_SPACING_MAX);
    }

    if !locks.line_height && (locks.font_size || locks.letter_spacing) {
        // rows × font_size × line_height = h.
        line_height = viewport.h / (rows_f * font_size);
        line_height = line_height.clamp(LINE_HEIGHT_MIN, LINE_HEIGHT_MAX);
    }

    let unchanged = (font_size - geometry.font_size).abs() < EPS_FONT_SIZE
        && (letter_spacing - geometry.letter_spacing).abs() < EPS_LETTER_SPACING
        && (line_height - geometry.line_height).abs() < EPS_LINE_HEIGHT;
    if unchanged {
        return geometry.clone();
    }

    GlyphGeometry {
        font_size,
        letter_spacing,
        line_height,
        font_family: geometry.font_family.clone(),
    }
}
