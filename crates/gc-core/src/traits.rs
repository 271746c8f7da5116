use std::sync::Arc;

use crate::frame::{FrameBuffer, GlyphGrid};

/// Taille de référence (px) pour la mesure d'avance des glyphes.
pub const METRICS_REFERENCE_SIZE: f32 = 100.0;

/// Ratio largeur/taille approximatif utilisé quand la police est absente.
pub const FALLBACK_ASPECT: f32 = 0.6;

/// Fournit des frames visuelles au pipeline.
///
/// Implémenté par : `CameraStream`, `TestPatternSource`.
///
/// # Example
/// ```
/// use gc_core::traits::FrameSource;
/// use gc_core::frame::FrameBuffer;
/// use std::sync::Arc;
///
/// struct DummySource;
/// impl FrameSource for DummySource {
///     fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> { None }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait FrameSource: Send + 'static {
    /// Retourne la prochaine frame disponible.
    ///
    /// Retourne `None` si la source est épuisée ou pas encore prête.
    /// Ne bloque JAMAIS au-delà d'une frame de la cadence capteur.
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>>;

    /// Dimensions natives de la source.
    fn native_size(&self) -> (u32, u32);

    /// `true` pour les sources infinies (caméra, procédural).
    fn is_live(&self) -> bool;
}

/// Mesure d'avance de glyphe pour une famille de police.
///
/// `advance_width` peut retourner une approximation (ratio 0.6 × taille)
/// si la famille demandée est indisponible.
pub trait FontMetrics {
    /// Largeur d'avance d'un glyphe représentatif à `reference_size` px.
    fn advance_width(&self, family: &str, reference_size: f32) -> f32;
}

/// Ratio largeur/taille d'un glyphe pour la famille donnée.
///
/// # Example
/// ```
/// use gc_core::traits::{FixedMetrics, glyph_aspect_ratio};
/// let metrics = FixedMetrics::default();
/// assert!((glyph_aspect_ratio(&metrics, "monospace") - 0.6).abs() < 0.001);
/// ```
#[must_use]
pub fn glyph_aspect_ratio(metrics: &dyn FontMetrics, family: &str) -> f32 {
    metrics.advance_width(family, METRICS_REFERENCE_SIZE) / METRICS_REFERENCE_SIZE
}

/// Provider de métriques à ratio constant — le fallback sans police.
#[derive(Clone, Copy, Debug)]
pub struct FixedMetrics(pub f32);

impl Default for FixedMetrics {
    fn default() -> Self {
        Self(FALLBACK_ASPECT)
    }
}

impl FontMetrics for FixedMetrics {
    fn advance_width(&self, _family: &str, reference_size: f32) -> f32 {
        self.0 * reference_size
    }
}

/// Descripteur de style accompagnant la grille vers le sink d'affichage.
#[derive(Clone, Debug)]
pub struct StyleDescriptor {
    /// Famille de police.
    pub font_family: String,
    /// Taille en px.
    pub font_size: f32,
    /// Interlettrage en em.
    pub letter_spacing: f32,
    /// Interligne sans unité.
    pub line_height: f32,
    /// Couleur d'encre.
    pub fg: (u8, u8, u8),
    /// Couleur de fond.
    pub bg: (u8, u8, u8),
}

/// Accepte une grille de glyphes et l'affiche. Aucune logique du cœur
/// ne dépend de la façon dont le rendu est réalisé.
pub trait DisplaySink {
    /// Présente la grille avec le style donné.
    ///
    /// # Errors
    /// Retourne une erreur si le sink n'est pas prêt; l'appelant saute
    /// le tick sans faire remonter l'échec.
    fn present(&mut self, grid: &GlyphGrid, style: &StyleDescriptor) -> anyhow::Result<()>;
}
