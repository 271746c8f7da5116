/// Snapshot export for glyphcam : rasterisation logicielle de la grille
/// de glyphes (ab_glyph) et encodage PNG. Fonction pure de
/// (grille, couleurs, taille de police) — aucun état du cœur.

pub mod metrics;
pub mod rasterizer;
pub mod snapshot;

pub use metrics::{GlyphMetrics, load_font_bytes};
pub use rasterizer::Rasterizer;
pub use snapshot::snapshot_to_png;
