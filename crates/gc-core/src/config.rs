use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ramp;

/// Bornes de la géométrie glyphe, partagées par le clamp, l'auto-fit et
/// le randomizer.
pub const FONT_SIZE_MIN: f32 = 4.0;
pub const FONT_SIZE_MAX: f32 = 128.0;
pub const LETTER_SPACING_MIN: f32 = -2.0;
pub const LETTER_SPACING_MAX: f32 = 8.0;
pub const LINE_HEIGHT_MIN: f32 = 0.5;
pub const LINE_HEIGHT_MAX: f32 = 3.0;

/// Plage slider des ajustements couleur, en pourcents (100 = neutre).
/// Les valeurs au-delà restent acceptées à la main — seul le canal
/// couleur [0,255] borne réellement l'effet.
pub const ADJUST_SLIDER_MIN: f32 = 0.0;
pub const ADJUST_SLIDER_MAX: f32 = 200.0;

/// Plage slider du pas d'échantillonnage.
pub const SAMPLE_STEP_MIN: u32 = 1;
pub const SAMPLE_STEP_MAX: u32 = 64;

/// Familles de polices proposées (énumération du randomizer; le provider
/// de métriques retombe sur un ratio fixe si la famille est absente).
pub const FONT_FAMILIES: &[&str] = &[
    "monospace",
    "Fira Code",
    "JetBrains Mono",
    "Cascadia Mono",
    "IBM Plex Mono",
];

/// Géométrie des glyphes rendus : taille, interlettrage, interligne.
///
/// # Example
/// ```
/// use gc_core::config::GlyphGeometry;
/// let geom = GlyphGeometry::default();
/// assert!((geom.line_height - 1.2).abs() < f32::EPSILON);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GlyphGeometry {
    /// Taille de police en pixels.
    pub font_size: f32,
    /// Interlettrage en em (relatif à `font_size`).
    pub letter_spacing: f32,
    /// Interligne sans unité (multiplicateur de `font_size`).
    pub line_height: f32,
    /// Famille de police demandée au provider de métriques.
    pub font_family: String,
}

impl Default for GlyphGeometry {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            letter_spacing: 0.0,
            line_height: 1.2,
            font_family: "monospace".to_string(),
        }
    }
}

/// Verrous par dimension : une dimension verrouillée a été fixée à la
/// main (ou par le randomizer) et l'auto-fit ne doit plus l'écraser.
///
/// Posés au seul endroit où les éditions utilisateur sont acceptées;
/// effacés uniquement par le reset complet des réglages.
///
/// # Example
/// ```
/// use gc_core::config::SizeLocks;
/// let mut locks = SizeLocks::default();
/// assert!(!locks.any());
/// locks.font_size = true;
/// assert!(locks.any());
/// locks.clear();
/// assert!(!locks.any());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SizeLocks {
    /// `font_size` fixé manuellement.
    pub font_size: bool,
    /// `letter_spacing` fixé manuellement.
    pub letter_spacing: bool,
    /// `line_height` fixé manuellement.
    pub line_height: bool,
}

impl SizeLocks {
    /// `true` si au moins une dimension est verrouillée.
    #[must_use]
    pub fn any(&self) -> bool {
        self.font_size || self.letter_spacing || self.line_height
    }

    /// `true` si les trois dimensions sont verrouillées.
    #[must_use]
    pub fn all(&self) -> bool {
        self.font_size && self.letter_spacing && self.line_height
    }

    /// Efface tous les verrous (reset complet uniquement).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Configuration complète du rendu, persistée en TOML.
///
/// Chaque champ a une valeur par défaut saine. Lue à chaque tick via
/// arc-swap — les écritures remplacent l'objet entier, jamais de lecture
/// déchirée.
///
/// # Example
/// ```
/// use gc_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.target_fps, 60);
/// assert_eq!(config.sample_step, 8);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RenderConfig {
    // === Rampe ===
    /// Rampe de glyphes, du plus sombre au plus dense. Invariant:
    /// jamais moins de 2 caractères — les éditions utilisateur passent
    /// par `try_set_ramp`, qui refuse et conserve la rampe précédente.
    pub glyph_ramp: String,
    /// Index du preset actif parmi les rampes built-in.
    pub ramp_index: usize,
    /// Inverser le parcours de la rampe (fond clair).
    pub invert: bool,

    // === Échantillonnage ===
    /// Une cellule couvre un bloc `sample_step × sample_step` de pixels.
    pub sample_step: u32,
    /// Miroir horizontal de la source.
    pub mirror: bool,

    // === Ajustements couleur (pourcents, 100 = neutre) ===
    /// Contraste linéaire autour du gris moyen.
    pub contrast: f32,
    /// Multiplicateur de luminosité par canal.
    pub brightness: f32,
    /// Saturation : interpolation vers la luminance.
    pub saturation: f32,
    /// Réduction en niveaux de gris.
    pub grayscale: bool,

    // === Géométrie glyphe ===
    /// Taille / interlettrage / interligne / famille.
    pub geometry: GlyphGeometry,
    /// Verrous auto-fit par dimension.
    pub locks: SizeLocks,

    // === Style ===
    /// Couleur d'encre (RGB).
    pub fg_color: (u8, u8, u8),
    /// Couleur de fond (RGB).
    pub bg_color: (u8, u8, u8),

    // === Viewport cible de l'auto-fit (pixels) ===
    /// Largeur du viewport que la grille doit exactement couvrir.
    pub viewport_w: u32,
    /// Hauteur du viewport que la grille doit exactement couvrir.
    pub viewport_h: u32,

    // === Performance ===
    /// Cadence cible de l'horloge de rafraîchissement.
    pub target_fps: u32,

    // === UI ===
    /// Afficher la sidebar de contrôles.
    pub show_sidebar: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyph_ramp: ramp::RAMP_COMPACT.to_string(),
            ramp_index: 0,
            invert: false,
            sample_step: 8,
            mirror: false,
            contrast: 100.0,
            brightness: 100.0,
            saturation: 100.0,
            grayscale: false,
            geometry: GlyphGeometry::default(),
            locks: SizeLocks::default(),
            fg_color: (220, 220, 220),
            bg_color: (16, 16, 16),
            viewport_w: 1280,
            viewport_h: 720,
            target_fps: 60,
            show_sidebar: true,
        }
    }
}

impl RenderConfig {
    /// Remplace la rampe après validation.
    ///
    /// # Errors
    /// [`CoreError::InvalidRamp`] si la rampe a moins de 2 caractères;
    /// la rampe précédente est conservée telle quelle.
    ///
    /// # Example
    /// ```
    /// use gc_core::config::RenderConfig;
    /// let mut config = RenderConfig::default();
    /// let before = config.glyph_ramp.clone();
    /// assert!(config.try_set_ramp("").is_err());
    /// assert_eq!(config.glyph_ramp, before);
    /// assert!(config.try_set_ramp(" #").is_ok());
    /// assert_eq!(config.glyph_ramp, " #");
    /// ```
    pub fn try_set_ramp(&mut self, ramp: &str) -> Result<(), CoreError> {
        ramp::validate(ramp)?;
        self.glyph_ramp = ramp.to_string();
        Ok(())
    }

    /// Sélectionne un preset de rampe par index (modulo le nombre de presets).
    pub fn select_ramp_preset(&mut self, index: usize) {
        let index = index % ramp::RAMP_PRESETS.len();
        self.ramp_index = index;
        self.glyph_ramp = ramp::RAMP_PRESETS[index].to_string();
    }

    /// Reset complet : valeurs par défaut, verrous effacés.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clamp all numeric fields to their valid ranges and repair an
    /// invalid ramp. Called after TOML deserialization.
    pub fn clamp_all(&mut self) {
        if ramp::validate(&self.glyph_ramp).is_err() {
            self.glyph_ramp = ramp::RAMP_PRESETS[0].to_string();
            self.ramp_index = 0;
        }
        self.ramp_index = self.ramp_index.min(ramp::RAMP_PRESETS.len() - 1);
        self.sample_step = self.sample_step.clamp(SAMPLE_STEP_MIN, SAMPLE_STEP_MAX);
        // Les pourcents n'ont pas de plafond — seul le canal [0,255] borne.
        self.contrast = self.contrast.max(0.0);
        self.brightness = self.brightness.max(0.0);
        self.saturation = self.saturation.max(0.0);
        self.geometry.font_size = self.geometry.font_size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        self.geometry.letter_spacing = self
            .geometry
            .letter_spacing
            .clamp(LETTER_SPACING_MIN, LETTER_SPACING_MAX);
        self.geometry.line_height = self
            .geometry
            .line_height
            .clamp(LINE_HEIGHT_MIN, LINE_HEIGHT_MAX);
        self.viewport_w = self.viewport_w.clamp(16, 16_384);
        self.viewport_h = self.viewport_h.clamp(16, 16_384);
        self.target_fps = self.target_fps.clamp(15, 120);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs
/// optionnelles (override partiel des défauts).
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    geometry: Option<GeometrySection>,
}

/// Render section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct RenderSection {
    glyph_ramp: Option<String>,
    ramp_index: Option<usize>,
    invert: Option<bool>,
    sample_step: Option<u32>,
    mirror: Option<bool>,
    contrast: Option<f32>,
    brightness: Option<f32>,
    saturation: Option<f32>,
    grayscale: Option<bool>,
    fg_color: Option<(u8, u8, u8)>,
    bg_color: Option<(u8, u8, u8)>,
    viewport_w: Option<u32>,
    viewport_h: Option<u32>,
    target_fps: Option<u32>,
    show_sidebar: Option<bool>,
}

/// Geometry section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct GeometrySection {
    font_size: Option<f32>,
    letter_spacing: Option<f32>,
    line_height: Option<f32>,
    font_family: Option<String>,
    locks: Option<SizeLocks>,
}

/// Miroir sérialisable du couple de sections, pour la sauvegarde.
#[derive(Serialize)]
struct SaveFile<'a> {
    render: SaveRender<'a>,
    geometry: SaveGeometry<'a>,
}

#[derive(Serialize)]
struct SaveRender<'a> {
    glyph_ramp: &'a str,
    ramp_index: usize,
    invert: bool,
    sample_step: u32,
    mirror: bool,
    contrast: f32,
    brightness: f32,
    saturation: f32,
    grayscale: bool,
    fg_color: (u8, u8, u8),
    bg_color: (u8, u8, u8),
    viewport_w: u32,
    viewport_h: u32,
    target_fps: u32,
    show_sidebar: bool,
}

#[derive(Serialize)]
struct SaveGeometry<'a> {
    font_size: f32,
    letter_spacing: f32,
    line_height: f32,
    font_family: &'a str,
    locks: SizeLocks,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.glyph_ramp {
            config.glyph_ramp = v;
        }
        if let Some(v) = r.ramp_index {
            config.ramp_index = v;
        }
        if let Some(v) = r.invert {
            config.invert = v;
        }
        if let Some(v) = r.sample_step {
            config.sample_step = v;
        }
        if let Some(v) = r.mirror {
            config.mirror = v;
        }
        if let Some(v) = r.contrast {
            config.contrast = v;
        }
        if let Some(v) = r.brightness {
            config.brightness = v;
        }
        if let Some(v) = r.saturation {
            config.saturation = v;
        }
        if let Some(v) = r.grayscale {
            config.grayscale = v;
        }
        if let Some(v) = r.fg_color {
            config.fg_color = v;
        }
        if let Some(v) = r.bg_color {
            config.bg_color = v;
        }
        if let Some(v) = r.viewport_w {
            config.viewport_w = v;
        }
        if let Some(v) = r.viewport_h {
            config.viewport_h = v;
        }
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = r.show_sidebar {
            config.show_sidebar = v;
        }
    }

    if let Some(g) = file.geometry {
        if let Some(v) = g.font_size {
            config.geometry.font_size = v;
        }
        if let Some(v) = g.letter_spacing {
            config.geometry.letter_spacing = v;
        }
        if let Some(v) = g.line_height {
            config.geometry.line_height = v;
        }
        if let Some(v) = g.font_family {
            config.geometry.font_family = v;
        }
        if let Some(v) = g.locks {
            config.locks = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge la config, ou retombe sur les défauts sans jamais faire
/// échouer le démarrage (fichier absent ou corrompu → warn + défauts).
#[must_use]
pub fn load_or_default(path: &Path) -> RenderConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!(
                "Config illisible ({}), utilisation des défauts : {e:#}",
                path.display()
            );
            RenderConfig::default()
        }
    }
}

/// Sauvegarde la config en TOML (appelée à chaque changement accepté).
///
/// # Errors
/// Returns an error if serialization or the filesystem write fails.
pub fn save_config(path: &Path, config: &RenderConfig) -> Result<()> {
    let file = SaveFile {
        render: SaveRender {
            glyph_ramp: &config.glyph_ramp,
            ramp_index: config.ramp_index,
            invert: config.invert,
            sample_step: config.sample_step,
            mirror: config.mirror,
            contrast: config.contrast,
            brightness: config.brightness,
            saturation: config.saturation,
            grayscale: config.grayscale,
            fg_color: config.fg_color,
            bg_color: config.bg_color,
            viewport_w: config.viewport_w,
            viewport_h: config.viewport_h,
            target_fps: config.target_fps,
            show_sidebar: config.show_sidebar,
        },
        geometry: SaveGeometry {
            font_size: config.geometry.font_size,
            letter_spacing: config.geometry.letter_spacing,
            line_height: config.geometry.line_height,
            font_family: &config.geometry.font_family,
            locks: config.locks,
        },
    };
    let content = toml::to_string_pretty(&file).context("Sérialisation TOML")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_all_repairs_ranges() {
        let mut config = RenderConfig {
            sample_step: 0,
            contrast: -50.0,
            target_fps: 1,
            geometry: GlyphGeometry {
                font_size: 9999.0,
                line_height: 0.0,
                letter_spacing: -100.0,
                ..GlyphGeometry::default()
            },
            ..RenderConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.sample_step, SAMPLE_STEP_MIN);
        assert!((config.contrast - 0.0).abs() < f32::EPSILON);
        assert!((config.geometry.font_size - FONT_SIZE_MAX).abs() < f32::EPSILON);
        assert!((config.geometry.line_height - LINE_HEIGHT_MIN).abs() < f32::EPSILON);
        assert!((config.geometry.letter_spacing - LETTER_SPACING_MIN).abs() < f32::EPSILON);
        assert_eq!(config.target_fps, 15);
    }

    #[test]
    fn clamp_all_keeps_high_percentages() {
        let mut config = RenderConfig {
            contrast: 350.0,
            ..RenderConfig::default()
        };
        config.clamp_all();
        assert!((config.contrast - 350.0).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_ramp_is_repaired_on_load() {
        let mut config = RenderConfig {
            glyph_ramp: "x".to_string(),
            ..RenderConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.glyph_ramp, ramp::RAMP_PRESETS[0]);
    }

    #[test]
    fn set_ramp_retains_previous_on_error() {
        let mut config = RenderConfig::default();
        let before = config.glyph_ramp.to_string();
        assert_eq!(config.try_set_ramp(""), Err(CoreError::InvalidRamp));
        assert_eq!(config.glyph_ramp, before);
    }

    #[test]
    fn reset_clears_locks() {
        let mut config = RenderConfig {
            locks: SizeLocks {
                font_size: true,
                line_height: true,
                ..SizeLocks::default()
            },
            ..RenderConfig::default()
        };
        assert!(config.locks.any());
        config.reset();
        assert!(!config.locks.any());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = RenderConfig {
            sample_step: 12,
            mirror: true,
            locks: SizeLocks {
                letter_spacing: true,
                ..SizeLocks::default()
            },
            ..RenderConfig::default()
        };
        config.geometry.font_size = 18.5;
        config.try_set_ramp(" .#").unwrap();
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.sample_step, 12);
        assert!(loaded.mirror);
        assert!(loaded.locks.letter_spacing);
        assert!((loaded.geometry.font_size - 18.5).abs() < 0.001);
        assert_eq!(loaded.glyph_ramp, " .#");
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = load_or_default(&missing);
        assert_eq!(config.target_fps, RenderConfig::default().target_fps);

        let corrupt = dir.path().join("bad.toml");
        std::fs::write(&corrupt, "not [valid } toml").unwrap();
        let config = load_or_default(&corrupt);
        assert_eq!(config.sample_step, RenderConfig::default().sample_step);
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[render]\nsample_step = 4\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.sample_step, 4);
        assert_eq!(config.target_fps, RenderConfig::default().target_fps);
    }
}
