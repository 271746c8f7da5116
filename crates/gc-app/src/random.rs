use gc_core::config::{
    ADJUST_SLIDER_MAX, ADJUST_SLIDER_MIN, FONT_FAMILIES, FONT_SIZE_MAX, FONT_SIZE_MIN,
    LETTER_SPACING_MAX, LETTER_SPACING_MIN, LINE_HEIGHT_MAX, LINE_HEIGHT_MIN, RenderConfig,
    SAMPLE_STEP_MAX, SAMPLE_STEP_MIN,
};
use gc_core::ramp::RAMP_PRESETS;
use rand::Rng;

/// Champs pris en compte par la randomisation. Chaque champ activé
/// reçoit un tirage uniforme indépendant sur son domaine.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug)]
pub struct RandomizeFields {
    pub ramp: bool,
    pub sample_step: bool,
    pub contrast: bool,
    pub brightness: bool,
    pub saturation: bool,
    pub fg_color: bool,
    pub bg_color: bool,
    pub font_size: bool,
    pub letter_spacing: bool,
    pub line_height: bool,
    pub font_family: bool,
}

impl RandomizeFields {
    /// Aucun champ activé.
    #[must_use]
    pub fn none() -> Self {
        Self {
            ramp: false,
            sample_step: false,
            contrast: false,
            brightness: false,
            saturation: false,
            fg_color: false,
            bg_color: false,
            font_size: false,
            letter_spacing: false,
            line_height: false,
            font_family: false,
        }
    }

    /// Tous les champs activés.
    #[must_use]
    pub fn all() -> Self {
        Self {
            ramp: true,
            sample_step: true,
            contrast: true,
            brightness: true,
            saturation: true,
            fg_color: true,
            bg_color: true,
            font_size: true,
            letter_spacing: true,
            line_height: true,
            font_family: true,
        }
    }
}

impl Default for RandomizeFields {
    fn default() -> Self {
        Self::all()
    }
}

/// Tire chaque champ activé uniformément sur son domaine : numériques
/// sur leur plage slider, couleurs sur tout l'espace RGB, énumérables
/// (presets de rampe, familles) sur l'énumération.
///
/// Tirer `font_size`, `letter_spacing` ou `line_height` pose le verrou
/// auto-fit correspondant — sémantique d'override manuel, comme une
/// édition directe de l'utilisateur.
pub fn randomize(config: &mut RenderConfig, fields: &RandomizeFields, rng: &mut impl Rng) {
    if fields.ramp {
        config.select_ramp_preset(rng.random_range(0..RAMP_PRESETS.len()));
    }
    if fields.sample_step {
        config.sample_step = rng.random_range(SAMPLE_STEP_MIN..=SAMPLE_STEP_MAX);
    }
    if fields.contrast {
        config.contrast = rng.random_range(ADJUST_SLIDER_MIN..=ADJUST_SLIDER_MAX);
    }
    if fields.brightness {
        config.brightness = rng.random_range(ADJUST_SLIDER_MIN..=ADJUST_SLIDER_MAX);
    }
    if fields.saturation {
        config.saturation = rng.random_range(ADJUST_SLIDER_MIN..=ADJUST_SLIDER_MAX);
    }
    if fields.fg_color {
        config.fg_color = (rng.random(), rng.random(), rng.random());
    }
    if fields.bg_color {
        config.bg_color = (rng.random(), rng.random(), rng.random());
    }
    if fields.font_size {
        config.geometry.font_size = rng.random_range(FONT_SIZE_MIN..=FONT_SIZE_MAX);
        config.locks.font_size = true;
    }
    if fields.letter_spacing {
        config.geometry.letter_spacing = rng.random_range(LETTER_SPACING_MIN..=LETTER_SPACING_MAX);
        config.locks.letter_spacing = true;
    }
    if fields.line_height {
        config.geometry.line_height = rng.random_range(LINE_HEIGHT_MIN..=LINE_HEIGHT_MAX);
        config.locks.line_height = true;
    }
    if fields.font_family {
        config.geometry.font_family =
            FONT_FAMILIES[rng.random_range(0..FONT_FAMILIES.len())].to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn single_field_changes_only_that_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut fields = RandomizeFields::none();
        fields.contrast = true;

        let before = RenderConfig::default();
        let mut config = before.clone();
        randomize(&mut config, &fields, &mut rng);

        assert!(config.contrast >= ADJUST_SLIDER_MIN && config.contrast <= ADJUST_SLIDER_MAX);
        assert_eq!(config.glyph_ramp, before.glyph_ramp);
        assert_eq!(config.sample_step, before.sample_step);
        assert!((config.brightness - before.brightness).abs() < f32::EPSILON);
        assert!((config.saturation - before.saturation).abs() < f32::EPSILON);
        assert_eq!(config.fg_color, before.fg_color);
        assert_eq!(config.bg_color, before.bg_color);
        assert_eq!(config.geometry, before.geometry);
        assert_eq!(config.locks, before.locks);
    }

    #[test]
    fn geometry_draws_set_their_locks() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut config = RenderConfig::default();
        assert!(!config.locks.any());

        randomize(&mut config, &RandomizeFields::all(), &mut rng);
        assert!(config.locks.font_size);
        assert!(config.locks.letter_spacing);
        assert!(config.locks.line_height);
    }

    #[test]
    fn draws_stay_in_domain() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..50 {
            let mut config = RenderConfig::default();
            randomize(&mut config, &RandomizeFields::all(), &mut rng);
            assert!(config.sample_step >= SAMPLE_STEP_MIN && config.sample_step <= SAMPLE_STEP_MAX);
            assert!(config.contrast >= ADJUST_SLIDER_MIN && config.contrast <= ADJUST_SLIDER_MAX);
            assert!(
                config.geometry.font_size >= FONT_SIZE_MIN
                    && config.geometry.font_size <= FONT_SIZE_MAX
            );
            assert!(
                config.geometry.line_height >= LINE_HEIGHT_MIN
                    && config.geometry.line_height <= LINE_HEIGHT_MAX
            );
            assert!(
                FONT_FAMILIES.contains(&config.geometry.font_family.as_str()),
                "famille hors énumération"
            );
            assert!(
                gc_core::ramp::RAMP_PRESETS.contains(&config.glyph_ramp.as_str()),
                "rampe hors presets"
            );
        }
    }

    #[test]
    fn no_fields_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(9);
        let before = RenderConfig::default();
        let mut config = before.clone();
        randomize(&mut config, &RandomizeFields::none(), &mut rng);
        assert_eq!(config.sample_step, before.sample_step);
        assert_eq!(config.glyph_ramp, before.glyph_ramp);
        assert_eq!(config.geometry, before.geometry);
        assert_eq!(config.fg_color, before.fg_color);
    }
}
