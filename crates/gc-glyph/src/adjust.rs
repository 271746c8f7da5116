use gc_core::config::RenderConfig;

/// Coefficients BT.601 — pondération perceptuelle des canaux.
const R_LUMA: f32 = 0.299;
const G_LUMA: f32 = 0.587;
const B_LUMA: f32 = 0.114;

/// Chaîne d'ajustement couleur d'un pixel : contraste, luminosité,
/// saturation (pourcents, 100 = neutre), puis réduction gris optionnelle.
///
/// Contraste : linéaire autour du gris moyen 128. Luminosité :
/// multiplicateur par canal. Saturation : interpolation vers la
/// luminance (préserve la luminance pondérée). Les intermédiaires
/// restent en f32 non bornés; un seul clamp final par canal [0,255].
///
/// # Example
/// ```
/// use gc_core::config::RenderConfig;
/// use gc_glyph::adjust::apply_chain;
/// // 100% partout = identité.
/// let config = RenderConfig::default();
/// assert_eq!(apply_chain(17, 130, 250, &config), (17, 130, 250));
/// ```
#[inline(always)]
#[must_use]
pub fn apply_chain(r: u8, g: u8, b: u8, config: &RenderConfig) -> (u8, u8, u8) {
    let kc = config.contrast / 100.0;
    let kb = config.brightness / 100.0;
    let ks = config.saturation / 100.0;

    let mut r = f32::from(r);
    let mut g = f32::from(g);
    let mut b = f32::from(b);

    // 1. Contraste autour du gris moyen.
    r = (r - 128.0) * kc + 128.0;
    g = (g - 128.0) * kc + 128.0;
    b = (b - 128.0) * kc + 128.0;

    // 2. Luminosité.
    r *= kb;
    g *= kb;
    b *= kb;

    // 3. Saturation — lerp vers la luminance courante.
    let l = R_LUMA * r + G_LUMA * g + B_LUMA * b;
    if config.grayscale {
        r = l;
        g = l;
        b = l;
    } else {
        r = l + (r - l) * ks;
        g = l + (g - l) * ks;
        b = l + (b - l) * ks;
    }

    // Arrondi, pas troncature : le lerp de saturation réintroduit un
    // epsilon flottant même à 100%.
    (
        r.clamp(0.0, 255.0).round() as u8,
        g.clamp(0.0, 255.0).round() as u8,
        b.clamp(0.0, 255.0).round() as u8,
    )
}

/// Luminance BT.601 d'un pixel ajusté, en byte [0,255].
///
/// `L = (0.299·R + 0.587·G + 0.114·B)`, les canaux étant déjà dans
/// [0,255]; la division par 255 est implicite dans l'indexation LUT.
///
/// # Example
/// ```
/// use gc_glyph::adjust::luminance;
/// assert_eq!(luminance(255, 255, 255), 255);
/// assert_eq!(luminance(0, 0, 0), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_chain_is_identity() {
        let config = RenderConfig::default();
        for &(r, g, b) in &[(0, 0, 0), (255, 255, 255), (12, 200, 99), (128, 128, 128)] {
            assert_eq!(apply_chain(r, g, b, &config), (r, g, b));
        }
    }

    #[test]
    fn zero_brightness_blacks_out() {
        let config = RenderConfig {
            brightness: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(apply_chain(200, 100, 50, &config), (0, 0, 0));
    }

    #[test]
    fn zero_saturation_desaturates() {
        let config = RenderConfig {
            saturation: 0.0,
            ..RenderConfig::default()
        };
        let (r, g, b) = apply_chain(250, 10, 10, &config);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn grayscale_equals_zero_saturation() {
        let gray = RenderConfig {
            grayscale: true,
            ..RenderConfig::default()
        };
        let desat = RenderConfig {
            saturation: 0.0,
            ..RenderConfig::default()
        };
        for &(r, g, b) in &[(250, 10, 10), (30, 140, 220), (90, 90, 90)] {
            assert_eq!(apply_chain(r, g, b, &gray), apply_chain(r, g, b, &desat));
        }
    }

    #[test]
    fn saturation_preserves_luminance() {
        let config = RenderConfig {
            saturation: 180.0,
            ..RenderConfig::default()
        };
        let (r, g, b) = apply_chain(200, 60, 120, &config);
        let before = luminance(200, 60, 120);
        let after = luminance(r, g, b);
        assert!(
            (i16::from(before) - i16::from(after)).abs() <= 2,
            "luminance drifted: {before} vs {after}"
        );
    }

    #[test]
    fn amplified_contrast_clamps_to_channel_range() {
        // Au-delà de 100%, non borné vers le haut.
        let config = RenderConfig {
            contrast: 400.0,
            ..RenderConfig::default()
        };
        let (r, _, _) = apply_chain(250, 250, 250, &config);
        assert_eq!(r, 255);
        let (r, _, _) = apply_chain(5, 5, 5, &config);
        assert_eq!(r, 0);
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let config = RenderConfig {
            contrast: 150.0,
            ..RenderConfig::default()
        };
        assert_eq!(apply_chain(128, 128, 128, &config), (128, 128, 128));
    }

    #[test]
    fn luminance_weights() {
        // Vert domine, bleu pèse le moins.
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
    }
}
