use crate::error::CoreError;

/// 10 caractères — compact, bon contraste.
pub const RAMP_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères — Paul Bourke extended, du plus sombre au plus dense.
pub const RAMP_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode — pseudo-pixels.
pub const RAMP_BLOCKS: &str = " ░▒▓█";

/// Minimal — haut contraste.
pub const RAMP_MINIMAL: &str = " .:░▒▓█";

/// Deux niveaux — silhouette pure.
pub const RAMP_BINARY: &str = " #";

/// Built-in ramp presets, selectable by index.
pub const RAMP_PRESETS: &[&str] = &[
    RAMP_COMPACT,
    RAMP_STANDARD,
    RAMP_BLOCKS,
    RAMP_MINIMAL,
    RAMP_BINARY,
];

/// Validate a user-entered ramp: ordered darkest→brightest, length ≥ 2.
///
/// # Errors
/// Returns [`CoreError::InvalidRamp`] when the ramp has fewer than
/// 2 characters. The caller must keep its previous ramp in that case.
///
/// # Example
/// ```
/// use gc_core::ramp::validate;
/// assert!(validate(" #").is_ok());
/// assert!(validate("#").is_err());
/// assert!(validate("").is_err());
/// ```
pub fn validate(ramp: &str) -> Result<(), CoreError> {
    if ramp.chars().count() < 2 {
        return Err(CoreError::InvalidRamp);
    }
    Ok(())
}

/// Lookup table mapping luminance [0..255] → ramp character.
///
/// Pre-computed when the ramp changes, O(1) per cell afterwards.
/// The table realizes `idx = floor(L · (len-1))` with `L = lum/255`,
/// so luminance 0 yields the first (darkest) character and 255 the last.
///
/// # Example
/// ```
/// use gc_core::ramp::RampLut;
/// let lut = RampLut::new(" .:#@");
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
pub struct RampLut {
    lut: [char; 256],
}

impl RampLut {
    /// Build a LUT from a ramp ordered darkest→brightest.
    ///
    /// A ramp shorter than 2 characters falls back to [`RAMP_BINARY`]
    /// rather than producing an unindexable table.
    ///
    /// # Example
    /// ```
    /// use gc_core::ramp::RampLut;
    /// let lut = RampLut::new(" .:#@");
    /// assert_eq!(lut.map(128), ':');
    /// ```
    #[must_use]
    pub fn new(ramp: &str) -> Self {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.len() < 2 {
            return Self::new(RAMP_BINARY);
        }
        let len = chars.len();
        let mut lut = [' '; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = chars[i * (len - 1) / 255];
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a ramp character.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_maps_extremes() {
        let lut = RampLut::new(" .:#@");
        assert_eq!(lut.map(0), ' ');
        assert_eq!(lut.map(255), '@');
    }

    #[test]
    fn lut_monotonic() {
        let lut = RampLut::new(" .:#@");
        let chars: Vec<char> = " .:#@".chars().collect();
        let mut prev_idx = 0usize;
        for i in 0..=255u8 {
            let ch = lut.map(i);
            let idx = chars.iter().position(|&c| c == ch).unwrap();
            assert!(idx >= prev_idx, "LUT non monotone à luminance {i}");
            prev_idx = idx;
        }
    }

    #[test]
    fn lut_index_formula() {
        // idx = floor(L * (len-1)) over the whole range, never out of bounds.
        for ramp in RAMP_PRESETS {
            let chars: Vec<char> = ramp.chars().collect();
            let lut = RampLut::new(ramp);
            for i in 0..=255u32 {
                let expected = chars[(i as usize * (chars.len() - 1)) / 255];
                assert_eq!(lut.map(i as u8), expected);
            }
        }
    }

    #[test]
    fn short_ramp_falls_back() {
        let lut = RampLut::new("@");
        assert_eq!(lut.map(0), ' ');
        assert_eq!(lut.map(255), '#');
    }

    #[test]
    fn validate_rejects_short() {
        assert_eq!(validate(""), Err(CoreError::InvalidRamp));
        assert_eq!(validate("x"), Err(CoreError::InvalidRamp));
        assert!(validate("x ").is_ok());
    }
}
