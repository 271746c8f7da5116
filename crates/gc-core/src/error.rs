use thiserror::Error;

/// Errors from the capture collaborator.
///
/// Neither variant is fatal: the application surfaces a persistent notice
/// and the conversion pipeline stays idle.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Access to the capture device was refused.
    #[error("Accès caméra refusé : {0}")]
    PermissionDenied(String),

    /// No usable capture device, or the transport could not be started.
    #[error("Caméra indisponible : {0}")]
    DeviceUnavailable(String),
}

/// Per-tick conversion failures. Always skippable, never surfaced.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    /// Source frame has zero usable pixels (source not ready yet).
    #[error("Frame dégénérée : surface nulle")]
    DegenerateFrame,
}

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Glyph ramp shorter than 2 characters. The previous ramp is retained.
    #[error("Rampe invalide : au moins 2 caractères requis")]
    InvalidRamp,

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}
