/// Configuration, types, and shared structures for glyphcam.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the glyphcam workspace.

pub mod config;
pub mod error;
pub mod frame;
pub mod ramp;
pub mod task;
pub mod traits;

pub use config::{GlyphGeometry, RenderConfig, SizeLocks};
pub use error::{CaptureError, ConvertError, CoreError};
pub use frame::{FrameBuffer, GlyphGrid};
pub use ramp::RampLut;
pub use task::Repeater;

/// Re-exports pour accès par chemin sémantique.
pub mod grid {
    pub use crate::frame::GlyphGrid;
}
