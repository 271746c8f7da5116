/// Frame-to-glyph conversion and auto-fit sizing for glyphcam.
///
/// The two core components live here: [`convert::Converter`] turns a raw
/// RGBA frame into a [`gc_core::frame::GlyphGrid`] under the active
/// `RenderConfig`, and [`autofit::autofit`] derives the glyph geometry
/// that makes the grid exactly cover the viewport.

pub mod adjust;
pub mod autofit;
pub mod convert;

pub use autofit::{Viewport, autofit};
pub use convert::Converter;
