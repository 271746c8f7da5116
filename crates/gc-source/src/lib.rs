/// Capture sources for glyphcam : flux caméra (transport ffmpeg),
/// générateur de mire procédurale, et le thread de capture qui publie
/// la frame la plus récente vers la boucle de rendu.

pub mod camera;
pub mod capture;
pub mod pattern;

pub use camera::CameraStream;
pub use capture::{CaptureCommand, CaptureSlot, ResumeGate, spawn_capture_thread};
pub use pattern::TestPatternSource;
