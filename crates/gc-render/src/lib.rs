/// Terminal rendering for glyphcam : écriture directe de la grille dans
/// le buffer ratatui, sidebar de contrôles, compteur FPS.

pub mod canvas;
pub mod fps;
pub mod sink;
pub mod ui;

pub use fps::FpsCounter;
pub use sink::{Hud, TerminalSink};
