use anyhow::Result;
use gc_core::config::RenderConfig;
use gc_core::frame::GlyphGrid;
use gc_core::traits::{DisplaySink, StyleDescriptor};
use ratatui::DefaultTerminal;

use crate::fps::FpsCounter;
use crate::ui;

/// État d'affichage annexe à la grille, mis à jour par l'app avant
/// chaque présentation.
#[derive(Default)]
pub struct Hud {
    /// Snapshot de la config pour la sidebar.
    pub config: RenderConfig,
    /// Lecture en pause.
    pub paused: bool,
    /// Randomisation périodique active.
    pub auto_randomize: bool,
    /// Overlay d'aide visible.
    pub show_help: bool,
    /// Notice persistante (capture indisponible). `None` = rien.
    pub notice: Option<String>,
    /// Message transitoire (export réussi, rampe refusée).
    pub flash: Option<String>,
    /// Éditeur de rampe : (buffer, curseur) quand il est ouvert.
    pub ramp_edit: Option<(String, usize)>,
    /// FPS lissé.
    pub fps: f64,
    /// Temps de frame en ms.
    pub frame_time_ms: f64,
}

/// Sink d'affichage terminal : possède le terminal ratatui et dessine
/// grille + sidebar. Aucune logique du cœur ne vit ici.
pub struct TerminalSink {
    terminal: DefaultTerminal,
    /// HUD courant, écrit par l'app à chaque tick.
    pub hud: Hud,
}

impl TerminalSink {
    /// Wrap an initialized ratatui terminal.
    #[must_use]
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self {
            terminal,
            hud: Hud::default(),
        }
    }

    /// Met à jour le compteur FPS du HUD.
    pub fn set_fps(&mut self, counter: &FpsCounter) {
        self.hud.fps = counter.fps();
        self.hud.frame_time_ms = counter.frame_time_ms;
    }
}

impl DisplaySink for TerminalSink {
    fn present(&mut self, grid: &GlyphGrid, style: &StyleDescriptor) -> Result<()> {
        let hud = &self.hud;
        self.terminal.draw(|frame| ui::draw(frame, grid, style, hud))?;
        Ok(())
    }
}
