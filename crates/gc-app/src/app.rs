use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use gc_core::config::RenderConfig;
use gc_core::error::ConvertError;
use gc_core::frame::{FrameBuffer, GlyphGrid};
use gc_core::task::Repeater;
use gc_core::traits::{DisplaySink, StyleDescriptor};
use gc_glyph::autofit::{Viewport, autofit};
use gc_glyph::convert::Converter;
use gc_render::fps::FpsCounter;
use gc_render::sink::TerminalSink;
use gc_source::capture::{CaptureCommand, CaptureSlot, ResumeGate};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::random::{self, RandomizeFields};

/// Durée d'affichage des messages transitoires.
const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Viewports proposés au cyclage (pixels).
const VIEWPORT_PRESETS: &[(u32, u32)] = &[
    (1280, 720),
    (1920, 1080),
    (2560, 1440),
    (640, 480),
    (800, 600),
];

/// Application state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Exécution normale.
    Running,
    /// Lecture arrêtée : plus aucun tick de conversion tant que la
    /// reprise n'est pas demandée.
    Paused,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Éditeur de rampe affiché (touche e).
    RampEdit,
    /// Fermeture au prochain tour de boucle.
    Quitting,
}

/// Paramètres d'assemblage de l'application.
pub struct AppOptions {
    /// Ratio largeur/taille des glyphes (métriques réelles ou fallback).
    pub aspect: f32,
    /// Bytes de la police pour l'export (None = export désactivé).
    pub font_data: Option<Vec<u8>>,
    /// Dossier de sortie des snapshots.
    pub out_dir: PathBuf,
    /// Intervalle de la randomisation périodique.
    pub randomize_interval: Duration,
    /// Notice persistante si la capture n'a pas pu s'ouvrir.
    pub capture_notice: Option<String>,
}

/// Main application struct holding all state.
pub struct App {
    state: AppState,
    /// Config partagée (écritures entières, lectures par tick).
    config: Arc<ArcSwap<RenderConfig>>,
    config_path: PathBuf,
    sink: TerminalSink,
    capture_out: Option<triple_buffer::Output<CaptureSlot>>,
    capture_cmd_tx: Option<flume::Sender<CaptureCommand>>,
    converter: Converter,
    /// Grille réutilisée, réécrite entièrement à chaque tick.
    grid: GlyphGrid,
    /// Dernière frame admise, conservée au plus un tick de conversion.
    current_frame: Option<Arc<FrameBuffer>>,
    last_seq: u64,
    gate: ResumeGate,
    fps: FpsCounter,
    aspect: f32,
    font_data: Option<Vec<u8>>,
    out_dir: PathBuf,
    randomize_interval: Duration,
    auto_rand: Option<Repeater>,
    rand_fields: RandomizeFields,
    rng: StdRng,
    config_dirty: bool,
    needs_autofit: bool,
    last_grid_dims: Option<(usize, usize)>,
    last_viewport: (u32, u32),
    notice: Option<String>,
    flash: Option<(String, Instant)>,
    ramp_edit_buf: String,
    ramp_edit_cursor: usize,
}

impl App {
    /// Assemble l'application autour d'un sink déjà initialisé.
    #[must_use]
    pub fn new(
        config: Arc<ArcSwap<RenderConfig>>,
        config_path: PathBuf,
        sink: TerminalSink,
        capture_out: Option<triple_buffer::Output<CaptureSlot>>,
        capture_cmd_tx: Option<flume::Sender<CaptureCommand>>,
        options: AppOptions,
    ) -> Self {
        let initial_ramp = config.load().glyph_ramp.clone();
        let initial_viewport = {
            let cfg = config.load();
            (cfg.viewport_w, cfg.viewport_h)
        };
        Self {
            state: AppState::Running,
            config,
            config_path,
            sink,
            capture_out,
            capture_cmd_tx,
            converter: Converter::new(&initial_ramp),
            grid: GlyphGrid::empty(),
            current_frame: None,
            last_seq: 0,
            gate: ResumeGate::default(),
            fps: FpsCounter::new(),
            aspect: options.aspect,
            font_data: options.font_data,
            out_dir: options.out_dir,
            randomize_interval: options.randomize_interval,
            auto_rand: None,
            rand_fields: RandomizeFields::default(),
            rng: StdRng::from_os_rng(),
            config_dirty: false,
            needs_autofit: false,
            last_grid_dims: None,
            last_viewport: initial_viewport,
            notice: options.capture_notice,
            flash: None,
            ramp_edit_buf: String::new(),
            ramp_edit_cursor: 0,
        }
    }

    /// Boucle principale, cadencée sur `target_fps`.
    ///
    /// # Errors
    /// Returns an error if terminal event polling fails.
    pub fn run(&mut self) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let frame_duration =
                Duration::from_secs_f64(1.0 / f64::from(self.config.load().target_fps));
            let now = Instant::now();
            let elapsed = now - last_frame;

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements.
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // Polling événements non-bloquant.
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            self.tick();
        }

        // Teardown : capture arrêtée, timer annulé. Le terminal est
        // restauré par l'appelant sur tous les chemins de sortie.
        if let Some(tx) = &self.capture_cmd_tx {
            let _ = tx.send(CaptureCommand::Stop);
        }
        if let Some(repeater) = self.auto_rand.take() {
            repeater.cancel();
        }
        Ok(())
    }

    /// Un tick d'affichage : randomisation périodique, lecture de la
    /// frame la plus récente, conversion, auto-fit, sauvegarde,
    /// présentation.
    fn tick(&mut self) {
        if self.auto_rand.as_ref().is_some_and(Repeater::poll) {
            self.apply_randomize();
        }

        // Frame la plus récente — les frames en retard sont écrasées
        // côté capture, jamais traitées ici.
        if self.state != AppState::Paused
            && let Some(out) = self.capture_out.as_mut()
        {
            let slot = out.read();
            if slot.seq > self.last_seq
                && self.gate.admits(slot.seq)
                && let Some(frame) = &slot.frame
            {
                self.current_frame = Some(Arc::clone(frame));
                self.last_seq = slot.seq;
            }
        }

        // Snapshot de config atomique pour tout le tick.
        let config = self.config.load_full();

        if self.state != AppState::Paused
            && let Some(frame) = self.current_frame.clone()
        {
            match self.converter.convert_into(&frame, &config, &mut self.grid) {
                Ok(()) => {
                    let dims = (self.grid.cols, self.grid.rows);
                    if self.last_grid_dims != Some(dims) {
                        self.last_grid_dims = Some(dims);
                        self.needs_autofit = true;
                    }
                }
                // Source pas prête : tick sauté, pas de grille émise.
                Err(ConvertError::DegenerateFrame) => {}
            }
        }

        if (config.viewport_w, config.viewport_h) != self.last_viewport {
            self.last_viewport = (config.viewport_w, config.viewport_h);
            self.needs_autofit = true;
        }
        if self.needs_autofit && !self.grid.is_empty() {
            self.needs_autofit = false;
            self.run_autofit();
        }

        if self.config_dirty {
            let cfg = self.config.load();
            if let Err(e) = gc_core::config::save_config(&self.config_path, &cfg) {
                log::warn!("Sauvegarde config : {e:#}");
            }
            self.config_dirty = false;
        }

        if self
            .flash
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > FLASH_DURATION)
        {
            self.flash = None;
        }

        self.present();
    }

    /// Présente la grille courante. Un sink pas prêt saute le tick.
    fn present(&mut self) {
        self.fps.tick();
        let config = self.config.load();

        self.sink.hud.config = (**config).clone();
        self.sink.hud.paused = self.state == AppState::Paused;
        self.sink.hud.show_help = self.state == AppState::Help;
        self.sink.hud.auto_randomize = self.auto_rand.is_some();
        self.sink.hud.notice = self.notice.clone();
        self.sink.hud.flash = self.flash.as_ref().map(|(msg, _)| msg.clone());
        self.sink.hud.ramp_edit = if self.state == AppState::RampEdit {
            Some((self.ramp_edit_buf.clone(), self.ramp_edit_cursor))
        } else {
            None
        };
        self.sink.set_fps(&self.fps);

        let style = StyleDescriptor {
            font_family: config.geometry.font_family.clone(),
            font_size: config.geometry.font_size,
            letter_spacing: config.geometry.letter_spacing,
            line_height: config.geometry.line_height,
            fg: config.fg_color,
            bg: config.bg_color,
        };

        if let Err(e) = self.sink.present(&self.grid, &style) {
            log::debug!("Sink indisponible, tick sauté : {e}");
        }
    }

    /// Recalcule la géométrie pour couvrir le viewport, verrous respectés.
    fn run_autofit(&mut self) {
        let config = self.config.load_full();
        let fitted = autofit(
            self.grid.cols,
            self.grid.rows,
            Viewport::new(config.viewport_w, config.viewport_h),
            &config.geometry,
            self.aspect,
            config.locks,
        );
        if fitted != config.geometry {
            let mut new_config = (*config).clone();
            new_config.geometry = fitted;
            self.config.store(Arc::new(new_config));
            self.config_dirty = true;
        }
    }

    /// Applique une mutation de config : clone, mutation, clamp, store.
    fn edit_config<F: FnOnce(&mut RenderConfig)>(&mut self, mutate: F) {
        let mut new_config = (*self.config.load_full()).clone();
        mutate(&mut new_config);
        new_config.clamp_all();
        self.config.store(Arc::new(new_config));
        self.config_dirty = true;
    }

    fn set_flash(&mut self, msg: impl Into<String>) {
        self.flash = Some((msg.into(), Instant::now()));
    }

    fn apply_randomize(&mut self) {
        let fields = self.rand_fields;
        let mut new_config = (*self.config.load_full()).clone();
        random::randomize(&mut new_config, &fields, &mut self.rng);
        new_config.clamp_all();
        self.config.store(Arc::new(new_config));
        self.config_dirty = true;
        self.needs_autofit = true;
    }

    fn handle_event(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.state {
            AppState::Help => self.state = AppState::Running,
            AppState::RampEdit => self.handle_ramp_edit_key(key),
            _ => self.handle_normal_key(key),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_normal_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Tab => self.edit_config(|c| c.show_sidebar = !c.show_sidebar),
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('r') => {
                self.apply_randomize();
                self.set_flash("Randomisé");
            }
            KeyCode::Char('R') => self.toggle_auto_randomize(),
            KeyCode::Char('x') => self.export_snapshot(),
            KeyCode::Char('e') => {
                self.ramp_edit_buf = self.config.load().glyph_ramp.clone();
                self.ramp_edit_cursor = self.ramp_edit_buf.chars().count();
                self.state = AppState::RampEdit;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.edit_config(|cfg| cfg.select_ramp_preset(index));
            }
            KeyCode::Char('d') => self.edit_config(|c| c.sample_step = c.sample_step.saturating_sub(1)),
            KeyCode::Char('D') => self.edit_config(|c| c.sample_step += 1),
            KeyCode::Char('i') => self.edit_config(|c| c.invert = !c.invert),
            KeyCode::Char('m') => self.edit_config(|c| c.mirror = !c.mirror),
            KeyCode::Char('g') => self.edit_config(|c| c.grayscale = !c.grayscale),
            KeyCode::Char('[') => self.edit_config(|c| c.contrast -= 5.0),
            KeyCode::Char(']') => self.edit_config(|c| c.contrast += 5.0),
            KeyCode::Char('{') => self.edit_config(|c| c.brightness -= 5.0),
            KeyCode::Char('}') => self.edit_config(|c| c.brightness += 5.0),
            KeyCode::Char('-') => self.edit_config(|c| c.saturation -= 5.0),
            KeyCode::Char('+' | '=') => self.edit_config(|c| c.saturation += 5.0),
            // Éditions directes de géométrie : la dimension devient
            // verrouillée — l'auto-fit ne l'écrasera plus.
            KeyCode::Char('f') => self.edit_config(|c| {
                c.geometry.font_size -= 0.5;
                c.locks.font_size = true;
            }),
            KeyCode::Char('F') => self.edit_config(|c| {
                c.geometry.font_size += 0.5;
                c.locks.font_size = true;
            }),
            KeyCode::Char('l') => self.edit_config(|c| {
                c.geometry.letter_spacing -= 0.05;
                c.locks.letter_spacing = true;
            }),
            KeyCode::Char('L') => self.edit_config(|c| {
                c.geometry.letter_spacing += 0.05;
                c.locks.letter_spacing = true;
            }),
            KeyCode::Char('h') => self.edit_config(|c| {
                c.geometry.line_height -= 0.05;
                c.locks.line_height = true;
            }),
            KeyCode::Char('H') => self.edit_config(|c| {
                c.geometry.line_height += 0.05;
                c.locks.line_height = true;
            }),
            KeyCode::Char('v') => self.edit_config(|c| {
                let current = (c.viewport_w, c.viewport_h);
                let next = VIEWPORT_PRESETS
                    .iter()
                    .position(|&p| p == current)
                    .map_or(0, |i| (i + 1) % VIEWPORT_PRESETS.len());
                (c.viewport_w, c.viewport_h) = VIEWPORT_PRESETS[next];
            }),
            KeyCode::Char('0') => {
                self.edit_config(RenderConfig::reset);
                self.needs_autofit = true;
                self.set_flash("Réglages par défaut, verrous levés");
            }
            _ => {}
        }
    }

    /// Arrêt/reprise de la lecture. À l'arrêt, plus aucun tick de
    /// conversion ne s'exécute après le retour de cette fonction (boucle
    /// monothread). À la reprise, la barrière n'admet que les frames
    /// strictement postérieures à la séquence publiée la plus récente —
    /// aucune grille ne dérive d'une frame capturée pendant l'arrêt.
    fn toggle_playback(&mut self) {
        if self.state == AppState::Paused {
            let latest = self
                .capture_out
                .as_mut()
                .map_or(0, |out| out.read().seq);
            self.gate.rearm(latest);
            self.last_seq = latest;
            self.current_frame = None;
            if let Some(tx) = &self.capture_cmd_tx {
                let _ = tx.send(CaptureCommand::Resume);
            }
            self.state = AppState::Running;
        } else {
            if let Some(tx) = &self.capture_cmd_tx {
                let _ = tx.send(CaptureCommand::Pause);
            }
            self.state = AppState::Paused;
        }
    }

    /// Démarre ou annule la randomisation périodique. L'annulation est
    /// idempotente et aucun tick ne part après elle.
    fn toggle_auto_randomize(&mut self) {
        if let Some(repeater) = self.auto_rand.take() {
            repeater.cancel();
            self.set_flash("Auto-randomize OFF");
        } else {
            self.auto_rand = Some(Repeater::spawn(self.randomize_interval));
            self.set_flash("Auto-randomize ON");
        }
    }

    fn export_snapshot(&mut self) {
        let Some(font_data) = self.font_data.as_deref() else {
            self.set_flash("Export indisponible : aucune police");
            return;
        };
        if self.grid.is_empty() {
            self.set_flash("Rien à exporter");
            return;
        }
        let config = self.config.load();
        match gc_export::snapshot_to_png(
            &self.grid,
            config.fg_color,
            config.bg_color,
            config.geometry.font_size,
            font_data,
            &self.out_dir,
        ) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("snapshot")
                    .to_string();
                self.set_flash(format!("Exporté : {name}"));
            }
            Err(e) => {
                log::warn!("Export échoué : {e:#}");
                self.set_flash("Export échoué");
            }
        }
    }

    fn handle_ramp_edit_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state = AppState::Running,
            KeyCode::Enter => {
                let buf = self.ramp_edit_buf.clone();
                let mut accepted = false;
                self.edit_config(|c| accepted = c.try_set_ramp(&buf).is_ok());
                if accepted {
                    self.state = AppState::Running;
                } else {
                    // Rampe refusée : l'ancienne reste active.
                    self.set_flash("Rampe refusée : 2 caractères minimum");
                }
            }
            KeyCode::Backspace => {
                if self.ramp_edit_cursor > 0 {
                    let idx = byte_index(&self.ramp_edit_buf, self.ramp_edit_cursor - 1);
                    self.ramp_edit_buf.remove(idx);
                    self.ramp_edit_cursor -= 1;
                }
            }
            KeyCode::Left => self.ramp_edit_cursor = self.ramp_edit_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.ramp_edit_cursor =
                    (self.ramp_edit_cursor + 1).min(self.ramp_edit_buf.chars().count());
            }
            KeyCode::Char(c) => {
                let idx = byte_index(&self.ramp_edit_buf, self.ramp_edit_cursor);
                self.ramp_edit_buf.insert(idx, c);
                self.ramp_edit_cursor += 1;
            }
            _ => {}
        }
    }
}

/// Index byte du `n`-ième caractère (fin de chaîne si hors bornes).
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}
