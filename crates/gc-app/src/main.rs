use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use gc_core::traits::{FixedMetrics, FrameSource, glyph_aspect_ratio};
use gc_render::sink::TerminalSink;
use gc_source::camera::CameraStream;
use gc_source::capture::spawn_capture_thread;
use gc_source::pattern::TestPatternSource;

pub mod app;
pub mod cli;
pub mod hotreload;
pub mod random;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config (absente ou corrompue → défauts, jamais fatal)
    let mut config = gc_core::config::load_or_default(&cli.config);
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    config.clamp_all();
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Hot-reload de la config (si le fichier existe déjà)
    let _watcher = if cli.config.exists() {
        match hotreload::spawn_config_watcher(&cli.config, &config) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Watcher config indisponible : {e}");
                None
            }
        }
    } else {
        None
    };

    // 5. Police : métriques réelles si trouvée, sinon ratio approximatif
    let font = gc_export::load_font_bytes(cli.font.as_deref());
    let (aspect, font_data) = match font {
        Some((_, bytes)) => match gc_export::GlyphMetrics::from_bytes(bytes.clone()) {
            Ok(metrics) => {
                let family = config.load().geometry.font_family.clone();
                (glyph_aspect_ratio(&metrics, &family), Some(bytes))
            }
            Err(e) => {
                log::warn!("Police inutilisable : {e}");
                (glyph_aspect_ratio(&FixedMetrics::default(), "monospace"), None)
            }
        },
        None => (glyph_aspect_ratio(&FixedMetrics::default(), "monospace"), None),
    };

    // 6. Ouvrir la source de capture. Un échec n'est pas fatal : notice
    //    persistante, pipeline au repos.
    let mut capture_notice = None;
    let source: Option<Box<dyn FrameSource>> = if cli.pattern {
        Some(Box::new(TestPatternSource::new(
            cli.capture_width,
            cli.capture_height,
        )))
    } else {
        match CameraStream::open(
            &cli.device,
            cli.capture_width,
            cli.capture_height,
            cli.capture_fps,
        ) {
            Ok(stream) => Some(Box::new(stream)),
            Err(e) => {
                log::warn!("{e}");
                capture_notice = Some(e.to_string());
                None
            }
        }
    };

    let pacing = if cli.pattern {
        Duration::from_secs_f64(1.0 / f64::from(cli.capture_fps.max(1)))
    } else {
        Duration::ZERO // la lecture du transport bloque déjà à la cadence device
    };
    let (capture_out, capture_cmd_tx) = match source {
        Some(source) => {
            let (cmd_tx, cmd_rx) = flume::bounded(8);
            (Some(spawn_capture_thread(source, cmd_rx, pacing)), Some(cmd_tx))
        }
        None => (None, None),
    };

    // 7. Terminal + app
    let terminal = ratatui::init();
    let sink = TerminalSink::new(terminal);

    let options = app::AppOptions {
        aspect,
        font_data,
        out_dir: cli.out_dir.clone(),
        randomize_interval: Duration::from_secs(cli.randomize_interval.max(1)),
        capture_notice,
    };
    let mut app_instance = app::App::new(
        config,
        cli.config.clone(),
        sink,
        capture_out,
        capture_cmd_tx,
        options,
    );

    // 8. Boucle principale
    let result = app_instance.run();

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}
