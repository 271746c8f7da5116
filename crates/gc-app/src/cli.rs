use std::path::PathBuf;

use clap::Parser;

/// glyphcam — Live camera feed as a character mosaic.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Device de capture V4L2.
    #[arg(long, default_value = "/dev/video0")]
    pub device: String,

    /// Largeur de capture demandée.
    #[arg(long, default_value_t = 640)]
    pub capture_width: u32,

    /// Hauteur de capture demandée.
    #[arg(long, default_value_t = 480)]
    pub capture_height: u32,

    /// Cadence de capture demandée au device.
    #[arg(long, default_value_t = 30)]
    pub capture_fps: u32,

    /// Utiliser la mire procédurale au lieu de la caméra.
    #[arg(long, default_value_t = false)]
    pub pattern: bool,

    /// Fichier de configuration TOML.
    #[arg(short, long, default_value = "config/glyphcam.toml")]
    pub config: PathBuf,

    /// Police TTF pour les métriques de glyphe et l'export PNG.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Dossier de sortie des snapshots.
    #[arg(long, default_value = "snapshots")]
    pub out_dir: PathBuf,

    /// Intervalle de la randomisation périodique, en secondes.
    #[arg(long, default_value_t = 8)]
    pub randomize_interval: u64,

    /// FPS cible (écrase la valeur de la config).
    #[arg(long)]
    pub fps: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
