use std::io::{BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::Arc;

use gc_core::error::CaptureError;
use gc_core::frame::FrameBuffer;
use gc_core::traits::FrameSource;

const BYTES_PER_PIXEL: usize = 4; // RGBA

/// Flux caméra via subprocess ffmpeg : rawvideo RGBA lu sur stdout.
///
/// Prérequis runtime : ffmpeg en PATH et un device V4L2 accessible.
/// `close()` tue le process exactement une fois; le drop ferme aussi.
pub struct CameraStream {
    width: u32,
    height: u32,
    child: Child,
    reader: BufReader<ChildStdout>,
    /// Buffer intermédiaire réutilisé entre le process et la frame.
    frame_buf: Vec<u8>,
    closed: bool,
    seq: u64,
    read_error_logged: bool,
}

impl CameraStream {
    /// Ouvre le device et démarre le transport.
    ///
    /// # Errors
    /// [`CaptureError::PermissionDenied`] si l'accès au device est
    /// refusé, [`CaptureError::DeviceUnavailable`] pour tout le reste
    /// (device absent, ffmpeg introuvable, pipe indisponible).
    pub fn open(device: &str, width: u32, height: u32, fps: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::DeviceUnavailable(format!(
                "dimensions nulles {width}×{height}"
            )));
        }

        // Sonde le device avant de lancer le transport : c'est ici que
        // le refus de permission se distingue de l'absence de device.
        if let Err(e) = std::fs::metadata(device) {
            return Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    CaptureError::PermissionDenied(device.to_string())
                }
                _ => CaptureError::DeviceUnavailable(format!("{device} : {e}")),
            });
        }

        let mut child = Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                "v4l2",
                "-framerate",
                &fps.to_string(),
                "-video_size",
                &format!("{width}x{height}"),
                "-i",
                device,
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-an",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CaptureError::DeviceUnavailable(
                    "ffmpeg introuvable dans PATH".to_string(),
                ),
                std::io::ErrorKind::PermissionDenied => {
                    CaptureError::PermissionDenied(e.to_string())
                }
                _ => CaptureError::DeviceUnavailable(e.to_string()),
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(CaptureError::DeviceUnavailable(
                "stdout ffmpeg indisponible".to_string(),
            ));
        };

        let frame_size = width as usize * height as usize * BYTES_PER_PIXEL;
        log::info!("Caméra ouverte : {device} {width}×{height}@{fps}");

        Ok(Self {
            width,
            height,
            child,
            reader: BufReader::with_capacity(frame_size, stdout),
            frame_buf: vec![0u8; frame_size],
            closed: false,
            seq: 0,
            read_error_logged: false,
        })
    }

    /// Libère le device. Idempotent : le process n'est tué qu'une fois.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.child.kill() {
            log::warn!("Arrêt ffmpeg : {e}");
        }
        let _ = self.child.wait();
        log::info!("Caméra fermée");
    }
}

impl FrameSource for CameraStream {
    /// Lit la prochaine frame du transport. `None` si le flux est fermé
    /// ou mort — l'appelant reste sur sa dernière frame connue.
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        if self.closed {
            return None;
        }
        if let Err(e) = self.reader.read_exact(&mut self.frame_buf) {
            if !self.read_error_logged {
                log::warn!("Lecture caméra interrompue : {e}");
                self.read_error_logged = true;
            }
            return None;
        }

        self.seq += 1;
        let mut frame = FrameBuffer::new(self.width, self.height);
        frame.data.copy_from_slice(&self.frame_buf);
        frame.seq = self.seq;
        Some(Arc::new(frame))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        true
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.close();
    }
}
