use std::sync::Arc;
use std::time::Duration;

use gc_core::frame::FrameBuffer;
use gc_core::traits::FrameSource;

/// Valeur publiée par le thread de capture : la frame la plus récente et
/// son numéro de séquence. Le triple buffer ne garde que la dernière —
/// les frames en retard sont écrasées, jamais mises en file.
#[derive(Clone, Default)]
pub struct CaptureSlot {
    /// Dernière frame publiée, `None` tant que la source n'a rien donné.
    pub frame: Option<Arc<FrameBuffer>>,
    /// Séquence de la frame publiée (0 = aucune).
    pub seq: u64,
}

/// Commandes acceptées par le thread de capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureCommand {
    /// Suspendre la lecture de la source.
    Pause,
    /// Reprendre la lecture.
    Resume,
    /// Terminer le thread (libère la source).
    Stop,
}

/// Barrière de reprise : mémorise la séquence la plus récente au moment
/// du resume et n'admet que les frames strictement plus récentes. Aucune
/// grille ne peut ainsi dériver d'une frame capturée pendant l'arrêt.
///
/// # Example
/// ```
/// use gc_source::capture::ResumeGate;
/// let mut gate = ResumeGate::default();
/// assert!(gate.admits(1));
/// gate.rearm(7);
/// assert!(!gate.admits(7));
/// assert!(gate.admits(8));
/// ```
#[derive(Debug, Default)]
pub struct ResumeGate {
    min_seq: u64,
}

impl ResumeGate {
    /// À appeler au resume, avec la séquence publiée la plus récente.
    pub fn rearm(&mut self, latest_seq: u64) {
        self.min_seq = latest_seq;
    }

    /// `true` si la frame est postérieure au dernier resume.
    #[must_use]
    pub fn admits(&self, seq: u64) -> bool {
        seq > self.min_seq
    }
}

/// Pause du thread quand la source est suspendue ou muette.
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Démarre le thread de capture : lit la source et publie chaque frame
/// dans un triple buffer (la boucle de rendu lit toujours la plus
/// récente, sans blocage ni file).
///
/// Le thread se termine sur `CaptureCommand::Stop` ou quand le canal de
/// commandes est fermé; la source est droppée à ce moment-là, ce qui
/// libère le device (fermeture exactement une fois, garantie par la
/// source elle-même).
#[must_use]
pub fn spawn_capture_thread(
    mut source: Box<dyn FrameSource>,
    cmd_rx: flume::Receiver<CaptureCommand>,
    min_interval: Duration,
) -> triple_buffer::Output<CaptureSlot> {
    let (mut input, output) = triple_buffer::TripleBuffer::new(&CaptureSlot::default()).split();

    std::thread::Builder::new()
        .name("gc-capture".into())
        .spawn(move || {
            let mut paused = false;
            'run: loop {
                loop {
                    match cmd_rx.try_recv() {
                        Ok(CaptureCommand::Pause) => paused = true,
                        Ok(CaptureCommand::Resume) => paused = false,
                        Ok(CaptureCommand::Stop) | Err(flume::TryRecvError::Disconnected) => {
                            break 'run;
                        }
                        Err(flume::TryRecvError::Empty) => break,
                    }
                }

                if paused {
                    std::thread::sleep(IDLE_SLEEP);
                    continue;
                }

                match source.next_frame() {
                    Some(frame) => {
                        let seq = frame.seq;
                        input.write(CaptureSlot {
                            frame: Some(frame),
                            seq,
                        });
                        if !min_interval.is_zero() {
                            std::thread::sleep(min_interval);
                        }
                    }
                    None => std::thread::sleep(IDLE_SLEEP),
                }
            }
            log::debug!("Thread de capture terminé");
        })
        .map_or_else(
            |e| {
                log::error!("Impossible de démarrer le thread de capture : {e}");
                let (_, output) = triple_buffer::TripleBuffer::new(&CaptureSlot::default()).split();
                output
            },
            |_| output,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::TestPatternSource;

    #[test]
    fn gate_admits_only_fresher_frames() {
        let mut gate = ResumeGate::default();
        assert!(gate.admits(1));
        gate.rearm(5);
        assert!(!gate.admits(4));
        assert!(!gate.admits(5));
        assert!(gate.admits(6));
    }

    #[test]
    fn capture_publishes_then_stops() {
        let (cmd_tx, cmd_rx) = flume::bounded(4);
        let source = Box::new(TestPatternSource::new(16, 16));
        let mut output = spawn_capture_thread(source, cmd_rx, Duration::from_millis(1));

        // Attendre la première publication.
        let mut seq = 0;
        for _ in 0..200 {
            std::thread::sleep(Duration::from_millis(2));
            let slot = output.read();
            if slot.frame.is_some() {
                seq = slot.seq;
                break;
            }
        }
        assert!(seq > 0, "aucune frame publiée");

        cmd_tx.send(CaptureCommand::Stop).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        let after_stop = output.read().seq;
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(output.read().seq, after_stop, "publication après Stop");
    }

    #[test]
    fn pause_halts_publication_and_resume_restarts() {
        let (cmd_tx, cmd_rx) = flume::bounded(4);
        let source = Box::new(TestPatternSource::new(8, 8));
        let mut output = spawn_capture_thread(source, cmd_rx, Duration::from_millis(1));

        cmd_tx.send(CaptureCommand::Pause).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        let paused_seq = output.read().seq;
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(output.read().seq, paused_seq);

        cmd_tx.send(CaptureCommand::Resume).unwrap();
        let mut resumed = false;
        for _ in 0..200 {
            std::thread::sleep(Duration::from_millis(2));
            if output.read().seq > paused_seq {
                resumed = true;
                break;
            }
        }
        assert!(resumed, "pas de reprise après Resume");
        cmd_tx.send(CaptureCommand::Stop).unwrap();
    }
}
