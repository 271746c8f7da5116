use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Tâche répétitive annulable : un thread émet un tick par intervalle
/// sur un canal flume, jusqu'à annulation.
///
/// Le handle est stocké au démarrage; `cancel()` est idempotent et sûr
/// à appeler plusieurs fois. Une fois `cancel()` retourné, `poll()` ne
/// rapporte plus jamais de tick — aucun tick orphelin. Le drop annule.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use gc_core::task::Repeater;
/// let repeater = Repeater::spawn(Duration::from_millis(10));
/// repeater.cancel();
/// repeater.cancel(); // idempotent
/// assert!(!repeater.poll());
/// ```
pub struct Repeater {
    cancelled: Arc<AtomicBool>,
    rx: flume::Receiver<()>,
}

/// Granularité de la sieste du thread émetteur, pour réagir vite à
/// l'annulation sans busy-wait.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

impl Repeater {
    /// Démarre le thread émetteur et retourne le handle.
    #[must_use]
    pub fn spawn(interval: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = flume::bounded::<()>(4);

        let flag = Arc::clone(&cancelled);
        std::thread::spawn(move || {
            let mut elapsed = Duration::ZERO;
            loop {
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let slice = interval
                    .saturating_sub(elapsed)
                    .clamp(Duration::from_millis(1), SLEEP_SLICE);
                std::thread::sleep(slice);
                elapsed += slice;
                if elapsed >= interval {
                    elapsed = Duration::ZERO;
                    if flag.load(Ordering::Relaxed) || tx.send(()).is_err() {
                        break; // annulé ou receiver droppé
                    }
                }
            }
        });

        Self { cancelled, rx }
    }

    /// Draine les ticks en attente; `true` si au moins un tick est dû.
    ///
    /// Retourne toujours `false` après annulation, même si des ticks
    /// étaient en vol dans le canal.
    #[must_use]
    pub fn poll(&self) -> bool {
        let mut fired = false;
        while self.rx.try_recv().is_ok() {
            fired = true;
        }
        fired && !self.cancelled.load(Ordering::Relaxed)
    }

    /// Annule la tâche. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// `true` si la tâche a été annulée.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Drop for Repeater {
    fn drop(&mut self) {
        self.cancel();
    }
}
