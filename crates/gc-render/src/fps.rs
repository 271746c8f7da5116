use std::time::Instant;

/// Lissage EMA du temps de frame.
const ALPHA: f64 = 0.1;

/// Compteur FPS par moyenne mobile exponentielle. Zéro allocation.
///
/// # Example
/// ```
/// use gc_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new();
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    last: Option<Instant>,
    avg_frame_secs: f64,
    /// Temps de la dernière frame en ms (pour la sidebar).
    pub frame_time_ms: f64,
}

impl FpsCounter {
    /// Create an idle counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            avg_frame_secs: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last {
            let dt = now.duration_since(last).as_secs_f64();
            self.frame_time_ms = dt * 1000.0;
            self.avg_frame_secs = if self.avg_frame_secs > 0.0 {
                self.avg_frame_secs * (1.0 - ALPHA) + dt * ALPHA
            } else {
                dt
            };
        }
        self.last = Some(now);
    }

    /// FPS moyen lissé; 0.0 avant la deuxième frame.
    #[must_use]
    pub fn fps(&self) -> f64 {
        if self.avg_frame_secs > 0.0 {
            1.0 / self.avg_frame_secs
        } else {
            0.0
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_counter_reports_zero() {
        let counter = FpsCounter::new();
        assert!(counter.fps().abs() < f64::EPSILON);
    }

    #[test]
    fn fps_converges_to_tick_rate() {
        let mut counter = FpsCounter::new();
        for _ in 0..30 {
            counter.tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let fps = counter.fps();
        assert!(fps > 20.0 && fps < 400.0, "fps hors plage plausible : {fps}");
    }
}
