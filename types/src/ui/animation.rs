use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    Running { progress: f32 },
    Completed,
}

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub(crate) struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub(crate) fn phase(&self) -> AnimPhase {
        if self.elapsed >= self.duration {
            AnimPhase::Completed
        } else {
            AnimPhase::Running {
                progress: normalized_progress(self.elapsed, self.duration),
            }
        }
    }
}

/// Short emphasis pulse, used when a toast appears.
#[derive(Debug, Clone)]
pub struct FlashEffect {
    timer: EffectTimer,
}

impl FlashEffect {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            timer: EffectTimer::new(duration),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.phase(), AnimPhase::Running { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimPhase, FlashEffect, normalized_progress};
    use std::time::Duration;

    #[test]
    fn zero_duration_is_complete() {
        assert!((normalized_progress(Duration::ZERO, Duration::ZERO) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn flash_runs_then_completes() {
        let mut flash = FlashEffect::new(Duration::from_millis(200));
        assert!(matches!(flash.phase(), AnimPhase::Running { progress } if progress < 0.1));
        flash.advance(Duration::from_millis(100));
        assert!(flash.is_active());
        flash.advance(Duration::from_millis(150));
        assert_eq!(flash.phase(), AnimPhase::Completed);
    }
}
