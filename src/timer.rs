use std::time::{Duration, Instant};

/// Remaining time under which the display should warn.
pub const DEFAULT_WARNING: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Completed,
}

/// Countdown for a timed exercise.
///
/// Time is passed in explicitly so the owner decides the clock; `update`
/// is expected to be called regularly while running.
#[derive(Debug, Clone)]
pub struct PracticeTimer {
    duration: Duration,
    /// Remaining time when the current run started
    remaining_at_start: Duration,
    remaining: Duration,
    started: Option<Instant>,
    complete: bool,
}

impl PracticeTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining_at_start: duration,
            remaining: duration,
            started: None,
            complete: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.remaining.is_zero() {
            return;
        }
        self.remaining_at_start = self.remaining;
        self.started = Some(now);
        self.complete = false;
    }

    pub fn pause(&mut self, now: Instant) {
        self.update(now);
        self.started = None;
        self.remaining_at_start = self.remaining;
    }

    /// Stop and rewind, optionally to a new duration.
    pub fn reset(&mut self, duration: Option<Duration>) {
        if let Some(duration) = duration {
            self.duration = duration;
        }
        self.remaining = self.duration;
        self.remaining_at_start = self.duration;
        self.started = None;
        self.complete = false;
    }

    /// Recompute the remaining time. Returns `Completed` exactly once, on
    /// the update that reaches zero.
    pub fn update(&mut self, now: Instant) -> Option<TimerEvent> {
        let started = self.started?;
        let elapsed = now.saturating_duration_since(started);
        self.remaining = self.remaining_at_start.saturating_sub(elapsed);

        if self.remaining.is_zero() {
            self.started = None;
            self.complete = true;
            tracing::info!(duration_secs = self.duration.as_secs(), "practice timer completed");
            return Some(TimerEvent::Completed);
        }
        None
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn minutes(&self) -> u64 {
        self.remaining.as_secs() / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining.as_secs() % 60
    }

    /// Fraction elapsed, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining.as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_warning(&self, threshold: Duration) -> bool {
        !self.remaining.is_zero() && self.remaining <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn counts_down_while_running() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new(Duration::from_secs(90));
        timer.start(t0);
        assert_eq!(timer.update(t0 + 15 * SECOND), None);

        assert_eq!(timer.remaining(), Duration::from_secs(75));
        assert_eq!((timer.minutes(), timer.seconds()), (1, 15));
        assert!((timer.progress() - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn pause_holds_remaining_time() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new(Duration::from_secs(60));
        timer.start(t0);
        timer.pause(t0 + 10 * SECOND);
        assert!(!timer.is_running());

        // Time passing while paused does not count
        assert_eq!(timer.update(t0 + 30 * SECOND), None);
        timer.start(t0 + 40 * SECOND);
        timer.update(t0 + 45 * SECOND);
        assert_eq!(timer.remaining(), Duration::from_secs(45));
    }

    #[test]
    fn completes_exactly_once() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new(Duration::from_secs(3));
        timer.start(t0);
        assert_eq!(timer.update(t0 + 4 * SECOND), Some(TimerEvent::Completed));
        assert_eq!(timer.update(t0 + 5 * SECOND), None);
        assert!(timer.is_complete());
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn reset_rewinds_and_accepts_new_duration() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new(Duration::from_secs(3));
        timer.start(t0);
        timer.update(t0 + 4 * SECOND);

        timer.reset(Some(Duration::from_secs(120)));
        assert!(!timer.is_complete());
        assert_eq!(timer.remaining(), Duration::from_secs(120));
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn warns_near_the_end() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new(Duration::from_secs(10));
        assert!(!timer.is_warning(DEFAULT_WARNING));
        timer.start(t0);
        timer.update(t0 + 6 * SECOND);
        assert!(timer.is_warning(DEFAULT_WARNING));
    }
}
