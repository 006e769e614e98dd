use std::time::{Duration, Instant};

/// How far ahead of the audio clock notes are scheduled (seconds).
pub const SCHEDULE_AHEAD: f64 = 0.1;
/// How often the scheduler wakes up.
pub const TICK_INTERVAL: Duration = Duration::from_millis(25);
/// The cursor may trail the clock by at most one tick before beats are
/// skipped instead of played late.
pub const SCHEDULE_QUANTUM: f64 = 0.025;

pub fn seconds_per_beat(bpm: u32) -> f64 {
    60.0 / bpm as f64
}

/// Milliseconds to wait before showing a beat scheduled at `scheduled`.
pub fn visual_delay_ms(scheduled: f64, now: f64) -> f64 {
    ((scheduled - now) * 1000.0).max(0.0)
}

/// Position of the next beat to schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatCursor {
    /// Audio clock time of the next note (seconds)
    pub next_note_time: f64,
    /// Beat index of that note within the measure
    pub current_beat: usize,
    /// No note scheduled since the cursor was placed
    fresh: bool,
}

impl BeatCursor {
    pub fn new(start: f64) -> Self {
        Self {
            next_note_time: start,
            current_beat: 0,
            fresh: true,
        }
    }

    /// True while the next note falls inside the lookahead window.
    pub fn is_due(&self, now: f64) -> bool {
        self.next_note_time < now + SCHEDULE_AHEAD
    }

    pub fn advance(&mut self, bpm: u32, beats_per_measure: usize) {
        self.next_note_time += seconds_per_beat(bpm);
        self.current_beat = (self.current_beat + 1) % beats_per_measure.max(1);
        self.fresh = false;
    }

    /// Skip whole beats along the current grid until the cursor is no more
    /// than one quantum behind `now`. Returns the number of beats skipped.
    ///
    /// A fresh cursor has no grid yet: it moves to `now` and keeps its beat.
    pub fn catch_up(&mut self, now: f64, bpm: u32, beats_per_measure: usize) -> u64 {
        let floor = now - SCHEDULE_QUANTUM;
        if self.next_note_time >= floor {
            return 0;
        }
        if self.fresh {
            self.next_note_time = now;
            return 0;
        }
        let spb = seconds_per_beat(bpm);
        let skipped = ((floor - self.next_note_time) / spb).ceil() as u64;
        self.next_note_time += skipped as f64 * spb;
        let n = beats_per_measure.max(1) as u64;
        self.current_beat = ((self.current_beat as u64 + skipped % n) % n) as usize;
        skipped
    }

    /// Bring `current_beat` into a new measure length.
    pub fn wrap(&mut self, beats_per_measure: usize) {
        self.current_beat %= beats_per_measure.max(1);
    }

    pub fn reset_beat(&mut self) {
        self.current_beat = 0;
    }
}

/// Recurring wall-clock timer driving the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    interval: Duration,
    next_due: Instant,
}

impl TickTimer {
    /// Armed timers are due immediately.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now,
        }
    }

    /// Returns true once per elapsed interval. Missed intervals are not
    /// replayed.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_delay_never_negative() {
        assert_eq!(visual_delay_ms(1.0, 2.0), 0.0);
        assert!((visual_delay_ms(1.05, 1.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn advance_wraps_beat() {
        let mut cursor = BeatCursor::new(0.0);
        for _ in 0..5 {
            cursor.advance(120, 4);
        }
        assert_eq!(cursor.current_beat, 1);
        assert!((cursor.next_note_time - 2.5).abs() < 1e-9);
    }

    #[test]
    fn catch_up_stays_on_grid() {
        let mut cursor = BeatCursor::new(0.0);
        cursor.advance(120, 4);
        cursor.next_note_time = 0.0;
        cursor.current_beat = 0;
        // Clock jumped to 1.26 s at 120 BPM: beats at 0, 0.5, 1.0 missed
        let skipped = cursor.catch_up(1.26, 120, 4);
        assert_eq!(skipped, 3);
        assert!((cursor.next_note_time - 1.5).abs() < 1e-9);
        assert_eq!(cursor.current_beat, 3);
        assert!(cursor.next_note_time >= 1.26 - SCHEDULE_QUANTUM);
    }

    #[test]
    fn fresh_cursor_moves_to_now_instead_of_skipping() {
        let mut cursor = BeatCursor::new(0.0);
        assert_eq!(cursor.catch_up(0.2, 120, 4), 0);
        assert_eq!(cursor.next_note_time, 0.2);
        assert_eq!(cursor.current_beat, 0);

        cursor.advance(120, 4);
        assert_eq!(cursor.catch_up(1.5, 120, 4), 2);
    }

    #[test]
    fn catch_up_ignores_small_lag() {
        let mut cursor = BeatCursor::new(1.0);
        assert_eq!(cursor.catch_up(1.02, 60, 4), 0);
        assert_eq!(cursor.next_note_time, 1.0);
    }

    #[test]
    fn tick_timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = TickTimer::new(TICK_INTERVAL, start);
        assert!(timer.due(start));
        assert!(!timer.due(start + Duration::from_millis(10)));
        assert!(timer.due(start + Duration::from_millis(25)));
        // A long stall yields a single tick
        assert!(timer.due(start + Duration::from_millis(200)));
        assert!(!timer.due(start + Duration::from_millis(210)));
    }
}
