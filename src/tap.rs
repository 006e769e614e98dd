use std::{collections::VecDeque, time::Instant};

use crate::engine::{MAX_BPM, MIN_BPM};

/// Taps kept for averaging.
pub const MAX_TAPS: usize = 5;
/// A gap longer than this starts a new tap sequence.
pub const RESET_GAP_MS: f64 = 2000.0;

/// Estimates a tempo from the intervals between the last few taps.
#[derive(Debug, Clone)]
pub struct TapTempo {
    taps: VecDeque<f64>,
    origin: Instant,
}

impl TapTempo {
    pub fn new() -> Self {
        Self {
            taps: VecDeque::with_capacity(MAX_TAPS + 1),
            origin: Instant::now(),
        }
    }

    /// Record a tap at the current wall-clock time.
    pub fn tap(&mut self) -> Option<u32> {
        let ms = self.origin.elapsed().as_secs_f64() * 1000.0;
        self.tap_at(ms)
    }

    /// Record a tap at `timestamp_ms` and return the new estimate, if any.
    ///
    /// Needs at least two taps. When the latest gap exceeds `RESET_GAP_MS`
    /// only the newest tap is kept and no estimate is produced.
    pub fn tap_at(&mut self, timestamp_ms: f64) -> Option<u32> {
        self.taps.push_back(timestamp_ms);
        while self.taps.len() > MAX_TAPS {
            self.taps.pop_front();
        }
        if self.taps.len() < 2 {
            return None;
        }

        let intervals: Vec<f64> = self
            .taps
            .iter()
            .zip(self.taps.iter().skip(1))
            .map(|(a, b)| b - a)
            .collect();

        let last_gap = intervals.last().copied().unwrap_or_default();
        if last_gap > RESET_GAP_MS {
            self.taps.clear();
            self.taps.push_back(timestamp_ms);
            tracing::debug!(gap_ms = last_gap, "tap sequence reset");
            return None;
        }

        let avg = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if avg <= 0.0 {
            return Some(MAX_BPM);
        }
        let bpm = (60_000.0 / avg).round();
        Some(bpm.clamp(MIN_BPM as f64, MAX_BPM as f64) as u32)
    }

    pub fn taps(&self) -> impl Iterator<Item = f64> + '_ {
        self.taps.iter().copied()
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }
}

impl Default for TapTempo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tap_has_no_estimate() {
        let mut taps = TapTempo::new();
        assert_eq!(taps.tap_at(0.0), None);
    }

    #[test]
    fn steady_half_second_taps_are_120() {
        let mut taps = TapTempo::new();
        taps.tap_at(0.0);
        assert_eq!(taps.tap_at(500.0), Some(120));
        assert_eq!(taps.tap_at(1000.0), Some(120));
    }

    #[test]
    fn long_gap_resets_to_latest_tap() {
        let mut taps = TapTempo::new();
        taps.tap_at(0.0);
        taps.tap_at(500.0);
        assert_eq!(taps.tap_at(3000.0), None);
        assert_eq!(taps.taps().collect::<Vec<_>>(), vec![3000.0]);

        assert_eq!(taps.tap_at(3600.0), Some(100));
    }

    #[test]
    fn keeps_only_last_five_taps() {
        let mut taps = TapTempo::new();
        // Slow taps first, then fast ones push them out
        for t in [0.0, 1000.0, 2000.0] {
            taps.tap_at(t);
        }
        let mut last = None;
        for t in [2250.0, 2500.0, 2750.0, 3000.0, 3250.0] {
            last = taps.tap_at(t);
        }
        assert_eq!(taps.taps().count(), MAX_TAPS);
        assert_eq!(last, Some(240));
    }

    #[test]
    fn estimate_is_clamped() {
        let mut taps = TapTempo::new();
        taps.tap_at(0.0);
        assert_eq!(taps.tap_at(100.0), Some(300));

        taps.reset();
        taps.tap_at(0.0);
        assert_eq!(taps.tap_at(1999.0), Some(30));
    }
}
