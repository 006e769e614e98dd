//! State types passed to the widgets
//!
//! Beat events arrive through a ring buffer; everything else is captured
//! from the engine once per frame.

use chrono::Weekday;
use practice_metronome::{schedule::Routine, synth::Sound};

/// A beat reached the audio output (sent from the engine's listener)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatEvent {
    pub beat: usize,
    pub accent: bool,
}

/// Countdown display values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerView {
    pub minutes: u64,
    pub seconds: u64,
    /// Whole percent elapsed
    pub percent: u8,
    pub running: bool,
    pub warning: bool,
    pub complete: bool,
}

/// Snapshot rendered each frame. The screen is redrawn only when it changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub bpm: u32,
    pub is_playing: bool,
    pub sound: Sound,
    /// Accent flag per beat of the measure
    pub accents: Vec<bool>,
    /// Preset the pattern matches, or its notation
    pub pattern_label: String,
    /// Beat to light up, while its flash lasts
    pub lit_beat: Option<BeatEvent>,
    pub timer: Option<TimerView>,
    pub today: (Weekday, Option<Routine>),
    pub status: Option<String>,
}
