//! Audio clocks the metronome schedules against.
//!
//! A clock exposes a monotonically advancing time in seconds (driven by the
//! audio hardware, or by rendering for [`offline::OfflineClock`]) and accepts
//! clicks stamped with an absolute time on that clock. Clicks are started by
//! the audio side at exactly that time, independent of when the scheduling
//! thread happens to wake up.

pub mod offline;

use crate::{error::EngineError, synth::ClickSpec};

/// Lifecycle of an audio clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    /// Time is frozen. Platforms may create clocks in this state until the
    /// user interacts; it must be resumed before anything will sound.
    Suspended,
    Closed,
}

/// A click stamped with its exact start time on the audio clock.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledClick {
    /// Seconds on the audio clock
    pub at: f64,
    /// Beat index within the measure
    pub beat: usize,
    pub click: ClickSpec,
}

pub trait AudioClock {
    /// Current time in seconds.
    fn now(&self) -> f64;

    fn state(&self) -> ClockState;

    fn resume(&mut self) -> Result<(), EngineError>;

    /// Queue a click to start at `click.at`. Times already in the past start
    /// as soon as possible.
    fn schedule(&mut self, click: ScheduledClick);

    /// Release the underlying output. Queued and sounding clicks are dropped.
    fn close(&mut self);
}

/// Lazily opens an audio clock the first time playback starts.
///
/// Any `FnMut() -> Result<C, EngineError>` is a source, which covers both
/// `open_default_output` and closures that build test clocks.
pub trait ClockSource {
    type Clock: AudioClock;

    fn open(&mut self) -> Result<Self::Clock, EngineError>;
}

impl<F, C> ClockSource for F
where
    F: FnMut() -> Result<C, EngineError>,
    C: AudioClock,
{
    type Clock = C;

    fn open(&mut self) -> Result<Self::Clock, EngineError> {
        self()
    }
}
