//! The metronome engine: a lookahead scheduler over an audio clock.
//!
//! The engine wakes up every [`TICK_INTERVAL`] (driven by [`MetronomeEngine::poll`])
//! and schedules every note that falls within the next [`SCHEDULE_AHEAD`]
//! seconds at its exact audio-clock time. Wake-up jitter therefore never
//! reaches the audio; it only shifts when notes get *queued*.
//!
//! Visual feedback is kept separate: each scheduled note also queues a beat
//! notification that is delivered to the listener once the clock reaches the
//! note's time.

pub mod scheduler;

use std::{collections::VecDeque, time::Instant};

use crate::{
    clock::{AudioClock, ClockSource, ClockState, ScheduledClick},
    error::EngineError,
    pattern::AccentPattern,
    synth::{ClickSpec, Sound},
    tap::TapTempo,
};

pub use self::scheduler::{
    seconds_per_beat, visual_delay_ms, BeatCursor, TickTimer, SCHEDULE_AHEAD, SCHEDULE_QUANTUM,
    TICK_INTERVAL,
};

pub const MIN_BPM: u32 = 20;
pub const MAX_BPM: u32 = 300;
pub const DEFAULT_BPM: u32 = 80;

pub fn clamp_bpm(bpm: i64) -> u32 {
    bpm.clamp(MIN_BPM as i64, MAX_BPM as i64) as u32
}

#[derive(Debug, Clone, Copy)]
struct PendingBeat {
    /// Audio clock time at which to notify
    fire_at: f64,
    beat: usize,
    accent: bool,
}

type BeatListener = Box<dyn FnMut(usize, bool)>;

pub struct MetronomeEngine<S: ClockSource> {
    source: S,
    clock: Option<S::Clock>,
    bpm: u32,
    pattern: AccentPattern,
    sound: Sound,
    cursor: BeatCursor,
    playing: bool,
    destroyed: bool,
    timer: Option<TickTimer>,
    listener: Option<BeatListener>,
    pending_beats: VecDeque<PendingBeat>,
    taps: TapTempo,
}

impl<S: ClockSource> MetronomeEngine<S> {
    /// Create an idle engine. The clock is not opened until the first
    /// [`start`](Self::start).
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: None,
            bpm: DEFAULT_BPM,
            pattern: AccentPattern::default(),
            sound: Sound::default(),
            cursor: BeatCursor::new(0.0),
            playing: false,
            destroyed: false,
            timer: None,
            listener: None,
            pending_beats: VecDeque::new(),
            taps: TapTempo::new(),
        }
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.destroyed {
            return Err(EngineError::Destroyed);
        }

        let clock = match self.clock.take() {
            Some(clock) if clock.state() != ClockState::Closed => clock,
            _ => self.source.open().inspect_err(|err| {
                tracing::error!(%err, "failed to open audio clock");
            })?,
        };
        let clock = self.clock.insert(clock);

        if clock.state() == ClockState::Suspended {
            clock.resume().inspect_err(|err| {
                tracing::error!(%err, "failed to resume audio clock");
            })?;
        }

        if self.playing {
            return Ok(());
        }

        let now = clock.now();
        self.cursor = BeatCursor::new(now);
        self.pending_beats.clear();
        self.playing = true;
        self.timer = Some(TickTimer::new(TICK_INTERVAL, Instant::now()));

        tracing::info!(bpm = self.bpm, pattern = %self.pattern, sound = %self.sound, "metronome started");
        Ok(())
    }

    /// Stop scheduling. Clicks already handed to the clock still play.
    pub fn stop(&mut self) {
        self.timer = None;
        self.cursor.reset_beat();
        self.pending_beats.clear();
        if self.playing {
            self.playing = false;
            tracing::info!("metronome stopped");
        }
    }

    pub fn toggle(&mut self) -> Result<(), EngineError> {
        if self.playing {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Clamped to [`MIN_BPM`, `MAX_BPM`]. Takes effect from the next note.
    pub fn set_bpm(&mut self, bpm: i32) {
        self.bpm = clamp_bpm(bpm as i64);
        tracing::debug!(bpm = self.bpm, "tempo changed");
    }

    pub fn set_accent_pattern(&mut self, pattern: impl Into<AccentPattern>) {
        self.pattern = pattern.into();
        self.cursor.wrap(self.pattern.beats_per_measure());
        tracing::debug!(pattern = %self.pattern, "accent pattern changed");
    }

    pub fn set_sound(&mut self, sound: Sound) {
        self.sound = sound;
        tracing::debug!(%sound, "sound changed");
    }

    /// Register the beat listener, replacing any previous one. Called from
    /// [`poll`](Self::poll) with the beat index and whether it is accented.
    pub fn set_on_beat<F>(&mut self, listener: F)
    where
        F: FnMut(usize, bool) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// One scheduler pass.
    pub fn tick(&mut self) {
        if self.destroyed || !self.playing {
            return;
        }
        let Some(clock) = self.clock.as_mut() else {
            return;
        };

        match clock.state() {
            ClockState::Running => {}
            ClockState::Suspended => {
                if let Err(err) = clock.resume() {
                    tracing::warn!(%err, "audio clock suspended, resume failed");
                }
                return;
            }
            ClockState::Closed => return,
        }

        let now = clock.now();
        let beats_per_measure = self.pattern.beats_per_measure();

        let skipped = self.cursor.catch_up(now, self.bpm, beats_per_measure);
        if skipped > 0 {
            tracing::warn!(skipped, "scheduler fell behind the audio clock, skipping beats");
        }

        while self.cursor.is_due(now) {
            let beat = self.cursor.current_beat;
            let accent = self.pattern.is_accent(beat);
            let at = self.cursor.next_note_time;

            clock.schedule(ScheduledClick {
                at,
                beat,
                click: ClickSpec::new(self.sound, accent),
            });

            let delay_ms = visual_delay_ms(at, now);
            self.pending_beats.push_back(PendingBeat {
                fire_at: now + delay_ms / 1000.0,
                beat,
                accent,
            });

            self.cursor.advance(self.bpm, beats_per_measure);
        }
    }

    /// Fire the listener for every beat whose time has been reached.
    pub fn deliver_beats(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(now) = self.clock.as_ref().map(|clock| clock.now()) else {
            return;
        };

        while self
            .pending_beats
            .front()
            .is_some_and(|pending| pending.fire_at <= now)
        {
            let Some(pending) = self.pending_beats.pop_front() else {
                break;
            };
            if let Some(listener) = self.listener.as_mut() {
                listener(pending.beat, pending.accent);
            }
        }
    }

    /// Drive the engine from the owning thread's loop.
    pub fn poll(&mut self, now: Instant) {
        if self.timer.as_mut().is_some_and(|timer| timer.due(now)) {
            self.tick();
        }
        self.deliver_beats();
    }

    /// Register a tap and apply the resulting tempo estimate.
    pub fn tap(&mut self) -> Option<u32> {
        let bpm = self.taps.tap()?;
        self.set_bpm(bpm as i32);
        Some(bpm)
    }

    pub fn tap_at(&mut self, timestamp_ms: f64) -> Option<u32> {
        let bpm = self.taps.tap_at(timestamp_ms)?;
        self.set_bpm(bpm as i32);
        Some(bpm)
    }

    /// Stop, close the audio clock and drop the listener. The engine is
    /// inert afterwards.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();
        if let Some(mut clock) = self.clock.take() {
            clock.close();
        }
        self.listener = None;
        self.destroyed = true;
        tracing::debug!("metronome destroyed");
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn pattern(&self) -> &AccentPattern {
        &self.pattern
    }

    pub fn beats_per_measure(&self) -> usize {
        self.pattern.beats_per_measure()
    }

    pub fn sound(&self) -> Sound {
        self.sound
    }

    /// Beat index of the next note to be scheduled.
    pub fn current_beat(&self) -> usize {
        self.cursor.current_beat
    }

    pub fn next_note_time(&self) -> f64 {
        self.cursor.next_note_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn pending_beats(&self) -> usize {
        self.pending_beats.len()
    }

    pub fn taps(&self) -> &TapTempo {
        &self.taps
    }

    pub fn clock(&self) -> Option<&S::Clock> {
        self.clock.as_ref()
    }

    pub fn clock_mut(&mut self) -> Option<&mut S::Clock> {
        self.clock.as_mut()
    }
}

impl<S: ClockSource> Drop for MetronomeEngine<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
