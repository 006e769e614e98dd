use crate::{
    clock::{AudioClock, ClockState, ScheduledClick},
    error::EngineError,
    synth::pool::VoicePool,
    MAX_BLOCK_SIZE,
};

/// A clock that only advances when audio is rendered from it.
///
/// Used for bouncing to a file and for driving the engine deterministically
/// in tests. Starts `Running`; call [`OfflineClock::suspend`] to model an
/// output the platform has not allowed to play yet.
pub struct OfflineClock {
    pool: VoicePool,
    sample_rate: u32,
    frames: u64,
    state: ClockState,
    /// Only kept when built with [`OfflineClock::with_history`]
    scheduled: Option<Vec<ScheduledClick>>,
    scratch: Vec<f32>,
}

impl OfflineClock {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            pool: VoicePool::new(sample_rate as f32),
            sample_rate,
            frames: 0,
            state: ClockState::Running,
            scheduled: None,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Record every scheduled click for inspection.
    pub fn with_history(mut self) -> Self {
        self.scheduled.get_or_insert_with(Vec::new);
        self
    }

    /// A clock source that opens a fresh offline clock each time.
    pub fn source(sample_rate: u32) -> impl FnMut() -> Result<OfflineClock, EngineError> {
        move || Ok(OfflineClock::new(sample_rate))
    }

    /// Like [`source`](Self::source), with click history enabled.
    pub fn recording_source(
        sample_rate: u32,
    ) -> impl FnMut() -> Result<OfflineClock, EngineError> {
        move || Ok(OfflineClock::new(sample_rate).with_history())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Every click scheduled since creation, in scheduling order. Empty
    /// unless history is enabled.
    pub fn scheduled(&self) -> &[ScheduledClick] {
        self.scheduled.as_deref().unwrap_or_default()
    }

    pub fn suspend(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Suspended;
        }
    }

    /// Render mono audio into `out` and advance the clock by its length.
    ///
    /// A suspended or closed clock outputs silence and does not advance.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.state != ClockState::Running {
            out.fill(0.0);
            return;
        }
        self.pool.render(out, self.frames);
        self.frames += out.len() as u64;
    }

    /// Advance by `seconds`, discarding the audio.
    pub fn advance(&mut self, seconds: f64) {
        let mut remaining = (seconds * self.sample_rate as f64).round().max(0.0) as usize;
        let mut scratch = std::mem::take(&mut self.scratch);
        while remaining > 0 && self.state == ClockState::Running {
            let len = remaining.min(scratch.len());
            self.render(&mut scratch[..len]);
            remaining -= len;
        }
        self.scratch = scratch;
    }
}

impl AudioClock for OfflineClock {
    fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn state(&self) -> ClockState {
        self.state
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        match self.state {
            ClockState::Closed => Err(EngineError::unavailable("offline clock is closed")),
            _ => {
                self.state = ClockState::Running;
                Ok(())
            }
        }
    }

    fn schedule(&mut self, click: ScheduledClick) {
        if self.state == ClockState::Closed {
            return;
        }
        let at_frame = (click.at.max(0.0) * self.sample_rate as f64).round() as u64;
        if !self.pool.enqueue(at_frame, click.click) {
            tracing::warn!(at = click.at, "offline clock queue full, click dropped");
        }
        if let Some(history) = self.scheduled.as_mut() {
            history.push(click);
        }
    }

    fn close(&mut self) {
        self.pool.silence();
        self.state = ClockState::Closed;
    }
}
