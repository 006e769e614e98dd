//! Realtime output through the system's default audio device.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};
use rtrb::{Producer, RingBuffer};

use crate::{
    clock::{AudioClock, ClockState, ScheduledClick},
    error::EngineError,
    synth::{message::ClickMessage, pool::VoicePool},
    MAX_BLOCK_SIZE,
};

const QUEUE_CAPACITY: usize = 256;

/// Audio clock backed by a cpal output stream.
///
/// Time is the number of frames the callback has written, so it advances in
/// whole device buffers. Clicks cross to the callback through a lock-free
/// ring and are started at their exact frame by the voice pool.
pub struct CpalClock {
    stream: Option<cpal::Stream>,
    frames: Arc<AtomicU64>,
    sample_rate: f64,
    channels: usize,
    tx: Producer<ClickMessage>,
    state: ClockState,
}

/// Open the default output device and start its stream.
pub fn open_default_output() -> Result<CpalClock, EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| EngineError::unavailable("no default output device available"))?;
    let config = device
        .default_output_config()
        .map_err(|err| EngineError::unavailable(format!("failed to fetch output config: {err}")))?;

    if config.sample_format() != SampleFormat::F32 {
        return Err(EngineError::unavailable(format!(
            "unsupported sample format {:?}",
            config.sample_format()
        )));
    }

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;

    let (tx, mut rx) = RingBuffer::<ClickMessage>::new(QUEUE_CAPACITY);
    let frames = Arc::new(AtomicU64::new(0));
    let frames_cb = frames.clone();
    let mut pool = VoicePool::new(sample_rate as f32);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                pool.drain(&mut rx);

                let total_frames = data.len() / channels;
                let mut position = frames_cb.load(Ordering::Relaxed);
                let mut written = 0;

                while written < total_frames {
                    let len = (total_frames - written).min(MAX_BLOCK_SIZE);
                    let block = &mut mono[..len];
                    pool.render(block, position);

                    // Mono to all channels
                    let out = &mut data[written * channels..(written + len) * channels];
                    for (frame, &s) in out.chunks_mut(channels).zip(block.iter()) {
                        frame.fill(s);
                    }

                    written += len;
                    position += len as u64;
                }

                frames_cb.store(position, Ordering::Release);
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .map_err(|err| EngineError::unavailable(format!("failed to build output stream: {err}")))?;

    let state = match stream.play() {
        Ok(()) => ClockState::Running,
        Err(err) => {
            tracing::warn!(%err, "output stream did not start, clock suspended");
            ClockState::Suspended
        }
    };

    tracing::info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "audio output opened"
    );

    Ok(CpalClock {
        stream: Some(stream),
        frames,
        sample_rate: sample_rate as f64,
        channels,
        tx,
        state,
    })
}

impl CpalClock {
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl AudioClock for CpalClock {
    fn now(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate
    }

    fn state(&self) -> ClockState {
        self.state
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| EngineError::unavailable("audio output is closed"))?;
        stream
            .play()
            .map_err(|err| EngineError::unavailable(format!("failed to resume output: {err}")))?;
        self.state = ClockState::Running;
        Ok(())
    }

    fn schedule(&mut self, click: ScheduledClick) {
        let at_frame = (click.at.max(0.0) * self.sample_rate).round() as u64;
        let msg = ClickMessage::Schedule {
            at_frame,
            click: click.click,
        };
        if self.tx.push(msg).is_err() {
            tracing::warn!(at = click.at, "click queue full, beat dropped");
        }
    }

    fn close(&mut self) {
        let _ = self.tx.push(ClickMessage::Silence);
        if self.stream.take().is_some() {
            tracing::debug!("audio output closed");
        }
        self.state = ClockState::Closed;
    }
}

impl Drop for CpalClock {
    fn drop(&mut self) {
        if self.state != ClockState::Closed {
            self.close();
        }
    }
}
