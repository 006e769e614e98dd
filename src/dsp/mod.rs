//! Low-level DSP primitives used to synthesize metronome clicks.
//!
//! These components are allocation-free and realtime-safe, so a click voice
//! can be built and rendered directly inside the audio callback.

/// Exponential gain curves (time-constant decay and target ramps).
pub mod decay;
/// Band-pass state-variable filter used to colour noise bursts.
pub mod filter;
/// Sine and white-noise sources.
pub mod oscillator;

/// Context passed to the primitives while rendering.
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch or centre frequency to render (Hz)
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
}

impl RenderCtx {
    pub fn from_freq(sample_rate: f32, frequency: f32) -> Self {
        Self {
            sample_rate,
            frequency,
        }
    }
}
