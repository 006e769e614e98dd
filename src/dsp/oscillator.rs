use std::f32::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::dsp::RenderCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Noise,
}

/// Phase-accumulating oscillator.
///
/// The noise source owns its own seeded generator so two voices started in
/// the same block do not produce identical bursts.
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    /// Normalized phase in [0, 1)
    phase: f32,
    rng: SmallRng,
}

impl OscillatorBlock {
    pub fn sine() -> Self {
        Self {
            waveform: OscillatorWaveform::Sine,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    pub fn noise(seed: u64) -> Self {
        Self {
            waveform: OscillatorWaveform::Noise,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => {
                let sample = (TAU * self.phase).sin();
                self.phase += ctx.frequency / ctx.sample_rate;
                self.phase -= self.phase.floor();
                sample
            }
            OscillatorWaveform::Noise => self.rng.gen_range(-1.0..1.0),
        }
    }

    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        for sample in destination.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }
}
