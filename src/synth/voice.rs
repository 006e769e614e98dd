//! A single click voice.
//!
//! # How It Works
//!
//! Noise sounds (click, woodblock):
//! 1. White noise shaped by a fast exponential burst envelope
//! 2. Band-pass filter gives the burst its pitch and "knock"
//! 3. Output gain ramps exponentially down to silence
//!
//! Beep:
//! 1. Sine tone at a fixed pitch
//! 2. Same exponential output ramp
//!
//! The voice stops by itself once the output ramp has run its length.

use crate::{
    dsp::{decay::ExpDecay, filter::BandPass, oscillator::OscillatorBlock, RenderCtx},
    synth::sound::{ClickTone, Source, Sound, NOISE_BURST_SECS, SILENCE_LEVEL},
};

/// Everything needed to voice one beat.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickSpec {
    pub sound: Sound,
    pub accent: bool,
}

impl ClickSpec {
    pub fn new(sound: Sound, accent: bool) -> Self {
        Self { sound, accent }
    }
}

enum Generator {
    Noise {
        osc: OscillatorBlock,
        burst: ExpDecay,
        filter: BandPass,
    },
    Tone {
        osc: OscillatorBlock,
    },
}

pub struct ClickVoice {
    spec: ClickSpec,
    generator: Generator,
    gain: ExpDecay,
    ctx: RenderCtx,
}

impl ClickVoice {
    pub fn new(spec: ClickSpec, sample_rate: f32, seed: u64) -> Self {
        let ClickTone {
            source,
            gain,
            length,
        } = spec.sound.tone(spec.accent);

        let (generator, frequency) = match source {
            Source::Noise {
                decay_fraction,
                centre_hz,
                q,
            } => (
                Generator::Noise {
                    osc: OscillatorBlock::noise(seed),
                    burst: ExpDecay::time_constant(
                        NOISE_BURST_SECS * decay_fraction,
                        NOISE_BURST_SECS,
                        sample_rate,
                    ),
                    filter: BandPass::new(centre_hz, q),
                },
                centre_hz,
            ),
            Source::Sine { frequency } => (
                Generator::Tone {
                    osc: OscillatorBlock::sine(),
                },
                frequency,
            ),
        };

        Self {
            spec,
            generator,
            gain: ExpDecay::ramp(gain, SILENCE_LEVEL, length, sample_rate),
            ctx: RenderCtx::from_freq(sample_rate, frequency),
        }
    }

    pub fn spec(&self) -> ClickSpec {
        self.spec
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.gain.is_active() {
            return 0.0;
        }
        let raw = match &mut self.generator {
            Generator::Noise { osc, burst, filter } => {
                let shaped = osc.next_sample(&self.ctx) * burst.next_sample();
                filter.next_sample(shaped, &self.ctx)
            }
            Generator::Tone { osc } => osc.next_sample(&self.ctx),
        };
        raw * self.gain.next_sample()
    }

    /// Mix this voice into `out` (adds, does not overwrite).
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if !self.gain.is_active() {
                break;
            }
            *sample += self.next_sample();
        }
    }

    pub fn is_active(&self) -> bool {
        self.gain.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn energy(spec: ClickSpec) -> f32 {
        let mut voice = ClickVoice::new(spec, SAMPLE_RATE, 3);
        let mut buffer = vec![0.0f32; 4800];
        voice.render(&mut buffer);
        buffer.iter().map(|s| s * s).sum()
    }

    #[test]
    fn accents_are_louder_than_plain_beats() {
        for sound in Sound::ALL {
            let accent = energy(ClickSpec::new(sound, true));
            let plain = energy(ClickSpec::new(sound, false));
            assert!(accent > plain, "{sound}: accent {accent} vs plain {plain}");
        }
    }

    #[test]
    fn voices_stop_well_before_the_next_beat() {
        for sound in Sound::ALL {
            let mut voice = ClickVoice::new(ClickSpec::new(sound, true), SAMPLE_RATE, 1);
            let mut buffer = vec![0.0f32; 9600];
            voice.render(&mut buffer);

            assert!(!voice.is_active());
            // Nothing after 60 ms
            let tail = &buffer[(0.06 * SAMPLE_RATE) as usize..];
            assert!(tail.iter().all(|s| *s == 0.0), "{sound} rings too long");
        }
    }

    #[test]
    fn render_mixes_into_existing_signal() {
        let mut voice = ClickVoice::new(ClickSpec::new(Sound::Beep, false), SAMPLE_RATE, 0);
        let mut buffer = vec![0.25f32; 16];
        voice.render(&mut buffer);
        // First sine sample is 0, so the existing level is untouched
        assert_eq!(buffer[0], 0.25);
        assert!(buffer[1] > 0.25);
    }

    #[test]
    fn output_stays_bounded() {
        for sound in Sound::ALL {
            let mut voice = ClickVoice::new(ClickSpec::new(sound, true), SAMPLE_RATE, 99);
            let mut buffer = vec![0.0f32; 4800];
            voice.render(&mut buffer);
            assert!(buffer.iter().all(|s| s.abs() <= 1.5));
        }
    }
}
