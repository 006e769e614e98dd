//! Click timbres and their synthesis parameters.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Length of the raw noise burst behind click and woodblock sounds.
pub const NOISE_BURST_SECS: f32 = 0.02;
/// Gain level treated as silence at the end of a click.
pub const SILENCE_LEVEL: f32 = 0.001;

/// Selectable metronome sound. Only chooses synthesis parameters; there is no
/// stored sample behind any of them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sound {
    #[default]
    Click,
    Woodblock,
    Beep,
}

/// What produces the raw signal of a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// Band-passed white noise burst
    Noise {
        /// Burst time constant as a fraction of `NOISE_BURST_SECS`
        decay_fraction: f32,
        /// Band-pass centre (Hz)
        centre_hz: f32,
        q: f32,
    },
    /// Plain sine tone
    Sine { frequency: f32 },
}

/// Fully resolved parameters for one note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTone {
    pub source: Source,
    /// Initial output gain, ramped exponentially to `SILENCE_LEVEL`
    pub gain: f32,
    /// Seconds until the voice stops
    pub length: f32,
}

impl Sound {
    pub const ALL: [Sound; 3] = [Sound::Click, Sound::Woodblock, Sound::Beep];

    pub fn name(self) -> &'static str {
        match self {
            Sound::Click => "click",
            Sound::Woodblock => "woodblock",
            Sound::Beep => "beep",
        }
    }

    /// The next sound in `ALL`, wrapping around.
    pub fn next(self) -> Sound {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Resolve the tone for an accented or plain beat.
    ///
    /// Accents sit higher, ring narrower and play 1.75x louder on the noise
    /// sounds; on the beep they are higher and louder.
    pub fn tone(self, accent: bool) -> ClickTone {
        match self {
            Sound::Click | Sound::Woodblock => {
                let (decay_fraction, base_q) = match self {
                    Sound::Woodblock => (0.15, 2.0),
                    _ => (0.08, 5.0),
                };
                ClickTone {
                    source: Source::Noise {
                        decay_fraction,
                        centre_hz: if accent { 3500.0 } else { 2500.0 },
                        q: if accent { base_q * 1.5 } else { base_q },
                    },
                    gain: if accent { 1.4 } else { 0.8 },
                    length: 0.05,
                }
            }
            Sound::Beep => ClickTone {
                source: Source::Sine {
                    frequency: if accent { 1000.0 } else { 800.0 },
                },
                gain: if accent { 1.0 } else { 0.6 },
                length: 0.04,
            },
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sound {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownSound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_noise_is_brighter_narrower_and_louder() {
        for sound in [Sound::Click, Sound::Woodblock] {
            let accent = sound.tone(true);
            let plain = sound.tone(false);
            let (
                Source::Noise { centre_hz: ac, q: aq, .. },
                Source::Noise { centre_hz: pc, q: pq, .. },
            ) = (accent.source, plain.source)
            else {
                panic!("{sound} should be noise based");
            };
            assert!(ac > pc);
            assert!(aq > pq);
            assert!((accent.gain / plain.gain - 1.75).abs() < 1e-6);
        }
    }

    #[test]
    fn woodblock_decays_slower_than_click() {
        let decay = |sound: Sound| match sound.tone(false).source {
            Source::Noise { decay_fraction, .. } => decay_fraction,
            Source::Sine { .. } => unreachable!(),
        };
        assert!(decay(Sound::Woodblock) > decay(Sound::Click));
    }

    #[test]
    fn every_tone_fits_between_beats_at_300_bpm() {
        for sound in Sound::ALL {
            for accent in [true, false] {
                assert!(sound.tone(accent).length < 0.2);
            }
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Woodblock".parse::<Sound>().unwrap(), Sound::Woodblock);
        assert_eq!(" beep ".parse::<Sound>().unwrap(), Sound::Beep);
        assert!("cowbell".parse::<Sound>().is_err());
    }

    #[test]
    fn next_cycles_through_all() {
        assert_eq!(Sound::Click.next(), Sound::Woodblock);
        assert_eq!(Sound::Woodblock.next(), Sound::Beep);
        assert_eq!(Sound::Beep.next(), Sound::Click);
    }
}
