//! Accent patterns: which beats of the measure are stressed.
//!
//! Patterns are written as a string of `X` (accent) and `.` (plain beat):
//!
//! ```
//! use practice_metronome::pattern::AccentPattern;
//!
//! let pattern: AccentPattern = "X..X..".parse().unwrap();
//! assert_eq!(pattern.beats_per_measure(), 6);
//! assert!(pattern.is_accent(3));
//!
//! // Presets are looked up by name
//! let backbeat: AccentPattern = "2&4".parse().unwrap();
//! assert_eq!(backbeat.to_string(), ".X.X");
//! ```

pub mod time_signature;

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

pub use time_signature::TimeSignature;

/// Named accent pattern offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub accents: &'static [bool],
}

const X: bool = true;
const O: bool = false;

pub const PRESETS: [Preset; 6] = [
    Preset {
        name: "4/4",
        accents: &[X, O, O, O],
    },
    Preset {
        name: "3/4",
        accents: &[X, O, O],
    },
    Preset {
        name: "6/8",
        accents: &[X, O, O, X, O, O],
    },
    Preset {
        name: "2&4",
        accents: &[O, X, O, X],
    },
    Preset {
        name: "exercise-1",
        accents: &[X, O, O, O, X, O, O, O, X, O, O, O, X, O, X, O],
    },
    Preset {
        name: "exercise-2",
        accents: &[X, O, O, X, O, X, O, O, X, O, O, X, O, O, X, O],
    },
];

impl Preset {
    pub fn pattern(&self) -> AccentPattern {
        AccentPattern::from(self.accents)
    }
}

/// Ordered accent flags, one per beat of the measure.
///
/// Never empty: an empty input becomes a single accented beat.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<bool>", into = "Vec<bool>"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccentPattern(Vec<bool>);

impl AccentPattern {
    pub fn new(accents: Vec<bool>) -> Self {
        if accents.is_empty() {
            Self(vec![true])
        } else {
            Self(accents)
        }
    }

    /// Downbeat accent for simple meters, an accent on every group start for
    /// compound meters.
    pub fn from_time_signature(ts: TimeSignature) -> Self {
        let accents = (0..ts.numerator)
            .map(|pulse| pulse == 0 || ts.starts_group(pulse))
            .collect();
        Self::new(accents)
    }

    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .map(Preset::pattern)
    }

    pub fn beats_per_measure(&self) -> usize {
        self.0.len()
    }

    /// Accent flag for `beat`, wrapping past the end of the measure.
    pub fn is_accent(&self, beat: usize) -> bool {
        self.0[beat % self.0.len()]
    }

    pub fn accents(&self) -> &[bool] {
        &self.0
    }

    /// Name of the preset this pattern matches, if any.
    pub fn preset_name(&self) -> Option<&'static str> {
        PRESETS
            .iter()
            .find(|preset| preset.accents == self.0.as_slice())
            .map(|preset| preset.name)
    }
}

impl Default for AccentPattern {
    fn default() -> Self {
        PRESETS[0].pattern()
    }
}

impl From<Vec<bool>> for AccentPattern {
    fn from(accents: Vec<bool>) -> Self {
        Self::new(accents)
    }
}

impl From<&[bool]> for AccentPattern {
    fn from(accents: &[bool]) -> Self {
        Self::new(accents.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for AccentPattern {
    fn from(accents: [bool; N]) -> Self {
        Self::new(accents.to_vec())
    }
}

impl From<AccentPattern> for Vec<bool> {
    fn from(pattern: AccentPattern) -> Self {
        pattern.0
    }
}

impl From<TimeSignature> for AccentPattern {
    fn from(ts: TimeSignature) -> Self {
        Self::from_time_signature(ts)
    }
}

impl fmt::Display for AccentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &accent in &self.0 {
            f.write_str(if accent { "X" } else { "." })?;
        }
        Ok(())
    }
}

/// Accepts a preset name, a time signature (`5/4`), or notation where `X`/`x`
/// marks an accent and `.`/`-` a plain beat. Spaces and bar lines are ignored.
impl FromStr for AccentPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(pattern) = Self::preset(s) {
            return Ok(pattern);
        }
        if s.contains('/') {
            return s.parse::<TimeSignature>().map(Self::from_time_signature);
        }

        let accents = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .map(|c| match c {
                'X' | 'x' => Ok(true),
                '.' | '-' => Ok(false),
                other => Err(PatternError::InvalidSymbol(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if accents.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self(accents))
    }
}
