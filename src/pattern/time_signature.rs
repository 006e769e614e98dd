use std::{fmt, str::FromStr};

use crate::error::PatternError;

/// Time signature with support for simple and compound meters.
///
/// The metronome clicks once per counted pulse (`numerator` clicks per bar).
/// The grouping only decides where accents fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    /// Number of pulses per bar (numerator)
    pub numerator: u8,
    /// Note value that gets one pulse (denominator: 4 = quarter, 8 = eighth)
    pub denominator: u8,
    /// Pulses grouped per felt beat
    /// Simple meters: 1 (2/4, 3/4, 4/4)
    /// Compound meters: 3 (6/8, 9/8, 12/8)
    pub tactus_group: u8,
}

impl TimeSignature {
    pub const FOUR_FOUR: TimeSignature = TimeSignature::simple(4, 4);
    pub const THREE_FOUR: TimeSignature = TimeSignature::simple(3, 4);
    pub const TWO_FOUR: TimeSignature = TimeSignature::simple(2, 4);
    /// Compound duple, two dotted-quarter beats
    pub const SIX_EIGHT: TimeSignature = TimeSignature::compound(6);
    pub const NINE_EIGHT: TimeSignature = TimeSignature::compound(9);
    pub const TWELVE_EIGHT: TimeSignature = TimeSignature::compound(12);

    pub const fn simple(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
            tactus_group: 1,
        }
    }

    /// Compound meter over eighth notes, grouped in threes.
    pub const fn compound(numerator: u8) -> Self {
        Self {
            numerator,
            denominator: 8,
            tactus_group: 3,
        }
    }

    /// Felt beats per bar: 4 for 4/4, 2 for 6/8, 3 for 9/8.
    pub fn tactus_beats_per_bar(&self) -> u8 {
        if self.is_compound() && self.numerator % self.tactus_group == 0 {
            self.numerator / self.tactus_group
        } else {
            self.numerator
        }
    }

    pub fn is_compound(&self) -> bool {
        self.tactus_group == 3
    }

    pub fn is_simple(&self) -> bool {
        !self.is_compound()
    }

    /// Whether `pulse` (0-based, within the bar) starts a felt beat group.
    pub fn starts_group(&self, pulse: u8) -> bool {
        self.is_compound() && pulse % self.tactus_group == 0
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parses `N/D`. Denominator 8 with a numerator divisible by three (and more
/// than three) is read as compound.
impl FromStr for TimeSignature {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PatternError::InvalidSymbol(s.chars().next().unwrap_or('/'));
        let (num, den) = s.split_once('/').ok_or_else(invalid)?;
        let numerator: u8 = num.trim().parse().map_err(|_| invalid())?;
        let denominator: u8 = den.trim().parse().map_err(|_| invalid())?;
        if numerator == 0 || denominator == 0 {
            return Err(PatternError::Empty);
        }

        if denominator == 8 && numerator > 3 && numerator % 3 == 0 {
            Ok(Self::compound(numerator))
        } else {
            Ok(Self::simple(numerator, denominator))
        }
    }
}
