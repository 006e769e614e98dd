use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    engine::DEFAULT_BPM,
    error::{ConfigError, PatternError},
    pattern::AccentPattern,
    synth::Sound,
};

/// Metronome settings as stored in a JSON file. Missing fields fall back to
/// their defaults.
///
/// ```json
/// { "bpm": 96, "sound": "woodblock", "pattern": "6/8" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetronomeConfig {
    pub bpm: i32,
    pub sound: Sound,
    /// Preset name, time signature, or `X`/`.` notation
    pub pattern: String,
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM as i32,
            sound: Sound::default(),
            pattern: "4/4".to_string(),
        }
    }
}

impl MetronomeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn accent_pattern(&self) -> Result<AccentPattern, PatternError> {
        self.pattern.parse()
    }
}
