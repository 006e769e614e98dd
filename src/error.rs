/// Errors surfaced by the metronome engine and its audio clocks.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The platform refused to create or resume the audio output.
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),
    /// `start()` was called after `destroy()`.
    #[error("metronome engine has been destroyed")]
    Destroyed,
    #[error("unknown metronome sound `{0}` (expected click, woodblock or beep)")]
    UnknownSound(String),
}

impl EngineError {
    pub fn unavailable<T: Into<String>>(msg: T) -> Self {
        Self::AudioUnavailable(msg.into())
    }
}

/// Errors from parsing accent pattern text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("accent pattern is empty")]
    Empty,
    #[error("invalid accent symbol `{0}` (use `X` for accents and `.` for plain beats)")]
    InvalidSymbol(char),
}

/// Errors from loading a settings file.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
