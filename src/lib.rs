pub mod clock; // Audio clocks (offline and realtime)
pub mod dsp;
pub mod engine; // Lookahead beat scheduler
pub mod error;
pub mod pattern; // Accent patterns and presets
pub mod schedule;
pub mod synth; // Click voices and the voice pool
pub mod tap;
pub mod timeline; // Loop region and sections
pub mod timer;

#[cfg(feature = "rtrb")]
pub mod backend;
#[cfg(feature = "serde")]
pub mod config;

pub use engine::MetronomeEngine;
pub use error::EngineError;

pub const MAX_BLOCK_SIZE: usize = 2048;
