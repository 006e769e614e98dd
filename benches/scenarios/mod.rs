//! Real-world scenario benchmarks.
//!
//! Complete click voices as the audio callback renders them, and the
//! scheduler work done on each tick.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
