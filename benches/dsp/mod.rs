//! Benchmarks for low-level DSP primitives.

mod decay;
mod filter;
mod oscillator;

pub use decay::bench_decay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
