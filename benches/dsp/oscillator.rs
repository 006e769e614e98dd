use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use practice_metronome::dsp::{oscillator::OscillatorBlock, RenderCtx};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::from_freq(48_000.0, 1000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut sine = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| sine.render(black_box(&mut buffer), black_box(&ctx)))
        });

        let mut noise = OscillatorBlock::noise(1);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| noise.render(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
