//! Benchmarks for the band-pass filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use practice_metronome::dsp::{filter::BandPass, oscillator::OscillatorBlock, RenderCtx};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 3500.0);

    for &size in BLOCK_SIZES {
        // White noise, the signal clicks actually filter
        let mut input = vec![0.0f32; size];
        OscillatorBlock::noise(7).render(&mut input, &ctx);

        for (name, q) in [("click", 5.0), ("click_accent", 7.5), ("woodblock", 2.0)] {
            let mut filter = BandPass::new(3500.0, q);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
