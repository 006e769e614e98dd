use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use practice_metronome::dsp::decay::ExpDecay;

use crate::BLOCK_SIZES;

pub fn bench_decay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/decay");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("ramp", size), &size, |b, _| {
            b.iter(|| {
                // Fresh curve each pass so it never runs out mid-benchmark
                let mut ramp = ExpDecay::ramp(1.4, 0.001, 0.05, 48_000.0);
                ramp.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
