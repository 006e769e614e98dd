//! Benchmarks for click voices and the voice pool.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use practice_metronome::synth::{
    pool::{VoicePool, MAX_VOICES},
    voice::ClickVoice,
    ClickSpec, Sound,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE VOICE ===
        // Built fresh each pass: construction happens in the callback too
        for sound in Sound::ALL {
            let spec = ClickSpec::new(sound, true);
            group.bench_with_input(BenchmarkId::new(sound.name(), size), &size, |b, _| {
                b.iter(|| {
                    let mut voice = ClickVoice::new(spec, SAMPLE_RATE, 1);
                    buffer.fill(0.0);
                    voice.render(black_box(&mut buffer));
                })
            });
        }

        // === FULL POOL ===
        // Worst case: every voice sounding at once
        group.bench_with_input(BenchmarkId::new("pool_full", size), &size, |b, _| {
            b.iter(|| {
                let mut pool = VoicePool::new(SAMPLE_RATE);
                for i in 0..MAX_VOICES as u64 {
                    pool.enqueue(i, ClickSpec::new(Sound::Woodblock, i % 4 == 0));
                }
                pool.render(black_box(&mut buffer), 0);
            })
        });
    }

    group.finish();
}
