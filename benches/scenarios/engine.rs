//! Benchmarks for scheduler ticks against an offline clock.

use std::hint::black_box;

use criterion::Criterion;
use practice_metronome::{
    clock::offline::OfflineClock,
    engine::{MetronomeEngine, SCHEDULE_QUANTUM},
    pattern::AccentPattern,
};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    // One tick plus one tick's worth of audio at the fastest tempo
    group.bench_function("tick_300bpm", |b| {
        let mut engine = MetronomeEngine::new(OfflineClock::source(48_000));
        engine.set_bpm(300);
        if let Some(pattern) = AccentPattern::preset("exercise-1") {
            engine.set_accent_pattern(pattern);
        }
        let _ = engine.start();

        b.iter(|| {
            if let Some(clock) = engine.clock_mut() {
                clock.advance(SCHEDULE_QUANTUM);
            }
            engine.tick();
            engine.deliver_beats();
            black_box(engine.current_beat());
        })
    });

    group.finish();
}
