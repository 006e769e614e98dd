use std::{cell::RefCell, rc::Rc};

use practice_metronome::{
    clock::{offline::OfflineClock, AudioClock, ClockSource, ScheduledClick},
    engine::SCHEDULE_QUANTUM,
    pattern::AccentPattern,
    synth::{ClickSpec, Sound},
    MetronomeEngine,
};

const SAMPLE_RATE: u32 = 48_000;

/// Tick and render the way `metronome bounce` does, returning the audio.
fn render<S: ClockSource<Clock = OfflineClock>>(
    engine: &mut MetronomeEngine<S>,
    seconds: f64,
) -> Vec<f32> {
    let chunk = (SCHEDULE_QUANTUM * SAMPLE_RATE as f64) as usize;
    let total = (seconds * SAMPLE_RATE as f64) as usize;
    let mut out = vec![0.0f32; total];

    for block in out.chunks_mut(chunk) {
        engine.tick();
        engine.deliver_beats();
        match engine.clock_mut() {
            Some(clock) => clock.render(block),
            None => break,
        }
    }
    out
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

fn window(audio: &[f32], at: f64, length: f64) -> &[f32] {
    let start = (at * SAMPLE_RATE as f64) as usize;
    let end = ((at + length) * SAMPLE_RATE as f64) as usize;
    &audio[start.min(audio.len())..end.min(audio.len())]
}

#[test]
fn clicks_land_on_the_beat_grid() {
    let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
    engine.set_bpm(120);
    engine.start().unwrap();

    let audio = render(&mut engine, 2.0);

    // Sound right after each beat, silence in between
    for beat in 0..4 {
        let at = beat as f64 * 0.5;
        assert!(peak(window(&audio, at, 0.02)) > 0.01, "no click at {at}s");
        assert_eq!(peak(window(&audio, at + 0.1, 0.35)), 0.0, "noise after {at}s");
    }
}

#[test]
fn first_sample_of_each_click_is_exact() {
    let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
    engine.set_bpm(100);
    engine.start().unwrap();

    let audio = render(&mut engine, 2.0);
    let onsets: Vec<usize> = audio
        .iter()
        .enumerate()
        .filter(|(i, s)| **s != 0.0 && (*i == 0 || audio[i - 1] == 0.0))
        .map(|(i, _)| i)
        .filter(|i| i % 28_800 < 10)
        .collect();

    // 0.6 s per beat = 28 800 frames
    assert_eq!(onsets.first(), Some(&0));
    assert!(onsets.contains(&28_800));
    assert!(onsets.contains(&57_600));
}

#[test]
fn accents_are_louder() {
    for sound in Sound::ALL {
        let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
        engine.set_bpm(60);
        engine.set_sound(sound);
        engine.set_accent_pattern([true, false]);
        engine.start().unwrap();

        let audio = render(&mut engine, 2.0);
        let energy = |samples: &[f32]| samples.iter().map(|s| s * s).sum::<f32>();
        let accent = energy(window(&audio, 0.0, 0.06));
        let plain = energy(window(&audio, 1.0, 0.06));
        assert!(accent > plain, "{sound}: accent {accent}, plain {plain}");
    }
}

#[test]
fn output_never_clips_hard() {
    let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
    engine.set_bpm(300);
    engine.set_sound(Sound::Click);
    engine.set_accent_pattern([true]);
    engine.start().unwrap();

    let audio = render(&mut engine, 2.0);
    assert!(peak(&audio) <= 1.5);
    assert!(audio.iter().all(|s| s.is_finite()));
}

#[test]
fn beat_listener_matches_audio() {
    let heard = Rc::new(RefCell::new(Vec::new()));
    let log = heard.clone();

    let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
    engine.set_bpm(120);
    engine.set_accent_pattern("X..".parse::<AccentPattern>().unwrap());
    engine.set_on_beat(move |beat, accent| log.borrow_mut().push((beat, accent)));
    engine.start().unwrap();

    render(&mut engine, 2.0);
    assert_eq!(
        heard.borrow().as_slice(),
        &[(0, true), (1, false), (2, false), (0, true)]
    );
}

#[test]
fn destroy_silences_everything() {
    let mut engine = MetronomeEngine::new(OfflineClock::source(SAMPLE_RATE));
    engine.set_bpm(120);
    engine.start().unwrap();
    render(&mut engine, 0.5);

    engine.destroy();
    assert!(engine.clock().is_none());
    assert!(engine.start().is_err());

    // A clock handed back after close stays silent
    let mut clock = OfflineClock::new(SAMPLE_RATE);
    clock.schedule(ScheduledClick {
        at: 0.0,
        beat: 0,
        click: ClickSpec::new(Sound::Beep, true),
    });
    clock.close();
    let mut out = vec![0.0f32; 4800];
    clock.render(&mut out);
    assert_eq!(peak(&out), 0.0);
}
