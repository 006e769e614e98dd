//! Play and bounce entry points

use std::{cell::Cell, path::Path, rc::Rc, time::Duration};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use rtrb::RingBuffer;

use practice_metronome::{
    backend::open_default_output,
    clock::{offline::OfflineClock, ClockSource},
    engine::{seconds_per_beat, SCHEDULE_QUANTUM},
    pattern::AccentPattern,
    synth::Sound,
    timer::PracticeTimer,
    MetronomeEngine,
};

use crate::ui::{state::BeatEvent, UiApp};

/// Beat notifications buffered between polls of the UI loop
const BEAT_QUEUE_SIZE: usize = 64;

/// Resolved tempo settings (config file merged with CLI flags)
#[derive(Debug, Clone)]
pub struct Settings {
    pub bpm: i32,
    pub sound: Sound,
    pub pattern: AccentPattern,
}

impl Settings {
    fn apply<S: ClockSource>(&self, engine: &mut MetronomeEngine<S>) {
        engine.set_bpm(self.bpm);
        engine.set_sound(self.sound);
        engine.set_accent_pattern(self.pattern.clone());
    }
}

/// Run the interactive metronome until the user quits.
pub fn run_play(settings: Settings, minutes: Option<u64>) -> EyreResult<()> {
    let (mut beat_tx, beat_rx) = RingBuffer::<BeatEvent>::new(BEAT_QUEUE_SIZE);

    let mut engine = MetronomeEngine::new(open_default_output);
    settings.apply(&mut engine);
    engine.set_on_beat(move |beat, accent| {
        if beat_tx.push(BeatEvent { beat, accent }).is_err() {
            tracing::trace!(beat, "beat queue full");
        }
    });

    let timer = minutes.map(|m| PracticeTimer::new(Duration::from_secs(m * 60)));
    let mut app = UiApp::new(engine, beat_rx, timer);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

/// Render `bars` measures of clicks to a 16-bit mono WAV file.
pub fn run_bounce(settings: Settings, out: &Path, bars: u32, sample_rate: u32) -> EyreResult<()> {
    let mut engine = MetronomeEngine::new(OfflineClock::source(sample_rate));
    settings.apply(&mut engine);

    let heard = Rc::new(Cell::new(0usize));
    let counter = heard.clone();
    engine.set_on_beat(move |_, _| counter.set(counter.get() + 1));
    engine.start().wrap_err("failed to start offline clock")?;

    let bpm = engine.bpm();
    let total_beats = bars as usize * engine.beats_per_measure();
    let total_secs = total_beats as f64 * seconds_per_beat(bpm);
    let total_frames = (total_secs * sample_rate as f64).round() as usize;
    let chunk = ((SCHEDULE_QUANTUM * sample_rate as f64).round() as usize).max(1);

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(out, spec)
        .wrap_err_with(|| format!("failed to create {}", out.display()))?;

    let mut block = vec![0.0f32; chunk];
    let mut written = 0;
    while written < total_frames {
        engine.tick();
        engine.deliver_beats();

        let len = chunk.min(total_frames - written);
        let Some(clock) = engine.clock_mut() else {
            break;
        };
        clock.render(&mut block[..len]);
        for sample in &block[..len] {
            let scaled = sample.clamp(-1.0, 1.0) * i16::MAX as f32;
            writer.write_sample(scaled as i16)?;
        }
        written += len;
    }
    engine.deliver_beats();
    writer.finalize().wrap_err("failed to finish WAV file")?;
    engine.destroy();

    tracing::info!(
        path = %out.display(),
        beats = heard.get(),
        seconds = total_secs,
        "bounce complete"
    );
    println!(
        "Wrote {} ({} beats at {} BPM, {:.1}s)",
        out.display(),
        heard.get(),
        bpm,
        total_secs
    );
    Ok(())
}
