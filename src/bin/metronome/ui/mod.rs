//! TUI module for metronome
//!
//! Drives the engine from the draw loop and shows beats as they reach the
//! speakers.

mod beats;
pub mod state;
mod transport;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use practice_metronome::{
    clock::ClockSource,
    pattern::PRESETS,
    schedule::{self, Routine},
    timer::{PracticeTimer, DEFAULT_WARNING},
    MetronomeEngine,
};

use beats::render_beats;
use state::{BeatEvent, TimerView, UiState};
use transport::render_transport;

/// Input poll timeout; short enough that the 25 ms scheduler tick stays
/// close to schedule
const INPUT_POLL: Duration = Duration::from_millis(5);
/// How long a beat stays lit
const FLASH: Duration = Duration::from_millis(120);

/// UI application state
pub struct UiApp<S: ClockSource> {
    engine: MetronomeEngine<S>,
    /// Beats delivered by the engine's listener
    beat_rx: Consumer<BeatEvent>,
    last_beat: Option<(BeatEvent, Instant)>,
    timer: Option<PracticeTimer>,
    /// Last state drawn; `None` forces a redraw
    drawn: Option<UiState>,
    preset_index: usize,
    today: (chrono::Weekday, Option<Routine>),
    status: Option<String>,
    should_quit: bool,
}

impl<S: ClockSource> UiApp<S> {
    pub fn new(
        engine: MetronomeEngine<S>,
        beat_rx: Consumer<BeatEvent>,
        timer: Option<PracticeTimer>,
    ) -> Self {
        let preset_index = engine
            .pattern()
            .preset_name()
            .and_then(|name| PRESETS.iter().position(|p| p.name == name))
            .unwrap_or(0);

        Self {
            engine,
            beat_rx,
            last_beat: None,
            timer,
            drawn: None,
            preset_index,
            today: schedule::today(),
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.engine.poll(now);
            self.poll_beats(now);
            self.update_timer(now);

            let state = self.capture(now);
            if self.drawn.as_ref() != Some(&state) {
                terminal.draw(|frame| render(frame, &state))?;
                self.drawn = Some(state);
            }

            if event::poll(INPUT_POLL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code);
                    }
                    Event::Resize(..) => self.drawn = None,
                    _ => {}
                }
            }
        }

        self.engine.destroy();
        Ok(())
    }

    fn poll_beats(&mut self, now: Instant) {
        while let Ok(event) = self.beat_rx.pop() {
            self.last_beat = Some((event, now));
        }
    }

    fn update_timer(&mut self, now: Instant) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        if timer.update(now).is_some() {
            self.engine.stop();
            self.status = Some("Exercise complete".to_string());
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        let now = Instant::now();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle(now),
            KeyCode::Char('t') | KeyCode::Char('T') => match self.engine.tap() {
                Some(bpm) => self.status = Some(format!("Tapped {bpm} BPM")),
                None => self.status = Some("Tap again...".to_string()),
            },
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_bpm(1),
            KeyCode::Char('-') => self.nudge_bpm(-1),
            KeyCode::Char(']') => self.nudge_bpm(10),
            KeyCode::Char('[') => self.nudge_bpm(-10),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.preset_index = (self.preset_index + 1) % PRESETS.len();
                let preset = PRESETS[self.preset_index];
                self.engine.set_accent_pattern(preset.pattern());
                self.status = Some(format!("Pattern {}", preset.name));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let sound = self.engine.sound().next();
                self.engine.set_sound(sound);
            }
            _ => {}
        }
    }

    fn toggle(&mut self, now: Instant) {
        match self.engine.toggle() {
            Ok(()) => {
                self.status = None;
                if let Some(timer) = self.timer.as_mut() {
                    if self.engine.is_playing() {
                        if timer.is_complete() {
                            timer.reset(None);
                        }
                        timer.start(now);
                    } else {
                        timer.pause(now);
                    }
                }
                if !self.engine.is_playing() {
                    self.last_beat = None;
                }
            }
            Err(err) => {
                tracing::error!(%err, "failed to start metronome");
                self.status = Some(format!("Audio unavailable: {err}"));
            }
        }
    }

    fn nudge_bpm(&mut self, delta: i32) {
        let bpm = self.engine.bpm() as i32 + delta;
        self.engine.set_bpm(bpm);
    }

    fn capture(&self, now: Instant) -> UiState {
        let pattern = self.engine.pattern();
        let lit_beat = self
            .last_beat
            .filter(|(_, at)| now.duration_since(*at) < FLASH)
            .map(|(event, _)| event);

        UiState {
            bpm: self.engine.bpm(),
            is_playing: self.engine.is_playing(),
            sound: self.engine.sound(),
            accents: pattern.accents().to_vec(),
            pattern_label: pattern
                .preset_name()
                .map(str::to_string)
                .unwrap_or_else(|| pattern.to_string()),
            lit_beat,
            timer: self.timer.as_ref().map(|timer| TimerView {
                minutes: timer.minutes(),
                seconds: timer.seconds(),
                percent: (timer.progress() * 100.0).round().clamp(0.0, 100.0) as u8,
                running: timer.is_running(),
                warning: timer.is_warning(DEFAULT_WARNING),
                complete: timer.is_complete(),
            }),
            today: self.today,
            status: self.status.clone(),
        }
    }
}

/// Render the UI
fn render(frame: &mut Frame, state: &UiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(4),    // Beat indicators
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_transport(frame, chunks[0], state);
    render_beats(frame, chunks[1], state);

    if let Some(status) = &state.status {
        let line = Paragraph::new(format!(" {status}")).style(Style::default().fg(Color::Yellow));
        frame.render_widget(line, chunks[2]);
    }

    let help = Paragraph::new(
        " [Space] Start/Stop  [T] Tap  [+/-] ±1  [[/]] ±10  [P] Pattern  [S] Sound  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use practice_metronome::clock::offline::OfflineClock;
    use rtrb::RingBuffer;

    use super::*;

    fn app() -> UiApp<impl ClockSource<Clock = OfflineClock>> {
        let (_tx, rx) = RingBuffer::<BeatEvent>::new(8);
        let engine = MetronomeEngine::new(OfflineClock::source(48_000));
        UiApp::new(engine, rx, Some(PracticeTimer::new(Duration::from_secs(60))))
    }

    #[test]
    fn idle_screen_is_not_redrawn() {
        let app = app();
        let now = Instant::now();
        assert_eq!(app.capture(now), app.capture(now + Duration::from_millis(5)));
        assert_eq!(app.capture(now), app.capture(now + Duration::from_secs(2)));
    }

    #[test]
    fn visible_changes_trigger_redraw() {
        let mut app = app();
        let now = Instant::now();
        let before = app.capture(now);

        app.handle_key(KeyCode::Char('+'));
        assert_ne!(app.capture(now), before);

        let event = BeatEvent { beat: 0, accent: true };
        app.last_beat = Some((event, now));
        let lit = app.capture(now);
        assert_eq!(lit.lit_beat, Some(event));
        // The flash expiring is a change too
        assert_ne!(app.capture(now + FLASH), lit);
    }
}
