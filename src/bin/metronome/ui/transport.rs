//! Transport bar widget - shows BPM, play state, sound, pattern and timer

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" metronome ").borders(Borders::ALL);

    let play_symbol = if state.is_playing { "▶" } else { "⏸" };
    let play_state_str = if state.is_playing { "Playing" } else { "Stopped" };

    let routine = match state.today.1 {
        Some(routine) => format!("{} · Routine {}", state.today.0, routine),
        None => format!("{} · Free play", state.today.0),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} BPM  ", state.bpm),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state_str),
            Style::default().fg(if state.is_playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("Sound: {}  ", state.sound),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Pattern: {}  ", state.pattern_label),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{routine}  "), Style::default().fg(Color::DarkGray)),
    ];

    if let Some(timer) = state.timer {
        let colour = if timer.complete {
            Color::Green
        } else if timer.warning {
            Color::Red
        } else {
            Color::Magenta
        };
        let label = if timer.complete {
            "Done!".to_string()
        } else {
            format!("{}:{:02} ({}%)", timer.minutes, timer.seconds, timer.percent)
        };
        let suffix = if timer.running || timer.complete { "" } else { " paused" };
        spans.push(Span::styled(
            format!("Timer {label}{suffix}"),
            Style::default().fg(colour),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
