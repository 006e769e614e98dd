//! Beat indicator widget - one cell per beat, lit on the current beat

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

/// Beats per row before the indicator wraps (exercise patterns have 16)
const BEATS_PER_ROW: usize = 8;

pub fn render_beats(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Beats ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<&[bool]> = state.accents.chunks(BEATS_PER_ROW).collect();
    if rows.is_empty() || inner.height == 0 {
        return;
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
        .split(inner);

    for (row_idx, (accents, row_area)) in rows.iter().zip(row_areas.iter()).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, BEATS_PER_ROW as u32); BEATS_PER_ROW])
            .split(*row_area);

        for (col, &accent) in accents.iter().enumerate() {
            let beat = row_idx * BEATS_PER_ROW + col;
            let lit = state.lit_beat.is_some_and(|event| event.beat == beat);

            let (symbol, colour) = match (accent, lit) {
                (true, true) => ("●", Color::Red),
                (false, true) => ("●", Color::Green),
                (true, false) => ("○", Color::LightRed),
                (false, false) => ("○", Color::DarkGray),
            };
            let mut style = Style::default().fg(colour);
            if lit {
                style = style.add_modifier(Modifier::BOLD);
            }

            let cell = Paragraph::new(vec![
                Line::from(symbol),
                Line::from(format!("{}", beat + 1)),
            ])
            .style(style)
            .alignment(Alignment::Center);
            frame.render_widget(cell, cells[col]);
        }
    }
}
