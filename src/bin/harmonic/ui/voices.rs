//! One envelope gauge per voice

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use super::state::{note_name, EngineStatus};

const VOICE_COLORS: [Color; 5] = [
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
];

pub fn render_voices(frame: &mut Frame, area: Rect, status: &EngineStatus) {
    let block = Block::default()
        .title(format!(
            " Voices {}/{} ",
            status.active_voices, status.num_voices
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let voices = &status.voices[..status.num_voices];
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(voices.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    for (i, (voice, row)) in voices.iter().zip(rows.iter()).enumerate() {
        let label = match voice.note {
            Some(note) if voice.releasing => format!(
                "{:<4} vel {:.2} release {:.2}",
                note_name(note),
                voice.velocity,
                voice.level
            ),
            Some(note) => format!(
                "{:<4} vel {:.2} {:.2}",
                note_name(note),
                voice.velocity,
                voice.level
            ),
            None => String::from("-"),
        };
        let color = if voice.releasing {
            Color::DarkGray
        } else {
            VOICE_COLORS[i % VOICE_COLORS.len()]
        };

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from(voice.level.clamp(0.0, 1.0)))
            .label(label);
        frame.render_widget(gauge, *row);
    }
}
