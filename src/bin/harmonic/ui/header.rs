//! Status bar: sound settings, octave and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use harmonic_synth::{
    dsp::{filter::FilterType, oscillator::Waveform},
    VoiceParams,
};

use super::state::EngineStatus;

fn waveform_label(waveform: Waveform) -> &'static str {
    match waveform {
        Waveform::Sine => "Sine",
        Waveform::Saw => "Saw",
        Waveform::Square => "Square",
    }
}

fn filter_label(filter_type: FilterType) -> &'static str {
    match filter_type {
        FilterType::LowPass => "LP",
        FilterType::BandPass => "BP",
        FilterType::HighPass => "HP",
    }
}

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    params: &VoiceParams,
    status: &EngineStatus,
    octave: i32,
    sample_rate: f32,
) {
    let block = Block::default().title(" harmonic ").borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", waveform_label(params.oscillator.waveform)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(
                "{} {:.0} Hz Q {:.2}  ",
                filter_label(params.filter.filter_type),
                params.filter.cutoff,
                params.filter.resonance
            ),
            Style::default().fg(Color::Green),
        ),
        Span::styled(format!("Octave {}  ", octave), Style::default().fg(Color::White)),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}", status.peak),
            Style::default().fg(if status.peak >= 1.0 {
                Color::Red
            } else {
                Color::Magenta
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
