//! TUI for the harmonic instrument
//!
//! Keys play notes and edit the parameter store; every edit sends a fresh
//! snapshot to the engine. Audio and voice status come back through rings.

mod header;
mod spectrum;
pub mod state;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{debug, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer, PushError};
use std::{thread, time::Duration};

use harmonic_synth::{
    dsp::{filter::FilterType, oscillator::Waveform},
    io::converter::midi_to_synth,
    synth::message::SynthMessage,
    ParamStore,
};

pub use state::EngineStatus;

use crate::keyboard::Keyboard;
use header::render_header;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization window length
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Cutoff moves by this factor per key press
const CUTOFF_STEP: f32 = 1.25;
const RESONANCE_STEP: f32 = 0.1;

pub struct UiApp {
    control_tx: Producer<SynthMessage>,
    audio_rx: Consumer<f32>,
    status_rx: Consumer<EngineStatus>,
    status: EngineStatus,
    params: ParamStore,
    keyboard: Keyboard,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<SynthMessage>,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<EngineStatus>,
        sample_rate: f32,
    ) -> Self {
        Self {
            control_tx,
            audio_rx,
            status_rx,
            status: EngineStatus::default(),
            params: ParamStore::new(),
            keyboard: Keyboard::new(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.send_params();

        while !self.should_quit {
            self.poll_audio();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.send(SynthMessage::AllNotesOff {
            allow_tail_off: false,
        });
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received {
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn poll_status(&mut self) {
        // Keep only the latest
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.keyboard.release_all();
                self.send(SynthMessage::AllNotesOff {
                    allow_tail_off: true,
                });
            }
            KeyCode::Char('z') => self.keyboard.octave_down(),
            KeyCode::Char('x') => self.keyboard.octave_up(),
            KeyCode::Char('1') => self.set_param("OSC1", Waveform::Sine.index() as f32),
            KeyCode::Char('2') => self.set_param("OSC1", Waveform::Saw.index() as f32),
            KeyCode::Char('3') => self.set_param("OSC1", Waveform::Square.index() as f32),
            KeyCode::Tab => {
                let next = (self.filter_type().index() + 1) % 3;
                self.set_param("FILTERTYPE", next as f32);
            }
            KeyCode::Char('[') => self.scale_param("FILTERCUTOFF", 1.0 / CUTOFF_STEP),
            KeyCode::Char(']') => self.scale_param("FILTERCUTOFF", CUTOFF_STEP),
            KeyCode::Char('-') => self.adjust_param("FILTERRESONANCE", -RESONANCE_STEP),
            KeyCode::Char('=') => self.adjust_param("FILTERRESONANCE", RESONANCE_STEP),
            KeyCode::Char(c) => {
                if let Some(note) = self.keyboard.note_for(c) {
                    let event = self.keyboard.toggle(note);
                    if let Some(message) = midi_to_synth(event, 0) {
                        self.send(message);
                    }
                }
            }
            _ => {}
        }
    }

    fn set_param(&mut self, id: &str, value: f32) {
        match self.params.set(id, value) {
            Ok(_) => self.send_params(),
            Err(err) => warn!("{err}"),
        }
    }

    fn adjust_param(&mut self, id: &str, delta: f32) {
        match self.params.adjust(id, delta) {
            Ok(_) => self.send_params(),
            Err(err) => warn!("{err}"),
        }
    }

    fn scale_param(&mut self, id: &str, factor: f32) {
        match self.params.get(id) {
            Ok(value) => self.set_param(id, value * factor),
            Err(err) => warn!("{err}"),
        }
    }

    fn send_params(&mut self) {
        let snapshot = self.params.snapshot();
        debug!(
            "params: {:?}, {:?} {:.0} Hz",
            snapshot.oscillator.waveform, snapshot.filter.filter_type, snapshot.filter.cutoff
        );
        self.send(SynthMessage::Params(snapshot));
    }

    fn send(&mut self, message: SynthMessage) {
        let mut pending = message;
        loop {
            match self.control_tx.push(pending) {
                Ok(_) => break,
                Err(PushError::Full(returned)) => {
                    if self.control_tx.is_abandoned() {
                        warn!("control queue abandoned; dropping {:?}", returned);
                        break;
                    }
                    pending = returned;
                    thread::sleep(Duration::from_micros(200));
                }
            }
        }
    }

    fn filter_type(&self) -> FilterType {
        self.params.snapshot().filter.filter_type
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let voice_rows = self.status.num_voices.max(1) as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),          // Header
                Constraint::Min(8),             // Scope + spectrum
                Constraint::Length(voice_rows), // Voices
                Constraint::Length(1),          // Help bar
            ])
            .split(area);

        render_header(
            frame,
            chunks[0],
            &self.params.snapshot(),
            &self.status,
            self.keyboard.octave(),
            self.sample_rate,
        );

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        render_voices(frame, chunks[2], &self.status);

        let help = Paragraph::new(
            " [a-k] Notes  [z/x] Octave  [1/2/3] Wave  [Tab] Filter  [ [ ] ] Cutoff  [-/=] Res  [Space] Release  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
