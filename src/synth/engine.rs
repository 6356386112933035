//! Top-level engine: voice pool plus control-message plumbing.
//!
//! The control thread pushes [`SynthMessage`]s into a queue; the audio thread
//! calls [`Synthesizer::process_block`], which drains the queue, applies the
//! newest parameter snapshot and renders the pool. Messages that need
//! sample accuracy go through [`Synthesizer::process_block_with_events`]
//! instead.

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    io::AudioBuffer,
    params::{ModulationRate, VoiceParams},
    synth::{
        message::{MessageReceiver, NoMessages, SynthMessage, TimedMessage},
        poly::{VoicePool, DEFAULT_VOICES},
    },
    MAX_BLOCK_SIZE, MAX_CHANNELS,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub num_channels: usize,
    pub num_voices: usize,
    pub filter_modulation: ModulationRate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            max_block_size: 512,
            num_channels: MAX_CHANNELS,
            num_voices: DEFAULT_VOICES,
            filter_modulation: ModulationRate::Block,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
        self
    }

    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    pub fn with_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels.clamp(1, MAX_CHANNELS);
        self
    }

    pub fn with_voices(mut self, num_voices: usize) -> Self {
        self.num_voices = num_voices.max(1);
        self
    }

    pub fn with_filter_modulation(mut self, rate: ModulationRate) -> Self {
        self.filter_modulation = rate;
        self
    }

    /// Same config with every field pulled into its valid range.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            sample_rate: if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
                self.sample_rate
            } else {
                defaults.sample_rate
            },
            max_block_size: self.max_block_size.clamp(1, MAX_BLOCK_SIZE),
            num_channels: self.num_channels.clamp(1, MAX_CHANNELS),
            num_voices: self.num_voices.max(1),
            filter_modulation: self.filter_modulation,
        }
    }
}

pub struct Synthesizer<R: MessageReceiver = NoMessages> {
    config: EngineConfig,
    pool: VoicePool,
    params: VoiceParams,
    rx: R,
}

impl Synthesizer<NoMessages> {
    /// Engine driven only through direct calls.
    pub fn without_queue(config: EngineConfig) -> Self {
        Self::new(config, NoMessages)
    }
}

impl<R: MessageReceiver> Synthesizer<R> {
    pub fn new(config: EngineConfig, rx: R) -> Self {
        let config = config.sanitized();
        let params = VoiceParams::default();

        let mut pool = VoicePool::new(config.num_voices);
        pool.set_modulation_rate(config.filter_modulation);
        pool.apply_params(&params);
        pool.prepare_to_play(config.sample_rate, config.max_block_size, config.num_channels);

        debug!(
            "synthesizer ready: {} voices, {} Hz, block {}, {} channels, {:?} filter modulation",
            config.num_voices,
            config.sample_rate,
            config.max_block_size,
            config.num_channels,
            config.filter_modulation
        );

        Self {
            config,
            pool,
            params,
            rx,
        }
    }

    /// Re-prepare for a new sample rate or block size. Allocates.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.config = self
            .config
            .with_sample_rate(sample_rate)
            .with_max_block_size(max_block_size);
        self.pool.prepare_to_play(
            self.config.sample_rate,
            self.config.max_block_size,
            self.config.num_channels,
        );
        debug!(
            "synthesizer re-prepared: {} Hz, block {}",
            self.config.sample_rate, self.config.max_block_size
        );
    }

    pub fn set_params(&mut self, params: VoiceParams) {
        self.params = params;
        self.pool.apply_params(&self.params);
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) {
        self.pool.note_on(note, velocity);
    }

    pub fn note_off(&mut self, note: u8) {
        self.pool.note_off(note);
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        self.pool.all_notes_off(allow_tail_off);
    }

    /// Drain pending control messages, then render `num_samples` into
    /// `output` (cleared first).
    pub fn process_block(&mut self, output: &mut AudioBuffer, num_samples: usize) {
        self.drain_messages();
        self.pool.render_block(output, num_samples);
    }

    /// Like [`process_block`](Self::process_block), but additionally applies
    /// `events` at their frame offsets. Offsets past the block are applied at
    /// its end; events must be sorted by offset.
    pub fn process_block_with_events(
        &mut self,
        output: &mut AudioBuffer,
        num_samples: usize,
        events: &[TimedMessage],
    ) {
        self.drain_messages();

        let num_samples = num_samples.min(output.num_samples());
        output.clear_range(0, num_samples);

        let mut position = 0;
        for event in events {
            let offset = event.offset.clamp(position, num_samples);
            if offset > position {
                self.pool.render_range(output, position, offset - position);
                position = offset;
            }
            self.handle_message(event.message);
        }

        if position < num_samples {
            self.pool.render_range(output, position, num_samples - position);
        }
    }

    fn drain_messages(&mut self) {
        let mut pending_params = None;

        while let Some(message) = self.rx.pop() {
            match message {
                // Only the newest snapshot matters
                SynthMessage::Params(params) => pending_params = Some(params),
                other => self.handle_message(other),
            }
        }

        if let Some(params) = pending_params {
            self.set_params(params);
        }
    }

    fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.pool.note_on(note, velocity),
            SynthMessage::NoteOff { note, .. } => self.pool.note_off(note),
            SynthMessage::AllNotesOff { allow_tail_off } => self.pool.all_notes_off(allow_tail_off),
            SynthMessage::Params(params) => self.set_params(params),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &VoiceParams {
        &self.params
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn active_voice_count(&self) -> usize {
        self.pool.active_voice_count()
    }

    pub fn reset(&mut self) {
        self.pool.reset();
    }
}
