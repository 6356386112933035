use log::debug;

use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeState},
        filter::{clamp_cutoff, FilterType, SVFilter},
    },
    io::AudioBuffer,
    params::{FilterParams, ModulationRate, VoiceParams},
    synth::bank::OscillatorBank,
    MAX_BLOCK_SIZE, MAX_CHANNELS,
};

/*
Harmonic Voice
==============

One voice = one note. Per channel it runs an oscillator bank (fundamental,
nine sub-harmonics, nine overtones) and a filter; the two envelopes are shared
by both channels.

Render pipeline for each block
------------------------------

    filter env ──(one value per block)──► cutoff = base + depth · env
                                                    │
    bank[ch] ─► Σ 19 osc ─► × VOICE_GAIN ─► × amp env ─► filter[ch] ─► += out
                 per sample                  per sample   per sample

The filter envelope is stepped through the whole block (so its times stay in
seconds) but only its final value re-tunes the filter, once, before any sample
is rendered. `ModulationRate::Sample` switches to a per-sample contour.

Lifecycle
---------

    Free ──start_note──► Active ──stop_note──► Releasing ──env idle──► Free
                           ▲                      │
                           └──────start_note──────┘

A voice is audible exactly while its amplitude envelope is not Idle.
*/

/// Fixed calibration gain applied to the summed stack.
pub const VOICE_GAIN: f32 = 0.07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Key held, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

pub struct HarmonicVoice {
    note: u8,
    velocity: f32,
    state: VoiceState,
    age: u64,

    prepared: bool,
    sample_rate: f32,
    num_channels: usize,
    block_size: usize,

    banks: [OscillatorBank; MAX_CHANNELS],
    filters: [SVFilter; MAX_CHANNELS],
    amp_env: Envelope,
    filter_env: Envelope,

    filter_params: FilterParams,
    modulation_rate: ModulationRate,
    filter_env_output: f32,
    gain: f32,

    scratch: AudioBuffer,
    mod_buffer: Vec<f32>,
}

impl HarmonicVoice {
    pub fn new() -> Self {
        let params = VoiceParams::default();
        let mut voice = Self {
            note: 0,
            velocity: 0.0,
            state: VoiceState::Free,
            age: 0,
            prepared: false,
            sample_rate: 44_100.0,
            num_channels: MAX_CHANNELS,
            block_size: 0,
            banks: std::array::from_fn(|_| OscillatorBank::new()),
            filters: std::array::from_fn(|_| SVFilter::default()),
            amp_env: Envelope::new(),
            filter_env: Envelope::new(),
            filter_params: params.filter,
            modulation_rate: ModulationRate::default(),
            filter_env_output: 0.0,
            gain: VOICE_GAIN,
            scratch: AudioBuffer::default(),
            mod_buffer: Vec::new(),
        };
        voice.apply_params(&params);
        voice
    }

    /// Size buffers and reset all DSP state. Allocates; call off the audio
    /// thread.
    pub fn prepare_to_play(&mut self, sample_rate: f32, block_size: usize, num_channels: usize) {
        self.reset();

        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
        self.num_channels = num_channels.clamp(1, MAX_CHANNELS);
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);

        self.amp_env.set_sample_rate(self.sample_rate);
        self.filter_env.set_sample_rate(self.sample_rate);
        for bank in &mut self.banks {
            bank.prepare(self.sample_rate);
        }
        for filter in &mut self.filters {
            filter.prepare(self.sample_rate);
        }
        self.update_filters(self.filter_env_output);

        self.gain = VOICE_GAIN;
        self.scratch = AudioBuffer::new(self.num_channels, self.block_size);
        self.mod_buffer = vec![0.0; self.block_size];
        self.prepared = true;

        debug!(
            "voice prepared: {} Hz, {} samples, {} channels",
            self.sample_rate, self.block_size, self.num_channels
        );
    }

    /// Silence the voice and return it to the pool.
    pub fn reset(&mut self) {
        self.amp_env.reset();
        self.filter_env.reset();
        for bank in &mut self.banks {
            bank.reset();
        }
        for filter in &mut self.filters {
            filter.reset();
        }
        self.filter_env_output = 0.0;
        self.clear_note();
    }

    /// Apply one control-rate parameter snapshot.
    pub fn apply_params(&mut self, params: &VoiceParams) {
        for bank in &mut self.banks {
            bank.set_params(&params.oscillator);
        }

        let amp = params.amp_adsr;
        self.amp_env.update(amp.attack, amp.decay, amp.sustain, amp.release);
        let filter = params.filter_adsr;
        self.filter_env.update(filter.attack, filter.decay, filter.sustain, filter.release);

        self.filter_params = params.filter;
        self.update_filters(self.filter_env_output);
    }

    /// Stamp the trigger order used for voice stealing.
    pub(crate) fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    pub fn set_modulation_rate(&mut self, rate: ModulationRate) {
        self.modulation_rate = rate;
    }

    /// Tune the stack to `note` and open both envelopes. The pitch wheel
    /// position is accepted for host compatibility and not used.
    pub fn start_note(&mut self, note: u8, velocity: f32, _pitch_wheel: i32) {
        self.note = note.min(127);
        self.velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state = VoiceState::Active;

        for bank in &mut self.banks {
            bank.set_note(self.note);
        }

        self.amp_env.note_on();
        self.filter_env.note_on();
    }

    /// Close both envelopes. Without a tail, or when already silent, the
    /// voice is freed immediately.
    pub fn stop_note(&mut self, _velocity: f32, allow_tail_off: bool) {
        self.amp_env.note_off();
        self.filter_env.note_off();

        if !allow_tail_off || !self.amp_env.is_active() {
            self.amp_env.reset();
            self.filter_env.reset();
            self.clear_note();
        } else {
            self.state = VoiceState::Releasing;
        }
    }

    /// Accumulate `num_samples` samples of this voice into `output` at
    /// `start_sample`. A no-op unless prepared and sounding.
    pub fn render_next_block(
        &mut self,
        output: &mut AudioBuffer,
        start_sample: usize,
        num_samples: usize,
    ) {
        if !self.prepared || !self.is_active() {
            return;
        }

        let end = start_sample
            .saturating_add(num_samples)
            .min(output.num_samples());
        let mut offset = start_sample.min(end);

        // Blocks larger than the prepared size are rendered as several blocks
        while offset < end && self.is_active() {
            let len = (end - offset).min(self.block_size);
            self.render_chunk(output, offset, len);
            offset += len;
        }

        if !self.amp_env.is_active() {
            self.clear_note();
        }
    }

    fn render_chunk(&mut self, output: &mut AudioBuffer, start: usize, len: usize) {
        let channels = self.num_channels.min(output.num_channels());

        match self.modulation_rate {
            ModulationRate::Block => {
                self.filter_env_output = self.filter_env.advance(len);
                self.update_filters(self.filter_env_output);
            }
            ModulationRate::Sample => {
                self.filter_env.render(&mut self.mod_buffer[..len]);
                self.filter_env_output = self.mod_buffer[len - 1];
            }
        }

        self.scratch.clear_range(0, len);

        for ch in 0..channels {
            let bank = &mut self.banks[ch];
            for sample in &mut self.scratch.channel_mut(ch)[..len] {
                *sample = bank.next_sample();
            }
        }

        self.scratch.apply_gain(len, self.gain);
        self.amp_env.apply_to_buffer(&mut self.scratch, 0, len);

        for ch in 0..channels {
            let filter = &mut self.filters[ch];
            let buffer = &mut self.scratch.channel_mut(ch)[..len];

            match self.modulation_rate {
                ModulationRate::Block => {
                    for sample in buffer.iter_mut() {
                        *sample = filter.process_sample(*sample);
                    }
                }
                ModulationRate::Sample => {
                    let FilterParams {
                        filter_type,
                        cutoff,
                        resonance,
                        env_depth,
                    } = self.filter_params;
                    for (sample, env) in buffer.iter_mut().zip(&self.mod_buffer[..len]) {
                        filter.set_params(filter_type, cutoff + env_depth * env, resonance);
                        *sample = filter.process_sample(*sample);
                    }
                }
            }
        }

        for ch in 0..channels {
            output.add_from(ch, start, &self.scratch.channel(ch)[..len]);
        }
    }

    /// Re-tune every channel's filter for the given filter-envelope value.
    fn update_filters(&mut self, env_value: f32) {
        let FilterParams {
            filter_type,
            cutoff,
            resonance,
            env_depth,
        } = self.filter_params;
        let modulated = modulated_cutoff(cutoff, env_depth, env_value);

        for filter in &mut self.filters {
            filter.set_params(filter_type, modulated, resonance);
        }
    }

    fn clear_note(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity = 0.0;
    }

    /// True while the amplitude envelope is not idle.
    pub fn is_active(&self) -> bool {
        self.amp_env.is_active()
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// The note this voice is assigned to, if any.
    pub fn note(&self) -> Option<u8> {
        match self.state {
            VoiceState::Free => None,
            _ => Some(self.note),
        }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.amp_env.level()
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.amp_env.state()
    }

    pub fn filter_envelope_output(&self) -> f32 {
        self.filter_env_output
    }

    pub fn filter_cutoff(&self) -> f32 {
        self.filters[0].cutoff()
    }

    pub fn filter_type(&self) -> FilterType {
        self.filters[0].filter_type()
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn oscillators(&self, channel: usize) -> Option<&OscillatorBank> {
        self.banks.get(channel)
    }
}

impl Default for HarmonicVoice {
    fn default() -> Self {
        Self::new()
    }
}

/// `clamp(base + depth · env, 20, 20000)`
#[inline]
pub fn modulated_cutoff(base_cutoff: f32, env_depth: f32, env_value: f32) -> f32 {
    clamp_cutoff(base_cutoff + env_depth * env_value)
}
