use log::debug;

use crate::{
    io::AudioBuffer,
    params::{ModulationRate, VoiceParams},
    synth::voice::{HarmonicVoice, VoiceState},
};

/// Default number of simultaneously sounding notes.
pub const DEFAULT_VOICES: usize = 5;

/// Fixed set of voices with note allocation and stealing.
pub struct VoicePool {
    voices: Vec<HarmonicVoice>,
    trigger_counter: u64,
}

impl VoicePool {
    pub fn new(num_voices: usize) -> Self {
        let voices = (0..num_voices.max(1)).map(|_| HarmonicVoice::new()).collect();

        Self {
            voices,
            trigger_counter: 0,
        }
    }

    pub fn prepare_to_play(&mut self, sample_rate: f32, block_size: usize, num_channels: usize) {
        for voice in &mut self.voices {
            voice.prepare_to_play(sample_rate, block_size, num_channels);
        }
        self.trigger_counter = 0;

        debug!("voice pool prepared with {} voices", self.voices.len());
    }

    pub fn apply_params(&mut self, params: &VoiceParams) {
        for voice in &mut self.voices {
            voice.apply_params(params);
        }
    }

    pub fn set_modulation_rate(&mut self, rate: ModulationRate) {
        for voice in &mut self.voices {
            voice.set_modulation_rate(rate);
        }
    }

    /// Start `note` on the best available voice. Always succeeds: when every
    /// voice is busy one of them is stolen.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let note = note.min(127);
        let index = self.allocate_voice(note);

        self.trigger_counter += 1;
        let voice = &mut self.voices[index];
        voice.set_age(self.trigger_counter);
        voice.start_note(note, velocity, 0);
    }

    /// Release the held voice playing `note`, if any. Voices already in
    /// their release tail are left alone.
    pub fn note_off(&mut self, note: u8) {
        let held = self
            .voices
            .iter()
            .position(|v| v.state() == VoiceState::Active && v.note() == Some(note));

        if let Some(index) = held {
            self.voices[index].stop_note(0.0, true);
        }
    }

    /// Release every held voice. Without a tail, releasing voices are cut
    /// as well.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            let stop = match voice.state() {
                VoiceState::Active => true,
                VoiceState::Releasing => !allow_tail_off,
                VoiceState::Free => false,
            };
            if stop {
                voice.stop_note(0.0, allow_tail_off);
            }
        }
    }

    /// Clear the first `num_samples` samples of `output` and mix every voice
    /// into them.
    pub fn render_block(&mut self, output: &mut AudioBuffer, num_samples: usize) {
        output.clear_range(0, num_samples);
        self.render_range(output, 0, num_samples);
    }

    /// Mix every voice into `output` without clearing it first.
    pub fn render_range(&mut self, output: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        for voice in &mut self.voices {
            voice.render_next_block(output, start_sample, num_samples);
        }
    }

    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn num_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[HarmonicVoice] {
        &self.voices
    }

    // Retrigger, then free, then quietest releasing, then oldest
    fn allocate_voice(&self, note: u8) -> usize {
        if let Some(index) = self.find_voice(note) {
            return index;
        }

        if let Some(index) = self.voices.iter().position(|v| !v.is_active()) {
            return index;
        }

        let releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by(|(_, a), (_, b)| {
                a.envelope_level()
                    .total_cmp(&b.envelope_level())
                    .then(a.age().cmp(&b.age()))
            })
            .map(|(index, _)| index);

        if let Some(index) = releasing {
            return index;
        }

        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    fn find_voice(&self, note: u8) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.is_active() && v.note() == Some(note))
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new(DEFAULT_VOICES)
    }
}
