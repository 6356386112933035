//! Status snapshots sent from the audio thread to the UI.
//!
//! Everything here is `Copy` and fixed-size so the callback can build and
//! push it without allocating.

use harmonic_synth::{synth::voice::VoiceState, VoicePool};

/// Voices shown in the UI; the engine default is five.
pub const MAX_UI_VOICES: usize = 8;

#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceStatus {
    pub note: Option<u8>,
    pub velocity: f32,
    /// Amplitude envelope level (0.0-1.0)
    pub level: f32,
    pub releasing: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EngineStatus {
    pub voices: [VoiceStatus; MAX_UI_VOICES],
    pub num_voices: usize,
    pub active_voices: usize,
    /// Peak of the last callback, first channel
    pub peak: f32,
}

impl EngineStatus {
    pub fn capture(pool: &VoicePool, peak: f32) -> Self {
        let mut status = Self {
            num_voices: pool.num_voices().min(MAX_UI_VOICES),
            active_voices: pool.active_voice_count(),
            peak,
            ..Self::default()
        };

        for (slot, voice) in status.voices.iter_mut().zip(pool.voices()) {
            *slot = VoiceStatus {
                note: voice.note(),
                velocity: voice.velocity(),
                level: voice.envelope_level(),
                releasing: voice.state() == VoiceState::Releasing,
            };
        }

        status
    }
}

/// Scientific pitch name, e.g. 60 -> "C4".
pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NAMES[usize::from(note % 12)], octave)
}
