pub mod dsp; // Oscillators, envelopes, filters, harmonic math
pub mod io; // Audio buffers and note events
pub mod params; // Parameter snapshots and the keyed store
pub mod synth; // Voices, voice pool, engine

pub use io::AudioBuffer;
pub use params::{ParamError, ParamStore, VoiceParams};
pub use synth::engine::{EngineConfig, Synthesizer};
pub use synth::poly::VoicePool;
pub use synth::voice::HarmonicVoice;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const MAX_CHANNELS: usize = 2;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
