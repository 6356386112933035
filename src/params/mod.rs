//! Parameter snapshots read by the voices once per block.
//!
//! `VoiceParams` is a plain `Copy` value: the control side builds one (directly
//! or through [`ParamStore`]) and hands it to the engine, which applies it to
//! every voice before rendering the next block. Nothing in the render path
//! reads shared mutable state.

mod error;
mod store;

pub use error::ParamError;
pub use store::{ParamDef, ParamStore, PARAMS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{filter::FilterType, harmonic::HARMONICS_PER_KIND, oscillator::Waveform};

/// Gain range for every oscillator in the stack, in dB.
pub const MIN_GAIN_DB: f32 = -40.0;
pub const MAX_GAIN_DB: f32 = 0.2;

/// How often the filter envelope re-tunes the filter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulationRate {
    /// One envelope value and one coefficient update per block.
    #[default]
    Block,
    /// Envelope value and coefficients follow every sample.
    Sample,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    /// Shared by the fundamental and all harmonic slots.
    pub waveform: Waveform,
    pub gain_db: f32,
    /// Semitones, fundamental only.
    pub pitch: i32,
    pub fm_frequency: f32,
    pub fm_depth: f32,
    /// Ratios 2..=10, in slot order.
    pub sub_gains_db: [f32; HARMONICS_PER_KIND],
    /// Ratios 2..=10, in slot order.
    pub overtone_gains_db: [f32; HARMONICS_PER_KIND],
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            gain_db: 0.1,
            pitch: 0,
            fm_frequency: 0.0,
            fm_depth: 0.0,
            sub_gains_db: [0.1; HARMONICS_PER_KIND],
            overtone_gains_db: [-20.0; HARMONICS_PER_KIND],
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl AdsrParams {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self::new(0.1, 0.1, 1.0, 0.4)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub filter_type: FilterType,
    pub cutoff: f32,
    pub resonance: f32,
    /// Hz added to the cutoff at full filter-envelope level.
    pub env_depth: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            filter_type: FilterType::LowPass,
            cutoff: 20_000.0,
            resonance: 0.1,
            env_depth: 10_000.0,
        }
    }
}

/// Everything a voice reads at control rate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub oscillator: OscillatorParams,
    pub amp_adsr: AdsrParams,
    pub filter: FilterParams,
    pub filter_adsr: AdsrParams,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            oscillator: OscillatorParams::default(),
            amp_adsr: AdsrParams::default(),
            filter: FilterParams::default(),
            filter_adsr: AdsrParams::new(0.01, 0.1, 1.0, 0.1),
        }
    }
}
