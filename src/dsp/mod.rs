//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; voice orchestration and parameter plumbing live in
//! `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter with low, band and high-pass responses.
pub mod filter;
/// Sub-harmonic and overtone frequency law.
pub mod harmonic;
/// Naive oscillator waveforms with optional FM.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeState};
pub use filter::{FilterType, SVFilter};
pub use harmonic::{midi_note_to_freq, HarmonicKind, HarmonicSlot};
pub use oscillator::{Oscillator, Waveform};

/// Convert decibels to linear gain. Anything at or below -100 dB is silence.
#[inline]
pub fn decibels_to_gain(db: f32) -> f32 {
    if db > MINUS_INFINITY_DB {
        10.0_f32.powf(db * 0.05)
    } else {
        0.0
    }
}

pub(crate) const MINUS_INFINITY_DB: f32 = -100.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decibel_conversion() {
        assert!((decibels_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((decibels_to_gain(-20.0) - 0.1).abs() < 1e-6);
        assert!((decibels_to_gain(6.0) - 1.995).abs() < 1e-3);
        assert_eq!(decibels_to_gain(-100.0), 0.0);
        assert_eq!(decibels_to_gain(f32::NEG_INFINITY), 0.0);
    }
}
