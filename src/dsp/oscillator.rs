use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{
    decibels_to_gain,
    harmonic::{midi_note_to_freq, HarmonicKind},
};

/*
Audio Oscillator
================

An oscillator generates a repeating waveform at a specific frequency. Here the
phase is kept normalized to [0, 1): one full cycle per unit of phase.

    increment = frequency / sample_rate
    phase     = (phase + increment) wrapped into [0, 1)

Waveforms
---------

  Sine     sin(2π · phase)           pure tone, fundamental only
  Saw      2 · phase - 1             all harmonics, bright and buzzy
  Square   +1 first half, -1 second  odd harmonics only, hollow

Saw and square are the naive (band-unlimited) shapes. They alias at high
frequencies; with nineteen partials stacked per voice that grit is part of the
instrument's character.

Frequency Modulation
--------------------

A secondary sine carrier can wobble the oscillator's frequency:

    instantaneous_hz = frequency + depth · sin(2π · fm_phase)

The carrier output (range -1..1) is scaled by depth and added to the phase
increment before the main waveform is read. Because the increment can dip
below zero at large depths, the phase wraps in both directions.
*/

/// Lowest base frequency an oscillator accepts.
pub const MIN_FREQUENCY: f32 = 0.01;
/// Pitch offset bounds in semitones.
pub const MIN_PITCH: i32 = -48;
pub const MAX_PITCH: i32 = 48;
/// FM carrier bounds: frequency in Hz, depth in Hz of deviation.
pub const MAX_FM_FREQUENCY: f32 = 1_000.0;
pub const MAX_FM_DEPTH: f32 = 100.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
}

impl Waveform {
    /// Map a host selector (0 sine, 1 saw, 2 square) to a waveform.
    /// Out-of-range selectors clamp to the nearest end.
    pub fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => Waveform::Sine,
            1 => Waveform::Saw,
            _ => Waveform::Square,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Waveform::Sine => 0,
            Waveform::Saw => 1,
            Waveform::Square => 2,
        }
    }

    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Sine carrier that modulates an oscillator's frequency.
#[derive(Debug, Clone, Copy, Default)]
struct FmCarrier {
    phase: f32,
    frequency: f32,
    depth: f32,
}

impl FmCarrier {
    #[inline]
    fn next_offset(&mut self, sample_rate: f32) -> f32 {
        if self.depth == 0.0 {
            return 0.0;
        }

        let value = (TAU * self.phase).sin();
        self.phase = wrap_phase(self.phase + self.frequency / sample_rate);
        value * self.depth
    }
}

#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    frequency: f32,
    gain: f32,
    pitch: i32,
    note: u8,
    sample_rate: f32,
    fm: FmCarrier,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency: 440.0,
            gain: 1.0,
            pitch: 0,
            note: 69,
            sample_rate: 44_100.0,
            fm: FmCarrier::default(),
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn saw() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    /// Reset phase of both the main and the FM oscillator.
    pub fn prepare(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.fm.phase = 0.0;
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = if hz.is_finite() {
            hz.max(MIN_FREQUENCY)
        } else {
            MIN_FREQUENCY
        };
    }

    /// Tune to `note` shifted by the current pitch offset.
    pub fn set_note(&mut self, note: u8) {
        self.note = note.min(127);
        self.set_frequency(midi_note_to_freq((self.note as i32 + self.pitch) as f32));
    }

    /// Tune to a sub-harmonic or overtone of `note`. Ignores the pitch offset.
    pub fn set_harmonic(&mut self, note: u8, kind: HarmonicKind, ratio: u32) {
        self.note = note.min(127);
        self.set_frequency(kind.apply(midi_note_to_freq(self.note as f32), ratio));
    }

    /// Semitone offset applied by `set_note`. Re-tunes if the offset changed.
    pub fn set_pitch(&mut self, semitones: i32) {
        let semitones = semitones.clamp(MIN_PITCH, MAX_PITCH);
        if semitones != self.pitch {
            self.pitch = semitones;
            self.set_note(self.note);
        }
    }

    pub fn set_gain_decibels(&mut self, db: f32) {
        self.gain = decibels_to_gain(db);
    }

    /// Configure the FM carrier. A depth of zero disables modulation.
    pub fn set_fm(&mut self, frequency: f32, depth: f32) {
        self.fm.frequency = if frequency.is_finite() {
            frequency.clamp(0.0, MAX_FM_FREQUENCY)
        } else {
            0.0
        };
        self.fm.depth = if depth.is_finite() {
            depth.clamp(0.0, MAX_FM_DEPTH)
        } else {
            0.0
        };
    }

    /// Apply one control-rate update.
    pub fn set_params(
        &mut self,
        waveform: Waveform,
        gain_db: f32,
        pitch: i32,
        fm_frequency: f32,
        fm_depth: f32,
    ) {
        self.set_waveform(waveform);
        self.set_gain_decibels(gain_db);
        self.set_pitch(pitch);
        self.set_fm(fm_frequency, fm_depth);
    }

    /// Produce one sample and advance the phase. Call exactly once per output
    /// sample, or the pitch drifts from wall-clock time.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let modulation = self.fm.next_offset(self.sample_rate);
        let increment = (self.frequency + modulation) / self.sample_rate;

        let value = self.waveform.evaluate(self.phase);
        self.phase = wrap_phase(self.phase + increment);

        self.gain * value
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    /// FM carrier frequency and depth, both in Hz.
    pub fn fm(&self) -> (f32, f32) {
        (self.fm.frequency, self.fm.depth)
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::sine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn valid_sine() {
        let mut osc = Oscillator::sine();
        osc.prepare(SAMPLE_RATE);
        osc.set_note(69);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        // sample n should be sin(2pi f n / sr), where f = 440Hz (MIDI 69)
        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / SAMPLE_RATE).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = Oscillator::saw();
        osc.prepare(SAMPLE_RATE);
        // Above Nyquist on purpose: increment > 1 per sample
        osc.set_frequency(70_000.0);
        osc.set_fm(300.0, 100.0);

        for _ in 0..10_000 {
            osc.next_sample();
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn negative_fm_excursion_wraps_backwards() {
        let mut osc = Oscillator::sine();
        osc.prepare(SAMPLE_RATE);
        osc.set_frequency(1.0);
        osc.set_fm(5.0, 100.0);

        for _ in 0..5_000 {
            let sample = osc.next_sample();
            assert!(sample.is_finite());
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn fm_settings_are_clamped() {
        let mut osc = Oscillator::sine();
        osc.set_fm(5_000.0, 1_000.0);
        assert_eq!(osc.fm(), (MAX_FM_FREQUENCY, MAX_FM_DEPTH));

        osc.set_fm(-3.0, f32::NAN);
        assert_eq!(osc.fm(), (0.0, 0.0));
    }

    #[test]
    fn gain_is_applied_after_waveform() {
        let mut osc = Oscillator::square();
        osc.prepare(SAMPLE_RATE);
        osc.set_gain_decibels(-20.0);

        let first = osc.next_sample();
        assert!((first - 0.1).abs() < 1e-5);
    }

    #[test]
    fn saw_and_square_stay_bounded() {
        for waveform in [Waveform::Saw, Waveform::Square] {
            let mut osc = Oscillator::new(waveform);
            osc.prepare(SAMPLE_RATE);
            osc.set_frequency(1234.5);

            for _ in 0..2_000 {
                let sample = osc.next_sample();
                assert!((-1.0..=1.0).contains(&sample));
            }
        }
    }

    #[test]
    fn pitch_offset_retunes_note() {
        let mut osc = Oscillator::sine();
        osc.prepare(SAMPLE_RATE);
        osc.set_note(69);
        osc.set_pitch(12);
        assert!((osc.frequency() - 880.0).abs() < 0.01);

        osc.set_pitch(100);
        assert_eq!(osc.pitch(), MAX_PITCH);
    }

    #[test]
    fn harmonic_ignores_pitch_offset() {
        let mut osc = Oscillator::sine();
        osc.prepare(SAMPLE_RATE);
        osc.set_pitch(7);
        osc.set_harmonic(69, HarmonicKind::Sub, 2);
        assert!((osc.frequency() - 220.0).abs() < 0.01);
    }

    #[test]
    fn frequency_never_reaches_zero() {
        let mut osc = Oscillator::sine();
        osc.set_frequency(-50.0);
        assert!(osc.frequency() > 0.0);
        osc.set_frequency(f32::NAN);
        assert!(osc.frequency() > 0.0);
    }

    #[test]
    fn waveform_selector_clamps() {
        assert_eq!(Waveform::from_index(-3), Waveform::Sine);
        assert_eq!(Waveform::from_index(1), Waveform::Saw);
        assert_eq!(Waveform::from_index(9), Waveform::Square);
    }
}
