//! The per-channel oscillator stack: one fundamental plus eighteen harmonic
//! slots, summed sample by sample.

use crate::{
    dsp::{
        harmonic::{harmonic_layout, HarmonicKind, HarmonicSlot, HARMONICS_PER_KIND, NUM_HARMONICS},
        oscillator::Oscillator,
    },
    params::{OscillatorParams, MAX_GAIN_DB, MIN_GAIN_DB},
};

/// An oscillator bound to one harmonic slot for its whole life.
#[derive(Debug, Clone)]
pub struct HarmonicOscillator {
    slot: HarmonicSlot,
    osc: Oscillator,
}

impl HarmonicOscillator {
    fn new(slot: HarmonicSlot) -> Self {
        Self {
            slot,
            osc: Oscillator::sine(),
        }
    }

    pub fn slot(&self) -> HarmonicSlot {
        self.slot
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.osc
    }
}

#[derive(Debug, Clone)]
pub struct OscillatorBank {
    fundamental: Oscillator,
    harmonics: [HarmonicOscillator; NUM_HARMONICS],
}

impl OscillatorBank {
    pub fn new() -> Self {
        Self {
            fundamental: Oscillator::sine(),
            harmonics: harmonic_layout().map(HarmonicOscillator::new),
        }
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.fundamental.prepare(sample_rate);
        for harmonic in &mut self.harmonics {
            harmonic.osc.prepare(sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.fundamental.reset();
        for harmonic in &mut self.harmonics {
            harmonic.osc.reset();
        }
    }

    /// Tune the whole stack to `note`.
    pub fn set_note(&mut self, note: u8) {
        self.fundamental.set_note(note);
        for harmonic in &mut self.harmonics {
            let HarmonicSlot { kind, ratio } = harmonic.slot;
            harmonic.osc.set_harmonic(note, kind, ratio);
        }
    }

    /// Apply a control-rate update. Pitch offset and FM only reach the
    /// fundamental; the waveform is shared by every slot. Gains are clamped to
    /// `MIN_GAIN_DB..=MAX_GAIN_DB`.
    pub fn set_params(&mut self, params: &OscillatorParams) {
        self.fundamental.set_params(
            params.waveform,
            clamp_gain_db(params.gain_db),
            params.pitch,
            params.fm_frequency,
            params.fm_depth,
        );

        for harmonic in &mut self.harmonics {
            let index = harmonic.slot.ratio.saturating_sub(2) as usize;
            let gains = match harmonic.slot.kind {
                HarmonicKind::Sub => &params.sub_gains_db,
                HarmonicKind::Overtone => &params.overtone_gains_db,
            };
            let gain_db = clamp_gain_db(gains[index.min(HARMONICS_PER_KIND - 1)]);
            harmonic.osc.set_params(params.waveform, gain_db, 0, 0.0, 0.0);
        }
    }

    /// Sum of all nineteen oscillators for one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut sum = self.fundamental.next_sample();
        for harmonic in &mut self.harmonics {
            sum += harmonic.osc.next_sample();
        }
        sum
    }

    pub fn fundamental(&self) -> &Oscillator {
        &self.fundamental
    }

    pub fn harmonics(&self) -> &[HarmonicOscillator] {
        &self.harmonics
    }

    /// The oscillator in a given slot, if the slot exists.
    pub fn harmonic(&self, kind: HarmonicKind, ratio: u32) -> Option<&Oscillator> {
        self.harmonics
            .iter()
            .find(|h| h.slot.kind == kind && h.slot.ratio == ratio)
            .map(|h| &h.osc)
    }
}

#[inline]
fn clamp_gain_db(db: f32) -> f32 {
    db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}

impl Default for OscillatorBank {
    fn default() -> Self {
        Self::new()
    }
}
