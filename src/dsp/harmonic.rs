/*
Harmonic Stacks
===============

Every voice sounds one fundamental plus eighteen related partials: nine
sub-harmonics below it and nine overtones above it.

  overtone     An integer multiple of the fundamental.
               ratio 2 = one octave up, 3 = octave + fifth, 4 = two octaves...

  sub-harmonic An integer division of the fundamental.
               ratio 2 = one octave down, 3 = octave + fifth down...

For A4 (MIDI 69, 440 Hz):

    ratio   sub-harmonic   overtone
      2       220.0 Hz      880 Hz
      3       146.7 Hz     1320 Hz
      4       110.0 Hz     1760 Hz
     ...
     10        44.0 Hz     4400 Hz

Each slot in the stack is bound to one kind and one ratio for its whole life.
Note-on only changes the note the law is evaluated against.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of partials of each kind.
pub const HARMONICS_PER_KIND: usize = 9;
/// Sub-harmonics plus overtones.
pub const NUM_HARMONICS: usize = HARMONICS_PER_KIND * 2;
/// Ratio of the first slot of each kind. Slot `i` uses `FIRST_RATIO + i`.
pub const FIRST_RATIO: u32 = 2;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonicKind {
    /// Divide the fundamental by the ratio.
    Sub,
    /// Multiply the fundamental by the ratio.
    Overtone,
}

impl HarmonicKind {
    #[inline]
    pub fn apply(self, fundamental: f32, ratio: u32) -> f32 {
        let ratio = ratio.max(1) as f32;
        match self {
            HarmonicKind::Sub => fundamental / ratio,
            HarmonicKind::Overtone => fundamental * ratio,
        }
    }
}

/// One position in the harmonic stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonicSlot {
    pub kind: HarmonicKind,
    pub ratio: u32,
}

impl HarmonicSlot {
    /// Frequency of this slot when the stack plays `note`.
    #[inline]
    pub fn frequency(&self, note: u8) -> f32 {
        self.kind.apply(midi_note_to_freq(note as f32), self.ratio)
    }
}

/// The fixed slot layout: sub-harmonics 2..=10 followed by overtones 2..=10.
pub const fn harmonic_layout() -> [HarmonicSlot; NUM_HARMONICS] {
    let mut slots = [HarmonicSlot {
        kind: HarmonicKind::Sub,
        ratio: FIRST_RATIO,
    }; NUM_HARMONICS];

    let mut i = 0;
    while i < HARMONICS_PER_KIND {
        slots[i] = HarmonicSlot {
            kind: HarmonicKind::Sub,
            ratio: FIRST_RATIO + i as u32,
        };
        slots[HARMONICS_PER_KIND + i] = HarmonicSlot {
            kind: HarmonicKind::Overtone,
            ratio: FIRST_RATIO + i as u32,
        };
        i += 1;
    }

    slots
}
