//! Computer keyboard as a one-octave piano.
//!
//! ```text
//!    w e   t y u
//!   a s d f g h j k
//!   C D E F G A B C
//! ```
//!
//! Terminals rarely report key releases, so each key toggles its note.

use harmonic_synth::io::midi::MidiEvent;

const KEY_LAYOUT: [char; 13] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k'];
const MIN_OCTAVE: i32 = -1;
const MAX_OCTAVE: i32 = 9;
const VELOCITY: u8 = 100;

pub struct Keyboard {
    octave: i32,
    held: [bool; 128],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 4,
            held: [false; 128],
        }
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn octave_up(&mut self) {
        self.octave = (self.octave + 1).min(MAX_OCTAVE);
    }

    pub fn octave_down(&mut self) {
        self.octave = (self.octave - 1).max(MIN_OCTAVE);
    }

    /// MIDI note for a piano key in the current octave.
    pub fn note_for(&self, key: char) -> Option<u8> {
        let offset = KEY_LAYOUT.iter().position(|k| *k == key.to_ascii_lowercase())?;
        let note = (self.octave + 1) * 12 + offset as i32;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }

    /// Flip the note between held and released, returning the event to send.
    pub fn toggle(&mut self, note: u8) -> MidiEvent {
        let slot = &mut self.held[usize::from(note.min(127))];
        *slot = !*slot;

        if *slot {
            MidiEvent::NoteOn {
                channel: 0,
                key: note,
                velocity: VELOCITY,
            }
        } else {
            MidiEvent::NoteOff {
                channel: 0,
                key: note,
                velocity: 0,
            }
        }
    }

    pub fn release_all(&mut self) {
        self.held = [false; 128];
    }
}
