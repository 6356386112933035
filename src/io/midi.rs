/// Channel-voice events as delivered by a host or keyboard, already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

/// Controller number for "all notes off".
pub const CC_ALL_NOTES_OFF: u8 = 123;
/// Controller number for "all sound off" (no release tail).
pub const CC_ALL_SOUND_OFF: u8 = 120;
