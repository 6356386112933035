use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF},
    synth::message::SynthMessage,
};

/// Translate a decoded MIDI event on `channel_filter` into an engine message.
///
/// A note-on with velocity 0 is a note-off, as in running-status streams.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: 0,
        } if channel == channel_filter => Some(SynthMessage::NoteOff {
            note: key.min(127),
            velocity: 0.0,
        }),
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(SynthMessage::NoteOn {
            note: key.min(127),
            velocity: velocity_to_unit(velocity),
        }),
        MidiEvent::NoteOff {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(SynthMessage::NoteOff {
            note: key.min(127),
            velocity: velocity_to_unit(velocity),
        }),
        MidiEvent::ControlChange {
            channel,
            controller: CC_ALL_NOTES_OFF,
            ..
        } if channel == channel_filter => Some(SynthMessage::AllNotesOff {
            allow_tail_off: true,
        }),
        MidiEvent::ControlChange {
            channel,
            controller: CC_ALL_SOUND_OFF,
            ..
        } if channel == channel_filter => Some(SynthMessage::AllNotesOff {
            allow_tail_off: false,
        }),
        _ => None,
    }
}

#[inline]
pub fn velocity_to_unit(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}
