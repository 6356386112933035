#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::params::VoiceParams;

#[derive(Debug, Copy, Clone)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8, velocity: f32 },
    AllNotesOff { allow_tail_off: bool },
    /// New parameter snapshot, applied before the next rendered sample.
    Params(VoiceParams),
}

/// A message scheduled at a frame offset inside the current block.
#[derive(Debug, Copy, Clone)]
pub struct TimedMessage {
    pub offset: usize,
    pub message: SynthMessage,
}

impl TimedMessage {
    pub fn new(offset: usize, message: SynthMessage) -> Self {
        Self { offset, message }
    }
}

/// Consumer side of the control queue, drained at the start of every block.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Receiver for engines driven only through direct calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMessages;

impl MessageReceiver for NoMessages {
    fn pop(&mut self) -> Option<SynthMessage> {
        None
    }
}
