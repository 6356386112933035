// Purpose: Voice management, polyphony, control messages
// This layer sits above the DSP primitives and manages multiple voices

pub mod bank;
pub mod engine;
pub mod message;
pub mod poly;
pub mod voice;
