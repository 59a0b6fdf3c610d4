//! MIDI event types for the dephase block pipeline.
//!
//! Host callbacks deliver MIDI alongside audio; the fixed-block rebuffer
//! re-times every event so that `frame_offset` is always relative to the block
//! the event is handed to, even when that block straddles host callbacks.

mod event;
pub use event::MidiEvent;

// Re-export essential upstream types (users shouldn't need to import midi-msg directly)
pub use midi_msg::{Channel, ChannelVoiceMsg};
