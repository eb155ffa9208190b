use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::{NoteEvent, SynthMessage},
};

/// Map a MIDI message on `channel_filter` to a note event at `offset`.
///
/// A note-on with velocity 0 is a note-off, per MIDI convention.
pub fn midi_to_event(midi: MidiEvent, channel_filter: u8, offset: usize) -> Option<NoteEvent> {
    let message = match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: 0,
        } if channel == channel_filter => SynthMessage::NoteOff { note: key },
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => SynthMessage::NoteOn {
            note: key,
            velocity: velocity_from_midi(velocity),
        },
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            SynthMessage::NoteOff { note: key }
        }
        MidiEvent::ControlChange {
            channel,
            controller: CC_ALL_NOTES_OFF,
            ..
        } if channel == channel_filter => SynthMessage::AllNotesOff,
        _ => return None,
    };

    Some(NoteEvent { offset, message })
}

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// MIDI velocity (0..=127) to 0.0..=1.0.
pub fn velocity_from_midi(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}

/// Decibels to linear amplitude. -inf dB (or NaN) maps to silence.
pub fn db_to_gain(db: f32) -> f32 {
    if db.is_nan() {
        return 0.0;
    }
    10.0_f32.powf(db / 20.0)
}
