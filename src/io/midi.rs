#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// MIDI controller 123: all notes off.
pub const CC_ALL_NOTES_OFF: u8 = 123;

impl MidiEvent {
    /// Decode a channel voice message from its raw bytes.
    ///
    /// Returns `None` for system messages, running status, and truncated input.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: *data.first()? & 0x7F,
                velocity: *data.get(1)? & 0x7F,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: *data.first()? & 0x7F,
                velocity: *data.get(1)? & 0x7F,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: *data.first()? & 0x7F,
                value: *data.get(1)? & 0x7F,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: *data.first()? & 0x7F,
            }),
            0xE0 => {
                let lsb = (*data.first()? & 0x7F) as i16;
                let msb = (*data.get(1)? & 0x7F) as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }
}
