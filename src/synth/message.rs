#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{
    dsp::clamp_or,
    io::converter::midi_note_to_freq,
    synth::params::{AdsrParams, FilterSettings, Waveform},
};

/// Highest MIDI note number.
pub const MAX_PITCH: u8 = 127;

/// Out-of-range note numbers land on the top key.
#[inline]
pub fn clamp_pitch(pitch: u8) -> u8 {
    pitch.min(MAX_PITCH)
}

/// A note claimed by a voice: MIDI pitch plus normalized velocity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Note {
    pub pitch: u8,
    /// 0.0 to 1.0
    pub velocity: f32,
}

impl Note {
    pub fn new(pitch: u8, velocity: f32) -> Self {
        Self {
            pitch: clamp_pitch(pitch),
            velocity: clamp_or(velocity, 0.0, 1.0, 0.0),
        }
    }

    pub fn frequency(&self) -> f32 {
        midi_note_to_freq(self.pitch)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    AllNotesOff,
}

impl SynthMessage {
    /// The one rule every consumer applies: pitches clamp to
    /// [`MAX_PITCH`], and a note-on without positive velocity is a note-off.
    pub fn normalized(self) -> Self {
        match self {
            SynthMessage::NoteOn { note, velocity } if velocity > 0.0 => SynthMessage::NoteOn {
                note: clamp_pitch(note),
                velocity,
            },
            SynthMessage::NoteOn { note, .. } | SynthMessage::NoteOff { note } => {
                SynthMessage::NoteOff {
                    note: clamp_pitch(note),
                }
            }
            SynthMessage::AllNotesOff => SynthMessage::AllNotesOff,
        }
    }
}

/// A note message stamped with its sample offset inside the current block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteEvent {
    pub offset: usize,
    pub message: SynthMessage,
}

impl NoteEvent {
    pub fn note_on(offset: usize, note: u8, velocity: f32) -> Self {
        Self {
            offset,
            message: SynthMessage::NoteOn { note, velocity },
        }
    }

    pub fn note_off(offset: usize, note: u8) -> Self {
        Self {
            offset,
            message: SynthMessage::NoteOff { note },
        }
    }

    pub fn all_notes_off(offset: usize) -> Self {
        Self {
            offset,
            message: SynthMessage::AllNotesOff,
        }
    }
}

/// Parameter change sent from the control side to the render side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    SetAdsr(AdsrParams),
    SetWaveform(Waveform),
    /// Linear gain
    SetGain(f32),
    SetFilter(FilterSettings),
}

pub trait MessageReceiver<T> {
    fn pop(&mut self) -> Option<T>;
}

#[cfg(feature = "rtrb")]
impl<T> MessageReceiver<T> for Consumer<T> {
    fn pop(&mut self) -> Option<T> {
        Consumer::pop(self).ok()
    }
}
