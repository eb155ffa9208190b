use crate::synth::message::{clamp_pitch, SynthMessage};

/// Key press from an on-screen or computer keyboard, sent to the render side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum KeyboardMessage {
    KeyDown { note: u8, velocity: f32 },
    KeyUp { note: u8 },
    AllKeysUp,
}

/// Which of the 128 MIDI keys are currently held.
///
/// Fed from two directions: presses coming from the control side (which
/// become note events) and note events coming from the host (which only
/// update the held set, so a keyboard display can mirror them).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: [u64; 2],
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the held set for a key press and return the note message it
    /// should trigger.
    pub fn apply(&mut self, message: KeyboardMessage) -> SynthMessage {
        let message = match message {
            KeyboardMessage::KeyDown { note, velocity } => SynthMessage::NoteOn { note, velocity },
            KeyboardMessage::KeyUp { note } => SynthMessage::NoteOff { note },
            KeyboardMessage::AllKeysUp => SynthMessage::AllNotesOff,
        }
        .normalized();
        self.record(&message);
        message
    }

    /// Mirror a note message that reached the synth some other way.
    pub fn record(&mut self, message: &SynthMessage) {
        match message.normalized() {
            SynthMessage::NoteOn { note, .. } => self.set(note, true),
            SynthMessage::NoteOff { note } => self.set(note, false),
            SynthMessage::AllNotesOff => self.reset(),
        }
    }

    fn set(&mut self, note: u8, down: bool) {
        let note = clamp_pitch(note);
        let (word, bit) = ((note / 64) as usize, note % 64);
        if down {
            self.held[word] |= 1 << bit;
        } else {
            self.held[word] &= !(1 << bit);
        }
    }

    pub fn is_note_on(&self, note: u8) -> bool {
        let note = clamp_pitch(note);
        self.held[(note / 64) as usize] & (1 << (note % 64)) != 0
    }

    pub fn held_count(&self) -> usize {
        self.held.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Held notes, lowest first.
    pub fn held_notes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=127u8).filter(move |&note| self.is_note_on(note))
    }

    pub fn reset(&mut self) {
        self.held = [0; 2];
    }
}
