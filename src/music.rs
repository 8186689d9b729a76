//! Equal-temperament note arithmetic.
//!
//! Notes are numbered as in MIDI: 69 is A4 at 440 Hz and each step is one
//! semitone. Offsets from a note are measured in cents (1/100 of a semitone).

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Reference pitch of A4.
pub const A4_FREQUENCY: f64 = 440.0;

/// Note number of A4.
pub const A4_NOTE: i32 = 69;

/// Pitch-class names indexed by `note mod 12`, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn check_frequency(frequency: f64) -> Result<f64> {
    if frequency.is_finite() && frequency > 0.0 {
        Ok(frequency)
    } else {
        Err(Error::invalid(
            "frequency",
            frequency,
            "frequency must be finite and positive",
        ))
    }
}

/// Nearest note to `frequency`.
///
/// ```
/// use pitchdetect::music::note_from_frequency;
///
/// assert_eq!(note_from_frequency(440.0).unwrap(), 69);
/// assert_eq!(note_from_frequency(261.63).unwrap(), 60);
/// assert!(note_from_frequency(0.0).is_err());
/// ```
pub fn note_from_frequency(frequency: f64) -> Result<i32> {
    let frequency = check_frequency(frequency)?;
    let semitones = 12.0 * (frequency / A4_FREQUENCY).log2();
    Ok(round_half_up(semitones) as i32 + A4_NOTE)
}

/// Exact equal-tempered frequency of `note`.
pub fn frequency_from_note(note: i32) -> f64 {
    A4_FREQUENCY * 2f64.powf((f64::from(note) - f64::from(A4_NOTE)) / 12.0)
}

/// Offset of `frequency` from `note` in cents, rounded down.
/// Positive when `frequency` is above the note.
pub fn cents_off_from_pitch(frequency: f64, note: i32) -> Result<i32> {
    let frequency = check_frequency(frequency)?;
    Ok((1200.0 * (frequency / frequency_from_note(note)).log2()).floor() as i32)
}

pub fn note_name(note: i32) -> &'static str {
    NOTE_NAMES[note.rem_euclid(12) as usize]
}

/// Octave in scientific pitch notation; C4 (note 60) starts octave 4.
pub fn octave(note: i32) -> i32 {
    note.div_euclid(12) - 1
}

/// How far a reading sits from its note, labelled for display.
///
/// A positive offset is reported as `Flat` and a negative one as `Sharp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "label", content = "cents", rename_all = "lowercase")]
pub enum Detune {
    InTune,
    Flat(u32),
    Sharp(u32),
}

impl Detune {
    pub fn from_cents(cents: i32) -> Self {
        match cents {
            0 => Detune::InTune,
            c if c > 0 => Detune::Flat(c.unsigned_abs()),
            c => Detune::Sharp(c.unsigned_abs()),
        }
    }
}

impl fmt::Display for Detune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detune::InTune => write!(f, "-- cents"),
            Detune::Flat(cents) => write!(f, "{} cents \u{266d}", cents),
            Detune::Sharp(cents) => write!(f, "{} cents \u{266f}", cents),
        }
    }
}

/// Nearest note to a detected frequency and the offset from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteInfo {
    pub semitone: i32,
    pub name: &'static str,
    pub octave: i32,
    pub cents: i32,
    pub detune: Detune,
}

impl NoteInfo {
    pub fn from_frequency(frequency: f64) -> Result<Self> {
        let semitone = note_from_frequency(frequency)?;
        let cents = cents_off_from_pitch(frequency, semitone)?;
        Ok(NoteInfo {
            semitone,
            name: note_name(semitone),
            octave: octave(semitone),
            cents,
            detune: Detune::from_cents(cents),
        })
    }
}

impl fmt::Display for NoteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}
