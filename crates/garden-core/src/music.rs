use crate::constants::CHORD_VELOCITY;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A single pitch, stored as a MIDI note number (60 = C4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note(u8);

impl Note {
    pub const fn from_midi(midi: u8) -> Self {
        Self(if midi > 127 { 127 } else { midi })
    }

    #[inline]
    pub fn midi(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn frequency_hz(self) -> f32 {
        midi_to_hz(self.0 as f32)
    }

    /// Scientific pitch octave (C4 is middle C).
    #[inline]
    pub fn octave(self) -> i32 {
        self.0 as i32 / 12 - 1
    }
}

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            PITCH_CLASS_NAMES[(self.0 % 12) as usize],
            self.octave()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter '{0}'")]
    UnknownLetter(char),
    #[error("invalid octave in '{0}'")]
    BadOctave(String),
    #[error("note '{0}' is outside the MIDI range")]
    OutOfRange(String),
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Parses names like `C4`, `F#5`, `Bb3` or `c-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteParseError::Empty)?;
        let pitch_class: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            other => return Err(NoteParseError::UnknownLetter(other)),
        };
        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        let octave: i32 = octave_str
            .parse()
            .map_err(|_| NoteParseError::BadOctave(s.to_string()))?;
        let midi = (octave + 1) * 12 + pitch_class + accidental;
        if !(0..=127).contains(&midi) {
            return Err(NoteParseError::OutOfRange(s.to_string()));
        }
        Ok(Note(midi as u8))
    }
}

/// The eight playable pitches: C4 D4 F4 G4 A4 C5 D5 F5.
pub const PENTATONIC_SCALE: [Note; 8] = [
    Note(60),
    Note(62),
    Note(65),
    Note(67),
    Note(69),
    Note(72),
    Note(74),
    Note(77),
];

/// Scale steps stacked on a base degree to form a triad.
pub const TRIAD_STEPS: [usize; 3] = [0, 2, 4];

/// Triad rooted at `index` in the pentatonic scale, wrapping past the top.
pub fn triad_for_index(index: usize) -> [Note; 3] {
    let n = PENTATONIC_SCALE.len();
    TRIAD_STEPS.map(|step| PENTATONIC_SCALE[(index + step) % n])
}

/// Musical durations used by the instrument, resolved against a tempo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLength {
    Eighth,
    Quarter,
}

impl NoteLength {
    pub fn seconds(self, bpm: f32) -> f32 {
        let beat = 60.0 / bpm.max(1.0);
        match self {
            NoteLength::Eighth => beat * 0.5,
            NoteLength::Quarter => beat,
        }
    }
}

/// A request for the synthesizer to sound one or more notes together.
///
/// Fields:
/// - `notes`: pitches to trigger simultaneously (a single note is a chord of one)
/// - `velocity`: normalized loudness 0..1
/// - `length`: musical length, resolved to seconds by the instrument's tempo
#[derive(Clone, Debug, PartialEq)]
pub struct ChordRequest {
    pub notes: SmallVec<[Note; 4]>,
    pub velocity: f32,
    pub length: NoteLength,
}

impl ChordRequest {
    pub fn triad(index: usize) -> Self {
        Self {
            notes: SmallVec::from_slice(&triad_for_index(index)),
            velocity: CHORD_VELOCITY,
            length: NoteLength::Quarter,
        }
    }
}

#[inline]
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_names_round_trip_through_display() {
        let names: Vec<String> = PENTATONIC_SCALE.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["C4", "D4", "F4", "G4", "A4", "C5", "D5", "F5"]);
    }

    #[test]
    fn parses_accidentals_and_negative_octaves() {
        assert_eq!("F#5".parse::<Note>().unwrap().midi(), 78);
        assert_eq!("Bb3".parse::<Note>().unwrap().midi(), 58);
        assert_eq!("c-1".parse::<Note>().unwrap().midi(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<Note>(), Err(NoteParseError::Empty));
        assert_eq!("H4".parse::<Note>(), Err(NoteParseError::UnknownLetter('H')));
        assert!(matches!("C".parse::<Note>(), Err(NoteParseError::BadOctave(_))));
        assert!(matches!("A9".parse::<Note>(), Err(NoteParseError::OutOfRange(_))));
        assert!(matches!(
            "INVALID".parse::<Note>(),
            Err(NoteParseError::UnknownLetter('I'))
        ));
    }

    #[test]
    fn note_lengths_follow_tempo() {
        assert!((NoteLength::Quarter.seconds(120.0) - 0.5).abs() < 1e-6);
        assert!((NoteLength::Eighth.seconds(120.0) - 0.25).abs() < 1e-6);
    }
}
