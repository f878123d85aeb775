// Spelled pitches and the four SATB voice identities.
//
// Everything downstream (intervals, scale degrees, chord factors) works on
// spelled pitch, not raw MIDI numbers: a diminished fifth and an augmented
// fourth occupy the same semitone span but are different voice-leading
// events, so the letter + accidental spelling must survive parsing.
//
// Pitch strings arrive from the external tonal analyzer in note-name form
// ("C4", "F#3", "Eb5", "B♭2"). Malformed strings are rejected here, at the
// boundary, so the rest of the engine never sees an unparseable note.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a pitch or note-name string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("empty pitch string")]
    Empty,
    #[error("invalid note letter in '{0}'")]
    BadLetter(String),
    #[error("invalid accidental in '{0}'")]
    BadAccidental(String),
    #[error("invalid or missing octave in '{0}'")]
    BadOctave(String),
}

/// The seven note letters, in C-major scale order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position within the octave, C = 0 .. B = 6. Drives generic
    /// (letter-distance) interval numbers.
    pub fn scale_index(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitone offset of the natural letter from C.
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// Chromatic alteration applied to a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Semitone shift: -2 .. +2.
    pub fn offset(self) -> i8 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

/// A note name without octave: letter plus accidental ("C", "F#", "Eb").
/// Chord roots and key tonics are note names; sounding notes are [`Pitch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl NoteName {
    pub fn new(letter: Letter, accidental: Accidental) -> Self {
        NoteName { letter, accidental }
    }

    pub fn natural(letter: Letter) -> Self {
        NoteName::new(letter, Accidental::Natural)
    }

    /// Chromatic pitch class 0-11 (C = 0).
    pub fn pitch_class(&self) -> u8 {
        let pc = self.letter.semitone() as i16 + self.accidental.offset() as i16;
        pc.rem_euclid(12) as u8
    }

    /// Place this note name in an octave.
    pub fn in_octave(&self, octave: i8) -> Pitch {
        Pitch {
            name: *self,
            octave,
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

impl FromStr for NoteName {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = parse_name_prefix(s)?;
        if !rest.is_empty() {
            return Err(PitchError::BadAccidental(s.to_string()));
        }
        Ok(name)
    }
}

/// A concrete pitch: note name plus octave. C4 is middle C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub name: NoteName,
    pub octave: i8,
}

impl Pitch {
    pub fn new(letter: Letter, accidental: Accidental, octave: i8) -> Self {
        Pitch {
            name: NoteName::new(letter, accidental),
            octave,
        }
    }

    pub fn pitch_class(&self) -> u8 {
        self.name.pitch_class()
    }

    /// MIDI-style pitch number (C4 = 60). Spelling may push this across
    /// an octave boundary (Cb4 = 59, B#3 = 60); that is intended.
    pub fn pitch_space(&self) -> i16 {
        (self.octave as i16 + 1) * 12
            + self.name.letter.semitone() as i16
            + self.name.accidental.offset() as i16
    }

    /// Diatonic position on the letter staff: octave * 7 + letter index.
    /// Two pitches a "third" apart differ by 2 here regardless of accidentals.
    pub fn diatonic_position(&self) -> i16 {
        self.octave as i16 * 7 + self.name.letter.scale_index() as i16
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = parse_name_prefix(s)?;
        if rest.is_empty() {
            return Err(PitchError::BadOctave(s.to_string()));
        }
        let octave: i8 = rest
            .parse()
            .map_err(|_| PitchError::BadOctave(s.to_string()))?;
        Ok(Pitch { name, octave })
    }
}

/// Parse the letter + accidental prefix of a pitch string, returning the
/// note name and the unconsumed remainder (the octave digits, if any).
fn parse_name_prefix(s: &str) -> Result<(NoteName, &str), PitchError> {
    let s = s.trim();
    let mut chars = s.chars();
    let first = chars.next().ok_or(PitchError::Empty)?;
    let letter = Letter::from_char(first).ok_or_else(|| PitchError::BadLetter(s.to_string()))?;

    let rest = chars.as_str();
    // Accidental spellings: ASCII (#, b, ##, bb), Unicode (♯, ♭, 𝄪, 𝄫),
    // and music21's '-' for flat.
    let (accidental, consumed) = if rest.starts_with("##") || rest.starts_with('𝄪') {
        (Accidental::DoubleSharp, if rest.starts_with("##") { 2 } else { '𝄪'.len_utf8() })
    } else if rest.starts_with("bb") || rest.starts_with('𝄫') {
        (Accidental::DoubleFlat, if rest.starts_with("bb") { 2 } else { '𝄫'.len_utf8() })
    } else if rest.starts_with('#') || rest.starts_with('♯') {
        (Accidental::Sharp, if rest.starts_with('#') { 1 } else { '♯'.len_utf8() })
    } else if rest.starts_with('b') || rest.starts_with('♭') || rest.starts_with('-') {
        // '-' is music21's flat spelling ("E-4" = Eb4). Negative octaves do
        // not occur in SATB ranges, so the dash is never an octave sign.
        let len = rest.chars().next().map_or(1, |c| c.len_utf8());
        (Accidental::Flat, len)
    } else {
        (Accidental::Natural, 0)
    };

    Ok((NoteName::new(letter, accidental), &rest[consumed..]))
}

/// Voice identity in an SATB texture. The derived order is the registral
/// order Bass < Tenor < Alto < Soprano, which governs display ordering and
/// the "extreme voices" (Bass-Soprano) logic in the rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Voice {
    Bass = 0,
    Tenor = 1,
    Alto = 2,
    Soprano = 3,
}

impl Voice {
    /// All voices in registral order, low to high.
    pub const ALL: [Voice; 4] = [Voice::Bass, Voice::Tenor, Voice::Alto, Voice::Soprano];

    /// Adjacent voice pairs (lower, upper), low to high.
    pub const ADJACENT_PAIRS: [(Voice, Voice); 3] = [
        (Voice::Bass, Voice::Tenor),
        (Voice::Tenor, Voice::Alto),
        (Voice::Alto, Voice::Soprano),
    ];

    /// The six unordered voice pairs, in the order the rules scan them.
    pub const PAIRS: [(Voice, Voice); 6] = [
        (Voice::Soprano, Voice::Alto),
        (Voice::Soprano, Voice::Tenor),
        (Voice::Soprano, Voice::Bass),
        (Voice::Alto, Voice::Tenor),
        (Voice::Alto, Voice::Bass),
        (Voice::Tenor, Voice::Bass),
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Voice::Bass => "Bass",
            Voice::Tenor => "Tenor",
            Voice::Alto => "Alto",
            Voice::Soprano => "Soprano",
        }
    }

    /// Single-letter key used in the analyzer's wire format.
    pub fn short(self) -> &'static str {
        match self {
            Voice::Bass => "B",
            Voice::Tenor => "T",
            Voice::Alto => "A",
            Voice::Soprano => "S",
        }
    }
}
