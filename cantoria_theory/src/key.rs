// Keys, scale degrees, and roman-numeral degree labels.
//
// Degree computation is table-driven: each chromatic semitone above the
// tonic collapses onto a diatonic degree number (raised and lowered steps
// share the number), and semitone 11 is always the (raised) leading tone.
// Mode-specific roman labels come from two fixed tables, so vii° in major
// and III in minor need no per-quality special-casing.

use crate::pitch::{NoteName, Pitch, PitchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major or minor mode of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Major,
    Minor,
}

/// A tonal key: tonic note name plus mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub tonic: NoteName,
    pub mode: KeyMode,
}

impl Key {
    pub fn new(tonic: NoteName, mode: KeyMode) -> Self {
        Key { tonic, mode }
    }

    /// Scale-degree information for a pitch within this key.
    pub fn degree_info(&self, pitch: &Pitch) -> DegreeInfo {
        let semitones =
            (pitch.pitch_class() as i16 - self.tonic.pitch_class() as i16).rem_euclid(12) as u8;
        // Altered (raised/lowered) chromatic steps collapse onto the same
        // diatonic degree number.
        const DEGREE_TABLE: [u8; 12] = [1, 2, 2, 3, 3, 4, 4, 5, 6, 6, 7, 7];
        DegreeInfo {
            degree: DEGREE_TABLE[semitones as usize],
            semitones_from_tonic: semitones,
            is_leading_tone: semitones == 11,
        }
    }

    /// Roman-numeral label for a chord root in this key, or `Unknown` when
    /// the root is not declared. Table-driven: major-mode vii is diminished,
    /// minor-mode III is major, and so on.
    pub fn degree_of_root(&self, root: Option<&NoteName>) -> Degree {
        const MAJOR: [&str; 7] = ["I", "ii", "iii", "IV", "V", "vi", "vii°"];
        const MINOR: [&str; 7] = ["i", "ii°", "III", "iv", "V", "VI", "vii°"];

        let Some(root) = root else {
            return Degree::Unknown;
        };
        let info = self.degree_info(&root.in_octave(4));
        let table = match self.mode {
            KeyMode::Major => &MAJOR,
            KeyMode::Minor => &MINOR,
        };
        Degree::Label(table[(info.degree - 1) as usize].to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        };
        write!(f, "{} {}", self.tonic, mode)
    }
}

impl FromStr for Key {
    type Err = PitchError;

    /// Parse "C major", "a minor", "Eb major". A lowercase tonic with no
    /// explicit mode word reads as minor, matching common shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (tonic_part, mode_part) = match s.split_once(char::is_whitespace) {
            Some((t, m)) => (t, Some(m.trim())),
            None => (s, None),
        };

        let mode = match mode_part {
            Some(m) if m.eq_ignore_ascii_case("major") => KeyMode::Major,
            Some(m) if m.eq_ignore_ascii_case("minor") => KeyMode::Minor,
            Some(_) => return Err(PitchError::BadLetter(s.to_string())),
            None => {
                if tonic_part.chars().next().is_some_and(|c| c.is_lowercase()) {
                    KeyMode::Minor
                } else {
                    KeyMode::Major
                }
            }
        };

        let tonic: NoteName = {
            // Tonic letter case only encodes mode shorthand; normalize it.
            let mut normalized = String::with_capacity(tonic_part.len());
            let mut chars = tonic_part.chars();
            if let Some(first) = chars.next() {
                normalized.push(first.to_ascii_uppercase());
            }
            normalized.extend(chars);
            normalized.parse()?
        };

        Ok(Key { tonic, mode })
    }
}

/// Scale-degree data for one pitch in one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeInfo {
    /// Diatonic degree number 1-7.
    pub degree: u8,
    /// Chromatic distance above the tonic, 0-11.
    pub semitones_from_tonic: u8,
    /// True iff the pitch sits a semitone below the tonic (degree 7 raised).
    pub is_leading_tone: bool,
}

/// A roman-numeral chord degree as supplied by the tonal analyzer or
/// computed from a declared root. `Unknown` replaces the legacy "?" string
/// sentinel so every consumer must handle the no-information case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Degree {
    Label(String),
    Unknown,
}

impl Degree {
    pub fn from_label(label: &str) -> Degree {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == "?" {
            Degree::Unknown
        } else {
            Degree::Label(trimmed.to_string())
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Degree::Label(l) => Some(l),
            Degree::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Degree::Unknown)
    }

    /// Dominant-function degree: V (and extensions), vii°, viiø.
    pub fn is_dominant(&self) -> bool {
        match self.label() {
            Some(l) => l.starts_with('V') || l.starts_with("vii°") || l.starts_with("viiø"),
            None => false,
        }
    }

    /// Tonic degree: I or i exactly.
    pub fn is_tonic(&self) -> bool {
        matches!(self.label(), Some("I") | Some("i"))
    }

    /// Submediant (deceptive-cadence target): vi, VI, and flat spellings.
    pub fn is_submediant(&self) -> bool {
        matches!(self.label(), Some("vi") | Some("VI") | Some("VIb") | Some("bVI"))
    }

    /// Mediant degree: iii or III exactly.
    pub fn is_mediant(&self) -> bool {
        matches!(self.label(), Some("III") | Some("iii"))
    }

    /// Secondary-function label such as "V/V" or "vii°/ii".
    pub fn is_secondary(&self) -> bool {
        self.label().is_some_and(|l| l.contains('/'))
    }

    /// One of the plain diatonic labels of either mode.
    pub fn is_diatonic_label(&self) -> bool {
        const DIATONIC: [&str; 13] = [
            "I", "ii", "iii", "IV", "V", "vi", "vii°", "i", "ii°", "III", "iv", "VII", "VI",
        ];
        self.label().is_some_and(|l| DIATONIC.contains(&l))
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degree::Label(l) => write!(f, "{l}"),
            Degree::Unknown => write!(f, "?"),
        }
    }
}
