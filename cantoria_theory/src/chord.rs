// SATB chords: raw analyzer input, parsed chords with per-voice factor
// analysis, and factor queries used by the voice-leading rules.
//
// Factor assignment is pitch-class arithmetic only: the chromatic distance
// from the declared root collapses onto root/third/fifth/seventh buckets
// regardless of octave or spelling. Anything outside those buckets is
// Unknown, including ninths.

use crate::catalog::ChordQuality;
use crate::key::{Degree, Key};
use crate::pitch::{Pitch, PitchError, Voice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which chord member a voice is sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordFactor {
    Root,
    Third,
    Fifth,
    Seventh,
    Unknown,
}

impl ChordFactor {
    /// Factor for the chromatic distance of a note above a root, both taken
    /// as pitch classes. 6 covers the diminished fifth, 8 the augmented.
    pub fn from_pitch_classes(note_pc: u8, root_pc: u8) -> ChordFactor {
        let semitones = (note_pc as i16 - root_pc as i16).rem_euclid(12);
        match semitones {
            0 => ChordFactor::Root,
            3 | 4 => ChordFactor::Third,
            6 | 7 | 8 => ChordFactor::Fifth,
            10 | 11 => ChordFactor::Seventh,
            _ => ChordFactor::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChordFactor::Root => "root",
            ChordFactor::Third => "third",
            ChordFactor::Fifth => "fifth",
            ChordFactor::Seventh => "seventh",
            ChordFactor::Unknown => "?",
        }
    }
}

impl fmt::Display for ChordFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Harmonic function assigned by the tonal analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmonicFunction {
    #[serde(rename = "T")]
    Tonic,
    #[serde(rename = "S")]
    Subdominant,
    #[serde(rename = "D")]
    Dominant,
}

/// Special chromatic chord tags forwarded by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialType {
    #[serde(rename = "+6it")]
    ItalianSixth,
    #[serde(rename = "+6fr")]
    FrenchSixth,
    #[serde(rename = "+6al")]
    GermanSixth,
    #[serde(rename = "N")]
    Neapolitan,
    #[serde(rename = "secondary-dominant")]
    SecondaryDominant,
    #[serde(rename = "borrowed-minor")]
    BorrowedMinor,
}

/// One chord as received from the analyzer, before any parsing. All fields
/// except the voices are optional; rules degrade gracefully when analysis
/// data is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChordInput {
    #[serde(rename = "S")]
    pub soprano: Option<String>,
    #[serde(rename = "A")]
    pub alto: Option<String>,
    #[serde(rename = "T")]
    pub tenor: Option<String>,
    #[serde(rename = "B")]
    pub bass: Option<String>,
    pub root: Option<String>,
    pub quality: Option<String>,
    #[serde(default)]
    pub inversion: u8,
    pub degree: Option<String>,
    pub degree_num: Option<u8>,
    pub function: Option<HarmonicFunction>,
    pub key: Option<String>,
    pub special_type: Option<SpecialType>,
}

impl ChordInput {
    pub fn voice(&self, voice: Voice) -> Option<&str> {
        match voice {
            Voice::Soprano => self.soprano.as_deref(),
            Voice::Alto => self.alto.as_deref(),
            Voice::Tenor => self.tenor.as_deref(),
            Voice::Bass => self.bass.as_deref(),
        }
    }
}

/// A fully parsed SATB chord with per-voice factor analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pitches: [Option<Pitch>; 4],
    factors: [ChordFactor; 4],
    pub root: Option<Pitch>,
    pub quality: Option<ChordQuality>,
    pub inversion: u8,
    pub degree: Degree,
    pub degree_num: Option<u8>,
    pub function: Option<HarmonicFunction>,
    pub key: Option<Key>,
    pub special_type: Option<SpecialType>,
}

impl Chord {
    /// Parse an analyzer chord. Fails only on a malformed voice pitch;
    /// missing or unrecognized analysis fields degrade to None with a log.
    pub fn from_input(input: &ChordInput) -> Result<Chord, PitchError> {
        let mut pitches: [Option<Pitch>; 4] = [None, None, None, None];
        for voice in Voice::ALL {
            if let Some(s) = input.voice(voice) {
                pitches[voice.index()] = Some(s.parse()?);
            }
        }

        // A bare note name reads in octave 4, matching analyzer shorthand.
        let root = match input.root.as_deref() {
            Some(r) => match parse_root(r) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(root = r, %err, "unparseable chord root, treating as absent");
                    None
                }
            },
            None => None,
        };

        let quality = match input.quality.as_deref() {
            Some(q) => match q.parse::<ChordQuality>() {
                Ok(q) => Some(q),
                Err(err) => {
                    warn!(%err, "unknown chord quality, treating as absent");
                    None
                }
            },
            None => None,
        };

        let key = match input.key.as_deref() {
            Some(k) => match k.parse::<Key>() {
                Ok(k) => Some(k),
                Err(err) => {
                    warn!(key = k, %err, "unparseable key, treating as absent");
                    None
                }
            },
            None => None,
        };

        let mut factors = [ChordFactor::Unknown; 4];
        if let Some(root) = &root {
            for voice in Voice::ALL {
                if let Some(p) = &pitches[voice.index()] {
                    factors[voice.index()] =
                        ChordFactor::from_pitch_classes(p.pitch_class(), root.pitch_class());
                }
            }
        }

        Ok(Chord {
            pitches,
            factors,
            root,
            quality,
            inversion: input.inversion,
            degree: input
                .degree
                .as_deref()
                .map_or(Degree::Unknown, Degree::from_label),
            degree_num: input.degree_num,
            function: input.function,
            key,
            special_type: input.special_type,
        })
    }

    /// Like `from_input` but logs and returns None instead of failing.
    pub fn from_input_safe(input: &ChordInput) -> Option<Chord> {
        match Chord::from_input(input) {
            Ok(chord) => Some(chord),
            Err(err) => {
                warn!(%err, "skipping chord with unparseable voice");
                None
            }
        }
    }

    /// Copy of this chord with the ambient key filled in when the input did
    /// not declare one. The chord itself is never mutated in place.
    pub fn with_key(&self, ambient: Option<Key>) -> Chord {
        let mut chord = self.clone();
        if chord.key.is_none() {
            chord.key = ambient;
        }
        chord
    }

    pub fn pitch(&self, voice: Voice) -> Option<&Pitch> {
        self.pitches[voice.index()].as_ref()
    }

    pub fn factor(&self, voice: Voice) -> ChordFactor {
        self.factors[voice.index()]
    }

    /// Voices currently sounding the given factor, bass to soprano.
    pub fn voices_with_factor(&self, factor: ChordFactor) -> Vec<Voice> {
        Voice::ALL
            .into_iter()
            .filter(|v| self.pitches[v.index()].is_some() && self.factors[v.index()] == factor)
            .collect()
    }

    pub fn has_factor(&self, factor: ChordFactor) -> bool {
        Voice::ALL
            .into_iter()
            .any(|v| self.pitches[v.index()].is_some() && self.factors[v.index()] == factor)
    }

    /// Root, third, and fifth all present.
    pub fn is_complete(&self) -> bool {
        self.has_factor(ChordFactor::Root)
            && self.has_factor(ChordFactor::Third)
            && self.has_factor(ChordFactor::Fifth)
    }

    /// Factors sounded by more than one voice.
    pub fn doubled_factors(&self) -> Vec<ChordFactor> {
        const KNOWN: [ChordFactor; 4] = [
            ChordFactor::Root,
            ChordFactor::Third,
            ChordFactor::Fifth,
            ChordFactor::Seventh,
        ];
        KNOWN
            .into_iter()
            .filter(|f| self.voices_with_factor(*f).len() > 1)
            .collect()
    }

    /// Required factors absent from the voicing, per the catalog definition
    /// of the declared quality. Empty when the quality is unknown or its
    /// factor count varies.
    pub fn missing_factors(&self) -> Vec<ChordFactor> {
        let Some(quality) = self.quality else {
            return Vec::new();
        };
        let required: &[ChordFactor] = match quality.definition().num_factors {
            Some(3) => &[ChordFactor::Root, ChordFactor::Third, ChordFactor::Fifth],
            Some(4) => &[
                ChordFactor::Root,
                ChordFactor::Third,
                ChordFactor::Fifth,
                ChordFactor::Seventh,
            ],
            _ => return Vec::new(),
        };
        required
            .iter()
            .copied()
            .filter(|f| !self.has_factor(*f))
            .collect()
    }

    /// Sounding pitch classes of the voicing, deduplicated.
    pub fn pitch_class_set(&self) -> Vec<u8> {
        let mut set: Vec<u8> = self
            .pitches
            .iter()
            .flatten()
            .map(|p| p.pitch_class())
            .collect();
        set.sort_unstable();
        set.dedup();
        set
    }

    /// Unique chromatic intervals above the root, sorted, 0 included when
    /// the root itself sounds. Used for augmented-sixth heuristics.
    pub fn intervals_from_root(&self) -> Vec<u8> {
        let Some(root) = &self.root else {
            return Vec::new();
        };
        let root_pc = root.pitch_class() as i16;
        let mut intervals: Vec<u8> = self
            .pitches
            .iter()
            .flatten()
            .map(|p| (p.pitch_class() as i16 - root_pc).rem_euclid(12) as u8)
            .collect();
        intervals.sort_unstable();
        intervals.dedup();
        intervals
    }

    /// Seventh present in the voicing.
    pub fn has_seventh(&self) -> bool {
        self.has_factor(ChordFactor::Seventh)
    }

    /// Chromatic-sonority heuristic for augmented-sixth family chords that
    /// reach the validator without a special_type tag. An interval of 10
    /// above the root, or a tritone in a voicing of three or more distinct
    /// intervals without a seventh, reads as an altered chord.
    pub fn looks_chromatic(&self) -> bool {
        let intervals = self.intervals_from_root();
        if intervals.contains(&10) {
            return true;
        }
        intervals.contains(&6) && intervals.len() >= 3 && !intervals.contains(&7)
    }

    /// Roman-numeral degree: the declared label when present, otherwise
    /// computed from root and key, otherwise Unknown.
    pub fn effective_degree(&self) -> Degree {
        if !self.degree.is_unknown() {
            return self.degree.clone();
        }
        match (&self.root, &self.key) {
            (Some(root), Some(key)) => key.degree_of_root(Some(&root.name)),
            _ => Degree::Unknown,
        }
    }

    /// Name to report the chord by: the root name, else the bass note name,
    /// else "?".
    pub fn display_root(&self) -> String {
        if let Some(root) = &self.root {
            return root.name.to_string();
        }
        match self.pitch(Voice::Bass) {
            Some(bass) => bass.name.to_string(),
            None => "?".to_string(),
        }
    }
}

fn parse_root(raw: &str) -> Result<Pitch, PitchError> {
    if raw.trim_end().ends_with(|c: char| c.is_ascii_digit()) {
        raw.parse()
    } else {
        format!("{raw}4").parse()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.display_root();
        let quality = self
            .quality
            .map_or("unknown", |q| q.label());
        write!(f, "{root} {quality}")?;
        for voice in Voice::ALL {
            if let Some(p) = self.pitch(voice) {
                write!(f, " {}:{p}({})", voice.short(), self.factor(voice))?;
            }
        }
        Ok(())
    }
}

impl FromStr for Chord {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input: ChordInput = serde_json::from_str(s)?;
        Chord::from_input(&input).map_err(serde::de::Error::custom)
    }
}
