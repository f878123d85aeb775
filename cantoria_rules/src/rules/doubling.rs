// Doubling restrictions on tendency tones: the leading tone and the
// chordal seventh may each sound in only one voice.
//
// Both rules inspect each chord of the pair on its own, first chord
// first. Factors are recomputed here against the declared root or, when
// absent, the bass note, so an unanalyzed chord still gets checked.

use crate::rule::{AffectedVoices, Detection, Rule, RuleTier};
use cantoria_theory::chord::ChordFactor;
use cantoria_theory::key::Degree;
use cantoria_theory::{Chord, Voice};

// Root pitch class for factor analysis, falling back to the bass note.
fn analysis_root_pc(chord: &Chord) -> Option<u8> {
    if let Some(root) = &chord.root {
        return Some(root.pitch_class());
    }
    chord.pitch(Voice::Bass).map(|p| p.pitch_class())
}

// Voices sounding the given factor above the analysis root.
fn voices_sounding(chord: &Chord, factor: ChordFactor) -> Vec<Voice> {
    let Some(root_pc) = analysis_root_pc(chord) else {
        return Vec::new();
    };
    Voice::ALL
        .into_iter()
        .filter(|v| {
            chord
                .pitch(*v)
                .is_some_and(|p| ChordFactor::from_pitch_classes(p.pitch_class(), root_pc) == factor)
        })
        .collect()
}

// Dominant-family degrees that carry an active leading tone: V, vii°
// and their applied (secondary) spellings.
fn is_dominant_degree(degree: &Degree) -> bool {
    let Some(label) = degree.label() else {
        return false;
    };
    label == "V"
        || label == "vii°"
        || label.starts_with("V/")
        || (label.starts_with("vii") && label.contains('/'))
}

// Which chord factor carries the leading tone. In V it is the major
// third over the root; in vii° the root itself is the leading tone.
fn leading_tone_factor(degree: &Degree) -> ChordFactor {
    if degree.label().is_some_and(|l| l.starts_with("vii")) {
        ChordFactor::Root
    } else {
        ChordFactor::Third
    }
}

/// In dominant-function chords the leading tone must not be doubled.
pub struct DuplicatedLeadingTone;

impl DuplicatedLeadingTone {
    fn check_chord(chord: &Chord) -> Option<AffectedVoices> {
        let degree = chord.effective_degree();
        if !is_dominant_degree(&degree) {
            return None;
        }
        let voices = voices_sounding(chord, leading_tone_factor(&degree));
        (voices.len() > 1).then(|| AffectedVoices::Voices(voices))
    }
}

impl Rule for DuplicatedLeadingTone {
    fn name(&self) -> &'static str {
        "duplicated_leading_tone"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FF0000"
    }
    fn short_msg(&self) -> &'static str {
        "Doubled leading tone"
    }
    fn full_msg(&self) -> &'static str {
        "The leading tone appears in more than one voice; both copies want \
         to resolve to the tonic, inviting parallels."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        if let Some(voices) = Self::check_chord(chord1) {
            return Some(Detection::at_first(voices));
        }
        Self::check_chord(chord2).map(Detection::at_second)
    }
}

/// The chordal seventh is a dissonance and must not be doubled.
pub struct DuplicatedSeventh;

impl DuplicatedSeventh {
    fn check_chord(chord: &Chord) -> Option<AffectedVoices> {
        let voices = voices_sounding(chord, ChordFactor::Seventh);
        (voices.len() > 1).then(|| AffectedVoices::Voices(voices))
    }
}

impl Rule for DuplicatedSeventh {
    fn name(&self) -> &'static str {
        "duplicated_seventh"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#DC143C"
    }
    fn short_msg(&self) -> &'static str {
        "Doubled seventh"
    }
    fn full_msg(&self) -> &'static str {
        "The chordal seventh appears in more than one voice; a dissonance \
         that must resolve cannot be doubled."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        if let Some(voices) = Self::check_chord(chord1) {
            return Some(Detection::at_first(voices));
        }
        Self::check_chord(chord2).map(Detection::at_second)
    }
}
