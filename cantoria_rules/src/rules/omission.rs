// Omitted essential factors. The third defines the chord quality and the
// seventh defines a seventh chord; the fifth is expendable.

use crate::rule::{AffectedVoices, Context, Detection, Rule, RuleTier};
use cantoria_theory::chord::ChordFactor;
use cantoria_theory::{Chord, Voice};

/// A voiced chord must carry its essential factors.
///
/// Only the first chord of the pair is examined: the second returns as the
/// first chord of the next pair, and checking both would double-report.
/// Chromatic chords (augmented-sixth family, Neapolitan, tagged secondary
/// dominants and borrowings) do not follow 1-3-5-7 morphology and are
/// exempt, whether tagged by the analyzer or recognized by interval
/// content.
pub struct ImproperOmission;

impl ImproperOmission {
    fn check(chord: &Chord) -> Option<Detection> {
        if chord.special_type.is_some() {
            return None;
        }
        if chord.looks_chromatic() {
            return None;
        }

        if chord.quality.is_some() {
            Self::check_by_quality(chord)
        } else {
            Self::check_by_factors(chord)
        }
    }

    // Quality known: compare the voicing against the catalog definition.
    fn check_by_quality(chord: &Chord) -> Option<Detection> {
        let missing = chord.missing_factors();
        if missing.contains(&ChordFactor::Third) {
            return Some(Detection::at_first(AffectedVoices::Unidentified));
        }
        if missing.contains(&ChordFactor::Seventh) && Self::expects_seventh(chord) {
            return Some(Detection::at_first(AffectedVoices::Unidentified));
        }
        None
    }

    // Quality unknown: fall back to raw factor analysis over the root.
    fn check_by_factors(chord: &Chord) -> Option<Detection> {
        chord.root?;

        let sounded: Vec<ChordFactor> = Voice::ALL
            .into_iter()
            .filter(|v| chord.pitch(*v).is_some())
            .map(|v| chord.factor(v))
            .collect();

        if !sounded.contains(&ChordFactor::Third) {
            return Some(Detection::at_first(AffectedVoices::Unidentified));
        }

        let degree_names_seventh = chord
            .effective_degree()
            .label()
            .is_some_and(|l| l.contains("V7") || l.contains("vii°7"));
        if degree_names_seventh && !sounded.contains(&ChordFactor::Seventh) {
            return Some(Detection::at_first(AffectedVoices::Unidentified));
        }
        None
    }

    // A missing seventh only matters when the chord claims one.
    fn expects_seventh(chord: &Chord) -> bool {
        if chord.quality.is_some_and(|q| q.has_seventh()) {
            return true;
        }
        chord
            .effective_degree()
            .label()
            .is_some_and(|l| l.starts_with('V'))
    }
}

impl Rule for ImproperOmission {
    fn name(&self) -> &'static str {
        "improper_omission"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Important
    }
    fn color(&self) -> &'static str {
        "#FF8C00"
    }
    fn short_msg(&self) -> &'static str {
        "Omitted chord factor"
    }
    fn full_msg(&self) -> &'static str {
        "The chord omits an essential factor. The third defines the chord's \
         quality and may be left out only in archaic final cadences."
    }

    fn detect(&self, chord1: &Chord, _chord2: &Chord) -> Option<Detection> {
        Self::check(chord1)
    }

    fn confidence(
        &self,
        _chord1: &Chord,
        _chord2: &Chord,
        _ctx: &Context,
        _detection: &Detection,
    ) -> u8 {
        85
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(json: &str) -> Chord {
        json.parse().unwrap()
    }

    #[test]
    fn test_complete_triad_is_clean() {
        let c = chord(
            r#"{"S": "G4", "A": "E4", "T": "C4", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        assert!(ImproperOmission.detect(&c, &c).is_none());
    }

    #[test]
    fn test_missing_third() {
        let c = chord(
            r#"{"S": "G4", "A": "C4", "T": "G3", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        let d = ImproperOmission.detect(&c, &c).unwrap();
        assert_eq!(d.chord_offset, 0);
        assert_eq!(d.voices, AffectedVoices::Unidentified);
    }

    #[test]
    fn test_missing_fifth_is_tolerated() {
        let c = chord(
            r#"{"S": "E4", "A": "C4", "T": "E3", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        assert!(ImproperOmission.detect(&c, &c).is_none());
    }

    #[test]
    fn test_dominant_seventh_without_seventh() {
        let c = chord(
            r#"{"S": "D5", "A": "B4", "T": "G3", "B": "G2",
                "root": "G", "quality": "dominant_seventh"}"#,
        );
        assert!(ImproperOmission.detect(&c, &c).is_some());
    }

    #[test]
    fn test_second_chord_is_not_checked() {
        let good = chord(
            r#"{"S": "G4", "A": "E4", "T": "C4", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        let bad = chord(
            r#"{"S": "G4", "A": "C4", "T": "G3", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        assert!(ImproperOmission.detect(&good, &bad).is_none());
    }

    #[test]
    fn test_tagged_chromatic_chord_is_exempt() {
        // Italian sixth has no fifth by construction.
        let it6 = chord(
            r#"{"S": "F#4", "A": "C4", "T": "C4", "B": "Ab3",
                "root": "Ab", "special_type": "+6it"}"#,
        );
        assert!(ImproperOmission.detect(&it6, &it6).is_none());
    }

    #[test]
    fn test_untagged_german_sixth_is_exempt_by_intervals() {
        // Ab C Eb F#: interval 10 above the root marks it chromatic.
        let ger6 = chord(r#"{"S": "F#4", "A": "Eb4", "T": "C4", "B": "Ab3", "root": "Ab"}"#);
        assert!(ImproperOmission.detect(&ger6, &ger6).is_none());
    }

    #[test]
    fn test_factor_fallback_without_quality() {
        // No quality declared; root-based factor analysis still finds the
        // missing third.
        let c = chord(r#"{"S": "G4", "A": "C4", "T": "G3", "B": "C3", "root": "C"}"#);
        assert!(ImproperOmission.detect(&c, &c).is_some());
    }

    #[test]
    fn test_no_root_no_quality_is_silent() {
        let c = chord(r#"{"S": "G4", "A": "C4", "T": "G3", "B": "C3"}"#);
        assert!(ImproperOmission.detect(&c, &c).is_none());
    }
}
