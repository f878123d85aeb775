// Seventh resolution: a chordal seventh is an obligatory dissonance and
// must fall by step.

use crate::context;
use crate::rule::{AffectedVoices, Detection, Rule, RuleTier};
use cantoria_theory::chord::ChordFactor;
use cantoria_theory::{Chord, Progression};

/// Every voice sounding the seventh must descend one or two semitones.
///
/// Re-voicings of the same chord carry the seventh along and are exempt.
/// Without a declared or inferable root there is no seventh to track.
pub struct SeventhResolution;

impl Rule for SeventhResolution {
    fn name(&self) -> &'static str {
        "seventh_resolution"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FF0000"
    }
    fn short_msg(&self) -> &'static str {
        "Unresolved seventh"
    }
    fn full_msg(&self) -> &'static str {
        "The chordal seventh is an obligatory dissonance and must resolve \
         down by step."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        chord1.root?;

        if context::is_revoicing(chord1, chord2) {
            return None;
        }

        let prog = Progression::new(chord1, chord2);
        for voice in chord1.voices_with_factor(ChordFactor::Seventh) {
            let Some(semitones) = prog.melodic_semitones(voice) else {
                continue;
            };
            if semitones == -1 || semitones == -2 {
                continue;
            }

            return Some(Detection::at_first(AffectedVoices::single(voice)));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{run_rule, Context};
    use cantoria_theory::{ChordInput, Voice};

    fn chord(json: &str) -> Chord {
        let input: ChordInput = serde_json::from_str(json).unwrap();
        Chord::from_input(&input).unwrap()
    }

    #[test]
    fn test_seventh_falling_by_step_is_clean() {
        // F4 (seventh of G7) falls to E4.
        let g7 = chord(
            r#"{"S": "F4", "A": "B3", "T": "D3", "B": "G2", "root": "G", "quality": "dominant_seventh"}"#,
        );
        let c = chord(
            r#"{"S": "E4", "A": "C4", "T": "C3", "B": "C3", "root": "C", "quality": "major"}"#,
        );
        assert!(run_rule(&SeventhResolution, &g7, &c, &Context::default()).is_none());
    }

    #[test]
    fn test_seventh_leaping_away() {
        // F4 leaps up to G4 instead of resolving.
        let g7 = chord(
            r#"{"S": "F4", "A": "B3", "T": "D3", "B": "G2", "root": "G", "quality": "dominant_seventh"}"#,
        );
        let c = chord(
            r#"{"S": "G4", "A": "C4", "T": "E3", "B": "C3", "root": "C", "quality": "major"}"#,
        );
        let d = SeventhResolution.detect(&g7, &c).unwrap();
        assert_eq!(d.voices, AffectedVoices::single(Voice::Soprano));
        let v = run_rule(&SeventhResolution, &g7, &c, &Context::default()).unwrap();
        assert_eq!(v.confidence, 100);
    }

    #[test]
    fn test_seventh_held_over_is_flagged() {
        // The seventh staying in place is not a resolution.
        let g7 = chord(
            r#"{"T": "F3", "B": "G2", "root": "G", "quality": "dominant_seventh"}"#,
        );
        let c = chord(r#"{"T": "F3", "B": "C3", "root": "C", "quality": "major"}"#);
        assert!(SeventhResolution.detect(&g7, &c).is_some());
    }

    #[test]
    fn test_revoicing_carries_the_seventh() {
        let close = chord(
            r#"{"S": "F4", "A": "B3", "T": "D3", "B": "G2",
                "root": "G", "quality": "dominant_seventh", "inversion": 0}"#,
        );
        let open = chord(
            r#"{"S": "B4", "A": "F4", "T": "D3", "B": "G2",
                "root": "G", "quality": "dominant_seventh", "inversion": 0}"#,
        );
        assert!(SeventhResolution.detect(&close, &open).is_none());
    }

    #[test]
    fn test_no_root_no_seventh_tracking() {
        let c1 = chord(r#"{"S": "F4", "B": "G2"}"#);
        let c2 = chord(r#"{"S": "G4", "B": "C3"}"#);
        assert!(SeventhResolution.detect(&c1, &c2).is_none());
    }
}
