// Unequal fifths: a diminished fifth opening out to a perfect fifth in a
// pair that involves the bass.

use crate::rule::{AffectedVoices, Context, Detection, Rule, RuleTier};
use cantoria_theory::interval::{Interval, Motion};
use cantoria_theory::pitch::Voice;
use cantoria_theory::Chord;

/// d5 -> P5 with the bass involved.
///
/// The inverse direction (P5 -> d5) resolves and is left alone, as are
/// upper-voice pairs. Parallel tenths between bass and soprano legitimize
/// the motion.
pub struct UnequalFifths;

const BASS_PAIRS: [(Voice, Voice); 3] = [
    (Voice::Bass, Voice::Soprano),
    (Voice::Bass, Voice::Alto),
    (Voice::Bass, Voice::Tenor),
];

/// Bass and soprano moving in parallel thirds or tenths.
fn has_parallel_tenths(chord1: &Chord, chord2: &Chord) -> bool {
    let (Some(b1), Some(s1), Some(b2), Some(s2)) = (
        chord1.pitch(Voice::Bass),
        chord1.pitch(Voice::Soprano),
        chord2.pitch(Voice::Bass),
        chord2.pitch(Voice::Soprano),
    ) else {
        return false;
    };

    if !Interval::between(b1, s1).is_simple_third() || !Interval::between(b2, s2).is_simple_third()
    {
        return false;
    }
    Motion::classify(b1, b2, s1, s2) == Motion::Parallel
}

impl Rule for UnequalFifths {
    fn name(&self) -> &'static str {
        "unequal_fifths"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FFA500"
    }
    fn short_msg(&self) -> &'static str {
        "Unequal fifths"
    }
    fn full_msg(&self) -> &'static str {
        "A diminished fifth opens into a perfect fifth against the bass. \
         Avoid: the dissonance expands instead of resolving."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (bass, upper) in BASS_PAIRS {
            let (Some(a1), Some(b1), Some(a2), Some(b2)) = (
                chord1.pitch(bass),
                chord1.pitch(upper),
                chord2.pitch(bass),
                chord2.pitch(upper),
            ) else {
                continue;
            };

            if !Interval::between(a1, b1).is_diminished_fifth() {
                continue;
            }
            if !Interval::between(a2, b2).is_perfect_fifth() {
                continue;
            }
            if has_parallel_tenths(chord1, chord2) {
                continue;
            }

            return Some(Detection::at_first(AffectedVoices::pair(bass, upper)));
        }
        None
    }

    fn confidence(
        &self,
        _chord1: &Chord,
        _chord2: &Chord,
        _ctx: &Context,
        _detection: &Detection,
    ) -> u8 {
        90
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::run_rule;
    use cantoria_theory::ChordInput;

    fn chord(json: &str) -> Chord {
        let input: ChordInput = serde_json::from_str(json).unwrap();
        Chord::from_input(&input).unwrap()
    }

    #[test]
    fn test_unequal_fifths_with_bass() {
        // B: B2 -> C3 under T: F3 -> G3: d5 opening to P5.
        let c1 = chord(r#"{"T": "F3", "B": "B2"}"#);
        let c2 = chord(r#"{"T": "G3", "B": "C3"}"#);
        let rule = UnequalFifths;
        let d = rule.detect(&c1, &c2).unwrap();
        assert_eq!(d.voices, AffectedVoices::pair(Voice::Bass, Voice::Tenor));
        let v = run_rule(&rule, &c1, &c2, &Context::default()).unwrap();
        assert_eq!(v.confidence, 90);
    }

    #[test]
    fn test_resolving_direction_is_fine() {
        // P5 -> d5 contracts toward resolution and is not flagged.
        let c1 = chord(r#"{"T": "G3", "B": "C3"}"#);
        let c2 = chord(r#"{"T": "F3", "B": "B2"}"#);
        assert!(UnequalFifths.detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_upper_voices_not_covered() {
        // The same d5 -> P5 between alto and soprano is outside this rule.
        let c1 = chord(r#"{"S": "F4", "A": "B3"}"#);
        let c2 = chord(r#"{"S": "G4", "A": "C4"}"#);
        assert!(UnequalFifths.detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_parallel_tenths_exemption() {
        // B: B2 -> C3 and S: D4 -> E4 form parallel tenths while the
        // bass-tenor pair makes d5 -> P5.
        let c1 = chord(r#"{"S": "D4", "T": "F3", "B": "B2"}"#);
        let c2 = chord(r#"{"S": "E4", "T": "G3", "B": "C3"}"#);
        assert!(UnequalFifths.detect(&c1, &c2).is_none());
    }
}
