// Direct (hidden) fifths and octaves: a voice pair arrives at a perfect
// interval by similar motion without having been there before.
//
// Both rules carry their stepwise carve-outs inside detection, since the
// allowances depend on the offending pair. Severity then scales with how
// exposed the pair is: outer voices are the worst offenders.

use crate::context;
use crate::rule::{AffectedVoices, Context, Detection, Exception, Rule, RuleTier};
use cantoria_theory::interval::{Interval, Motion, LEAP_THRESHOLD};
use cantoria_theory::pitch::Voice;
use cantoria_theory::Chord;

fn pair_confidence(voices: &AffectedVoices) -> u8 {
    let has_bass = voices.contains(Voice::Bass);
    let has_soprano = voices.contains(Voice::Soprano);
    if has_bass && has_soprano {
        100
    } else if has_bass {
        90
    } else if has_soprano {
        80
    } else {
        70
    }
}

/// Arrival at a perfect fifth by similar motion.
///
/// A d5 start is left to the unequal-fifths rule, and a P5 start to the
/// parallel-fifths rule. Outer voices may still arrive at a fifth when the
/// soprano moves by step and the bass by a moderate leap; inner pairs when
/// exactly one voice moves by step.
pub struct DirectFifths {
    exceptions: Vec<Exception>,
}

impl DirectFifths {
    pub fn new() -> Self {
        DirectFifths {
            exceptions: vec![Exception {
                name: "revoicing",
                description: "allowed when redistributing the same chord",
                check: |c1, c2, _| context::is_revoicing(c1, c2),
            }],
        }
    }
}

impl Default for DirectFifths {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for DirectFifths {
    fn name(&self) -> &'static str {
        "direct_fifths"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FFFF00"
    }
    fn short_msg(&self) -> &'static str {
        "Direct fifth"
    }
    fn full_msg(&self) -> &'static str {
        "Two voices arrive at a perfect fifth by similar motion. Avoid: it \
         weakens the independence of the voices."
    }
    fn exceptions(&self) -> &[Exception] {
        &self.exceptions
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (v1, v2) in Voice::PAIRS {
            let (Some(a1), Some(b1), Some(a2), Some(b2)) = (
                chord1.pitch(v1),
                chord1.pitch(v2),
                chord2.pitch(v1),
                chord2.pitch(v2),
            ) else {
                continue;
            };

            if !Interval::between(a2, b2).is_perfect_fifth() {
                continue;
            }
            let initial = Interval::between(a1, b1);
            if initial.is_perfect_fifth() {
                continue; // parallel fifths territory
            }
            if initial.is_diminished_fifth() {
                continue; // unequal fifths territory
            }
            if Motion::classify(a1, a2, b1, b2) != Motion::Parallel {
                continue;
            }

            let v1_move = (a2.pitch_space() - a1.pitch_space()).abs();
            let v2_move = (b2.pitch_space() - b1.pitch_space()).abs();
            let v1_stepwise = v1_move <= LEAP_THRESHOLD;
            let v2_stepwise = v2_move <= LEAP_THRESHOLD;

            let is_outer = (v1 == Voice::Soprano && v2 == Voice::Bass)
                || (v1 == Voice::Bass && v2 == Voice::Soprano);
            if is_outer {
                let (soprano_stepwise, bass_move) = if v1 == Voice::Soprano {
                    (v1_stepwise, v2_move)
                } else {
                    (v2_stepwise, v1_move)
                };
                // Stepwise soprano over a bass leap of a third to a fifth.
                if soprano_stepwise && (3..=7).contains(&bass_move) {
                    continue;
                }
            } else if v1_stepwise != v2_stepwise {
                // Exactly one voice by step.
                continue;
            }

            return Some(Detection::at_first(AffectedVoices::pair(v1, v2)));
        }
        None
    }

    fn confidence(
        &self,
        _chord1: &Chord,
        _chord2: &Chord,
        _ctx: &Context,
        detection: &Detection,
    ) -> u8 {
        pair_confidence(&detection.voices)
    }
}

/// Arrival at a perfect octave or unison by similar motion.
///
/// The outer-voice carve-out is stricter than for fifths: only the cadence
/// shape of a soprano rising by semitone over a bass rising a perfect
/// fourth is tolerated.
pub struct DirectOctaves;

impl Rule for DirectOctaves {
    fn name(&self) -> &'static str {
        "direct_octaves"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FFFF00"
    }
    fn short_msg(&self) -> &'static str {
        "Direct octave"
    }
    fn full_msg(&self) -> &'static str {
        "Two voices arrive at a perfect octave by similar motion. Avoid: it \
         weakens the independence of the voices."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (v1, v2) in Voice::PAIRS {
            let (Some(a1), Some(b1), Some(a2), Some(b2)) = (
                chord1.pitch(v1),
                chord1.pitch(v2),
                chord2.pitch(v1),
                chord2.pitch(v2),
            ) else {
                continue;
            };

            if !Interval::between(a2, b2).is_octave_or_unison() {
                continue;
            }
            if Interval::between(a1, b1).is_octave_or_unison() {
                continue; // parallel octaves territory
            }
            if Motion::classify(a1, a2, b1, b2) != Motion::Parallel {
                continue;
            }

            // Signed movements: direction matters for the cadence carve-out.
            let v1_semis = a2.pitch_space() - a1.pitch_space();
            let v2_semis = b2.pitch_space() - b1.pitch_space();
            let v1_stepwise = v1_semis.abs() <= LEAP_THRESHOLD;
            let v2_stepwise = v2_semis.abs() <= LEAP_THRESHOLD;

            let is_outer = (v1 == Voice::Soprano && v2 == Voice::Bass)
                || (v1 == Voice::Bass && v2 == Voice::Soprano);
            if is_outer {
                let (soprano_semis, bass_semis) = if v1 == Voice::Soprano {
                    (v1_semis, v2_semis)
                } else {
                    (v2_semis, v1_semis)
                };
                // Leading tone to tonic in the soprano over a rising fourth
                // in the bass.
                if soprano_semis == 1 && bass_semis == 5 {
                    continue;
                }
            } else if v1_stepwise != v2_stepwise {
                continue;
            }

            return Some(Detection::at_first(AffectedVoices::pair(v1, v2)));
        }
        None
    }

    fn confidence(
        &self,
        _chord1: &Chord,
        _chord2: &Chord,
        _ctx: &Context,
        detection: &Detection,
    ) -> u8 {
        pair_confidence(&detection.voices)
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
    fn test_direct_fifth_outer_voices_both_leaping() {
        // S: C4 -> A4 (leap of 9), B: G2 -> D3 (leap of 7), both up,
        // arriving at a compound P5 (D3-A4) from a fourth.
        let c1 = chord(r#"{"S": "C4", "B": "G2"}"#);
        let c2 = chord(r#"{"S": "A4", "B": "D3"}"#);
        let rule = DirectFifths::new();
        let d = rule.detect(&c1, &c2).unwrap();
        assert_eq!(d.voices, AffectedVoices::pair(Voice::Soprano, Voice::Bass));
        let v = run_rule(&rule, &c1, &c2, &Context::default()).unwrap();
        assert_eq!(v.confidence, 100);
    }

    #[test]
    fn test_direct_fifth_outer_carveout() {
        // S: B3 -> A3 is stepwise, B: G2 -> D2 is a fourth down (5 semis);
        // tolerated for the outer pair.
        let c1 = chord(r#"{"S": "B3", "B": "G2"}"#);
        let c2 = chord(r#"{"S": "A3", "B": "D2"}"#);
        assert!(DirectFifths::new().detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_direct_fifth_inner_one_step_allowed() {
        // A: B3 -> C4 stepwise, T: C3 -> F3 leaping, both rising into the
        // fifth F3-C4; one stepwise voice satisfies the inner carve-out.
        let c1 = chord(r#"{"A": "B3", "T": "C3"}"#);
        let c2 = chord(r#"{"A": "C4", "T": "F3"}"#);
        assert!(DirectFifths::new().detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_direct_fifth_inner_both_stepping() {
        // Both inner voices stepwise into a fifth is still direct: the
        // carve-out needs exactly one stepwise voice. A: G#3 -> A3 and
        // T: C3 -> D3 squeeze an A5 into a P5.
        let c1 = chord(r#"{"A": "G#3", "T": "C3"}"#);
        let c2 = chord(r#"{"A": "A3", "T": "D3"}"#);
        let rule = DirectFifths::new();
        let d = rule.detect(&c1, &c2).unwrap();
        let v = run_rule(&rule, &c1, &c2, &Context::default()).unwrap();
        assert_eq!(d.voices, AffectedVoices::pair(Voice::Alto, Voice::Tenor));
        assert_eq!(v.confidence, 70);
    }

    #[test]
    fn test_diminished_start_left_to_unequal_fifths() {
        // B3-F4 is d5 moving to C4-G4 P5: unequal fifths, not direct.
        let c1 = chord(r#"{"A": "F4", "T": "B3"}"#);
        let c2 = chord(r#"{"A": "G4", "T": "C4"}"#);
        assert!(DirectFifths::new().detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_direct_octave_outer_cadence_allowed() {
        // S: B4 -> C5 (+1), B: G2 -> C3 (+5): the permitted cadence shape.
        let c1 = chord(r#"{"S": "B4", "B": "G2"}"#);
        let c2 = chord(r#"{"S": "C5", "B": "C3"}"#);
        assert!(DirectOctaves.detect(&c1, &c2).is_none());
    }

    #[test]
    fn test_direct_octave_outer_voices_leaping() {
        // S: D4 -> G4 (+5) over B: C2 -> G2 (+7). Arrival G2-G4 is a double
        // octave, named P8; the soprano did not rise by a single semitone so
        // the cadence carve-out does not apply.
        let c1 = chord(r#"{"S": "D4", "B": "C2"}"#);
        let c2 = chord(r#"{"S": "G4", "B": "G2"}"#);
        let rule = DirectOctaves;
        let d = rule.detect(&c1, &c2).unwrap();
        assert_eq!(d.voices, AffectedVoices::pair(Voice::Soprano, Voice::Bass));
        let v = run_rule(&rule, &c1, &c2, &Context::default()).unwrap();
        assert_eq!(v.confidence, 100);
    }

    #[test]
    fn test_direct_octave_with_bass_not_soprano() {
        // T: D3 -> G3 (+5), B: C2 -> G2 (+7) arriving at an octave from a
        // ninth; the strict cadence carve-out only exists for the outer pair.
        let c1 = chord(r#"{"T": "D3", "B": "C2"}"#);
        let c2 = chord(r#"{"T": "G3", "B": "G2"}"#);
        let rule = DirectOctaves;
        let d = rule.detect(&c1, &c2).unwrap();
        let v = run_rule(&rule, &c1, &c2, &Context::default()).unwrap();
        assert_eq!(d.voices, AffectedVoices::pair(Voice::Tenor, Voice::Bass));
        assert_eq!(v.confidence, 90);
    }
}
