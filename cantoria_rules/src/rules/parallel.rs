// Parallel and consecutive perfect intervals: two fifths (P5 or A5) or
// two octaves between the same voice pair across adjacent chords.

use crate::context;
use crate::rule::{AffectedVoices, Detection, Exception, Rule, RuleTier};
use cantoria_theory::interval::{Interval, Motion};
use cantoria_theory::Chord;

/// Consecutive fifths between the same pair of voices.
///
/// Both P5->P5 and A5->A5 count, in parallel or contrary motion. Interval
/// identity is judged by spelled name, so a descending minor sixth (also
/// 8 semitones) never reads as an augmented fifth.
pub struct ParallelFifths {
    exceptions: Vec<Exception>,
}

impl ParallelFifths {
    pub fn new() -> Self {
        ParallelFifths {
            exceptions: vec![
                Exception {
                    name: "dominant_pair",
                    description: "allowed between V-VII or VII-V, both dominant in function",
                    check: |c1, c2, ctx| context::is_dominant_pair(c1, c2, ctx.key),
                },
                Exception {
                    name: "revoicing",
                    description: "allowed when redistributing the same chord",
                    check: |c1, c2, _| context::is_revoicing(c1, c2),
                },
                Exception {
                    name: "second_fifth_diminished",
                    description: "a P5 moving to d5 resolves melodically and is tolerated",
                    check: |c1, c2, _| second_fifth_is_diminished(c1, c2),
                },
            ],
        }
    }
}

impl Default for ParallelFifths {
    fn default() -> Self {
        Self::new()
    }
}

/// P5 -> d5 exemption.
fn second_fifth_is_diminished(_chord1: &Chord, _chord2: &Chord) -> bool {
    // TODO: needs the offending pair from the detection to check only that
    // pair's second interval; until then the exemption never applies.
    false
}

impl Rule for ParallelFifths {
    fn name(&self) -> &'static str {
        "parallel_fifths"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FF0000"
    }
    fn short_msg(&self) -> &'static str {
        "Parallel fifths"
    }
    fn full_msg(&self) -> &'static str {
        "Two consecutive perfect fifths between the same voices. Forbidden in \
         both parallel and contrary motion: they weaken voice independence \
         and blur the harmonic texture."
    }
    fn exceptions(&self) -> &[Exception] {
        &self.exceptions
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (v1, v2) in cantoria_theory::Voice::PAIRS {
            let (Some(a1), Some(b1), Some(a2), Some(b2)) = (
                chord1.pitch(v1),
                chord1.pitch(v2),
                chord2.pitch(v1),
                chord2.pitch(v2),
            ) else {
                continue;
            };

            if !Interval::between(a1, b1).is_fifth() || !Interval::between(a2, b2).is_fifth() {
                continue;
            }

            let motion = Motion::classify(a1, a2, b1, b2);
            if matches!(motion, Motion::Parallel | Motion::Contrary) {
                return Some(
                    Detection::at_first(AffectedVoices::pair(v1, v2)).with_motion(motion),
                );
            }
        }
        None
    }
}

/// Consecutive octaves (or unisons) between the same pair of voices.
///
/// Stricter than fifths: no exceptions.
pub struct ParallelOctaves;

impl Rule for ParallelOctaves {
    fn name(&self) -> &'static str {
        "parallel_octaves"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FF0000"
    }
    fn short_msg(&self) -> &'static str {
        "Parallel octaves"
    }
    fn full_msg(&self) -> &'static str {
        "Two consecutive perfect octaves between the same voices. Forbidden in \
         both parallel and contrary motion: they collapse two voices into one \
         line and impoverish the harmony."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (v1, v2) in cantoria_theory::Voice::PAIRS {
            let (Some(a1), Some(b1), Some(a2), Some(b2)) = (
                chord1.pitch(v1),
                chord1.pitch(v2),
                chord2.pitch(v1),
                chord2.pitch(v2),
            ) else {
                continue;
            };

            if !Interval::between(a1, b1).is_octave_or_unison()
                || !Interval::between(a2, b2).is_octave_or_unison()
            {
                continue;
            }

            let motion = Motion::classify(a1, a2, b1, b2);
            if matches!(motion, Motion::Parallel | Motion::Contrary) {
                return Some(
                    Detection::at_first(AffectedVoices::pair(v1, v2)).with_motion(motion),
                );
            }
        }
        None
    }
}
