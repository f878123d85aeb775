// Leading-tone resolution: the leading tone of a dominant-function chord
// must resolve to the tonic, with a small set of pedagogical escapes.
//
// Two kinds of leading tone are tracked. The tonal leading tone is the
// raised seventh degree of the key, active only inside dominant-degree
// chords. The local leading tone is the major third of a secondary
// dominant resolving down a fifth, detected from declared degrees so that
// V7/V is not mistaken for a diatonic ii.

use crate::context;
use crate::rule::{AffectedVoices, Detection, Rule, RuleTier};
use cantoria_theory::chord::ChordFactor;
use cantoria_theory::interval::{Interval, Quality};
use cantoria_theory::key::{Degree, Key, KeyMode};
use cantoria_theory::pitch::Voice;
use cantoria_theory::Chord;

pub struct LeadingToneResolution;

/// Degree computed from the chord root and a key, ignoring any declared
/// label. Secondary labels collapse to their diatonic position here.
fn computed_degree(chord: &Chord, key: Option<Key>) -> Degree {
    match (&chord.root, key) {
        (Some(root), Some(k)) => k.degree_of_root(Some(&root.name)),
        _ => Degree::Unknown,
    }
}

/// Root motion of a perfect fourth up or fifth down (or their compounds),
/// the dominant-to-tonic gesture.
fn roots_move_by_fifth(chord1: &Chord, chord2: &Chord) -> bool {
    let (Some(r1), Some(r2)) = (&chord1.root, &chord2.root) else {
        return false;
    };
    let iv = Interval::between(r1, r2);
    iv.quality == Quality::Perfect && matches!(iv.generic, 4 | 5)
}

impl Rule for LeadingToneResolution {
    fn name(&self) -> &'static str {
        "leading_tone_resolution"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#CD853F"
    }
    fn short_msg(&self) -> &'static str {
        "Unresolved leading tone"
    }
    fn full_msg(&self) -> &'static str {
        "The leading tone of a dominant-function chord must resolve to the \
         tonic (or its octave)."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        let key = chord1.key;

        for voice in Voice::ALL {
            let Some(note1) = chord1.pitch(voice) else {
                continue;
            };

            let mut is_candidate = false;
            let mut is_local = false;

            // Tonal leading tone: degree 7 a semitone under the tonic,
            // active only in dominant-degree chords. In iii the same note
            // is the chord fifth and carries no obligation.
            if let Some(k) = key {
                if k.degree_info(note1).is_leading_tone
                    && computed_degree(chord1, key).is_dominant()
                {
                    is_candidate = true;
                }
            }

            // Local leading tone: major third over the root of a chord
            // resolving down a fifth, when the declared degree marks the
            // chord as secondary or otherwise non-diatonic.
            if !is_candidate && roots_move_by_fifth(chord1, chord2) {
                let declared = &chord1.degree;
                if (declared.is_secondary() || !declared.is_diatonic_label())
                    && let Some(root1) = &chord1.root
                {
                    let semis =
                        (note1.pitch_class() as i16 - root1.pitch_class() as i16).rem_euclid(12);
                    if semis == 4 {
                        is_candidate = true;
                        is_local = true;
                    }
                }
            }

            if !is_candidate {
                continue;
            }

            // Mediant chords never impose resolution.
            if matches!(computed_degree(chord1, key).label(), Some("III") | Some("iii")) {
                continue;
            }

            let Some(note2) = chord2.pitch(voice) else {
                continue;
            };

            // Resolved: lands on the tonic degree, in any octave.
            if let Some(k) = key
                && k.degree_info(note2).degree == 1
            {
                continue;
            }

            // Resolved: rises by semitone (covers local leading tones).
            if note2.pitch_space() - note1.pitch_space() == 1 {
                continue;
            }

            // Deceptive cadence handling. A submediant destination keeps the
            // obligation (the tonic is its third); an unknown degree might
            // be the tonic, so it also keeps validating. Any other known
            // non-tonic destination releases a tonal leading tone.
            if key.is_some() {
                let dest = computed_degree(chord2, key);
                if !dest.is_unknown()
                    && !dest.is_submediant()
                    && !dest.is_tonic()
                    && !is_local
                {
                    continue;
                }
            }

            // Between dominant-function chords, movement is free.
            if key.is_some() && context::is_dominant_pair(chord1, chord2, key) {
                continue;
            }

            // Deceptive cadence from V6 in major: the bass leading tone may
            // fall to the root of vi.
            if voice == Voice::Bass
                && !is_local
                && let Some(k) = key
                && k.mode == KeyMode::Major
                && computed_degree(chord2, key).label() == Some("vi")
                && let Some(root2) = &chord2.root
                && ChordFactor::from_pitch_classes(note2.pitch_class(), root2.pitch_class())
                    == ChordFactor::Root
            {
                continue;
            }

            // Covered resolution in an interior voice: the leading tone may
            // drop to the fifth of the resolution chord when the next voice
            // up sounds the root.
            if matches!(voice, Voice::Alto | Voice::Tenor)
                && let Some(root2) = &chord2.root
                && ChordFactor::from_pitch_classes(note2.pitch_class(), root2.pitch_class())
                    == ChordFactor::Fifth
            {
                let upper = if voice == Voice::Alto {
                    Voice::Soprano
                } else {
                    Voice::Alto
                };
                if let Some(upper_note) = chord2.pitch(upper)
                    && ChordFactor::from_pitch_classes(
                        upper_note.pitch_class(),
                        root2.pitch_class(),
                    ) == ChordFactor::Root
                {
                    continue;
                }
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
    use cantoria_theory::ChordInput;

    fn chord(json: &str) -> Chord {
        let input: ChordInput = serde_json::from_str(json).unwrap();
        Chord::from_input(&input).unwrap()
    }

    fn ctx_c_major() -> Context {
        Context {
            key: Some("C major".parse().unwrap()),
        }
    }

    #[test]
    fn test_leading_tone_resolving_up_is_clean() {
        // V -> I with B4 -> C5 in the soprano.
        let v = chord(
            r#"{"S": "B4", "A": "D4", "T": "G3", "B": "G2", "root": "G", "quality": "major"}"#,
        );
        let i = chord(
            r#"{"S": "C5", "A": "E4", "T": "G3", "B": "C3", "root": "C", "quality": "major"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &v, &i, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_leading_tone_abandoned_in_soprano() {
        // B4 drops to G4: the leading tone escapes to the dominant.
        let v = chord(
            r#"{"S": "B4", "A": "D4", "T": "G3", "B": "G2", "root": "G", "quality": "major"}"#,
        );
        let i = chord(
            r#"{"S": "G4", "A": "E4", "T": "C4", "B": "C3", "root": "C", "quality": "major"}"#,
        );
        let d = LeadingToneResolution.detect(
            &v.with_key(ctx_c_major().key),
            &i.with_key(ctx_c_major().key),
        );
        assert_eq!(d.unwrap().voices, AffectedVoices::single(Voice::Soprano));
    }

    #[test]
    fn test_leading_tone_in_mediant_is_free() {
        // In iii the scale's seventh degree is the chord fifth: E-G-B. The
        // B in the alto may move anywhere.
        let iii = chord(
            r#"{"S": "G4", "A": "B3", "T": "E3", "B": "E2", "root": "E", "quality": "minor"}"#,
        );
        let iv = chord(
            r#"{"S": "A4", "A": "C4", "T": "F3", "B": "F2", "root": "F", "quality": "major"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &iii, &iv, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_interior_covered_resolution() {
        // Alto leading tone drops to the fifth of I while the soprano above
        // sounds the tonic root.
        let v = chord(
            r#"{"S": "D5", "A": "B4", "T": "F4", "B": "G2", "root": "G", "quality": "dominant_seventh"}"#,
        );
        let i = chord(
            r#"{"S": "C5", "A": "G4", "T": "E4", "B": "C3", "root": "C", "quality": "major"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &v, &i, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_deceptive_cadence_keeps_obligation() {
        // V -> vi: the tonic is the third of vi, so the leading tone still
        // must rise. Here the soprano B4 falls to A4 instead.
        let v = chord(
            r#"{"S": "B4", "A": "D4", "T": "G3", "B": "G2", "root": "G", "quality": "major"}"#,
        );
        let vi = chord(
            r#"{"S": "A4", "A": "E4", "T": "C4", "B": "A2", "root": "A", "quality": "minor"}"#,
        );
        let d = LeadingToneResolution.detect(
            &v.with_key(ctx_c_major().key),
            &vi.with_key(ctx_c_major().key),
        );
        assert_eq!(d.unwrap().voices, AffectedVoices::single(Voice::Soprano));
    }

    #[test]
    fn test_remote_destination_releases_tonal_leading_tone() {
        // V -> IV releases the tonal leading tone (no tonic in reach).
        let v = chord(
            r#"{"S": "B4", "A": "D4", "T": "G3", "B": "G2", "root": "G", "quality": "major"}"#,
        );
        let iv = chord(
            r#"{"S": "A4", "A": "F4", "T": "C4", "B": "F2", "root": "F", "quality": "major"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &v, &iv, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_unknown_destination_degree_keeps_obligation() {
        // The destination has no root, so its degree cannot be computed.
        // It might still be the tonic, so the leading tone gets no release.
        let v = chord(
            r#"{"S": "B4", "A": "D4", "T": "G3", "B": "G2", "root": "G", "quality": "major"}"#,
        );
        let unknown = chord(r#"{"S": "A4", "A": "F4", "T": "D4", "B": "D3"}"#);
        let d = LeadingToneResolution.detect(
            &v.with_key(ctx_c_major().key),
            &unknown.with_key(ctx_c_major().key),
        );
        assert_eq!(d.unwrap().voices, AffectedVoices::single(Voice::Soprano));
    }

    #[test]
    fn test_v6_deceptive_cadence_in_bass() {
        // V6 -> vi in major: the bass leading tone B2 falls to A2, the root
        // of vi. Allowed.
        let v6 = chord(
            r#"{"S": "G4", "A": "D4", "T": "G3", "B": "B2", "root": "G", "quality": "major", "inversion": 1}"#,
        );
        let vi = chord(
            r#"{"S": "A4", "A": "C4", "T": "E3", "B": "A2", "root": "A", "quality": "minor"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &v6, &vi, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_local_leading_tone_of_secondary_dominant() {
        // D7 -> G declared as V7/V -> V. F# is the local leading tone; it
        // falls to D4 instead of rising to G.
        let v7_of_v = chord(
            r#"{"S": "F#4", "A": "C4", "T": "A3", "B": "D3",
                "root": "D", "quality": "dominant_seventh", "degree": "V7/V"}"#,
        );
        let v = chord(
            r#"{"S": "D4", "A": "B3", "T": "G3", "B": "G2",
                "root": "G", "quality": "major", "degree": "V"}"#,
        );
        let d = LeadingToneResolution.detect(
            &v7_of_v.with_key(ctx_c_major().key),
            &v.with_key(ctx_c_major().key),
        );
        assert_eq!(d.unwrap().voices, AffectedVoices::single(Voice::Soprano));
    }

    #[test]
    fn test_local_leading_tone_rising_is_clean() {
        let v7_of_v = chord(
            r#"{"S": "F#4", "A": "C4", "T": "A3", "B": "D3",
                "root": "D", "quality": "dominant_seventh", "degree": "V7/V"}"#,
        );
        let v = chord(
            r#"{"S": "G4", "A": "B3", "T": "G3", "B": "G2",
                "root": "G", "quality": "major", "degree": "V"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &v7_of_v, &v, &ctx_c_major()).is_none());
    }

    #[test]
    fn test_no_key_and_no_secondary_marks_is_silent() {
        // Without a key or secondary degree there is no leading tone to
        // track. (I -> IV has P4 root motion but a declared diatonic label.)
        let c1 = chord(
            r#"{"S": "E4", "A": "C4", "T": "G3", "B": "C3", "root": "C", "degree": "I"}"#,
        );
        let c2 = chord(
            r#"{"S": "F4", "A": "C4", "T": "A3", "B": "F2", "root": "F", "degree": "IV"}"#,
        );
        assert!(run_rule(&LeadingToneResolution, &c1, &c2, &Context::default()).is_none());
    }
}
