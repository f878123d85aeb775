// Harmonic-context checks shared by rule exceptions: re-voicings of the
// same chord, dominant-function V/VII pairs, and stubs for modulation and
// sequence awareness.

use cantoria_theory::{Chord, HarmonicFunction, Key, Voice};
use tracing::debug;

/// True when the two chords are the same harmony in a different
/// disposition: identical root, quality, and inversion, identical sounding
/// pitch classes, but at least one voice on a different concrete pitch.
pub fn is_revoicing(chord1: &Chord, chord2: &Chord) -> bool {
    let same_identity = chord1.root.map(|r| r.name) == chord2.root.map(|r| r.name)
        && chord1.quality == chord2.quality
        && chord1.inversion == chord2.inversion;
    if !same_identity {
        return false;
    }

    if chord1.pitch_class_set() != chord2.pitch_class_set() {
        return false;
    }

    let moved = Voice::ALL
        .into_iter()
        .any(|v| chord1.pitch(v) != chord2.pitch(v));
    if moved {
        debug!(pcs = ?chord1.pitch_class_set(), "revoicing detected");
    }
    moved
}

/// True when the pair is V-VII or VII-V: two chords sharing the dominant
/// function and its tritone, where strict parallel rules relax.
///
/// Judged on declared degree numbers {5, 7}. Declared functions refine the
/// verdict; missing function data falls back to accepting the pair, since
/// degrees 5 and 7 are dominant in both modes.
pub fn is_dominant_pair(chord1: &Chord, chord2: &Chord, _key: Option<Key>) -> bool {
    let (Some(d1), Some(d2)) = (chord1.degree_num, chord2.degree_num) else {
        return false;
    };
    if !((d1 == 5 && d2 == 7) || (d1 == 7 && d2 == 5)) {
        return false;
    }

    match (chord1.function, chord2.function) {
        (Some(HarmonicFunction::Dominant), Some(HarmonicFunction::Dominant)) => true,
        (None, _) | (_, None) => true,
        (f1, f2) => {
            f1 == Some(HarmonicFunction::Dominant) || f2 == Some(HarmonicFunction::Dominant)
        }
    }
}

/// Modulation detection across a chord sequence.
pub fn detect_modulation(_chords: &[Chord]) -> Option<Key> {
    // TODO: needs windowed degree analysis over the whole sequence; the
    // validator currently sees only adjacent pairs.
    None
}

/// Sequential-pattern (harmonic march) membership, where some rules relax.
pub fn is_in_sequence(_chords: &[Chord], _index: usize) -> bool {
    // TODO: requires pattern matching over at least two prior pairs.
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantoria_theory::ChordInput;

    fn chord(json: &str) -> Chord {
        let input: ChordInput = serde_json::from_str(json).unwrap();
        Chord::from_input(&input).unwrap()
    }

    #[test]
    fn test_revoicing_detected() {
        let closed = chord(
            r#"{"S": "C4", "A": "G3", "T": "E3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        let open = chord(
            r#"{"S": "E4", "A": "C4", "T": "G3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        assert!(is_revoicing(&closed, &open));
    }

    #[test]
    fn test_identical_voicing_is_not_revoicing() {
        let c = chord(
            r#"{"S": "C4", "A": "G3", "T": "E3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        assert!(!is_revoicing(&c, &c.clone()));
    }

    #[test]
    fn test_different_harmony_is_not_revoicing() {
        let c = chord(
            r#"{"S": "C4", "A": "G3", "T": "E3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        let g = chord(
            r#"{"S": "B3", "A": "G3", "T": "D3", "B": "G2",
                "root": "G", "quality": "major", "inversion": 0}"#,
        );
        assert!(!is_revoicing(&c, &g));
    }

    #[test]
    fn test_pitch_class_mismatch_is_not_revoicing() {
        // Same declared identity but a seventh added in the second voicing
        let plain = chord(
            r#"{"S": "C4", "A": "G3", "T": "E3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        let with_seventh = chord(
            r#"{"S": "Bb3", "A": "G3", "T": "E3", "B": "C3",
                "root": "C", "quality": "major", "inversion": 0}"#,
        );
        assert!(!is_revoicing(&plain, &with_seventh));
    }

    #[test]
    fn test_dominant_pair() {
        let v = chord(r#"{"B": "G2", "degree_num": 5, "function": "D"}"#);
        let vii = chord(r#"{"B": "B2", "degree_num": 7, "function": "D"}"#);
        assert!(is_dominant_pair(&v, &vii, None));
        assert!(is_dominant_pair(&vii, &v, None));

        // Missing function data falls back to accepting degrees {5,7}
        let v_bare = chord(r#"{"B": "G2", "degree_num": 5}"#);
        assert!(is_dominant_pair(&v_bare, &vii, None));

        // Wrong degrees never qualify
        let i = chord(r#"{"B": "C3", "degree_num": 1, "function": "T"}"#);
        assert!(!is_dominant_pair(&i, &v, None));
        // Both functions present and neither dominant
        let v_t = chord(r#"{"B": "G2", "degree_num": 5, "function": "T"}"#);
        let vii_s = chord(r#"{"B": "B2", "degree_num": 7, "function": "S"}"#);
        assert!(!is_dominant_pair(&v_t, &vii_s, None));
    }
}
