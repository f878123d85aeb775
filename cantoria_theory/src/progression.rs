// Horizontal analysis of an adjacent chord pair: which factor each voice
// moves from and to, and which voices make a given factor movement.

use crate::chord::{Chord, ChordFactor};
use crate::pitch::Voice;

/// Two adjacent chords viewed as one progression.
#[derive(Debug, Clone)]
pub struct Progression<'a> {
    pub chord1: &'a Chord,
    pub chord2: &'a Chord,
}

impl<'a> Progression<'a> {
    pub fn new(chord1: &'a Chord, chord2: &'a Chord) -> Self {
        Progression { chord1, chord2 }
    }

    /// (factor in chord1, factor in chord2) for one voice.
    pub fn factor_movement(&self, voice: Voice) -> (ChordFactor, ChordFactor) {
        (self.chord1.factor(voice), self.chord2.factor(voice))
    }

    /// Voices making a specific factor movement, bass to soprano.
    pub fn voices_with_movement(&self, from: ChordFactor, to: ChordFactor) -> Vec<Voice> {
        Voice::ALL
            .into_iter()
            .filter(|v| self.factor_movement(*v) == (from, to))
            .collect()
    }

    /// All four factor movements, indexed by voice.
    pub fn all_factor_movements(&self) -> [(Voice, ChordFactor, ChordFactor); 4] {
        Voice::ALL.map(|v| {
            let (f1, f2) = self.factor_movement(v);
            (v, f1, f2)
        })
    }

    /// Signed melodic interval in semitones for one voice, when it sounds
    /// in both chords.
    pub fn melodic_semitones(&self, voice: Voice) -> Option<i16> {
        let from = self.chord1.pitch(voice)?;
        let to = self.chord2.pitch(voice)?;
        Some(to.pitch_space() - from.pitch_space())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Chord;

    fn chord(json: &str) -> Chord {
        json.parse().unwrap()
    }

    #[test]
    fn test_factor_movements_v7_to_i() {
        let g7 = chord(
            r#"{"S": "F4", "A": "B3", "T": "D4", "B": "G2",
                "root": "G", "quality": "dominant_seventh"}"#,
        );
        let c = chord(
            r#"{"S": "E4", "A": "C4", "T": "C4", "B": "C3",
                "root": "C", "quality": "major"}"#,
        );
        let prog = Progression::new(&g7, &c);

        assert_eq!(
            prog.factor_movement(Voice::Soprano),
            (ChordFactor::Seventh, ChordFactor::Third)
        );
        assert_eq!(
            prog.voices_with_movement(ChordFactor::Seventh, ChordFactor::Third),
            vec![Voice::Soprano]
        );
        assert_eq!(prog.melodic_semitones(Voice::Soprano), Some(-1));
        assert_eq!(prog.melodic_semitones(Voice::Bass), Some(5));
    }

    #[test]
    fn test_melodic_semitones_requires_both_pitches() {
        let partial = chord(r#"{"B": "C3", "root": "C"}"#);
        let full = chord(r#"{"S": "G4", "A": "E4", "T": "C4", "B": "C3", "root": "C"}"#);
        let prog = Progression::new(&partial, &full);
        assert_eq!(prog.melodic_semitones(Voice::Soprano), None);
        assert_eq!(prog.melodic_semitones(Voice::Bass), Some(0));
    }
}
