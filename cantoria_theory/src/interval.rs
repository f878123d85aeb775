// Spelled intervals and two-voice motion classification.
//
// Interval identity uses the spelled simple name (quality + generic number),
// not the raw semitone count: a descending minor sixth spans 8 semitones
// just like an augmented fifth, but only one of them is a "fifth" for the
// consecutive-fifths rules. The generic number comes from letter distance,
// the quality from the semitone offset against the diatonic base.

use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval quality in the traditional naming system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Diminished,
    Minor,
    Perfect,
    Major,
    Augmented,
}

impl Quality {
    pub fn symbol(self) -> &'static str {
        match self {
            Quality::Diminished => "d",
            Quality::Minor => "m",
            Quality::Perfect => "P",
            Quality::Major => "M",
            Quality::Augmented => "A",
        }
    }
}

/// A directed interval between two pitches, carrying both the signed
/// semitone distance and the octave-reduced simple name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Signed semitone distance (positive = second pitch is higher).
    pub semitones: i16,
    /// Simple generic number, 1..=8 (compounds reduce: a 10th reports as 3).
    pub generic: u8,
    pub quality: Quality,
}

impl Interval {
    /// Compute the interval from `a` to `b`.
    pub fn between(a: &Pitch, b: &Pitch) -> Interval {
        let semitones = b.pitch_space() - a.pitch_space();

        // Name the interval from the registrally lower pitch upward.
        // On a pitch-space tie (C#4 vs Db4) the diatonic position breaks it.
        let (lo, hi) = if (a.pitch_space(), a.diatonic_position())
            <= (b.pitch_space(), b.diatonic_position())
        {
            (a, b)
        } else {
            (b, a)
        };

        let steps = (hi.diatonic_position() - lo.diatonic_position()).max(0);
        let span = hi.pitch_space() - lo.pitch_space();

        // Reduce compounds to a simple interval, keeping octaves as 8ths.
        let mut simple_steps = steps % 7;
        let mut simple_span = span - 12 * (steps / 7);
        if steps > 0 && simple_steps == 0 {
            simple_steps = 7;
            simple_span += 12;
        }

        let quality = quality_for(simple_steps as u8, simple_span);
        Interval {
            semitones,
            generic: simple_steps as u8 + 1,
            quality,
        }
    }

    /// The simple name, e.g. "P5", "m3", "d5", "A5".
    pub fn simple_name(&self) -> String {
        format!("{}{}", self.quality.symbol(), self.generic)
    }

    pub fn is_perfect_fifth(&self) -> bool {
        self.generic == 5 && self.quality == Quality::Perfect
    }

    pub fn is_augmented_fifth(&self) -> bool {
        self.generic == 5 && self.quality == Quality::Augmented
    }

    pub fn is_diminished_fifth(&self) -> bool {
        self.generic == 5 && self.quality == Quality::Diminished
    }

    /// Fifth for the consecutive-fifths rules: perfect or augmented.
    /// Diminished fifths are handled separately (unequal fifths).
    pub fn is_fifth(&self) -> bool {
        self.is_perfect_fifth() || self.is_augmented_fifth()
    }

    /// Perfect octave or perfect unison.
    pub fn is_octave_or_unison(&self) -> bool {
        self.quality == Quality::Perfect && (self.generic == 1 || self.generic == 8)
    }

    /// Simple third of major, minor, or augmented quality. Tenths reduce to
    /// thirds, so this is also the parallel-tenths test.
    pub fn is_simple_third(&self) -> bool {
        self.generic == 3
            && matches!(
                self.quality,
                Quality::Major | Quality::Minor | Quality::Augmented
            )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Quality from the simple letter-step count (0 = unison .. 7 = octave)
/// and the reduced semitone span.
fn quality_for(simple_steps: u8, simple_span: i16) -> Quality {
    // Diatonic base spans for unison, 2nd, 3rd, 4th, 5th, 6th, 7th, octave.
    const BASE: [i16; 8] = [0, 2, 4, 5, 7, 9, 11, 12];
    let base = BASE[simple_steps as usize];
    let diff = simple_span - base;
    let perfect_class = matches!(simple_steps, 0 | 3 | 4 | 7);

    if perfect_class {
        match diff {
            0 => Quality::Perfect,
            d if d >= 1 => Quality::Augmented,
            _ => Quality::Diminished,
        }
    } else {
        match diff {
            0 => Quality::Major,
            -1 => Quality::Minor,
            d if d >= 1 => Quality::Augmented,
            _ => Quality::Diminished,
        }
    }
}

/// Melodic leap test: absolute motion larger than `threshold` semitones.
/// The default threshold of 2 makes anything beyond a whole step a leap.
pub fn is_leap(from: &Pitch, to: &Pitch, threshold: i16) -> bool {
    (to.pitch_space() - from.pitch_space()).abs() > threshold
}

/// Default leap threshold in semitones (a major second).
pub const LEAP_THRESHOLD: i16 = 2;

/// How two voices move relative to each other across one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Both voices move in the same direction by a nonzero amount.
    Parallel,
    /// The voices move in opposite directions.
    Contrary,
    /// Exactly one voice moves.
    Oblique,
    /// Neither voice moves.
    Static,
}

impl Motion {
    /// Classify the joint motion of two voices across a transition.
    pub fn classify(v1_from: &Pitch, v1_to: &Pitch, v2_from: &Pitch, v2_to: &Pitch) -> Motion {
        let d1 = v1_to.pitch_space() - v1_from.pitch_space();
        let d2 = v2_to.pitch_space() - v2_from.pitch_space();

        if d1 == 0 && d2 == 0 {
            Motion::Static
        } else if d1 == 0 || d2 == 0 {
            Motion::Oblique
        } else if (d1 > 0) == (d2 > 0) {
            Motion::Parallel
        } else {
            Motion::Contrary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pitch {
        s.parse().unwrap()
    }

    fn iv(a: &str, b: &str) -> Interval {
        Interval::between(&p(a), &p(b))
    }

    #[test]
    fn test_simple_names() {
        assert_eq!(iv("C4", "G4").simple_name(), "P5");
        assert_eq!(iv("C4", "E4").simple_name(), "M3");
        assert_eq!(iv("C4", "Eb4").simple_name(), "m3");
        assert_eq!(iv("B3", "F4").simple_name(), "d5");
        assert_eq!(iv("C4", "G#4").simple_name(), "A5");
        assert_eq!(iv("C4", "C5").simple_name(), "P8");
        assert_eq!(iv("C4", "C4").simple_name(), "P1");
        assert_eq!(iv("C4", "F4").simple_name(), "P4");
        assert_eq!(iv("C4", "B4").simple_name(), "M7");
        assert_eq!(iv("C4", "Bb4").simple_name(), "m7");
    }

    #[test]
    fn test_compound_reduction() {
        // P12 reduces to P5, M10 to M3, double octave to P8
        assert_eq!(iv("C3", "G4").simple_name(), "P5");
        assert_eq!(iv("C3", "E4").simple_name(), "M3");
        assert_eq!(iv("C3", "C5").simple_name(), "P8");
        assert!(iv("C3", "G4").is_perfect_fifth());
        assert!(iv("C3", "E4").is_simple_third());
    }

    #[test]
    fn test_descending_intervals_keep_names() {
        // A descending minor sixth is 8 semitones but NOT a fifth.
        let m6_down = iv("C5", "E4");
        assert_eq!(m6_down.semitones, -8);
        assert_eq!(m6_down.simple_name(), "m6");
        assert!(!m6_down.is_fifth());

        let p5_down = iv("G4", "C4");
        assert_eq!(p5_down.semitones, -7);
        assert!(p5_down.is_perfect_fifth());
    }

    #[test]
    fn test_enharmonic_spellings_differ() {
        // C-F# is an augmented fourth, C-Gb a diminished fifth: same span.
        assert_eq!(iv("C4", "F#4").simple_name(), "A4");
        assert_eq!(iv("C4", "Gb4").simple_name(), "d5");
        assert!(iv("C4", "Gb4").is_diminished_fifth());
        assert!(!iv("C4", "F#4").is_diminished_fifth());
    }

    #[test]
    fn test_fifth_predicates() {
        assert!(iv("C4", "G4").is_fifth());
        assert!(iv("C4", "G#4").is_fifth());
        assert!(!iv("C4", "Gb4").is_fifth());
        assert!(!iv("C4", "F4").is_fifth());
    }

    #[test]
    fn test_octave_or_unison() {
        assert!(iv("C4", "C4").is_octave_or_unison());
        assert!(iv("C4", "C5").is_octave_or_unison());
        assert!(iv("C3", "C5").is_octave_or_unison());
        assert!(!iv("C4", "B3").is_octave_or_unison());
        // Diminished octave is not a perfect octave
        assert!(!iv("C4", "Cb5").is_octave_or_unison());
    }

    #[test]
    fn test_tenths_are_simple_thirds() {
        assert!(iv("C3", "E4").is_simple_third()); // M10
        assert!(iv("C3", "Eb4").is_simple_third()); // m10
        assert!(iv("C4", "E4").is_simple_third()); // M3
        assert!(!iv("C3", "F4").is_simple_third()); // P11
    }

    #[test]
    fn test_leap_detection() {
        assert!(!is_leap(&p("C4"), &p("D4"), LEAP_THRESHOLD)); // whole step
        assert!(is_leap(&p("C4"), &p("E4"), LEAP_THRESHOLD)); // third
        assert!(is_leap(&p("C4"), &p("G3"), LEAP_THRESHOLD)); // descending fourth
        assert!(!is_leap(&p("C4"), &p("C4"), LEAP_THRESHOLD));
    }

    #[test]
    fn test_motion_classification() {
        // Both up
        assert_eq!(
            Motion::classify(&p("C4"), &p("D4"), &p("E4"), &p("F4")),
            Motion::Parallel
        );
        // Opposite directions
        assert_eq!(
            Motion::classify(&p("C4"), &p("D4"), &p("G4"), &p("F4")),
            Motion::Contrary
        );
        // One stationary
        assert_eq!(
            Motion::classify(&p("C4"), &p("C4"), &p("E4"), &p("F4")),
            Motion::Oblique
        );
        // Neither moves
        assert_eq!(
            Motion::classify(&p("C4"), &p("C4"), &p("E4"), &p("E4")),
            Motion::Static
        );
    }
}
