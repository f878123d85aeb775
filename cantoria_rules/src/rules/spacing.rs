// Vertical spacing and ordering of the four voices.

use crate::rule::{AffectedVoices, Context, Detection, Rule, RuleTier};
use cantoria_theory::{Chord, Voice};

// Upper adjacent pairs are held to within an octave; tenor and bass may
// spread freely.
const OCTAVE_SEMITONES: i16 = 12;

/// Voices must keep their registral order: bass below tenor below alto
/// below soprano.
pub struct VoiceCrossing;

impl Rule for VoiceCrossing {
    fn name(&self) -> &'static str {
        "voice_crossing"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Critical
    }
    fn color(&self) -> &'static str {
        "#FF0000"
    }
    fn short_msg(&self) -> &'static str {
        "Voice crossing"
    }
    fn full_msg(&self) -> &'static str {
        "A lower voice is written above a higher one; keep the voices in \
         registral order."
    }

    fn detect(&self, chord1: &Chord, _chord2: &Chord) -> Option<Detection> {
        for (lower, upper) in Voice::ADJACENT_PAIRS {
            let Some(p_lower) = chord1.pitch(lower) else {
                continue;
            };
            let Some(p_upper) = chord1.pitch(upper) else {
                continue;
            };
            if p_lower.pitch_space() > p_upper.pitch_space() {
                return Some(Detection::at_first(AffectedVoices::pair(lower, upper)));
            }
        }
        None
    }
}

/// Soprano-alto and alto-tenor must stay within an octave of each other.
pub struct MaximumDistance;

impl Rule for MaximumDistance {
    fn name(&self) -> &'static str {
        "maximum_distance"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Important
    }
    fn color(&self) -> &'static str {
        "#FFFF00"
    }
    fn short_msg(&self) -> &'static str {
        "Voices too far apart"
    }
    fn full_msg(&self) -> &'static str {
        "Adjacent upper voices should be no more than an octave apart."
    }

    fn detect(&self, chord1: &Chord, _chord2: &Chord) -> Option<Detection> {
        for (lower, upper) in [(Voice::Alto, Voice::Soprano), (Voice::Tenor, Voice::Alto)] {
            let Some(p_lower) = chord1.pitch(lower) else {
                continue;
            };
            let Some(p_upper) = chord1.pitch(upper) else {
                continue;
            };
            if p_upper.pitch_space() - p_lower.pitch_space() > OCTAVE_SEMITONES {
                return Some(Detection::at_first(AffectedVoices::pair(lower, upper)));
            }
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
        80
    }
}

/// A voice may not move past where its neighbor just was.
pub struct VoiceOverlap;

impl Rule for VoiceOverlap {
    fn name(&self) -> &'static str {
        "voice_overlap"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Important
    }
    fn color(&self) -> &'static str {
        "#FFFF00"
    }
    fn short_msg(&self) -> &'static str {
        "Voice overlap"
    }
    fn full_msg(&self) -> &'static str {
        "A voice moves beyond the previous note of its neighbor, blurring \
         the part writing."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        for (lower, upper) in Voice::ADJACENT_PAIRS {
            let (Some(p1_lower), Some(p1_upper)) = (chord1.pitch(lower), chord1.pitch(upper))
            else {
                continue;
            };
            let (Some(p2_lower), Some(p2_upper)) = (chord2.pitch(lower), chord2.pitch(upper))
            else {
                continue;
            };

            // Upper voice dips below where the lower voice was, or the
            // lower voice climbs above where the upper voice was. The
            // invaded register belongs to the first chord, so the error
            // is positioned there.
            if p2_upper.pitch_space() < p1_lower.pitch_space()
                || p2_lower.pitch_space() > p1_upper.pitch_space()
            {
                return Some(Detection::at_first(AffectedVoices::pair(lower, upper)));
            }
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
        80
    }
}
