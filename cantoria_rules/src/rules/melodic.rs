// Melodic-line restrictions on individual voices.

use crate::rule::{AffectedVoices, Context, Detection, Rule, RuleTier};
use cantoria_theory::{Chord, Progression, Voice};

const MAX_MELODIC_LEAP: i16 = 12;

/// No voice should leap more than a perfect octave.
///
/// All offending voices of the pair are gathered into one violation,
/// reported on the arrival chord.
pub struct ExcessiveMelodicMotion;

impl Rule for ExcessiveMelodicMotion {
    fn name(&self) -> &'static str {
        "excessive_melodic_motion"
    }
    fn tier(&self) -> RuleTier {
        RuleTier::Important
    }
    fn color(&self) -> &'static str {
        "#FF8C00"
    }
    fn short_msg(&self) -> &'static str {
        "Excessive melodic leap"
    }
    fn full_msg(&self) -> &'static str {
        "A voice leaps more than an octave, which breaks the melodic line \
         in choral writing."
    }

    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection> {
        let prog = Progression::new(chord1, chord2);
        let mut leaping: Vec<Voice> = Vec::new();
        for voice in Voice::ALL {
            let Some(semitones) = prog.melodic_semitones(voice) else {
                continue;
            };
            if semitones.abs() > MAX_MELODIC_LEAP {
                leaping.push(voice);
            }
        }
        (!leaping.is_empty()).then(|| Detection::at_second(AffectedVoices::Voices(leaping)))
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
