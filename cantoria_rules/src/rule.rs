// Rule framework: tiers, confidence levels, the Rule trait, and the
// shared validation protocol every rule runs through.
//
// A rule reports raw detections; the protocol layers exception checks,
// confidence scoring, and motion-dependent message wording on top. Rules
// stay immutable after construction, so one engine can be shared freely.

use cantoria_theory::interval::Motion;
use cantoria_theory::key::Key;
use cantoria_theory::{Chord, Voice};
use serde::Serialize;
use tracing::debug;

/// Confidence of a reported violation, as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    /// Unambiguous rule, no judgment involved.
    Certain,
    /// Very likely an error in clear context.
    High,
    /// Possibly an uncontemplated exception.
    Medium,
    /// Edge case, pedagogical suggestion only.
    Low,
}

impl ConfidenceLevel {
    pub fn percent(self) -> u8 {
        match self {
            ConfidenceLevel::Certain => 100,
            ConfidenceLevel::High => 80,
            ConfidenceLevel::Medium => 60,
            ConfidenceLevel::Low => 40,
        }
    }
}

/// Priority band of a rule. Serializes as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleTier {
    /// Grave errors: parallels, obligatory resolutions.
    Critical = 1,
    /// Notable errors: spacing, leaps, overlaps.
    Important = 2,
    /// Refinements: modulation and special-chord subtleties.
    Advanced = 3,
}

impl RuleTier {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl Serialize for RuleTier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// Which voices a violation points at. Omission errors can know a factor
/// is absent without knowing which voice should have carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AffectedVoices {
    Voices(Vec<Voice>),
    Unidentified,
}

impl AffectedVoices {
    pub fn pair(a: Voice, b: Voice) -> AffectedVoices {
        AffectedVoices::Voices(vec![a, b])
    }

    pub fn single(v: Voice) -> AffectedVoices {
        AffectedVoices::Voices(vec![v])
    }

    /// Voices in registral order, bass first. Unidentified sorts to nothing.
    pub fn sorted(&self) -> Vec<Voice> {
        match self {
            AffectedVoices::Voices(vs) => {
                let mut vs = vs.clone();
                vs.sort();
                vs
            }
            AffectedVoices::Unidentified => Vec::new(),
        }
    }

    pub fn contains(&self, voice: Voice) -> bool {
        matches!(self, AffectedVoices::Voices(vs) if vs.contains(&voice))
    }
}

/// Raw detection result from a rule, before exceptions and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 0 when the fault sits on the first chord of the pair, 1 on the second.
    pub chord_offset: u8,
    pub voices: AffectedVoices,
    /// Motion of the offending pair, when the rule is motion-based.
    pub motion: Option<Motion>,
}

impl Detection {
    pub fn at_first(voices: AffectedVoices) -> Detection {
        Detection {
            chord_offset: 0,
            voices,
            motion: None,
        }
    }

    pub fn at_second(voices: AffectedVoices) -> Detection {
        Detection {
            chord_offset: 1,
            voices,
            motion: None,
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Detection {
        self.motion = Some(motion);
        self
    }
}

/// A named exemption attached to a rule. When its check passes, the
/// detection is suppressed without becoming a violation.
pub struct Exception {
    pub name: &'static str,
    pub description: &'static str,
    pub check: fn(&Chord, &Chord, &Context) -> bool,
}

/// Ambient information shared by all rules for one validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Key of the exercise. Injected into chords that do not declare one.
    pub key: Option<Key>,
}

/// A confirmed rule violation, ready for display or serialization.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: &'static str,
    pub tier: RuleTier,
    pub color: &'static str,
    pub short_msg: String,
    pub full_msg: &'static str,
    /// Confidence percentage, 0-100.
    pub confidence: u8,
    /// 0 = first chord of the pair, 1 = second.
    pub chord_offset: u8,
    pub voices: AffectedVoices,
    pub motion: Option<Motion>,
}

/// One voice-leading rule. Implementations provide detection and,
/// optionally, exception lists and context-dependent confidence.
pub trait Rule {
    fn name(&self) -> &'static str;
    fn tier(&self) -> RuleTier;
    /// Hex UI color for highlighting this rule's violations.
    fn color(&self) -> &'static str;
    fn short_msg(&self) -> &'static str;
    fn full_msg(&self) -> &'static str;

    fn exceptions(&self) -> &[Exception] {
        &[]
    }

    /// Core detection, free of exception logic.
    fn detect(&self, chord1: &Chord, chord2: &Chord) -> Option<Detection>;

    /// Confidence of a confirmed detection. Defaults to certain.
    fn confidence(
        &self,
        _chord1: &Chord,
        _chord2: &Chord,
        _ctx: &Context,
        _detection: &Detection,
    ) -> u8 {
        ConfidenceLevel::Certain.percent()
    }
}

/// Run one rule over a chord pair: inject the ambient key, detect, apply
/// exceptions, score, and word the message for the observed motion.
pub fn run_rule(
    rule: &dyn Rule,
    chord1: &Chord,
    chord2: &Chord,
    ctx: &Context,
) -> Option<Violation> {
    // The frontend sends the key in the context, not on each chord.
    let chord1 = chord1.with_key(ctx.key);
    let chord2 = chord2.with_key(ctx.key);

    let detection = rule.detect(&chord1, &chord2)?;

    for exc in rule.exceptions() {
        if (exc.check)(&chord1, &chord2, ctx) {
            debug!(rule = rule.name(), exception = exc.name, "exception applied");
            return None;
        }
    }

    let confidence = rule.confidence(&chord1, &chord2, ctx, &detection);

    // "Parallel X" reads as "Consecutive X" when the faulty motion is
    // contrary rather than direct.
    let short_msg = match detection.motion {
        Some(Motion::Contrary) => rule.short_msg().replace("Parallel", "Consecutive"),
        _ => rule.short_msg().to_string(),
    };

    Some(Violation {
        rule: rule.name(),
        tier: rule.tier(),
        color: rule.color(),
        short_msg,
        full_msg: rule.full_msg(),
        confidence,
        chord_offset: detection.chord_offset,
        voices: detection.voices,
        motion: detection.motion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantoria_theory::ChordInput;

    struct AlwaysFires {
        exceptions: Vec<Exception>,
    }

    impl Rule for AlwaysFires {
        fn name(&self) -> &'static str {
            "always_fires"
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
            "test rule"
        }
        fn exceptions(&self) -> &[Exception] {
            &self.exceptions
        }
        fn detect(&self, _c1: &Chord, _c2: &Chord) -> Option<Detection> {
            Some(
                Detection::at_first(AffectedVoices::pair(Voice::Bass, Voice::Tenor))
                    .with_motion(Motion::Contrary),
            )
        }
    }

    fn chord() -> Chord {
        let input: ChordInput = serde_json::from_str(
            r#"{"S": "G4", "A": "E4", "T": "C4", "B": "C3", "root": "C", "quality": "major"}"#,
        )
        .unwrap();
        Chord::from_input(&input).unwrap()
    }

    #[test]
    fn test_contrary_motion_rewords_message() {
        let rule = AlwaysFires { exceptions: vec![] };
        let v = run_rule(&rule, &chord(), &chord(), &Context::default()).unwrap();
        assert_eq!(v.short_msg, "Consecutive fifths");
        assert_eq!(v.confidence, 100);
    }

    #[test]
    fn test_exception_suppresses_violation() {
        let rule = AlwaysFires {
            exceptions: vec![Exception {
                name: "always",
                description: "suppresses everything",
                check: |_, _, _| true,
            }],
        };
        assert!(run_rule(&rule, &chord(), &chord(), &Context::default()).is_none());
    }

    #[test]
    fn test_key_injection_reaches_detection() {
        struct SeesKey;
        impl Rule for SeesKey {
            fn name(&self) -> &'static str {
                "sees_key"
            }
            fn tier(&self) -> RuleTier {
                RuleTier::Advanced
            }
            fn color(&self) -> &'static str {
                "#000000"
            }
            fn short_msg(&self) -> &'static str {
                "key missing"
            }
            fn full_msg(&self) -> &'static str {
                "fires when the first chord has no key"
            }
            fn detect(&self, c1: &Chord, _c2: &Chord) -> Option<Detection> {
                c1.key.is_none().then(|| {
                    Detection::at_first(AffectedVoices::single(Voice::Bass))
                })
            }
        }

        let ctx = Context {
            key: Some("C major".parse().unwrap()),
        };
        // With an ambient key the chord seen by detect() carries it.
        assert!(run_rule(&SeesKey, &chord(), &chord(), &ctx).is_none());
        assert!(run_rule(&SeesKey, &chord(), &chord(), &Context::default()).is_some());
    }

    #[test]
    fn test_tier_and_confidence_values() {
        assert_eq!(RuleTier::Critical.value(), 1);
        assert_eq!(RuleTier::Important.value(), 2);
        assert_eq!(RuleTier::Advanced.value(), 3);
        assert_eq!(ConfidenceLevel::Certain.percent(), 100);
        assert_eq!(ConfidenceLevel::High.percent(), 80);
        assert_eq!(ConfidenceLevel::Medium.percent(), 60);
        assert_eq!(ConfidenceLevel::Low.percent(), 40);
    }
}
