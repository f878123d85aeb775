// Validation engine: owns the rule set, runs it over a progression, and
// shapes the results for the notation frontend.

use crate::rule::{run_rule, Context, Rule, RuleTier, Violation};
use crate::rules::{
    DirectFifths, DirectOctaves, DuplicatedLeadingTone, DuplicatedSeventh,
    ExcessiveMelodicMotion, ImproperOmission, LeadingToneResolution, MaximumDistance,
    ParallelFifths, ParallelOctaves, SeventhResolution, UnequalFifths, VoiceCrossing,
    VoiceOverlap,
};
use cantoria_theory::{Chord, ChordInput};
use serde::Serialize;
use tracing::{debug, info, warn};

// Beats per measure assumed by the frontend's error positions.
const BEATS_PER_MEASURE: usize = 4;

struct RuleEntry {
    rule: Box<dyn Rule>,
    enabled: bool,
}

/// A violation tied to its position in the progression. `pair_index` is
/// the index of the first chord of the offending pair.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedViolation {
    pub pair_index: usize,
    #[serde(flatten)]
    pub violation: Violation,
}

/// An error entry in the shape the frontend consumes.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayError {
    pub id: String,
    pub message: String,
    pub short_message: String,
    pub time_index: usize,
    pub voices: Vec<&'static str>,
    pub confidence: u8,
    pub color: &'static str,
    pub rule: &'static str,
}

/// Runs every enabled rule over each adjacent chord pair of a progression.
///
/// Rules fire in registration order, so output order is deterministic for
/// a given engine configuration.
pub struct RulesEngine {
    rules: Vec<RuleEntry>,
}

impl RulesEngine {
    /// An engine with no rules registered.
    pub fn new() -> RulesEngine {
        RulesEngine { rules: Vec::new() }
    }

    /// The standard engine: all fourteen rules, enabled.
    pub fn with_default_rules() -> RulesEngine {
        let mut engine = RulesEngine::new();
        engine.register(Box::new(ParallelFifths::new()));
        engine.register(Box::new(ParallelOctaves));
        engine.register(Box::new(DirectFifths::new()));
        engine.register(Box::new(DirectOctaves));
        engine.register(Box::new(UnequalFifths));
        engine.register(Box::new(LeadingToneResolution));
        engine.register(Box::new(SeventhResolution));
        engine.register(Box::new(VoiceCrossing));
        engine.register(Box::new(MaximumDistance));
        engine.register(Box::new(VoiceOverlap));
        engine.register(Box::new(DuplicatedLeadingTone));
        engine.register(Box::new(DuplicatedSeventh));
        engine.register(Box::new(ExcessiveMelodicMotion));
        engine.register(Box::new(ImproperOmission));
        engine
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        info!(rule = rule.name(), tier = rule.tier().value(), "rule registered");
        self.rules.push(RuleEntry { rule, enabled: true });
    }

    pub fn enable_rule(&mut self, name: &str) {
        self.set_enabled(name, true);
    }

    pub fn disable_rule(&mut self, name: &str) {
        self.set_enabled(name, false);
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) {
        for entry in &mut self.rules {
            if entry.rule.name() == name {
                entry.enabled = enabled;
                info!(rule = name, enabled, "rule toggled");
                return;
            }
        }
        warn!(rule = name, "unknown rule name");
    }

    /// Names of enabled rules, optionally restricted to one tier.
    pub fn active_rules(&self, tier: Option<RuleTier>) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|e| e.enabled && tier.is_none_or(|t| e.rule.tier() == t))
            .map(|e| e.rule.name())
            .collect()
    }

    /// All enabled rules over one chord pair.
    pub fn validate_pair(&self, chord1: &Chord, chord2: &Chord, ctx: &Context) -> Vec<Violation> {
        self.rules
            .iter()
            .filter(|e| e.enabled)
            .filter_map(|e| run_rule(e.rule.as_ref(), chord1, chord2, ctx))
            .collect()
    }

    /// Validate a whole progression. Chords that fail to parse are skipped
    /// along with both pairs that touch them.
    pub fn validate(&self, inputs: &[ChordInput], ctx: &Context) -> Vec<PositionedViolation> {
        let chords: Vec<Option<Chord>> = inputs.iter().map(Chord::from_input_safe).collect();

        let mut violations = Vec::new();
        for (pair_index, window) in chords.windows(2).enumerate() {
            let (Some(chord1), Some(chord2)) = (&window[0], &window[1]) else {
                debug!(pair_index, "pair skipped, unparseable chord");
                continue;
            };
            for violation in self.validate_pair(chord1, chord2, ctx) {
                violations.push(PositionedViolation {
                    pair_index,
                    violation,
                });
            }
        }
        violations
    }

    /// Shape violations for the frontend: absolute beat positions, measure
    /// and beat numbers, and voice names in bass-to-soprano order.
    pub fn format_for_display(&self, violations: &[PositionedViolation]) -> Vec<DisplayError> {
        violations
            .iter()
            .map(|pv| {
                let time_index = pv.pair_index + pv.violation.chord_offset as usize;
                let measure = time_index / BEATS_PER_MEASURE + 1;
                let beat = time_index % BEATS_PER_MEASURE + 1;

                let voices: Vec<&'static str> = pv
                    .violation
                    .voices
                    .sorted()
                    .into_iter()
                    .map(|v| v.label())
                    .collect();

                let short_message = if voices.is_empty() {
                    pv.violation.short_msg.clone()
                } else {
                    format!("{} ({})", pv.violation.short_msg, voices.join("-"))
                };

                DisplayError {
                    id: format!("err-{time_index}"),
                    message: format!("Measure {measure}, beat {beat}: {short_message}"),
                    short_message,
                    time_index,
                    voices,
                    confidence: pv.violation.confidence,
                    color: pv.violation.color,
                    rule: pv.violation.rule,
                }
            })
            .collect()
    }
}

impl Default for RulesEngine {
    fn default() -> RulesEngine {
        RulesEngine::with_default_rules()
    }
}
