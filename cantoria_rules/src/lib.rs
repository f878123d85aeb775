// Voice-leading rule validation for SATB chorale exercises.
//
// The crate is organized around three layers:
//   rule.rs    — the Rule trait and the shared validation protocol
//   rules/     — the fourteen concrete rules, grouped by concern
//   engine.rs  — the engine that runs rules over whole progressions
//
// `context.rs` holds progression-level analysis shared between rules
// (re-voicing and dominant-pair recognition).

pub mod context;
pub mod engine;
pub mod rule;
pub mod rules;

pub use engine::{DisplayError, PositionedViolation, RulesEngine};
pub use rule::{
    run_rule, AffectedVoices, ConfidenceLevel, Context, Detection, Exception, Rule, RuleTier,
    Violation,
};
