// The rule catalog, grouped by concern.

pub mod direct;
pub mod doubling;
pub mod leading_tone;
pub mod melodic;
pub mod omission;
pub mod parallel;
pub mod seventh;
pub mod spacing;
pub mod unequal;

pub use direct::{DirectFifths, DirectOctaves};
pub use doubling::{DuplicatedLeadingTone, DuplicatedSeventh};
pub use leading_tone::LeadingToneResolution;
pub use melodic::ExcessiveMelodicMotion;
pub use omission::ImproperOmission;
pub use parallel::{ParallelFifths, ParallelOctaves};
pub use seventh::SeventhResolution;
pub use spacing::{MaximumDistance, VoiceCrossing, VoiceOverlap};
pub use unequal::UnequalFifths;
