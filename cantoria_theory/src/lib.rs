// Music-theory foundations for the voice-leading validator.
//
// Module map:
//   pitch       - spelled pitches, accidentals, SATB voice labels
//   interval    - spelled intervals, simple names, motion classification
//   key         - keys, scale degrees, roman-numeral degree labels
//   catalog     - static chord-quality definitions (morphology, cyphers)
//   chord       - analyzer chord input, parsed chords, factor analysis
//   progression - horizontal factor movement between adjacent chords

pub mod catalog;
pub mod chord;
pub mod interval;
pub mod key;
pub mod pitch;
pub mod progression;

pub use catalog::{ChordDefinition, ChordQuality};
pub use chord::{Chord, ChordFactor, ChordInput, HarmonicFunction, SpecialType};
pub use interval::{Interval, Motion, Quality};
pub use key::{Degree, DegreeInfo, Key, KeyMode};
pub use pitch::{Pitch, PitchError, Voice};
pub use progression::Progression;
