// Static chord catalog: morphology, figured-bass cyphers, and factor
// layout per inversion for every chord quality the validator understands.
//
// Chromatic qualities (secondary dominants, Neapolitan, augmented sixths)
// are defined here but detected upstream by the tonal analyzer; the
// validator only consumes the declared quality label.

use crate::chord::ChordFactor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every chord quality the catalog knows. Accepts both snake_case labels
/// and the hyphenated spellings emitted by the upstream analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    DominantSeventh,
    DiminishedSeventh,
    HalfDiminished,
    MajorSeventh,
    MinorSeventh,
    SecondaryDominant,
    SecondaryLeadingToneDim,
    SecondaryLeadingToneHalfDim,
    NeapolitanSixth,
    ItalianAugmentedSixth,
    FrenchAugmentedSixth,
    GermanAugmentedSixth,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 15] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::DominantSeventh,
        ChordQuality::DiminishedSeventh,
        ChordQuality::HalfDiminished,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::SecondaryDominant,
        ChordQuality::SecondaryLeadingToneDim,
        ChordQuality::SecondaryLeadingToneHalfDim,
        ChordQuality::NeapolitanSixth,
        ChordQuality::ItalianAugmentedSixth,
        ChordQuality::FrenchAugmentedSixth,
        ChordQuality::GermanAugmentedSixth,
    ];

    /// Canonical snake_case label.
    pub fn label(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::DominantSeventh => "dominant_seventh",
            ChordQuality::DiminishedSeventh => "diminished_seventh",
            ChordQuality::HalfDiminished => "half_diminished",
            ChordQuality::MajorSeventh => "major_seventh",
            ChordQuality::MinorSeventh => "minor_seventh",
            ChordQuality::SecondaryDominant => "secondary_dominant",
            ChordQuality::SecondaryLeadingToneDim => "secondary_leading_tone_dim",
            ChordQuality::SecondaryLeadingToneHalfDim => "secondary_leading_tone_half_dim",
            ChordQuality::NeapolitanSixth => "neapolitan_sixth",
            ChordQuality::ItalianAugmentedSixth => "italian_augmented_sixth",
            ChordQuality::FrenchAugmentedSixth => "french_augmented_sixth",
            ChordQuality::GermanAugmentedSixth => "german_augmented_sixth",
        }
    }

    /// Qualities whose definition carries a chordal seventh.
    pub fn has_seventh(self) -> bool {
        self.definition().num_factors == Some(4)
    }

    pub fn definition(self) -> &'static ChordDefinition {
        definition_for(self)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognized chord quality label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chord quality: {0:?}")]
pub struct UnknownQuality(pub String);

impl FromStr for ChordQuality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Hyphenated spellings come from the music21-based analyzer.
        let q = match s {
            "major" => ChordQuality::Major,
            "minor" => ChordQuality::Minor,
            "diminished" => ChordQuality::Diminished,
            "dominant_seventh" | "dominant-seventh" => ChordQuality::DominantSeventh,
            "diminished_seventh" | "diminished-seventh" => ChordQuality::DiminishedSeventh,
            "half_diminished" | "half-diminished-seventh" => ChordQuality::HalfDiminished,
            "major_seventh" | "major-seventh" => ChordQuality::MajorSeventh,
            "minor_seventh" | "minor-seventh" => ChordQuality::MinorSeventh,
            "secondary_dominant" => ChordQuality::SecondaryDominant,
            "secondary_leading_tone_dim" => ChordQuality::SecondaryLeadingToneDim,
            "secondary_leading_tone_half_dim" => ChordQuality::SecondaryLeadingToneHalfDim,
            "neapolitan_sixth" => ChordQuality::NeapolitanSixth,
            "italian_augmented_sixth" => ChordQuality::ItalianAugmentedSixth,
            "french_augmented_sixth" => ChordQuality::FrenchAugmentedSixth,
            "german_augmented_sixth" => ChordQuality::GermanAugmentedSixth,
            other => return Err(UnknownQuality(other.to_string())),
        };
        Ok(q)
    }
}

impl TryFrom<String> for ChordQuality {
    type Error = UnknownQuality;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChordQuality> for &'static str {
    fn from(q: ChordQuality) -> &'static str {
        q.label()
    }
}

/// How a quality gets recognized in a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Recognizable from root and quality alone.
    Internal,
    /// Requires the upstream tonal analyzer (chromatic context).
    External,
}

/// Broad family of a chord quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    DiatonicTriad,
    DiatonicSeventh,
    ChromaticSecondary,
    ChromaticAltered,
    ChromaticAugmentedSixth,
}

/// Vertical shape of a quality: either stacked intervals above a root, or
/// characteristic scale degrees for rootless augmented-sixth sonorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Morphology {
    /// Simple interval names above the root, e.g. ["M3", "P5", "m7"].
    IntervalsFromRoot(&'static [&'static str]),
    /// Characteristic degrees, e.g. ["b6", "1", "#4"] for the Italian sixth.
    CharacteristicDegrees(&'static [&'static str]),
}

/// Static knowledge about one chord quality.
#[derive(Debug, Clone, Copy)]
pub struct ChordDefinition {
    pub name: &'static str,
    pub morphology: Morphology,
    /// 3 for triads, 4 for seventh chords, None when it varies.
    pub num_factors: Option<u8>,
    /// Baroque figured-bass cypher indexed by inversion.
    pub figured_bass: &'static [&'static str],
    /// Which factor sits in the bass per inversion.
    pub bass_factor_by_inversion: &'static [ChordFactor],
    pub detection: Detection,
    pub category: Category,
    /// Factor carrying the leading tone, when the quality has one.
    pub leading_tone_factor: Option<ChordFactor>,
    /// Factor with an obligatory downward resolution, when present.
    pub resolution_factor: Option<ChordFactor>,
    /// Typical syntactic context, e.g. "V-I" or "+6it -> V".
    pub syntax: &'static str,
}

impl ChordDefinition {
    pub fn figured_bass_for(&self, inversion: u8) -> Option<&'static str> {
        self.figured_bass.get(inversion as usize).copied()
    }

    pub fn bass_factor_for(&self, inversion: u8) -> Option<ChordFactor> {
        self.bass_factor_by_inversion.get(inversion as usize).copied()
    }
}

const TRIAD_BASS: &[ChordFactor] = &[ChordFactor::Root, ChordFactor::Third, ChordFactor::Fifth];
const SEVENTH_BASS: &[ChordFactor] = &[
    ChordFactor::Root,
    ChordFactor::Third,
    ChordFactor::Fifth,
    ChordFactor::Seventh,
];

fn definition_for(quality: ChordQuality) -> &'static ChordDefinition {
    match quality {
        ChordQuality::Major => &ChordDefinition {
            name: "major triad",
            morphology: Morphology::IntervalsFromRoot(&["M3", "P5"]),
            num_factors: Some(3),
            figured_bass: &["5/3", "6", "6/4"],
            bass_factor_by_inversion: TRIAD_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicTriad,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "universal",
        },
        ChordQuality::Minor => &ChordDefinition {
            name: "minor triad",
            morphology: Morphology::IntervalsFromRoot(&["m3", "P5"]),
            num_factors: Some(3),
            figured_bass: &["5/3", "6", "6/4"],
            bass_factor_by_inversion: TRIAD_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicTriad,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "universal",
        },
        ChordQuality::Diminished => &ChordDefinition {
            name: "diminished triad",
            morphology: Morphology::IntervalsFromRoot(&["m3", "d5"]),
            num_factors: Some(3),
            figured_bass: &["5b", "6", "+6/3"],
            bass_factor_by_inversion: TRIAD_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicTriad,
            leading_tone_factor: Some(ChordFactor::Root),
            resolution_factor: None,
            syntax: "VII-I",
        },
        ChordQuality::DominantSeventh => &ChordDefinition {
            name: "dominant seventh",
            morphology: Morphology::IntervalsFromRoot(&["M3", "P5", "m7"]),
            num_factors: Some(4),
            figured_bass: &["7/+", "6/5-", "+6", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicSeventh,
            leading_tone_factor: Some(ChordFactor::Third),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "V-I",
        },
        ChordQuality::DiminishedSeventh => &ChordDefinition {
            name: "diminished seventh",
            morphology: Morphology::IntervalsFromRoot(&["m3", "d5", "d7"]),
            num_factors: Some(4),
            figured_bass: &["7-", "6-/5-", "+6", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicSeventh,
            leading_tone_factor: Some(ChordFactor::Root),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "VII-I",
        },
        ChordQuality::HalfDiminished => &ChordDefinition {
            name: "half-diminished seventh",
            morphology: Morphology::IntervalsFromRoot(&["m3", "d5", "m7"]),
            num_factors: Some(4),
            figured_bass: &["7", "6/5b", "+6", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicSeventh,
            leading_tone_factor: Some(ChordFactor::Root),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "VII-I",
        },
        ChordQuality::MajorSeventh => &ChordDefinition {
            name: "major seventh",
            morphology: Morphology::IntervalsFromRoot(&["M3", "P5", "M7"]),
            num_factors: Some(4),
            figured_bass: &["7", "6/5", "4/3", "2"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicSeventh,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "varies",
        },
        ChordQuality::MinorSeventh => &ChordDefinition {
            name: "minor seventh",
            morphology: Morphology::IntervalsFromRoot(&["m3", "P5", "m7"]),
            num_factors: Some(4),
            figured_bass: &["7", "6/5", "4/3", "2"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::Internal,
            category: Category::DiatonicSeventh,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "varies",
        },
        ChordQuality::SecondaryDominant => &ChordDefinition {
            name: "secondary dominant",
            morphology: Morphology::IntervalsFromRoot(&["M3", "P5", "m7"]),
            num_factors: None,
            figured_bass: &["", "6", "6/4", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::External,
            category: Category::ChromaticSecondary,
            leading_tone_factor: Some(ChordFactor::Third),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "V/x -> x",
        },
        ChordQuality::SecondaryLeadingToneDim => &ChordDefinition {
            name: "secondary leading-tone diminished",
            morphology: Morphology::IntervalsFromRoot(&["m3", "d5", "d7"]),
            num_factors: None,
            figured_bass: &["7-", "6-/5-", "+6", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::External,
            category: Category::ChromaticSecondary,
            leading_tone_factor: Some(ChordFactor::Root),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "vii°/x -> x",
        },
        ChordQuality::SecondaryLeadingToneHalfDim => &ChordDefinition {
            name: "secondary leading-tone half-diminished",
            morphology: Morphology::IntervalsFromRoot(&["m3", "d5", "m7"]),
            num_factors: Some(4),
            figured_bass: &["7", "6/5b", "+6", "+4"],
            bass_factor_by_inversion: SEVENTH_BASS,
            detection: Detection::External,
            category: Category::ChromaticSecondary,
            leading_tone_factor: Some(ChordFactor::Root),
            resolution_factor: Some(ChordFactor::Seventh),
            syntax: "viiø7/x -> x",
        },
        ChordQuality::NeapolitanSixth => &ChordDefinition {
            name: "Neapolitan sixth",
            morphology: Morphology::IntervalsFromRoot(&["M3", "P5"]),
            num_factors: Some(3),
            figured_bass: &["N", "N6", "N6/4"],
            bass_factor_by_inversion: TRIAD_BASS,
            detection: Detection::External,
            category: Category::ChromaticAltered,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "N6 -> V",
        },
        ChordQuality::ItalianAugmentedSixth => &ChordDefinition {
            name: "Italian augmented sixth",
            morphology: Morphology::CharacteristicDegrees(&["b6", "1", "#4"]),
            num_factors: None,
            figured_bass: &["+6it"],
            bass_factor_by_inversion: &[],
            detection: Detection::External,
            category: Category::ChromaticAugmentedSixth,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "+6it -> V",
        },
        ChordQuality::FrenchAugmentedSixth => &ChordDefinition {
            name: "French augmented sixth",
            morphology: Morphology::CharacteristicDegrees(&["b6", "1", "2", "#4"]),
            num_factors: None,
            figured_bass: &["+6fr"],
            bass_factor_by_inversion: &[],
            detection: Detection::External,
            category: Category::ChromaticAugmentedSixth,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "+6fr -> V",
        },
        ChordQuality::GermanAugmentedSixth => &ChordDefinition {
            name: "German augmented sixth",
            morphology: Morphology::CharacteristicDegrees(&["b6", "1", "b3", "#4"]),
            num_factors: None,
            figured_bass: &["+6al"],
            bass_factor_by_inversion: &[],
            detection: Detection::External,
            category: Category::ChromaticAugmentedSixth,
            leading_tone_factor: None,
            resolution_factor: None,
            syntax: "+6al -> V",
        },
    }
}
