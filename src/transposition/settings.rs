//! Configuration for a transposition session and instrument defaults

use serde::{Deserialize, Serialize};

use crate::models::document::ClefShape;

use super::key_diff::TransposeDirection;
use super::range::{InstrumentRange, PitchBand};

/// Options applied to every operation of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransposeSettings {
    /// Allow double sharps and double flats when spelling transposed notes
    pub use_double_accidentals: bool,

    /// Direction used by key transpositions that do not name one
    pub default_direction: TransposeDirection,

    /// Whether to ask the layout to recompute after a change
    pub relayout: bool,
}

impl Default for TransposeSettings {
    fn default() -> Self {
        Self {
            use_double_accidentals: false,
            default_direction: TransposeDirection::Closest,
            relayout: true,
        }
    }
}

/// Defaults of the instrument a part is changed to. Ranges are MIDI key
/// numbers (C4 = 60).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartDefaults {
    /// Semitones from written to sounding pitch (-2 for a B-flat clarinet)
    pub transp: Option<i32>,
    /// Octaves from written to sounding pitch (-1 for a guitar)
    pub oct: Option<i32>,
    pub comf_low: Option<i32>,
    pub comf_high: Option<i32>,
    pub pro_low: Option<i32>,
    pub pro_high: Option<i32>,
    /// Clef of each staff of the new instrument
    pub clefs: Vec<ClefShape>,
    #[serde(alias = "name")]
    pub label: Option<String>,
    pub short_name: Option<String>,
    /// MIDI instrument name
    #[serde(alias = "id")]
    pub midi_instrname: Option<String>,
    pub midi_prog: Option<MidiProgram>,
}

/// MIDI program of an instrument; some instruments list several, of which
/// the first is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MidiProgram {
    Single(u8),
    Several(Vec<u8>),
}

impl MidiProgram {
    pub fn program(&self) -> Option<u8> {
        match self {
            MidiProgram::Single(prog) => Some(*prog),
            MidiProgram::Several(progs) => progs.first().copied(),
        }
    }
}

impl PartDefaults {
    /// Instrument range, when all four bounds are given
    pub fn range(&self) -> Option<InstrumentRange> {
        Some(InstrumentRange {
            comfortable: PitchBand::from_midi(self.comf_low?, self.comf_high?),
            professional: PitchBand::from_midi(self.pro_low?, self.pro_high?),
        })
    }
}
