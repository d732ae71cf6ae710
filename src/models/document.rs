//! Score document consumed by the transposition core
//!
//! The tree is flat: a score definition (document key plus one
//! staff definition per staff number) and a list of measures, each holding
//! the staves and their notes.

use serde::{Deserialize, Serialize};

use super::key_signature::KeySignature;
use super::pitch::Note;
use crate::transposition::interval::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClefShape {
    G,
    GG,
    F,
    C,
    Perc,
    Tab,
}

impl ClefShape {
    /// Percussion and tablature staves carry no transposable pitch
    pub fn is_pitched(&self) -> bool {
        !matches!(self, ClefShape::Perc | ClefShape::Tab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDef {
    pub n: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Abbreviated label shown on systems after the first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_abbr: Option<String>,
    /// MIDI instrument name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi_instrname: Option<String>,
    /// MIDI program number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi_instrnum: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clef_shape: Option<ClefShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_sig: Option<KeySignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_diat: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_semi: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_oct: Option<i32>,
    /// Number of 12-fifths folds applied to the stored key signature
    #[serde(default)]
    pub enharmonic_distance: i32,
}

impl StaffDef {
    pub fn new(n: u32) -> Self {
        Self {
            n,
            label: None,
            label_abbr: None,
            midi_instrname: None,
            midi_instrnum: None,
            clef_shape: None,
            key_sig: None,
            trans_diat: None,
            trans_semi: None,
            trans_oct: None,
            enharmonic_distance: 0,
        }
    }

    /// Whether notes on this staff are subject to pitch transposition
    pub fn is_pitched(&self) -> bool {
        self.clef_shape.map(|c| c.is_pitched()).unwrap_or(true)
    }

    /// Written-to-sounding transposition already applied to this staff
    pub fn transposition(&self) -> Option<Interval> {
        match (self.trans_diat, self.trans_semi) {
            (Some(diatonic), Some(chromatic)) => Some(Interval::new(diatonic, chromatic)),
            (None, Some(chromatic)) => Some(Interval::from_pitches(chromatic)),
            _ => None,
        }
    }

    pub fn set_transposition(&mut self, interval: Interval) {
        self.trans_diat = Some(interval.diatonic());
        self.trans_semi = Some(interval.chromatic());
    }

    pub fn reset_transposition(&mut self) {
        self.trans_diat = None;
        self.trans_semi = None;
        self.trans_oct = None;
    }

    /// Fifths count of the stored key before any enharmonic fold
    pub fn unfolded_key_fifths(&self) -> Option<i32> {
        self.key_sig
            .and_then(|key| key.fifths())
            .map(|fifths| fifths + 12 * self.enharmonic_distance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_sig: Option<KeySignature>,
    #[serde(default)]
    pub staff_defs: Vec<StaffDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub n: u32,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default)]
    pub staves: Vec<Staff>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub score_def: ScoreDef,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staff_def(&self, n: u32) -> Option<&StaffDef> {
        self.score_def.staff_defs.iter().find(|def| def.n == n)
    }

    pub fn staff_def_mut(&mut self, n: u32) -> Option<&mut StaffDef> {
        self.score_def.staff_defs.iter_mut().find(|def| def.n == n)
    }

    /// All notes on staves numbered `n`, across every measure
    pub fn notes_on_staff(&self, n: u32) -> impl Iterator<Item = &Note> {
        self.measures
            .iter()
            .flat_map(|measure| measure.staves.iter())
            .filter(move |staff| staff.n == n)
            .flat_map(|staff| staff.notes.iter())
    }
}
