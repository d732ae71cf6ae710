//! Note pitch model: pitch names, accidentals and notes
//!
//! A note stores its spelling as a pitch name (C..B) and an optional
//! accidental child. The accidental carries two independent values, the
//! written accidental (`accid`) and the gestural one (`accid_ges`), as in MEI.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Pitch name, numbered 1..7 from C to B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PitchName {
    C = 1,
    D = 2,
    E = 3,
    F = 4,
    G = 5,
    A = 6,
    B = 7,
}

impl PitchName {
    /// Pitch name from a zero-based step (0 = C, 6 = B)
    pub fn from_step(step: i32) -> PitchName {
        match step.rem_euclid(7) {
            0 => PitchName::C,
            1 => PitchName::D,
            2 => PitchName::E,
            3 => PitchName::F,
            4 => PitchName::G,
            5 => PitchName::A,
            _ => PitchName::B,
        }
    }

    /// Zero-based step (0 = C, 6 = B)
    pub fn step(&self) -> i32 {
        *self as i32 - 1
    }

    /// Semitones above C of the natural pitch
    pub fn semitones(&self) -> i32 {
        match self {
            PitchName::C => 0,
            PitchName::D => 2,
            PitchName::E => 4,
            PitchName::F => 5,
            PitchName::G => 7,
            PitchName::A => 9,
            PitchName::B => 11,
        }
    }
}

/// Written accidental values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrittenAccidental {
    /// Sharp
    S,
    /// Flat
    F,
    /// Double sharp (written as two sharps)
    Ss,
    /// Double sharp (x glyph)
    X,
    /// Double flat
    Ff,
    /// Triple sharp (x + sharp)
    Xs,
    /// Triple sharp
    Ts,
    /// Triple flat
    Tf,
    /// Natural
    N,
    /// Natural + flat
    Nf,
    /// Natural + sharp
    Ns,
}

impl WrittenAccidental {
    pub fn alteration(&self) -> i32 {
        match self {
            WrittenAccidental::S | WrittenAccidental::Ns => 1,
            WrittenAccidental::F | WrittenAccidental::Nf => -1,
            WrittenAccidental::Ss | WrittenAccidental::X => 2,
            WrittenAccidental::Ff => -2,
            WrittenAccidental::Xs | WrittenAccidental::Ts => 3,
            WrittenAccidental::Tf => -3,
            WrittenAccidental::N => 0,
        }
    }
}

/// Gestural (sounding) accidental values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturalAccidental {
    S,
    F,
    Ss,
    Ff,
    N,
}

impl GesturalAccidental {
    pub fn alteration(&self) -> i32 {
        match self {
            GesturalAccidental::S => 1,
            GesturalAccidental::F => -1,
            GesturalAccidental::Ss => 2,
            GesturalAccidental::Ff => -2,
            GesturalAccidental::N => 0,
        }
    }

    /// Gestural accidental for an alteration, `None` for 0 or anything
    /// outside ±2
    pub fn from_alteration(alter: i32) -> Option<GesturalAccidental> {
        match alter {
            -2 => Some(GesturalAccidental::Ff),
            -1 => Some(GesturalAccidental::F),
            1 => Some(GesturalAccidental::S),
            2 => Some(GesturalAccidental::Ss),
            _ => None,
        }
    }
}

/// Accidental child of a note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accid: Option<WrittenAccidental>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accid_ges: Option<GesturalAccidental>,
}

impl Accid {
    pub fn gestural(value: GesturalAccidental) -> Self {
        Self {
            accid: None,
            accid_ges: Some(value),
        }
    }

    pub fn written(value: WrittenAccidental) -> Self {
        Self {
            accid: Some(value),
            accid_ges: None,
        }
    }

    /// Alteration in semitones. The gestural value wins over the written one.
    pub fn alteration(&self) -> i32 {
        if let Some(ges) = self.accid_ges {
            ges.alteration()
        } else if let Some(written) = self.accid {
            written.alteration()
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: String,
    /// Notes without a pitch name are left alone by every operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pname: Option<PitchName>,
    #[serde(default)]
    pub oct: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accid: Option<Accid>,
}

impl Note {
    pub fn new(id: impl Into<String>, pname: PitchName, oct: i32) -> Self {
        Self {
            id: id.into(),
            pname: Some(pname),
            oct,
            accid: None,
        }
    }

    /// Builder-style helper attaching a gestural accidental for `alter`
    pub fn with_alteration(mut self, alter: i32) -> Self {
        self.accid = GesturalAccidental::from_alteration(alter).map(Accid::gestural);
        self
    }

    pub fn alteration(&self) -> i32 {
        self.accid.as_ref().map(Accid::alteration).unwrap_or(0)
    }

    /// Absolute pitch in semitones, `12 * oct + pitch class + alteration`
    /// (C4 = 48, i.e. the MIDI key number minus 12)
    pub fn absolute_pitch(&self) -> Option<i32> {
        self.pname
            .map(|pname| self.oct * 12 + pname.semitones() + self.alteration())
    }
}
