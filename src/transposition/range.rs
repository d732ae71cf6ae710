//! Octave placement of a part inside an instrument's range
//!
//! Given an interval about to be applied to a staff, compute how many whole
//! octaves (as semitones) should be added so that the music sits in the
//! instrument's comfortable range, or failing that its professional range.

use serde::{Deserialize, Serialize};

use crate::models::document::Document;

use super::interval::Interval;

/// Half-width of the window around a band's centre that the mean pitch must
/// reach in the single-staff search
const CENTER_WINDOW: f64 = 6.0;

/// Inclusive band of absolute pitches (`12 * oct + pitch class`, C4 = 48)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchBand {
    pub low: i32,
    pub high: i32,
}

impl PitchBand {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    /// Band given in MIDI key numbers (C4 = 60)
    pub const fn from_midi(low: i32, high: i32) -> Self {
        Self::new(low - 12, high - 12)
    }

    pub fn center(&self) -> f64 {
        (self.low + self.high) as f64 / 2.0
    }

    pub fn contains(&self, low: i32, high: i32) -> bool {
        low >= self.low && high <= self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRange {
    pub comfortable: PitchBand,
    pub professional: PitchBand,
}

/// Lowest, highest and mean absolute pitch of a set of notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteStats {
    pub low: i32,
    pub high: i32,
    pub mean: f64,
}

/// Pitch statistics of staff `staff_n` as it would sound after `chromatic`
/// semitones; `None` when the staff has no pitched notes
pub fn staff_note_stats(doc: &Document, staff_n: u32, chromatic: i32) -> Option<NoteStats> {
    let mut low = i32::MAX;
    let mut high = i32::MIN;
    let mut total: i64 = 0;
    let mut count: i64 = 0;

    for pitch in doc
        .notes_on_staff(staff_n)
        .filter_map(|note| note.absolute_pitch())
        .map(|pitch| pitch + chromatic)
    {
        low = low.min(pitch);
        high = high.max(pitch);
        total += pitch as i64;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(NoteStats {
        low,
        high,
        mean: total as f64 / count as f64,
    })
}

/// Octave shift bringing `mean` within the window around the band centre
fn center_shift(mean: f64, band: &PitchBand) -> i32 {
    let center = band.center();
    let mut shift = 0;
    while mean + shift as f64 > center + CENTER_WINDOW {
        shift -= 12;
    }
    while mean + (shift as f64) < center - CENTER_WINDOW {
        shift += 12;
    }
    shift
}

fn single_staff_shift(stats: &NoteStats, range: &InstrumentRange) -> i32 {
    let comfortable = center_shift(stats.mean, &range.comfortable);
    if range.comfortable.contains(stats.low + comfortable, stats.high + comfortable) {
        return comfortable;
    }

    let professional = center_shift(stats.mean, &range.professional);
    if range.professional.contains(stats.low + professional, stats.high + professional) {
        professional
    } else {
        comfortable
    }
}

fn multi_staff_shift(stats: &NoteStats, band: &PitchBand) -> i32 {
    let gap = |shift: i32| {
        let over = stats.high + shift - band.high;
        let under = band.low - (stats.low + shift);
        (over, under)
    };

    let mut shift = 0;
    loop {
        let (over, under) = gap(shift);
        if over <= 0 && under <= 0 {
            break;
        }
        let step = if over > under {
            -12
        } else if under > over {
            12
        } else {
            // equally far out on both sides: no octave helps
            break;
        };
        let (next_over, next_under) = gap(shift + step);
        if next_over.max(next_under) >= over.max(under) {
            break;
        }
        shift += step;
    }
    shift
}

/// Semitones (a multiple of 12) to add to `interval` so that staff `staff_n`
/// fits the instrument range. Returns 0 for a staff without notes.
pub fn part_transposition(
    doc: &Document,
    interval: Interval,
    staff_n: u32,
    range: &InstrumentRange,
    multi_staff: bool,
) -> i32 {
    let stats = match staff_note_stats(doc, staff_n, interval.chromatic()) {
        Some(stats) => stats,
        None => return 0,
    };

    let shift = if multi_staff {
        multi_staff_shift(&stats, &range.comfortable)
    } else {
        single_staff_shift(&stats, range)
    };
    log::debug!(
        "staff {}: notes {}..{} (mean {:.1}) shifted by {}",
        staff_n,
        stats.low,
        stats.high,
        stats.mean,
        shift
    );
    shift
}
