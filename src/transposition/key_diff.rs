//! Interval between two key signatures
//!
//! The raw interval between keys is always taken upward (less than an
//! octave). The direction then decides whether it is kept or replaced by its
//! downward counterpart. For `Closest`, a running total of the semitones
//! transposed in the session keeps the notated music within a tritone of where
//! it started.

use serde::{Deserialize, Serialize};

use super::error::{Result, TransposeError};
use super::interval::Interval;

/// Largest distance in semitones the session may drift from concert pitch
pub const MAX_CHROMATIC_DRIFT: i32 = 6;

/// Diatonic step of the tonic of each key, indexed by fifths mod 7
/// (C G D A E B F#)
const KEY_STEPS: [i32; 7] = [0, 4, 1, 5, 2, 6, 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransposeDirection {
    /// Raw upward interval, without consulting or updating the history
    None,
    Up,
    Down,
    #[default]
    Closest,
}

/// Total semitones transposed so far in a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChromaticHistory {
    total: i32,
}

impl ChromaticHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }

    fn commit(&mut self, chromatic: i32) -> Result<()> {
        let total = self.total + chromatic;
        if total.abs() > MAX_CHROMATIC_DRIFT {
            log::error!(
                "chromatic history {} + {} leaves the ±{} window",
                self.total,
                chromatic,
                MAX_CHROMATIC_DRIFT
            );
            return Err(TransposeError::ChromaticDrift {
                history: self.total,
                chromatic,
            });
        }
        self.total = total;
        Ok(())
    }
}

/// Upward interval (less than an octave) from one key to another
pub fn key_interval(old_fifths: i32, new_fifths: i32) -> Interval {
    let cof_steps = if new_fifths >= old_fifths {
        new_fifths - old_fifths
    } else {
        12 - (old_fifths - new_fifths)
    };

    let diatonic = (KEY_STEPS[new_fifths.rem_euclid(7) as usize]
        - KEY_STEPS[old_fifths.rem_euclid(7) as usize])
        .rem_euclid(7);
    let chromatic = (cof_steps * 7).rem_euclid(12);

    Interval::new(diatonic, chromatic)
}

fn downward(interval: Interval) -> Interval {
    let mut diatonic = interval.diatonic() - 7;
    let mut chromatic = interval.chromatic() - 12;
    if diatonic == -7 {
        diatonic = 0;
    }
    if chromatic == -12 {
        chromatic = 0;
    }
    Interval::new(diatonic, chromatic)
}

fn upward(interval: Interval) -> Interval {
    if interval.chromatic() >= 0 && interval.diatonic() >= 0 {
        return interval;
    }
    let mut diatonic = interval.diatonic() + 7;
    let mut chromatic = interval.chromatic() + 12;
    if diatonic == 7 {
        diatonic = 0;
    }
    if chromatic == 12 {
        chromatic = 0;
    }
    Interval::new(diatonic, chromatic)
}

/// Interval taking music in `old_fifths` to `new_fifths`.
///
/// Every direction except `None` commits the chosen chromatic distance to
/// `history`. A result that would leave the history outside ±6 semitones is
/// rejected and the history is left unchanged.
pub fn keydiff_to_interval(
    old_fifths: i32,
    new_fifths: i32,
    direction: TransposeDirection,
    history: &mut ChromaticHistory,
) -> Result<Interval> {
    let raw = key_interval(old_fifths, new_fifths);

    let interval = match direction {
        TransposeDirection::None => return Ok(raw),
        TransposeDirection::Up => upward(raw),
        TransposeDirection::Down => downward(raw),
        TransposeDirection::Closest => {
            let candidate = if raw.chromatic() > MAX_CHROMATIC_DRIFT {
                downward(raw)
            } else {
                raw
            };
            let drift = history.total() + candidate.chromatic();
            if drift > MAX_CHROMATIC_DRIFT {
                downward(raw)
            } else if drift < -MAX_CHROMATIC_DRIFT {
                upward(raw)
            } else {
                candidate
            }
        }
    };

    history.commit(interval.chromatic())?;
    log::debug!(
        "key {} -> {} ({:?}): interval ({}, {}), history {}",
        old_fifths,
        new_fifths,
        direction,
        interval.diatonic(),
        interval.chromatic(),
        history.total()
    );
    Ok(interval)
}
