//! Tonal pitch class codec and spelling search
//!
//! A tonal pitch class (tpc) is a position on the line of fifths:
//! Fbb = -1, Cbb = 0, ..., F = 13, C = 14, G = 15, ..., B## = 33.
//! Steps are zero-based (0 = C, 6 = B).

use super::interval::Interval;

/// Lowest tpc covered by the tables (F double-flat)
pub const TPC_MIN: i32 = -1;
/// Highest tpc covered by the tables (B double-sharp)
pub const TPC_MAX: i32 = 33;

/// Iteration cap of the spelling search
pub const MAX_SPELLING_ITERATIONS: usize = 10;

const TPC_STEPS: [i32; 7] = [3, 0, 4, 1, 5, 2, 6];

#[rustfmt::skip]
const SPELLINGS: [i32; 35] = [
//   bb   b   -   #  ##
     0,   7, 14, 21, 28, // C
     2,   9, 16, 23, 30, // D
     4,  11, 18, 25, 32, // E
    -1,   6, 13, 20, 27, // F
     1,   8, 15, 22, 29, // G
     3,  10, 17, 24, 31, // A
     5,  12, 19, 26, 33, // B
];

#[rustfmt::skip]
const PITCHES: [i32; 35] = [
//   F   C   G   D   A   E   B
     3, -2,  5,  0,  7,  2,  9, // bb
     4, -1,  6,  1,  8,  3, 10, // b
     5,  0,  7,  2,  9,  4, 11, // -
     6,  1,  8,  3, 10,  5, 12, // #
     7,  2,  9,  4, 11,  6, 13, // ##
];

/// Step (0 = C) of a tonal pitch class
pub fn tpc2step(tpc: i32) -> i32 {
    TPC_STEPS[(tpc + 1).rem_euclid(7) as usize]
}

/// Tonal pitch class of a step and an alteration in [-2, 2]
pub fn step2tpc(step: i32, alter: i32) -> i32 {
    debug_assert!((0..7).contains(&step), "step out of range: {}", step);
    debug_assert!((-2..=2).contains(&alter), "alteration out of range: {}", alter);
    SPELLINGS[(step * 5 + alter + 2) as usize]
}

/// Chromatic pitch class of a tonal pitch class. Values range over [-2, 13]
/// since Cb, Cbb, B# and B## are not folded.
pub fn tpc2pitch(tpc: i32) -> i32 {
    debug_assert!((TPC_MIN..=TPC_MAX).contains(&tpc), "tpc out of range: {}", tpc);
    PITCHES[(tpc + 1) as usize]
}

/// Alteration encoded by a tonal pitch class
pub fn tpc2alter(tpc: i32) -> i32 {
    (tpc + 1).div_euclid(7) - 2
}

/// Semitones above C of a natural step
pub fn pitch_from_step(step: i32) -> i32 {
    tpc2pitch(step2tpc(step, 0))
}

/// Spelling found by [`transpose_tpc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spelling {
    /// Zero-based step (0 = C)
    pub step: i32,
    pub alter: i32,
    /// Octaves crossed by the step arithmetic
    pub octave_carry: i32,
    /// False when the iteration cap was hit before the alteration fitted
    pub exact: bool,
}

/// Spell `tpc` moved by `interval`, keeping the alteration within ±1 (or ±2
/// with double accidentals).
///
/// The diatonic displacement starts at `interval.diatonic()` and is nudged one
/// step at a time until the alteration needed to reach the chromatic target is
/// within bounds. After [`MAX_SPELLING_ITERATIONS`] the last candidate is
/// returned with `exact == false`.
///
/// Every reachable input settles well before the cap, so the cap and the
/// inexact result only bound the loop; callers still treat `exact == false`
/// as a best-effort spelling. A null interval returns the input spelling
/// unchanged, even when its alteration is outside the bounds.
pub fn transpose_tpc(tpc: i32, interval: Interval, use_double_accidentals: bool) -> Spelling {
    let (min_alter, max_alter) = if use_double_accidentals { (-2, 2) } else { (-1, 1) };

    if interval.is_zero() {
        return Spelling {
            step: tpc2step(tpc),
            alter: tpc2alter(tpc),
            octave_carry: 0,
            exact: true,
        };
    }

    let semitones = interval.chromatic();
    let mut steps = interval.diatonic();
    let pitch = tpc2pitch(tpc);

    let mut spelling = Spelling {
        step: tpc2step(tpc),
        alter: tpc2alter(tpc),
        octave_carry: 0,
        exact: false,
    };

    for _ in 0..MAX_SPELLING_ITERATIONS {
        let raw = tpc2step(tpc) + steps;
        let step = raw.rem_euclid(7);
        let octave_carry = raw.div_euclid(7);

        let natural = tpc2pitch(step2tpc(step, 0));
        let mut alter = (semitones - (natural - pitch)).rem_euclid(12);
        if alter > 6 {
            alter -= 12;
        }

        spelling = Spelling {
            step,
            alter,
            octave_carry,
            exact: false,
        };

        if alter > max_alter {
            steps += 1;
        } else if alter < min_alter {
            steps -= 1;
        } else {
            spelling.exact = true;
            break;
        }
    }

    spelling
}
