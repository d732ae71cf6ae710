//! Intervals as a (diatonic steps, chromatic semitones) pair
//!
//! An interval is a displacement, never an absolute pitch. Major second up
//! is (1, 2), minor third down is (-2, -3), augmented fourth is (3, 6) and
//! diminished fifth is (4, 6).

use serde::{Deserialize, Serialize};

/// Diatonic steps of the simplest spelling for each chromatic distance
const LEAST_FIFTHS_STEPS: [i32; 12] = [0, 1, 1, 2, 2, 3, 3, 4, 5, 5, 6, 6];

/// Circle-of-fifths position of the simplest spelling for each chromatic distance
const LEAST_FIFTHS: [i32; 12] = [0, -5, 2, -3, 4, -1, 6, 1, -4, 3, -2, 5];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    diatonic: i32,
    chromatic: i32,
}

impl Interval {
    pub const fn new(diatonic: i32, chromatic: i32) -> Self {
        Self { diatonic, chromatic }
    }

    /// One octave up
    pub const fn octave() -> Self {
        Self::new(7, 12)
    }

    pub fn diatonic(&self) -> i32 {
        self.diatonic
    }

    pub fn chromatic(&self) -> i32 {
        self.chromatic
    }

    pub fn set_diatonic(&mut self, diatonic: i32) {
        self.diatonic = diatonic;
    }

    pub fn set_chromatic(&mut self, chromatic: i32) {
        self.chromatic = chromatic;
    }

    pub fn is_zero(&self) -> bool {
        self.diatonic == 0 && self.chromatic == 0
    }

    /// Reverse the direction of the interval in place
    pub fn flip(&mut self) {
        self.diatonic = -self.diatonic;
        self.chromatic = -self.chromatic;
    }

    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// Componentwise sum of two intervals
    pub fn plus(self, other: Interval) -> Self {
        Self::new(self.diatonic + other.diatonic, self.chromatic + other.chromatic)
    }

    /// Add `octaves` whole octaves (negative for downward)
    pub fn plus_octaves(self, octaves: i32) -> Self {
        Self::new(self.diatonic + octaves * 7, self.chromatic + octaves * 12)
    }

    fn step_class(&self) -> i32 {
        self.diatonic.rem_euclid(7)
    }

    fn interval_class(&self) -> i32 {
        self.chromatic.rem_euclid(12)
    }

    /// Fold into a single ascending octave: diatonic in [0,7), chromatic in [0,12)
    pub fn normalize(&self) -> Self {
        Self::new(self.step_class(), self.interval_class())
    }

    /// Spell a tritone as an augmented fourth rather than a diminished fifth
    pub fn normalize_tritone(&self) -> Self {
        if self.interval_class() == 6 && self.step_class() == 4 {
            Self::new(self.diatonic - 1, self.chromatic)
        } else {
            *self
        }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.diatonic.abs(), self.chromatic.abs())
    }

    /// Simplest interval spanning `semitones`, spelled with the fewest
    /// fifths; each octave crossed adds seven diatonic steps
    pub fn from_pitches(semitones: i32) -> Self {
        let magnitude = semitones.abs();
        let octaves = magnitude / 12;
        let mut diatonic = LEAST_FIFTHS_STEPS[(magnitude % 12) as usize] + octaves * 7;
        if semitones < 0 {
            diatonic = -diatonic;
        }
        Self::new(diatonic, semitones)
    }

    /// Circle-of-fifths distance covered by this interval, signed by its
    /// direction
    pub fn fifths(&self) -> i32 {
        let simple = self.abs().normalize();
        let chromatic = simple.chromatic as usize;
        let mut fifths = LEAST_FIFTHS[chromatic];
        let mut steps = simple.diatonic - LEAST_FIFTHS_STEPS[chromatic];
        while steps > 3 {
            steps -= 7;
        }
        while steps < -3 {
            steps += 7;
        }
        // each step away from the simplest spelling is 12 fifths
        fifths -= steps * 12;

        if self.chromatic >= 0 && self.diatonic >= 0 {
            fifths
        } else {
            -fifths
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        let mut interval = Interval::new(2, 4);
        interval.flip();
        assert_eq!(interval, Interval::new(-2, -4));
        assert_eq!(interval.flipped(), Interval::new(2, 4));
    }

    #[test]
    fn test_setters() {
        let mut interval = Interval::default();
        interval.set_diatonic(4);
        interval.set_chromatic(7);
        assert_eq!(interval, Interval::new(4, 7));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Interval::new(-1, -2).normalize(), Interval::new(6, 10));
        assert_eq!(Interval::new(9, 16).normalize(), Interval::new(2, 4));
        assert_eq!(Interval::new(-7, -12).normalize(), Interval::new(0, 0));
    }

    #[test]
    fn test_normalize_tritone() {
        // diminished fifth becomes augmented fourth
        assert_eq!(Interval::new(4, 6).normalize_tritone(), Interval::new(3, 6));
        assert_eq!(Interval::new(3, 6).normalize_tritone(), Interval::new(3, 6));
        assert_eq!(Interval::new(4, 7).normalize_tritone(), Interval::new(4, 7));
    }

    #[test]
    fn test_abs() {
        assert_eq!(Interval::new(-3, -5).abs(), Interval::new(3, 5));
    }

    #[test]
    fn test_from_pitches() {
        assert_eq!(Interval::from_pitches(0), Interval::new(0, 0));
        assert_eq!(Interval::from_pitches(2), Interval::new(1, 2));
        assert_eq!(Interval::from_pitches(6), Interval::new(3, 6));
        assert_eq!(Interval::from_pitches(7), Interval::new(4, 7));
        assert_eq!(Interval::from_pitches(-2), Interval::new(-1, -2));
        assert_eq!(Interval::from_pitches(14), Interval::new(8, 14));
        assert_eq!(Interval::from_pitches(-12), Interval::new(-7, -12));
    }

    #[test]
    fn test_fifths_simple_intervals() {
        assert_eq!(Interval::new(0, 0).fifths(), 0);
        assert_eq!(Interval::new(4, 7).fifths(), 1);
        assert_eq!(Interval::new(1, 2).fifths(), 2);
        assert_eq!(Interval::new(2, 3).fifths(), -3);
        assert_eq!(Interval::new(3, 6).fifths(), 6);
        assert_eq!(Interval::new(4, 6).fifths(), -6);
        assert_eq!(Interval::new(3, 5).fifths(), -1);
    }

    #[test]
    fn test_fifths_downward_and_enharmonic() {
        // B-flat instrument: sounds a major second lower
        assert_eq!(Interval::new(-1, -2).fifths(), -2);
        // C to C-flat
        assert_eq!(Interval::new(0, -1).fifths(), -7);
        // C to C-sharp
        assert_eq!(Interval::new(0, 1).fifths(), 7);
        // octaves do not move the key
        assert_eq!(Interval::octave().fifths(), 0);
        assert_eq!(Interval::new(8, 14).fifths(), 2);
    }
}
