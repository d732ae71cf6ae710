//! Key signatures as a count of fifths
//!
//! Written form follows the MEI tokens: "7f".."1f" for flats, "0" for no
//! accidentals, "1s".."7s" for sharps, and "mixed" for non-standard
//! signatures.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest representable number of sharps or flats
pub const MAX_FIFTHS: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySignature {
    /// Positive for sharps, negative for flats, always within ±7
    Fifths(i8),
    Mixed,
}

impl KeySignature {
    /// Key signature for a fifths count, `None` outside ±7
    pub fn from_fifths(fifths: i32) -> Option<KeySignature> {
        if (-MAX_FIFTHS..=MAX_FIFTHS).contains(&fifths) {
            Some(KeySignature::Fifths(fifths as i8))
        } else {
            None
        }
    }

    pub fn fifths(&self) -> Option<i32> {
        match self {
            KeySignature::Fifths(f) => Some(*f as i32),
            KeySignature::Mixed => None,
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySignature::Mixed => write!(f, "mixed"),
            KeySignature::Fifths(0) => write!(f, "0"),
            KeySignature::Fifths(n) if *n > 0 => write!(f, "{}s", n),
            KeySignature::Fifths(n) => write!(f, "{}f", -n),
        }
    }
}

impl FromStr for KeySignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid key signature: '{}'. Expected 7f..1f, 0, 1s..7s or mixed", s);
        match s {
            "mixed" => return Ok(KeySignature::Mixed),
            "0" => return Ok(KeySignature::Fifths(0)),
            _ => {}
        }
        if s.len() != 2 {
            return Err(invalid());
        }
        let (count, kind) = s.split_at(1);
        let count: i32 = count.parse().map_err(|_| invalid())?;
        if !(1..=MAX_FIFTHS).contains(&count) {
            return Err(invalid());
        }
        match kind {
            "s" => Ok(KeySignature::Fifths(count as i8)),
            "f" => Ok(KeySignature::Fifths(-count as i8)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for KeySignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeySignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("0".parse::<KeySignature>().unwrap(), KeySignature::Fifths(0));
        assert_eq!("3s".parse::<KeySignature>().unwrap(), KeySignature::Fifths(3));
        assert_eq!("7f".parse::<KeySignature>().unwrap(), KeySignature::Fifths(-7));
        assert_eq!("mixed".parse::<KeySignature>().unwrap(), KeySignature::Mixed);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("8s".parse::<KeySignature>().is_err());
        assert!("0s".parse::<KeySignature>().is_err());
        assert!("2x".parse::<KeySignature>().is_err());
        assert!("".parse::<KeySignature>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for fifths in -7..=7 {
            let key = KeySignature::from_fifths(fifths).unwrap();
            assert_eq!(key.to_string().parse::<KeySignature>().unwrap(), key);
        }
        assert_eq!(KeySignature::Fifths(-2).to_string(), "2f");
    }

    #[test]
    fn test_from_fifths_bounds() {
        assert_eq!(KeySignature::from_fifths(8), None);
        assert_eq!(KeySignature::from_fifths(-8), None);
        assert_eq!(KeySignature::Mixed.fifths(), None);
    }

    #[test]
    fn test_serde_as_token() {
        let json = serde_json::to_string(&KeySignature::Fifths(-4)).unwrap();
        assert_eq!(json, "\"4f\"");
        let parsed: KeySignature = serde_json::from_str("\"5s\"").unwrap();
        assert_eq!(parsed, KeySignature::Fifths(5));
    }
}
