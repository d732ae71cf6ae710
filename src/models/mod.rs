//! Models module for the transposition core
//!
//! The score document, its notes and key signatures.

pub mod document;
pub mod key_signature;
pub mod pitch;

// Re-export commonly used types
pub use document::{ClefShape, Document, Measure, ScoreDef, Staff, StaffDef};
pub use key_signature::KeySignature;
pub use pitch::{Accid, GesturalAccidental, Note, PitchName, WrittenAccidental};
