//! Transposition core
//!
//! Intervals, tonal pitch class spelling, key-difference resolution, note
//! transposition, key-signature bookkeeping and instrument range fitting,
//! tied together by [`TransposeSession`].

pub mod error;
pub mod interval;
pub mod key_diff;
pub mod key_signature;
pub mod note;
pub mod range;
pub mod session;
pub mod settings;
pub mod tpc;

pub use error::{Result, TransposeError};
pub use interval::Interval;
pub use key_diff::{keydiff_to_interval, ChromaticHistory, TransposeDirection};
pub use key_signature::first_key_sig_fifths;
pub use note::{transpose_document_notes, transpose_note, NoteSummary};
pub use range::{InstrumentRange, PitchBand};
pub use session::{NoRelayout, Relayout, TransposeSession};
pub use settings::{MidiProgram, PartDefaults, TransposeSettings};
