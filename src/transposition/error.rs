//! Error types for transposition
//!
//! `ChromaticDrift` and `PitchMismatch` are internal invariant violations:
//! they indicate a bug in the resolver or the spelling search and are never
//! corrected silently. The remaining variants describe bad caller input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransposeError {
    /// The accumulated chromatic transposition left the ±6 semitone window
    #[error("Internal transposition error: chromatic history {history} + {chromatic} leaves the ±6 window")]
    ChromaticDrift { history: i32, chromatic: i32 },

    /// A transposed note no longer sounds at the expected absolute pitch
    #[error("Internal transposition error: note '{note_id}' sounds at {actual}, expected {expected}")]
    PitchMismatch {
        note_id: String,
        expected: i32,
        actual: i32,
    },

    /// The spelling search produced an alteration that has no accidental
    #[error("Note '{note_id}' would need an alteration of {alter} semitones")]
    UnencodableAlteration { note_id: String, alter: i32 },

    #[error("No staff definition with n={0}")]
    UnknownStaffDef(u32),

    #[error("No document loaded")]
    NoDocument,

    #[error("Invalid key signature: {0}")]
    InvalidKeySignature(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TransposeError {
    fn from(e: serde_json::Error) -> Self {
        TransposeError::Json(e.to_string())
    }
}

impl TransposeError {
    /// Whether the error signals an algorithmic defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TransposeError::ChromaticDrift { .. } | TransposeError::PitchMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TransposeError>;
