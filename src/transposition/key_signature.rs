//! Key-signature bookkeeping after a transposition
//!
//! The document key is the concert key. A staff definition stores its written
//! key, which differs from the concert key by the fifths of the staff's
//! transposition interval. Written keys beyond ±7 fifths are folded by 12
//! (e.g. 8 sharps becomes 4 flats) and the fold count is kept in
//! `enharmonic_distance`.

use crate::models::document::{ClefShape, Document, StaffDef};
use crate::models::key_signature::{KeySignature, MAX_FIFTHS};

use super::interval::Interval;

/// Concert key of the document in fifths.
///
/// Uses the document key when present, otherwise the first pitched staff
/// definition declaring a key, converted back to concert pitch. Defaults to
/// C major (0).
pub fn first_key_sig_fifths(doc: &Document) -> i32 {
    if let Some(fifths) = doc.score_def.key_sig.and_then(|key| key.fifths()) {
        return fifths;
    }

    doc.score_def
        .staff_defs
        .iter()
        .filter(|def| def.is_pitched())
        .find_map(|def| {
            let written = def.unfolded_key_fifths()?;
            let transposition = def.transposition().map_or(0, |t| t.fifths());
            Some(written + transposition)
        })
        .unwrap_or(0)
}

/// Fold a fifths count into ±7, returning the folded value and the number of
/// 12-fifths folds (positive when sharps were folded into flats)
pub fn fold_fifths(fifths: i32) -> (i32, i32) {
    let mut folded = fifths;
    let mut distance = 0;
    while folded > MAX_FIFTHS {
        folded -= 12;
        distance += 1;
    }
    while folded < -MAX_FIFTHS {
        folded += 12;
        distance -= 1;
    }
    (folded, distance)
}

fn store_written_key(def: &mut StaffDef, written: i32) {
    let (folded, distance) = fold_fifths(written);
    if distance != 0 {
        log::debug!(
            "staff {}: written key {} folded to {} (enharmonic distance {})",
            def.n,
            written,
            folded,
            distance
        );
    }
    def.key_sig = KeySignature::from_fifths(folded);
    def.enharmonic_distance = distance;
}

/// Set the concert key of the document to `new_fifths` and rewrite every
/// explicit staff key accordingly. Mixed signatures are left alone.
pub fn propagate_key(doc: &mut Document, new_fifths: i32) {
    for def in doc.score_def.staff_defs.iter_mut() {
        if def.clef_shape == Some(ClefShape::Perc) {
            continue;
        }
        let current = def.key_sig;
        match current {
            Some(KeySignature::Fifths(_)) => {
                let transposition = def.transposition().map_or(0, |t| t.fifths());
                store_written_key(def, new_fifths - transposition);
            }
            Some(KeySignature::Mixed) => {
                log::debug!("staff {}: mixed key signature left unchanged", def.n);
            }
            None => {}
        }
    }
    doc.score_def.key_sig = KeySignature::from_fifths(new_fifths);
}

/// Move the written key of one staff by the fifths of `interval`.
///
/// A staff without its own key starts from the document key, and only gets
/// one when the interval actually changes the key.
pub fn shift_staff_key(doc: &mut Document, staff_n: u32, interval: Interval) {
    let shift = interval.fifths();
    let document_key = doc.score_def.key_sig.and_then(|key| key.fifths()).unwrap_or(0);

    let def = match doc.staff_def_mut(staff_n) {
        Some(def) => def,
        None => return,
    };
    if def.clef_shape == Some(ClefShape::Perc) {
        return;
    }

    let current = def.key_sig;
    match current {
        Some(KeySignature::Mixed) => {
            log::debug!("staff {}: mixed key signature left unchanged", def.n);
        }
        Some(KeySignature::Fifths(_)) => {
            let written = def.unfolded_key_fifths().unwrap_or(0);
            store_written_key(def, written + shift);
        }
        None if shift != 0 => store_written_key(def, document_key + shift),
        None => {}
    }
}
