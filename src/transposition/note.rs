//! Note transposition
//!
//! Each note is respelled through its tonal pitch class, then its octave is
//! recomputed so that the sounding pitch moves by exactly the interval's
//! chromatic distance. All notes are planned and checked before any of them
//! is written back, so a failure leaves the document untouched.

use std::collections::HashSet;

use crate::models::document::Document;
use crate::models::pitch::{Accid, GesturalAccidental, Note, PitchName};

use super::error::{Result, TransposeError};
use super::interval::Interval;
use super::tpc::{step2tpc, transpose_tpc};

/// New spelling for one note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedPitch {
    pub pname: PitchName,
    pub oct: i32,
    pub alter: i32,
    /// False when the spelling search hit its iteration cap
    pub exact: bool,
}

/// Counts reported by a document-wide note transposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteSummary {
    pub transposed: usize,
    pub skipped: usize,
    /// Notes spelled from the best candidate after the search cap
    pub approximate: usize,
}

/// Compute the transposed spelling of `note`, or `None` when the note has no
/// pitch name or an alteration the spelling tables cannot represent.
pub fn plan_note(note: &Note, interval: Interval, use_double_accidentals: bool) -> Result<Option<PlannedPitch>> {
    let pname = match note.pname {
        Some(pname) => pname,
        None => {
            log::debug!("note '{}' has no pitch name, skipped", note.id);
            return Ok(None);
        }
    };
    let alter = note.alteration();
    if !(-2..=2).contains(&alter) {
        log::warn!("note '{}' has alteration {}, skipped", note.id, alter);
        return Ok(None);
    }

    let tpc = step2tpc(pname.step(), alter);
    let spelling = transpose_tpc(tpc, interval, use_double_accidentals);
    if !spelling.exact {
        log::warn!(
            "note '{}': no spelling of ({}, {}) within bounds, using step {} alteration {}",
            note.id,
            interval.diatonic(),
            interval.chromatic(),
            spelling.step,
            spelling.alter
        );
    }
    // only an inexact spelling can land outside ±2
    if GesturalAccidental::from_alteration(spelling.alter).is_none() && spelling.alter != 0 {
        return Err(TransposeError::UnencodableAlteration {
            note_id: note.id.clone(),
            alter: spelling.alter,
        });
    }

    let new_pname = PitchName::from_step(spelling.step);
    let target = pname.semitones() + alter + interval.chromatic();
    let mut candidate = new_pname.semitones() + spelling.alter;
    let mut octaves = 0;
    while candidate < target {
        candidate += 12;
        octaves += 1;
    }
    while candidate > target {
        candidate -= 12;
        octaves -= 1;
    }

    let planned = PlannedPitch {
        pname: new_pname,
        oct: note.oct + octaves,
        alter: spelling.alter,
        exact: spelling.exact,
    };

    let expected = note.oct * 12 + target;
    let mut check = note.clone();
    apply_planned(&mut check, &planned);
    let actual = check.absolute_pitch().unwrap_or(i32::MIN);
    if actual != expected {
        log::error!(
            "note '{}' would sound at {} instead of {} (carry {})",
            note.id,
            actual,
            expected,
            spelling.octave_carry
        );
        return Err(TransposeError::PitchMismatch {
            note_id: note.id.clone(),
            expected,
            actual,
        });
    }

    Ok(Some(planned))
}

/// Write a planned spelling into the note: step and octave are replaced, the
/// accidental is dropped and recreated only for a non-zero alteration.
pub fn apply_planned(note: &mut Note, planned: &PlannedPitch) {
    note.pname = Some(planned.pname);
    note.oct = planned.oct;
    note.accid = GesturalAccidental::from_alteration(planned.alter).map(Accid::gestural);
}

/// Transpose one note in place
pub fn transpose_note(note: &mut Note, interval: Interval, use_double_accidentals: bool) -> Result<bool> {
    match plan_note(note, interval, use_double_accidentals)? {
        Some(planned) => {
            apply_planned(note, &planned);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Staff numbers whose notes are subject to transposition: every staff
/// except those whose definition has a percussion or tablature clef
fn pitched_staves(doc: &Document, only: Option<u32>) -> HashSet<u32> {
    doc.measures
        .iter()
        .flat_map(|measure| measure.staves.iter().map(|staff| staff.n))
        .filter(|n| only.map_or(true, |wanted| wanted == *n))
        .filter(|n| doc.staff_def(*n).map_or(true, |def| def.is_pitched()))
        .collect()
}

/// Transpose every note of the pitched staves (or only staff `only`).
pub fn transpose_document_notes(
    doc: &mut Document,
    interval: Interval,
    only: Option<u32>,
    use_double_accidentals: bool,
) -> Result<NoteSummary> {
    let staves = pitched_staves(doc, only);
    let mut summary = NoteSummary::default();

    let notes: Vec<&mut Note> = doc
        .measures
        .iter_mut()
        .flat_map(|measure| measure.staves.iter_mut())
        .filter(|staff| staves.contains(&staff.n))
        .flat_map(|staff| staff.notes.iter_mut())
        .collect();

    let mut plans = Vec::with_capacity(notes.len());
    for note in notes.iter() {
        let plan = plan_note(note, interval, use_double_accidentals)?;
        match &plan {
            Some(planned) => {
                summary.transposed += 1;
                if !planned.exact {
                    summary.approximate += 1;
                }
            }
            None => summary.skipped += 1,
        }
        plans.push(plan);
    }

    for (note, plan) in notes.into_iter().zip(plans) {
        if let Some(planned) = plan {
            apply_planned(note, &planned);
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{ClefShape, Measure, Staff, StaffDef};
    use crate::models::pitch::{Accid, WrittenAccidental};

    fn spelled(note: &Note) -> (PitchName, i32, i32) {
        (note.pname.unwrap(), note.alteration(), note.oct)
    }

    #[test]
    fn test_c4_to_d4() {
        let mut note = Note::new("n1", PitchName::C, 4);
        assert!(transpose_note(&mut note, Interval::new(1, 2), false).unwrap());
        assert_eq!(spelled(&note), (PitchName::D, 0, 4));
        assert!(note.accid.is_none());
    }

    #[test]
    fn test_c4_down_a_semitone_is_b3() {
        let mut note = Note::new("n1", PitchName::C, 4);
        transpose_note(&mut note, Interval::new(-1, -1), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::B, 0, 3));
    }

    #[test]
    fn test_accidental_recreated() {
        let mut note = Note::new("n1", PitchName::G, 4);
        // up a major third: B4
        transpose_note(&mut note, Interval::new(2, 4), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::B, 0, 4));
        // up a major second: C#5
        transpose_note(&mut note, Interval::new(1, 2), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::C, 1, 5));
        assert_eq!(note.accid, Some(Accid::gestural(GesturalAccidental::S)));
        // down an augmented unison: C5, accidental removed
        transpose_note(&mut note, Interval::new(0, -1), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::C, 0, 5));
        assert!(note.accid.is_none());
    }

    #[test]
    fn test_written_accidental_read_and_replaced() {
        let mut note = Note::new("n1", PitchName::B, 3);
        note.accid = Some(Accid::written(WrittenAccidental::F));
        // Bb3 up a major second: C4
        transpose_note(&mut note, Interval::new(1, 2), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::C, 0, 4));
        assert!(note.accid.is_none());
    }

    #[test]
    fn test_cb_keeps_sounding_octave() {
        // Cb4 sounds as B3; up a minor second would be Dbb4, respelled C4
        let mut note = Note::new("n1", PitchName::C, 4).with_alteration(-1);
        let before = note.absolute_pitch().unwrap();
        transpose_note(&mut note, Interval::new(1, 1), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::C, 0, 4));
        assert_eq!(note.absolute_pitch().unwrap(), before + 1);

        // B#3 sounds as C4; down an augmented unison gives B3
        let mut note = Note::new("n2", PitchName::B, 3).with_alteration(1);
        transpose_note(&mut note, Interval::new(0, -1), false).unwrap();
        assert_eq!(spelled(&note), (PitchName::B, 0, 3));
    }

    #[test]
    fn test_round_trip_invariant_all_spellings() {
        let intervals = [
            Interval::new(0, 1),
            Interval::new(1, 2),
            Interval::new(-1, -1),
            Interval::new(2, 3),
            Interval::new(4, 7),
            Interval::new(-4, -7),
            Interval::new(3, 6),
            Interval::new(6, 11),
            Interval::new(7, 12),
            Interval::new(-9, -15),
            Interval::new(1, 0),
        ];
        for pname in [
            PitchName::C,
            PitchName::D,
            PitchName::E,
            PitchName::F,
            PitchName::G,
            PitchName::A,
            PitchName::B,
        ] {
            for alter in -2..=2 {
                for interval in intervals {
                    for double in [false, true] {
                        let mut note = Note::new("n", pname, 4).with_alteration(alter);
                        let before = note.absolute_pitch().unwrap();
                        transpose_note(&mut note, interval, double).unwrap();
                        assert_eq!(
                            note.absolute_pitch().unwrap(),
                            before + interval.chromatic(),
                            "{:?}{} by {:?}",
                            pname,
                            alter,
                            interval
                        );
                        let bound = if double { 2 } else { 1 };
                        assert!(note.alteration().abs() <= bound);
                    }
                }
            }
        }
    }

    #[test]
    fn test_null_interval_is_identity() {
        for alter in -2..=2 {
            let original = Note::new("n", PitchName::E, 3).with_alteration(alter);
            let mut note = original.clone();
            transpose_note(&mut note, Interval::default(), false).unwrap();
            assert_eq!(spelled(&note), spelled(&original));
        }
    }

    #[test]
    fn test_null_interval_keeps_double_flat_without_doubles() {
        // identity wins over the single-accidental bound
        let mut note = Note::new("n", PitchName::F, 4).with_alteration(-2);
        assert!(transpose_note(&mut note, Interval::default(), false).unwrap());
        assert_eq!(spelled(&note), (PitchName::F, -2, 4));
        assert_eq!(note.accid, Some(Accid::gestural(GesturalAccidental::Ff)));

        // any real interval respells within the bound: Fbb4 up a major second is F4
        assert!(transpose_note(&mut note, Interval::new(1, 2), false).unwrap());
        assert_eq!(spelled(&note), (PitchName::F, 0, 4));
        assert!(note.accid.is_none());
    }

    #[test]
    fn test_unpitched_and_triple_accidental_notes_skipped() {
        let mut rest_like = Note {
            id: "x".to_string(),
            pname: None,
            oct: 4,
            accid: None,
        };
        assert!(!transpose_note(&mut rest_like, Interval::new(1, 2), false).unwrap());

        let mut triple = Note::new("t", PitchName::F, 4);
        triple.accid = Some(Accid::written(WrittenAccidental::Ts));
        let before = triple.clone();
        assert!(!transpose_note(&mut triple, Interval::new(1, 2), false).unwrap());
        assert_eq!(triple, before);
    }

    #[test]
    fn test_document_skips_percussion_staff() {
        let mut doc = Document::new();
        let mut perc = StaffDef::new(2);
        perc.clef_shape = Some(ClefShape::Perc);
        doc.score_def.staff_defs = vec![StaffDef::new(1), perc];
        doc.measures.push(Measure {
            staves: vec![
                Staff { n: 1, notes: vec![Note::new("a", PitchName::C, 4)] },
                Staff { n: 2, notes: vec![Note::new("b", PitchName::C, 4)] },
            ],
        });

        let summary = transpose_document_notes(&mut doc, Interval::new(4, 7), None, false).unwrap();
        assert_eq!(summary.transposed, 1);
        assert_eq!(doc.measures[0].staves[0].notes[0].pname, Some(PitchName::G));
        assert_eq!(doc.measures[0].staves[1].notes[0].pname, Some(PitchName::C));
    }

    #[test]
    fn test_document_restricted_to_one_staff() {
        let mut doc = Document::new();
        doc.measures.push(Measure {
            staves: vec![
                Staff { n: 1, notes: vec![Note::new("a", PitchName::C, 4)] },
                Staff { n: 2, notes: vec![Note::new("b", PitchName::C, 4)] },
            ],
        });
        transpose_document_notes(&mut doc, Interval::new(2, 4), Some(2), false).unwrap();
        assert_eq!(doc.measures[0].staves[0].notes[0].pname, Some(PitchName::C));
        assert_eq!(doc.measures[0].staves[1].notes[0].pname, Some(PitchName::E));
    }
}
