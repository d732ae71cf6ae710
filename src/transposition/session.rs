//! Transposition session
//!
//! A session owns the chromatic history of the loaded document and the
//! settings, and ties the resolver, note transposer, key propagation and
//! range fitting together into document-level operations.

use crate::models::document::Document;
use crate::models::key_signature::MAX_FIFTHS;

use super::error::{Result, TransposeError};
use super::interval::Interval;
use super::key_diff::{keydiff_to_interval, ChromaticHistory, TransposeDirection};
use super::key_signature::{first_key_sig_fifths, propagate_key, shift_staff_key};
use super::note::{transpose_document_notes, NoteSummary};
use super::range::{part_transposition, InstrumentRange};
use super::settings::{PartDefaults, TransposeSettings};

/// Hook invoked after the document has changed, so a renderer can lay it out
/// again
pub trait Relayout: Send {
    fn relayout(&mut self, doc: &Document);
}

/// Relayout hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRelayout;

impl Relayout for NoRelayout {
    fn relayout(&mut self, _doc: &Document) {}
}

pub struct TransposeSession {
    settings: TransposeSettings,
    history: ChromaticHistory,
    layout: Box<dyn Relayout>,
}

impl Default for TransposeSession {
    fn default() -> Self {
        Self::new(TransposeSettings::default())
    }
}

impl TransposeSession {
    pub fn new(settings: TransposeSettings) -> Self {
        Self::with_relayout(settings, Box::new(NoRelayout))
    }

    pub fn with_relayout(settings: TransposeSettings, layout: Box<dyn Relayout>) -> Self {
        Self {
            settings,
            history: ChromaticHistory::new(),
            layout,
        }
    }

    pub fn settings(&self) -> &TransposeSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TransposeSettings) {
        self.settings = settings;
    }

    /// Semitones transposed since the document was loaded
    pub fn history(&self) -> i32 {
        self.history.total()
    }

    /// Forget the chromatic history; called when a new document is loaded
    pub fn reset_history(&mut self) {
        self.history.reset();
    }

    /// Concert key of the document in fifths
    pub fn key_signature_fifths(&self, doc: &Document) -> i32 {
        first_key_sig_fifths(doc)
    }

    fn relayout(&mut self, doc: &Document) {
        if self.settings.relayout {
            self.layout.relayout(doc);
        }
    }

    /// Transpose the whole document to the key with `new_fifths`, using the
    /// configured default direction
    pub fn transpose_to_key(&mut self, doc: &mut Document, new_fifths: i32) -> Result<Interval> {
        let direction = self.settings.default_direction;
        self.transpose_to_key_with_direction(doc, new_fifths, direction)
    }

    pub fn transpose_to_key_with_direction(
        &mut self,
        doc: &mut Document,
        new_fifths: i32,
        direction: TransposeDirection,
    ) -> Result<Interval> {
        if new_fifths.abs() > MAX_FIFTHS {
            return Err(TransposeError::InvalidKeySignature(format!(
                "{} fifths is outside -{}..={}",
                new_fifths, MAX_FIFTHS, MAX_FIFTHS
            )));
        }

        let old_fifths = first_key_sig_fifths(doc);

        // only committed once every note has been transposed
        let mut history = self.history;
        let interval = keydiff_to_interval(old_fifths, new_fifths, direction, &mut history)?;

        let summary =
            transpose_document_notes(doc, interval, None, self.settings.use_double_accidentals)?;
        propagate_key(doc, new_fifths);
        self.history = history;

        log::info!(
            "Transposed to key {} by ({}, {}): {} notes, {} skipped, {} approximate",
            new_fifths,
            interval.diatonic(),
            interval.chromatic(),
            summary.transposed,
            summary.skipped,
            summary.approximate
        );
        self.relayout(doc);
        Ok(interval)
    }

    /// Transpose the notes of staff `staff_n` by `interval` and move that
    /// staff's written key with them. The chromatic history is not involved.
    pub fn transpose_interval(
        &mut self,
        doc: &mut Document,
        interval: Interval,
        staff_n: u32,
    ) -> Result<NoteSummary> {
        let summary = self.transpose_staff(doc, interval, staff_n)?;
        log::info!(
            "Transposed staff {} by ({}, {}): {} notes, {} skipped",
            staff_n,
            interval.diatonic(),
            interval.chromatic(),
            summary.transposed,
            summary.skipped
        );
        self.relayout(doc);
        Ok(summary)
    }

    fn transpose_staff(
        &self,
        doc: &mut Document,
        interval: Interval,
        staff_n: u32,
    ) -> Result<NoteSummary> {
        if doc.staff_def(staff_n).is_none() {
            return Err(TransposeError::UnknownStaffDef(staff_n));
        }
        let summary = transpose_document_notes(
            doc,
            interval,
            Some(staff_n),
            self.settings.use_double_accidentals,
        )?;
        shift_staff_key(doc, staff_n, interval);
        Ok(summary)
    }

    /// Semitones (a multiple of 12) to add to `interval` so that staff
    /// `staff_n` fits `range`
    pub fn part_transposition(
        &self,
        doc: &Document,
        interval: Interval,
        staff_n: u32,
        range: &InstrumentRange,
        multi_staff: bool,
    ) -> Result<i32> {
        if doc.staff_def(staff_n).is_none() {
            return Err(TransposeError::UnknownStaffDef(staff_n));
        }
        Ok(part_transposition(doc, interval, staff_n, range, multi_staff))
    }

    /// Switch the staves `staff_ns` of one part to a new instrument.
    ///
    /// Each staff is brought back to concert pitch, given the new instrument's
    /// transposition, clef, labels and MIDI instrument, moved by whole octaves
    /// into the instrument range and finally written out for the new
    /// instrument. The document is left unchanged if any staff fails.
    pub fn change_part(
        &mut self,
        doc: &mut Document,
        staff_ns: &[u32],
        defaults: &PartDefaults,
    ) -> Result<()> {
        let last_clef = match defaults.clefs.last() {
            Some(clef) => *clef,
            None => {
                log::warn!("change_part: instrument defines no staves");
                return Err(TransposeError::InvalidAction(
                    "instrument defines no staves".to_string(),
                ));
            }
        };

        let range = defaults.range();
        let multi_staff = staff_ns.len() > 1 && defaults.clefs.len() > 1;
        let mut work = doc.clone();

        for (index, &staff_n) in staff_ns.iter().enumerate() {
            let def = work
                .staff_def_mut(staff_n)
                .ok_or(TransposeError::UnknownStaffDef(staff_n))?;

            // back to concert pitch
            let mut interval = def
                .transposition()
                .unwrap_or_default()
                .plus_octaves(def.trans_oct.unwrap_or(0));
            def.reset_transposition();

            let part_transpose = match defaults.transp {
                Some(transp) => {
                    let written = Interval::from_pitches(-transp).normalize_tritone();
                    def.set_transposition(written.flipped());
                    written
                }
                None => Interval::default(),
            };

            def.clef_shape = Some(defaults.clefs.get(index).copied().unwrap_or(last_clef));
            if let Some(label) = &defaults.label {
                def.label = Some(label.clone());
            }
            if let Some(short_name) = &defaults.short_name {
                def.label_abbr = Some(short_name.clone());
            }
            if let Some(name) = &defaults.midi_instrname {
                def.midi_instrname = Some(name.clone());
            }
            if let Some(prog) = defaults.midi_prog.as_ref().and_then(|p| p.program()) {
                def.midi_instrnum = Some(prog);
            }

            if let Some(range) = &range {
                let octaves =
                    part_transposition(&work, interval, staff_n, range, multi_staff) / 12;
                interval = interval.plus_octaves(octaves);
            }

            if let Some(oct) = defaults.oct {
                interval = interval.plus_octaves(-oct);
                if let Some(def) = work.staff_def_mut(staff_n) {
                    def.trans_oct = Some(oct);
                }
            }

            let interval = interval.plus(part_transpose);
            log::debug!(
                "change_part: staff {} transposed by ({}, {})",
                staff_n,
                interval.diatonic(),
                interval.chromatic()
            );
            self.transpose_staff(&mut work, interval, staff_n)?;
        }

        *doc = work;
        log::info!("Changed part on staves {:?}", staff_ns);
        self.relayout(doc);
        Ok(())
    }
}
