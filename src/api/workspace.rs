//! Document workspace behind the JavaScript API
//!
//! Holds the loaded document together with its transposition session and
//! dispatches editor actions received as JSON.

use serde::{Deserialize, Serialize};

use crate::models::document::Document;
use crate::transposition::{
    Interval, PartDefaults, Result, TransposeDirection, TransposeError, TransposeSession,
    TransposeSettings,
};

/// Editor action, e.g. `{"action":"transposeToKey","param":{"newFifths":2}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "param", rename_all = "camelCase")]
pub enum EditorAction {
    TransposeToKey {
        #[serde(rename = "newFifths")]
        new_fifths: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<TransposeDirection>,
    },
    TransposeInterval {
        diatonic: i32,
        chromatic: i32,
        #[serde(rename = "staffN")]
        staff_n: u32,
    },
    ChangePart {
        #[serde(rename = "staffNs")]
        staff_ns: Vec<u32>,
        #[serde(default)]
        defaults: PartDefaults,
    },
}

/// Reply to a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Concert key after the action
    pub fifths: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
    pub history: i32,
}

/// `{"fifths": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignatureInfo {
    pub fifths: i32,
}

#[derive(Default)]
pub struct Workspace {
    document: Option<Document>,
    session: TransposeSession,
}

impl Workspace {
    pub fn new(settings: TransposeSettings) -> Self {
        Self {
            document: None,
            session: TransposeSession::new(settings),
        }
    }

    pub fn with_session(session: TransposeSession) -> Self {
        Self {
            document: None,
            session,
        }
    }

    pub fn session(&self) -> &TransposeSession {
        &self.session
    }

    pub fn set_settings(&mut self, settings: TransposeSettings) {
        self.session.set_settings(settings);
    }

    /// Replace the loaded document; the chromatic history starts over
    pub fn load(&mut self, doc: Document) {
        self.document = Some(doc);
        self.session.reset_history();
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let doc: Document = serde_json::from_str(json)?;
        self.load(doc);
        Ok(())
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_json(&self) -> Result<String> {
        let doc = self.document.as_ref().ok_or(TransposeError::NoDocument)?;
        Ok(serde_json::to_string(doc)?)
    }

    pub fn key_signature(&self) -> Result<KeySignatureInfo> {
        let doc = self.document.as_ref().ok_or(TransposeError::NoDocument)?;
        Ok(KeySignatureInfo {
            fifths: self.session.key_signature_fifths(doc),
        })
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<ActionResult> {
        let doc = self.document.as_mut().ok_or(TransposeError::NoDocument)?;

        let interval = match action {
            EditorAction::TransposeToKey {
                new_fifths,
                direction,
            } => {
                let direction = direction.unwrap_or(self.session.settings().default_direction);
                Some(
                    self.session
                        .transpose_to_key_with_direction(doc, new_fifths, direction)?,
                )
            }
            EditorAction::TransposeInterval {
                diatonic,
                chromatic,
                staff_n,
            } => {
                let interval = Interval::new(diatonic, chromatic);
                self.session.transpose_interval(doc, interval, staff_n)?;
                Some(interval)
            }
            EditorAction::ChangePart { staff_ns, defaults } => {
                if staff_ns.is_empty() {
                    return Err(TransposeError::InvalidAction(
                        "changePart needs at least one staff".to_string(),
                    ));
                }
                self.session.change_part(doc, &staff_ns, &defaults)?;
                None
            }
        };

        Ok(ActionResult {
            fifths: self.session.key_signature_fifths(doc),
            interval,
            history: self.session.history(),
        })
    }

    /// Parse and apply an action given as JSON
    /// Apply an action with `settings` in place of the session's for this
    /// call only; the session's settings are restored whatever the outcome
    pub fn apply_with_settings(
        &mut self,
        action: EditorAction,
        settings: Option<TransposeSettings>,
    ) -> Result<ActionResult> {
        let settings = match settings {
            Some(settings) => settings,
            None => return self.apply(action),
        };
        let saved = self.session.settings().clone();
        self.session.set_settings(settings);
        let result = self.apply(action);
        self.session.set_settings(saved);
        result
    }

    pub fn apply_json(&mut self, json: &str) -> Result<ActionResult> {
        let action: EditorAction = serde_json::from_str(json)
            .map_err(|e| TransposeError::InvalidAction(e.to_string()))?;
        self.apply(action)
    }
}
