// Whole-score transposition through the workspace: notes, staff keys of
// transposing instruments, and the editor action JSON.

use transpose_wasm::api::{KeySignatureInfo, Workspace};
use transpose_wasm::models::{Document, KeySignature, Note, PitchName};
use transpose_wasm::transposition::{Interval, TransposeError};

/// Flute (concert), clarinet in B♭, horn in F and a percussion staff, all
/// playing concert C4 in C major
const ORCHESTRA: &str = r#"{
    "score_def": {
        "key_sig": "0",
        "staff_defs": [
            {"n": 1, "label": "Flute", "clef_shape": "g", "key_sig": "0"},
            {"n": 2, "label": "Clarinet in B♭", "clef_shape": "g", "key_sig": "2s",
             "trans_diat": -1, "trans_semi": -2},
            {"n": 3, "label": "Horn in F", "clef_shape": "g", "key_sig": "1s",
             "trans_diat": -4, "trans_semi": -7},
            {"n": 4, "label": "Snare", "clef_shape": "perc", "key_sig": "0"}
        ]
    },
    "measures": [
        {"staves": [
            {"n": 1, "notes": [{"id": "fl1", "pname": 1, "oct": 4}]},
            {"n": 2, "notes": [{"id": "cl1", "pname": 2, "oct": 4}]},
            {"n": 3, "notes": [{"id": "hn1", "pname": 5, "oct": 4}]},
            {"n": 4, "notes": [{"id": "sn1", "pname": 3, "oct": 5}]}
        ]}
    ]
}"#;

fn load() -> Workspace {
    let mut workspace = Workspace::default();
    workspace.load_json(ORCHESTRA).expect("fixture should load");
    workspace
}

fn note<'a>(doc: &'a Document, id: &str) -> &'a Note {
    doc.measures
        .iter()
        .flat_map(|m| m.staves.iter())
        .flat_map(|s| s.notes.iter())
        .find(|n| n.id == id)
        .expect("note should exist")
}

fn spelled(doc: &Document, id: &str) -> (PitchName, i32, i32) {
    let n = note(doc, id);
    (n.pname.expect("pitched note"), n.alteration(), n.oct)
}

fn staff_key(doc: &Document, n: u32) -> Option<KeySignature> {
    doc.staff_def(n).and_then(|def| def.key_sig)
}

#[test]
fn test_concert_key_of_fixture() {
    let workspace = load();
    assert_eq!(workspace.key_signature().unwrap(), KeySignatureInfo { fifths: 0 });
}

#[test]
fn test_transpose_to_f_sharp_major() {
    let mut workspace = load();
    let result = workspace
        .apply_json(r#"{"action":"transposeToKey","param":{"newFifths":6}}"#)
        .unwrap();
    assert_eq!(result.interval, Some(Interval::new(3, 6)));
    assert_eq!(result.history, 6);

    let doc = workspace.document().unwrap();
    assert_eq!(spelled(doc, "fl1"), (PitchName::F, 1, 4));
    assert_eq!(spelled(doc, "cl1"), (PitchName::G, 1, 4));
    assert_eq!(spelled(doc, "hn1"), (PitchName::C, 1, 5));
    // percussion is never transposed
    assert_eq!(spelled(doc, "sn1"), (PitchName::E, 0, 5));

    assert_eq!(doc.score_def.key_sig, Some(KeySignature::Fifths(6)));
    assert_eq!(staff_key(doc, 1), Some(KeySignature::Fifths(6)));
    // G# major for the clarinet is written as A♭ major
    assert_eq!(staff_key(doc, 2), Some(KeySignature::Fifths(-4)));
    assert_eq!(doc.staff_def(2).unwrap().enharmonic_distance, 1);
    assert_eq!(staff_key(doc, 3), Some(KeySignature::Fifths(7)));
    assert_eq!(staff_key(doc, 4), Some(KeySignature::Fifths(0)));
}

#[test]
fn test_f_sharp_to_d_flat_goes_down() {
    let mut workspace = load();
    workspace
        .apply_json(r#"{"action":"transposeToKey","param":{"newFifths":6}}"#)
        .unwrap();
    let result = workspace
        .apply_json(r#"{"action":"transposeToKey","param":{"newFifths":-5}}"#)
        .unwrap();
    assert_eq!(result.interval, Some(Interval::new(-2, -5)));
    assert_eq!(result.history, 1);
    assert_eq!(result.fifths, -5);

    let doc = workspace.document().unwrap();
    assert_eq!(spelled(doc, "fl1"), (PitchName::D, -1, 4));
    assert_eq!(spelled(doc, "cl1"), (PitchName::E, -1, 4));
    assert_eq!(spelled(doc, "hn1"), (PitchName::A, -1, 4));

    assert_eq!(staff_key(doc, 2), Some(KeySignature::Fifths(-3)));
    assert_eq!(doc.staff_def(2).unwrap().enharmonic_distance, 0);
    assert_eq!(staff_key(doc, 3), Some(KeySignature::Fifths(-4)));
}

#[test]
fn test_concert_pitch_moves_by_history() {
    let mut workspace = load();
    let before: Vec<i32> = workspace
        .document()
        .unwrap()
        .notes_on_staff(1)
        .filter_map(|n| n.absolute_pitch())
        .collect();

    for fifths in [2, -3, 7, -7, 4, 0] {
        let body = format!(
            r#"{{"action":"transposeToKey","param":{{"newFifths":{}}}}}"#,
            fifths
        );
        let result = workspace.apply_json(&body).unwrap();
        assert!(result.history.abs() <= 6, "history {} after {}", result.history, fifths);
    }

    let history = workspace.session().history();
    let after: Vec<i32> = workspace
        .document()
        .unwrap()
        .notes_on_staff(1)
        .filter_map(|n| n.absolute_pitch())
        .collect();
    let expected: Vec<i32> = before.iter().map(|p| p + history).collect();
    assert_eq!(after, expected);
}

#[test]
fn test_transpose_interval_action() {
    let mut workspace = load();
    let result = workspace
        .apply_json(r#"{"action":"transposeInterval","param":{"diatonic":-2,"chromatic":-3,"staffN":1}}"#)
        .unwrap();
    assert_eq!(result.interval, Some(Interval::new(-2, -3)));
    // the document key is untouched by a single-staff transposition
    assert_eq!(result.fifths, 0);
    assert_eq!(result.history, 0);

    let doc = workspace.document().unwrap();
    assert_eq!(spelled(doc, "fl1"), (PitchName::A, 0, 3));
    assert_eq!(staff_key(doc, 1), Some(KeySignature::Fifths(3)));
    assert_eq!(spelled(doc, "cl1"), (PitchName::D, 0, 4));
}

#[test]
fn test_invalid_key_is_rejected_without_change() {
    let mut workspace = load();
    let before = workspace.document_json().unwrap();
    let result = workspace.apply_json(r#"{"action":"transposeToKey","param":{"newFifths":-8}}"#);
    assert!(matches!(result, Err(TransposeError::InvalidKeySignature(_))));
    assert_eq!(workspace.document_json().unwrap(), before);
}

#[test]
fn test_document_json_round_trip_keeps_tokens() {
    let mut workspace = load();
    workspace
        .apply_json(r#"{"action":"transposeToKey","param":{"newFifths":6}}"#)
        .unwrap();
    let json = workspace.document_json().unwrap();
    assert!(json.contains(r#""key_sig":"6s""#));
    assert!(json.contains(r#""key_sig":"4f""#));

    let reloaded: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(&reloaded, workspace.document().unwrap());
}

#[test]
fn test_key_signature_json_shape() {
    let workspace = load();
    let json = serde_json::to_string(&workspace.key_signature().unwrap()).unwrap();
    assert_eq!(json, r#"{"fifths":0}"#);
}
