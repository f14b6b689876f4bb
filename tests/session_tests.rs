//! Tests for the key-test session collaborator over parsed models.

use keyprobe::models::FirmwareDescriptor;
use keyprobe::parser::parse_descriptor;
use keyprobe::session::{KeyTestState, TestReport, TestSession};

fn corne_model() -> keyprobe::models::KeyboardModel {
    let descriptor = FirmwareDescriptor::from_text(
        "corne.json",
        r#"{"keyboard": "Corne", "split": {"enabled": true}}"#,
    );
    parse_descriptor(&descriptor).unwrap()
}

#[test]
fn test_session_covers_every_model_key() {
    let model = corne_model();
    let session = TestSession::new(&model);

    assert_eq!(session.total(), 42);
    assert_eq!(session.tested_count(), 0);
    assert!(!session.is_complete());
    assert_eq!(session.keyboard, "Corne");
}

#[test]
fn test_session_never_mutates_the_model() {
    let model = corne_model();
    let before = model.clone();

    let mut session = TestSession::new(&model);
    for key in &model.keys {
        session.press(key.id);
        session.release(key.id);
    }

    assert_eq!(model, before);
    assert!(session.is_complete());
}

#[test]
fn test_progress_tracks_tested_keys() {
    let model = corne_model();
    let mut session = TestSession::new(&model);

    for id in 0..21 {
        session.press(id);
        session.release(id);
    }

    assert_eq!(session.tested_count(), 21);
    assert_eq!(session.progress_percent(), 50.0);
    assert_eq!(session.state(0), KeyTestState::Tested);
    assert_eq!(session.state(21), KeyTestState::Untested);
}

#[test]
fn test_report_matches_model_order() {
    let model = corne_model();
    let mut session = TestSession::new(&model);
    session.press(0);
    session.release(0);

    let report = TestReport::from_session(&session, &model);
    assert_eq!(report.keyboard, "Corne");
    assert_eq!(report.total_keys, 42);
    assert_eq!(report.tested_keys, 1);
    assert_eq!(report.keys.len(), 42);

    for (key, line) in model.keys.iter().zip(&report.keys) {
        assert_eq!(line.id, key.id);
        assert_eq!(line.row, key.row);
        assert_eq!(line.col, key.col);
        assert_eq!(line.keycode, key.keycode);
    }
    assert!(report.keys[0].tested);
    assert!(!report.keys[1].tested);
}

#[test]
fn test_report_serializes_expected_fields() {
    let model = corne_model();
    let session = TestSession::new(&model);
    let report = TestReport::from_session(&session, &model);

    let json = serde_json::to_value(&report).unwrap();
    for field in ["timestamp", "keyboard", "total_keys", "tested_keys", "progress", "keys"] {
        assert!(json.get(field).is_some(), "report must carry {field}");
    }
    assert_eq!(json["progress"], 0.0);
}
