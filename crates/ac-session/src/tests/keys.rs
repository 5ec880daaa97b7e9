use ac_core::settings::parse_settings_toml;
use ac_core::settings::DEFAULT_SETTINGS_TOML;
use ac_core::KeyEvent;

use super::*;
use crate::{EditableField, KeyResponse};

#[test]
fn test_tab_accepts() {
    let mut model = model_showing("goo", "gle.com");
    let resp = model.on_key_event(KeyEvent::Tab);
    assert!(resp.consumed);
    assert!(resp.accepted);
    assert_eq!(model.field().text(), "google.com");
    assert!(!model.has_suggestion());
    assert_eq!(model.field().selection(), 10..10);
}

#[test]
fn test_enter_accepts_and_passes_through() {
    let mut model = model_showing("goo", "gle.com");
    let resp = model.on_key_event(KeyEvent::Enter);
    assert!(!resp.consumed);
    assert!(resp.accepted);
    assert_eq!(model.user_text(), "google.com");
}

#[test]
fn test_enter_without_accept_on_enter() {
    let toml = DEFAULT_SETTINGS_TOML.replace("accept_on_enter = true", "accept_on_enter = false");
    let settings = parse_settings_toml(&toml).unwrap();
    let mut model = OverlayModel::new(FieldBuffer::new(), settings);
    type_string(&mut model, "goo");
    model.set_suggestion("goo", Some("gle"), None);

    assert_eq!(model.on_key_event(KeyEvent::Enter), KeyResponse::default());
    assert!(model.has_suggestion());
}

#[test]
fn test_backspace_dismisses_only_suggestion() {
    let mut model = model_showing("goo", "gle.com");
    let resp = model.on_key_event(KeyEvent::Backspace);
    assert!(resp.consumed);
    assert!(resp.dismissed);
    assert_eq!(model.field().text(), "goo");
    assert_eq!(model.user_text(), "goo");
    assert!(!model.has_suggestion());
    assert!(!model.last_edit_was_typing());
    assert_eq!(
        suggestion_updates(&model.take_notifications()),
        vec![("goo".to_string(), EditKind::Deletion)]
    );
}

#[test]
fn test_keys_without_suggestion_pass_through() {
    let mut model = make_model();
    type_string(&mut model, "goo");
    for key in [KeyEvent::Tab, KeyEvent::Enter, KeyEvent::Backspace, KeyEvent::Char('x')] {
        assert_eq!(model.on_key_event(key), KeyResponse::default());
    }
    assert_eq!(model.field().text(), "goo");
}

#[test]
fn test_unbound_key_passes_through() {
    let mut model = model_showing("goo", "gle");
    assert!(!model.on_key_event(KeyEvent::Char('g')).consumed);
    assert!(!model.on_key_event(KeyEvent::Escape).consumed);
    assert!(model.has_suggestion());
}

#[test]
fn test_keys_ignored_inside_session() {
    let mut model = model_showing("goo", "gle");
    model.connection().begin_batch_edit();
    assert_eq!(model.on_key_event(KeyEvent::Tab), KeyResponse::default());
    model.connection().end_batch_edit();
    assert!(model.has_suggestion());
    assert_eq!(model.field().text(), "google");
}
