use ac_core::EditState;

use super::*;
use crate::{EditableField, OverlayController};

#[test]
fn test_install_refuses_off_boundary_cursor() {
    let mut field = FieldBuffer::with_text("hello");
    let mut overlay = OverlayController::new();
    for (start, end) in [(0, 0), (2, 2), (1, 5), (0, 5)] {
        let state = EditState::new("hello", Some(" world"), start, end);
        assert!(!overlay.install(&mut field, &state), "{start}..{end}");
        assert_eq!(field.text(), "hello");
        assert_eq!(field.overlay(), None);
    }
    let state = EditState::new("hello", Some(" world"), 5, 5);
    assert!(overlay.install(&mut field, &state));
}

#[test]
fn test_prefix_extension_reuse_without_flicker() {
    let mut model = model_showing("App", "le Inc");
    assert_eq!(model.field().text(), "Apple Inc");

    type_string(&mut model, "l");
    assert_eq!(model.user_text(), "Appl");
    assert_eq!(model.suggestion_text(), Some("e Inc"));
    assert_eq!(model.field().text(), "Apple Inc");
    assert_eq!(model.field().overlay(), Some(4..9));

    // Only the caret moved as far as observers can tell.
    let notes = model.take_notifications();
    assert_eq!(text_changes(&notes), 0);
    assert_eq!(
        suggestion_updates(&notes),
        vec![("Appl".to_string(), EditKind::Typing)]
    );
}

#[test]
fn test_reuse_carries_additional_text() {
    let mut model = make_model();
    type_string(&mut model, "App");
    model.set_suggestion("App", Some("le Inc"), Some("apple.com"));
    type_string(&mut model, "le");
    assert_eq!(model.suggestion_text(), Some(" Inc"));
    assert_eq!(model.additional_text(), Some("apple.com"));
}

#[test]
fn test_typing_past_suggestion_drops_it() {
    let mut model = model_showing("App", "le");
    type_string(&mut model, "le");
    assert!(!model.has_suggestion());
    assert_eq!(model.field().text(), "Apple");
    assert_eq!(model.field().overlay(), None);
}

#[test]
fn test_diverging_keystroke_drops_suggestion() {
    let mut model = model_showing("App", "le Inc");
    type_string(&mut model, "x");
    assert!(!model.has_suggestion());
    assert_eq!(model.field().text(), "Appx");
}

#[test]
fn test_protocol_cannot_address_suggestion_text() {
    let mut model = model_showing("abc", "def");
    // Offsets past the user text do not exist while the protocol runs.
    assert!(!model.connection().set_selection(5, 5));
    assert_eq!(model.field().text(), "abcdef");
    assert_eq!(model.field().selection(), 3..3);
}

#[test]
fn test_composing_text_never_covers_suggestion() {
    let mut model = model_showing("hel", "lo");
    model.connection().set_composing_region(0, 3);
    assert_eq!(model.field().text(), "hello");
    assert_eq!(model.field().composing_region(), Some(0..3));

    model.connection().set_composing_text("help", 1);
    assert_eq!(model.field().text(), "help");
    assert_eq!(model.field().composing_region(), Some(0..4));
    assert_eq!(model.user_text(), "help");
    assert!(!model.has_suggestion());
}
