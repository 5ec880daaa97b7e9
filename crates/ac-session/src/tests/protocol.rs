use ac_core::KeyEvent;

use super::*;
use crate::protocol::{CAP_MODE_CHARACTERS, CAP_MODE_SENTENCES, CAP_MODE_WORDS};
use crate::{CommandResult, CompositionCommand, ContentPayload, EditableField};

#[test]
fn test_delete_surrounding_does_not_split_emoji() {
    let mut model = make_model();
    model.connection().commit_text("a\u{1F600}", 1);
    model.connection().delete_surrounding_text(1, 0);
    assert_eq!(model.field().text(), "a");
    assert_eq!(model.user_text(), "a");
}

#[test]
fn test_delete_in_code_points() {
    let mut model = make_model();
    type_string(&mut model, "日本語");
    model.connection().delete_surrounding_text_in_code_points(2, 0);
    assert_eq!(model.field().text(), "日");
}

#[test]
fn test_invalid_selection_is_refused() {
    let mut model = make_model();
    type_string(&mut model, "abc");
    let before = model.current_state().clone();
    assert!(!model.connection().set_selection(2, 4));
    assert_eq!(model.current_state(), &before);
    assert!(model.connection().set_selection(1, 2));
    assert_eq!(model.field().selection(), 1..2);
}

#[test]
fn test_caps_mode_query() {
    let mut model = make_model();
    let all = CAP_MODE_CHARACTERS | CAP_MODE_WORDS | CAP_MODE_SENTENCES;
    assert_eq!(model.connection().get_cursor_caps_mode(all), all);
    type_string(&mut model, "Hello. ");
    assert_eq!(model.connection().get_cursor_caps_mode(CAP_MODE_SENTENCES), CAP_MODE_SENTENCES);
    type_string(&mut model, "w");
    assert_eq!(model.connection().get_cursor_caps_mode(all), CAP_MODE_CHARACTERS);
}

#[test]
fn test_host_keys_are_not_handled_by_field() {
    let mut model = make_model();
    type_string(&mut model, "ab");
    assert!(!model.connection().send_key_event(KeyEvent::Enter));
    assert!(model.connection().send_key_event(KeyEvent::Char('c')));
    assert_eq!(model.field().text(), "abc");
    assert!(model.last_edit_was_typing());
}

#[test]
fn test_correction_and_completion() {
    let mut model = make_model();
    type_string(&mut model, "teh");
    assert!(model.connection().commit_correction(0, "teh", "the"));
    assert_eq!(model.field().text(), "the");
    assert!(!model.last_edit_was_typing());
    assert!(!model.connection().commit_correction(0, "teh", "the"));

    assert!(model.connection().commit_completion(" end"));
    assert_eq!(model.field().text(), "the end");
}

#[test]
fn test_cursor_updates_and_content_reach_field() {
    let mut model = make_model();
    assert!(model.connection().request_cursor_updates(3));
    assert_eq!(model.field().cursor_update_mode(), Some(3));

    let content = ContentPayload {
        mime_type: "image/gif".to_string(),
        description: "wave".to_string(),
    };
    assert!(model.connection().commit_content(content.clone()));
    assert_eq!(model.field().committed_content(), &[content]);
}

#[test]
fn test_perform_decoded_commands() {
    let mut model = make_model();
    let script = r#"[
        {"op":"begin_batch_edit"},
        {"op":"set_composing_text","text":"he"},
        {"op":"set_composing_text","text":"hey"},
        {"op":"finish_composing_text"},
        {"op":"end_batch_edit"}
    ]"#;
    let commands: Vec<CompositionCommand> = serde_json::from_str(script).unwrap();
    let results: Vec<CommandResult> = commands
        .into_iter()
        .map(|c| model.connection().perform(c))
        .collect();
    assert!(results.iter().take(4).all(|r| r.handled()));
    assert_eq!(model.field().text(), "hey");
    assert_eq!(model.field().composing_region(), None);
    assert_eq!(model.reconciliation_count(), 1);
    assert!(model.last_edit_was_typing());
}
