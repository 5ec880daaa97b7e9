mod keys;
mod overlay;
mod protocol;

use ac_core::Settings;

use super::{EditKind, FieldBuffer, Notification, OverlayModel};

pub(super) fn make_model() -> OverlayModel<FieldBuffer> {
    OverlayModel::new(FieldBuffer::new(), Settings::default())
}

// Helper: simulate the protocol committing a string one character at a time
pub(super) fn type_string(model: &mut OverlayModel<FieldBuffer>, s: &str) {
    for ch in s.chars() {
        model.connection().commit_text(&ch.to_string(), 1);
    }
}

/// Model with `user` typed and `suggestion` pushed for it. Notifications
/// are drained.
pub(super) fn model_showing(user: &str, suggestion: &str) -> OverlayModel<FieldBuffer> {
    let mut model = make_model();
    type_string(&mut model, user);
    assert!(model.set_suggestion(user, Some(suggestion), None));
    model.take_notifications();
    model
}

pub(super) fn text_changes(notes: &[Notification]) -> usize {
    notes
        .iter()
        .filter(|n| matches!(n, Notification::TextChanged(_)))
        .count()
}

pub(super) fn suggestion_updates(notes: &[Notification]) -> Vec<(String, EditKind)> {
    notes
        .iter()
        .filter_map(|n| match n {
            Notification::SuggestionStateChanged { user_text, edit } => {
                Some((user_text.clone(), *edit))
            }
            _ => None,
        })
        .collect()
}
