//! Replayable interaction scripts.
//!
//! A script is a JSON array of steps, each tagged by `"step"`. Protocol
//! commands use the same `"op"`-tagged form `CompositionCommand` decodes:
//!
//! ```json
//! [
//!   {"step": "ime", "command": {"op": "commit_text", "text": "g"}},
//!   {"step": "suggest", "user_text": "g", "suggestion": "oogle.com"},
//!   {"step": "key", "key": "tab"}
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ac_core::{EditState, KeyEvent, SettingsError};
use ac_session::{
    CommandResult, CompositionCommand, EditableField, KeyResponse, Notification, OverlayModel,
};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("script parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// One composition protocol command.
    Ime { command: CompositionCommand },
    /// The suggestion source answers for `user_text`.
    Suggest {
        user_text: String,
        #[serde(default)]
        suggestion: Option<String>,
        #[serde(default)]
        additional: Option<String>,
    },
    Commit,
    /// Host key press, offered to the overlay.
    Key { key: KeyEvent },
    Paste { text: String },
    Replace { text: String },
    Select { start: usize, end: usize },
    Focus { focused: bool },
    Sync,
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Self::Ime { command } => {
                let op = serde_json::to_value(command)
                    .ok()
                    .and_then(|v| v.get("op").and_then(|op| op.as_str()).map(str::to_string))
                    .unwrap_or_default();
                format!("ime {op}")
            }
            Self::Suggest { user_text, .. } => format!("suggest {user_text:?}"),
            Self::Commit => "commit".to_string(),
            Self::Key { key } => format!("key {key:?}"),
            Self::Paste { text } => format!("paste {text:?}"),
            Self::Replace { text } => format!("replace {text:?}"),
            Self::Select { start, end } => format!("select {start}..{end}"),
            Self::Focus { focused } => format!("focus {focused}"),
            Self::Sync => "sync".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Command { result: CommandResult },
    Applied { ok: bool },
    Key { response: KeyResponse },
    Done,
}

/// Model state after one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub outcome: Outcome,
    pub display: String,
    pub user_text: String,
    pub suggestion: Option<String>,
    pub selection: (usize, usize),
    pub should_request: bool,
    pub notifications: Vec<Notification>,
}

pub fn parse_script(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let content = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(&content)
}

fn apply_step<F: EditableField>(model: &mut OverlayModel<F>, step: &Step) -> Outcome {
    match step {
        Step::Ime { command } => Outcome::Command {
            result: model.connection().perform(command.clone()),
        },
        Step::Suggest {
            user_text,
            suggestion,
            additional,
        } => Outcome::Applied {
            ok: model.set_suggestion(user_text, suggestion.as_deref(), additional.as_deref()),
        },
        Step::Commit => Outcome::Applied {
            ok: model.commit_suggestion(),
        },
        Step::Key { key } => Outcome::Key {
            response: model.on_key_event(*key),
        },
        Step::Paste { text } => {
            model.paste(text);
            Outcome::Done
        }
        Step::Replace { text } => {
            model.on_external_text_replace(text);
            Outcome::Done
        }
        Step::Select { start, end } => {
            model.on_selection_changed(*start, *end);
            Outcome::Done
        }
        Step::Focus { focused } => {
            model.on_focus_changed(*focused);
            Outcome::Done
        }
        Step::Sync => {
            model.on_protocol_state_synced();
            Outcome::Done
        }
    }
}

/// Runs every step against `model`, reporting the state after each.
pub fn run_script<F: EditableField>(model: &mut OverlayModel<F>, steps: &[Step]) -> Vec<StepReport> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let outcome = apply_step(model, step);
            let state = model.current_state();
            debug!(index, step = %step.label(), display = %render_state(state), "step");
            StepReport {
                index,
                step: step.clone(),
                outcome,
                display: render_state(state),
                user_text: state.user_text().to_string(),
                suggestion: state.suggestion_text().map(str::to_string),
                selection: (state.sel_start(), state.sel_end()),
                should_request: model.should_request_suggestions(),
                notifications: model.take_notifications(),
            }
        })
        .collect()
}

/// Text with the caret as `|`, a selection as `{…}` and the suggestion as
/// `[…]`.
pub fn render_state(state: &EditState) -> String {
    let text = state.text();
    let user_len = state.user_text().len();
    let collapsed = state.is_selection_collapsed();
    let markers = |p: usize, out: &mut String| {
        if state.has_suggestion() && p == text.len() {
            out.push(']');
        }
        if !collapsed && p == state.sel_end() {
            out.push('}');
        }
        if p == state.sel_start() {
            out.push(if collapsed { '|' } else { '{' });
        }
        if state.has_suggestion() && p == user_len {
            out.push('[');
        }
    };
    let mut out = String::with_capacity(text.len() + 4);
    for (i, c) in text.char_indices() {
        markers(i, &mut out);
        out.push(c);
    }
    markers(text.len(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::Settings;
    use ac_session::{EditKind, FieldBuffer};

    const SCRIPT: &str = r#"[
        {"step": "ime", "command": {"op": "commit_text", "text": "g"}},
        {"step": "ime", "command": {"op": "commit_text", "text": "o"}},
        {"step": "suggest", "user_text": "g", "suggestion": "oogle.com"},
        {"step": "suggest", "user_text": "go", "suggestion": "ogle.com", "additional": "google.com"},
        {"step": "key", "key": "tab"}
    ]"#;

    fn model() -> OverlayModel<FieldBuffer> {
        OverlayModel::new(FieldBuffer::new(), Settings::default())
    }

    #[test]
    fn replays_typing_suggest_and_accept() {
        let steps = parse_script(SCRIPT).unwrap();
        let mut model = model();
        let reports = run_script(&mut model, &steps);
        assert_eq!(reports.len(), 5);

        assert!(reports[1].should_request);
        assert_eq!(reports[2].outcome, Outcome::Applied { ok: false });
        assert_eq!(reports[3].outcome, Outcome::Applied { ok: true });
        assert_eq!(reports[3].display, "go|[ogle.com]");
        assert_eq!(reports[3].suggestion.as_deref(), Some("ogle.com"));

        let Outcome::Key { response } = reports[4].outcome else {
            panic!("expected key outcome");
        };
        assert!(response.consumed && response.accepted);
        assert_eq!(reports[4].display, "google.com|");
        assert!(reports[4].notifications.iter().any(|n| matches!(
            n,
            Notification::SuggestionStateChanged { edit: EditKind::Commit, .. }
        )));
    }

    #[test]
    fn unknown_step_is_rejected() {
        let err = parse_script(r#"[{"step": "warp"}]"#).unwrap_err();
        assert!(matches!(err, ScriptError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_script(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }

    #[test]
    fn render_marks_selection() {
        let state = EditState::new("hello", None, 1, 3);
        assert_eq!(render_state(&state), "h{el}lo");
        let state = EditState::new("hé", Some("llo"), 3, 3);
        assert_eq!(render_state(&state), "hé|[llo]");
    }

    #[test]
    fn labels_name_protocol_ops() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps[0].label(), "ime commit_text");
        assert_eq!(steps[4].label(), "key Tab");
    }
}
