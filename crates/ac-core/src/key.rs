use serde::{Deserialize, Serialize};

/// Key vocabulary shared by the composition protocol and host key handling.
///
/// Unit variants deserialize from snake_case strings (`"tab"`,
/// `"arrow_right"`), which is how the settings file names keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEvent {
    Backspace,
    ForwardDelete,
    Enter,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Char(char),
}

impl KeyEvent {
    /// Keys that produce or remove text when applied to a field.
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            Self::Backspace | Self::ForwardDelete | Self::Char(_)
        )
    }
}
