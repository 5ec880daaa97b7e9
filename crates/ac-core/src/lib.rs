pub mod edit_state;
pub mod key;
pub mod settings;
pub mod unicode;

pub use edit_state::EditState;
pub use key::KeyEvent;
pub use settings::{Settings, SettingsError};
