//! Construction-time configuration: grid dimensions and the initial value
//! of every mode flag in [`crate::terminal::Terminal`]. This is the core's
//! only configurable surface; a host embedding it merges a user-supplied
//! partial fragment over [`TerminalConfig::default`] using ordinary serde
//! deserialization, the same pattern the donor workspace's own
//! configuration crate uses for its own per-field defaults.

use serde::{Deserialize, Serialize};

fn default_cols() -> u16 {
    80
}

fn default_rows() -> u16 {
    24
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Initial dimensions and mode flags for a new [`crate::terminal::Terminal`].
/// Fields not present in a partial fragment fall back to these defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default = "default_cols")]
    pub cols: u16,
    #[serde(default = "default_rows")]
    pub rows: u16,
    #[serde(default = "default_true")]
    pub wraparound: bool,
    #[serde(default = "default_true")]
    pub cursor_visible: bool,
    #[serde(default = "default_false")]
    pub insert_mode: bool,
    #[serde(default = "default_false")]
    pub application_keypad_mode: bool,
    #[serde(default = "default_false")]
    pub application_cursor_mode: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            wraparound: default_true(),
            cursor_visible: default_true(),
            insert_mode: default_false(),
            application_keypad_mode: default_false(),
            application_cursor_mode: default_false(),
        }
    }
}
