pub mod config;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod terminal;

pub use config::TerminalConfig;
pub use encoder::{encode_key, Key, KeyEvent, KeypadKey, Modifiers};
pub use error::{VtError, VtResult};
pub use grid::{Cell, CharsetTag, Color, Grid, GridSize, GridSnapshot, Rendition};
pub use terminal::{Terminal, TerminalEvent};
