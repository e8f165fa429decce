//! Rope-backed text buffer for the editor pane.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
