//! Terminal UI components.
//!
//! The screen is split into the editor pane (Document Text) on the left and
//! the preview pane (Rendered HTML) on the right, with one footer row that
//! shows the status bar, a toast, or the open-file prompt.

mod render;
mod status;

pub use render::{html_line_spans, line_number_width, render, split_panes};

pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;

#[cfg(test)]
mod tests;
