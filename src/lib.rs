// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # gitmd
//!
//! A terminal markdown editor with a live, sanitized HTML preview.
//!
//! gitmd keeps the preview in step with the text while you type:
//! - GitHub-Flavored Markdown rendered by comrak
//! - An allow-list sanitizer, so the preview never carries scripts
//! - Classed syntax highlighting for labelled code blocks
//! - Auto-save of the text into a single snapshot slot
//!
//! ## Architecture
//!
//! gitmd uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: State transitions
//! - **View**: Render to terminal
//!
//! Text changes never render directly. They request a render from the
//! [`scheduler`], which runs at most one render+persist cycle per frame
//! using whatever the text is when the frame comes.
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: The text buffer being edited
//! - [`render`]: Markdown to sanitized HTML
//! - [`highlight`]: Syntax highlighting of rendered code blocks
//! - [`preview`]: The HTML display surface
//! - [`scheduler`]: Frame-paced, single-slot render scheduling
//! - [`store`]: Snapshot persistence
//! - [`config`]: Saved defaults and platform paths
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod preview;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::render::MarkdownRenderer;
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore, Persistence};
}
