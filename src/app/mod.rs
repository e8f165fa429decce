//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Every text change goes through [`Model::request_render`]; the loop ticks
//! the model once per turn so at most one render cycle runs per frame.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{COPY_FEEDBACK_MS, Model, NOTICE_MS, SAVE_FEEDBACK_MS, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::highlight::{self, HighlightBackground};
use crate::render::MarkdownRenderer;
use crate::scheduler::DEFAULT_FRAME_MS;
use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    ephemeral: bool,
    page_output: Option<PathBuf>,
    background: HighlightBackground,
    frame_ms: u64,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application that restores the last session.
    pub const fn new() -> Self {
        Self {
            file_path: None,
            store_path: None,
            ephemeral: false,
            page_output: None,
            background: HighlightBackground::Light,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }

    /// Open this file at startup instead of the saved snapshot.
    #[must_use]
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Persist the snapshot into this JSON file.
    #[must_use]
    pub fn with_store_path(mut self, path: Option<PathBuf>) -> Self {
        self.store_path = path;
        self
    }

    /// Keep the snapshot in memory only.
    #[must_use]
    pub const fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Mirror the preview into a standalone HTML page.
    #[must_use]
    pub fn with_page_output(mut self, path: Option<PathBuf>) -> Self {
        self.page_output = path;
        self
    }

    #[must_use]
    pub const fn with_background(mut self, background: HighlightBackground) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub const fn with_frame_ms(mut self, frame_ms: u64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    fn open_store(&self) -> Result<Box<dyn KeyValueStore>, StoreError> {
        if self.ephemeral {
            return Ok(Box::new(MemoryStore::new()));
        }
        let Some(path) = self.store_path.as_deref() else {
            return Ok(Box::new(MemoryStore::new()));
        };
        let store = FileStore::open(path)?;
        info!(path = %path.display(), "opened snapshot store");
        Ok(Box::new(store))
    }

    /// Build the startup model and schedule its first render.
    ///
    /// An unusable store file degrades to an in-memory store with a warning
    /// toast; editing still works.
    pub(crate) fn build_model(&self, size: (u16, u16)) -> Model {
        let (store, store_failed): (Box<dyn KeyValueStore>, bool) = match self.open_store() {
            Ok(store) => (store, false),
            Err(err) => {
                warn!(%err, "snapshot store unavailable; changes will not outlive this session");
                (Box::new(MemoryStore::new()), true)
            }
        };
        let mut model = Model::restore(store, size)
            .with_frame_ms(self.frame_ms)
            .with_background(self.background)
            .with_page_output(self.page_output.clone());

        if store_failed {
            model.show_toast(
                ToastLevel::Warning,
                "Snapshot store unavailable; not saving",
                NOTICE_MS,
            );
        }
        if let Some(path) = self.file_path.as_deref()
            && let Err(err) = model.load_file(path)
        {
            warn!(path = %path.display(), "{err:#}");
            model.show_toast(ToastLevel::Error, format!("Open failed: {err}"), NOTICE_MS);
        }
        model.request_render();
        model
    }
}

/// Render `source` once into a standalone page.
///
/// # Errors
///
/// Returns an error if the renderer fails.
pub fn export_html(source: &str, background: HighlightBackground) -> Result<String> {
    let mut preview = crate::preview::Preview::new();
    preview.set_dark(background.is_dark());
    preview.install(MarkdownRenderer::default().render(source)?);
    highlight::highlight_code_blocks(&mut preview);
    Ok(preview.page(highlight::stylesheet(background)))
}
