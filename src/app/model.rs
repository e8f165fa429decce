use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::editor::EditorBuffer;
use crate::highlight::{self, HighlightBackground};
use crate::preview::Preview;
use crate::render::{MarkdownRenderer, SAMPLE};
use crate::scheduler::{DEFAULT_FRAME_MS, RenderScheduler};
use crate::store::{KeyValueStore, Persistence};

/// How long "Copied!" / "Failed" feedback stays up.
pub const COPY_FEEDBACK_MS: u64 = 1_500;
/// How long "Saved" feedback stays up.
pub const SAVE_FEEDBACK_MS: u64 = 900;
/// Default lifetime of other notices.
pub const NOTICE_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_ms: u64,
}

/// The complete application state.
///
/// The editor buffer owns the Document Text; the preview owns the Rendered
/// HTML. Everything that changes the text funnels into
/// [`Model::request_render`], and [`Model::tick`] runs the due render cycle.
pub struct Model {
    /// Editing surface (owner of the Document Text)
    pub editor: EditorBuffer,
    /// Display surface (owner of the Rendered HTML)
    pub preview: Preview,
    /// File the text was last loaded from, for the status bar
    pub file_path: Option<PathBuf>,
    /// Standalone page mirrored after each cycle
    pub page_output: Option<PathBuf>,
    /// First visible editor line
    pub editor_scroll: usize,
    /// First visible preview line
    pub preview_scroll: usize,
    /// Terminal size (width, height)
    pub size: (u16, u16),
    /// Open-file prompt input, when the prompt is showing
    pub prompt: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    renderer: MarkdownRenderer,
    persistence: Persistence<Box<dyn KeyValueStore>>,
    scheduler: RenderScheduler,
    background: HighlightBackground,
    now_ms: u64,
    cycles: u64,
    render_failures: u64,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model editing `text`, persisting into `store`.
    pub fn new(text: &str, store: Box<dyn KeyValueStore>, size: (u16, u16)) -> Self {
        Self::from_parts(text, Persistence::new(store), size)
    }

    /// Create a model from the saved snapshot, or the sample document when
    /// there is none (or it is empty).
    pub fn restore(store: Box<dyn KeyValueStore>, size: (u16, u16)) -> Self {
        let persistence = Persistence::new(store);
        let text = persistence
            .restore()
            .filter(|snapshot| !snapshot.is_empty())
            .unwrap_or_else(|| SAMPLE.to_string());
        Self::from_parts(&text, persistence, size)
    }

    fn from_parts(
        text: &str,
        persistence: Persistence<Box<dyn KeyValueStore>>,
        size: (u16, u16),
    ) -> Self {
        Self {
            editor: EditorBuffer::from_text(text),
            preview: Preview::new(),
            file_path: None,
            page_output: None,
            editor_scroll: 0,
            preview_scroll: 0,
            size,
            prompt: None,
            should_quit: false,
            renderer: MarkdownRenderer::default(),
            persistence,
            scheduler: RenderScheduler::new(DEFAULT_FRAME_MS),
            background: HighlightBackground::Light,
            now_ms: 0,
            cycles: 0,
            render_failures: 0,
            toast: None,
        }
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_frame_ms(mut self, frame_ms: u64) -> Self {
        self.scheduler = RenderScheduler::new(frame_ms);
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: HighlightBackground) -> Self {
        self.background = background;
        self.preview.set_dark(background.is_dark());
        self
    }

    #[must_use]
    pub fn with_page_output(mut self, path: Option<PathBuf>) -> Self {
        self.page_output = path;
        self
    }

    /// Advance the model clock. The event loop calls this every turn.
    pub const fn set_clock(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Ask for a render+persist cycle at the next frame, replacing any
    /// cycle that is still pending.
    pub fn request_render(&mut self) {
        let token = self.scheduler.request_render(self.now_ms);
        debug!(token = token.id(), due_ms = token.due_ms(), "render requested");
    }

    /// Advance the clock and run the pending cycle if its frame has come.
    /// Returns `true` when anything visible changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.set_clock(now_ms);
        let expired = self.expire_toast(now_ms);
        if self.scheduler.take_due(now_ms).is_some() {
            self.run_render_cycle();
            return true;
        }
        expired
    }

    /// Run a pending cycle immediately, regardless of the frame clock.
    pub fn flush_pending_render(&mut self) {
        if self.scheduler.cancel().is_some() {
            self.run_render_cycle();
        }
    }

    /// Milliseconds until the model needs another [`Model::tick`].
    pub fn time_until_next_tick(&self) -> Option<u64> {
        let render = self.scheduler.time_until_due(self.now_ms);
        let toast = self
            .toast
            .as_ref()
            .map(|toast| toast.expires_ms.saturating_sub(self.now_ms));
        match (render, toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub const fn render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// One render cycle: render the current text, install it, highlight it,
    /// mirror it, then save the text. A render failure leaves the previous
    /// preview in place but never skips the save.
    pub fn run_render_cycle(&mut self) {
        let started = Instant::now();
        let text = self.editor.text();
        self.cycles += 1;

        match self.renderer.render(&text) {
            Ok(html) => {
                self.preview.install(html);
                highlight::highlight_code_blocks(&mut self.preview);
                self.preview_scroll = self.preview_scroll.min(self.max_preview_scroll());
                self.write_page_output();
            }
            Err(err) => {
                self.render_failures += 1;
                warn!(%err, "render failed; preview not updated");
            }
        }

        self.persistence.save(&text);
        debug!(
            cycle = self.cycles,
            bytes = text.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "render cycle complete"
        );
    }

    /// Last scrollable preview line.
    pub fn max_preview_scroll(&self) -> usize {
        self.preview.html().lines().count().saturating_sub(1)
    }

    /// Number of render cycles executed so far.
    pub const fn render_cycles(&self) -> u64 {
        self.cycles
    }

    pub const fn render_failures(&self) -> u64 {
        self.render_failures
    }

    /// Replace the Document Text wholesale and request a render.
    pub fn load_text(&mut self, text: &str) {
        self.editor.set_text(text);
        self.editor_scroll = 0;
        self.preview_scroll = 0;
        self.request_render();
    }

    /// Read `path` as text (invalid UTF-8 replaced) and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.load_text(&String::from_utf8_lossy(&bytes));
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save the current text right away. Returns whether the write landed.
    pub fn save_now(&mut self) -> bool {
        self.persistence.save(&self.editor.text())
    }

    /// The saved snapshot as the store currently holds it.
    pub fn saved_snapshot(&self) -> Option<String> {
        self.persistence.restore()
    }

    pub const fn background(&self) -> HighlightBackground {
        self.background
    }

    /// Switch light/dark. Only the stylesheet and the preview's root class
    /// change; the Rendered HTML stays as it is.
    pub fn toggle_theme(&mut self) {
        self.background = self.background.toggled();
        self.preview.set_dark(self.background.is_dark());
        self.write_page_output();
    }

    pub fn stylesheet(&self) -> &'static str {
        highlight::stylesheet(self.background)
    }

    fn write_page_output(&self) {
        let Some(path) = self.page_output.as_deref() else {
            return;
        };
        if let Err(err) = self.preview.write_page(path, self.stylesheet()) {
            warn!(%err, path = %path.display(), "failed to write preview page");
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>, duration_ms: u64) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_ms: self.now_ms.saturating_add(duration_ms),
        });
    }

    pub(super) fn expire_toast(&mut self, now_ms: u64) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_ms <= now_ms)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Visible rows of the editor and preview panes.
    pub const fn pane_height(&self) -> usize {
        // Pane borders plus the status bar.
        self.size.1.saturating_sub(3) as usize
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("editor", &self.editor)
            .field("file_path", &self.file_path)
            .field("background", &self.background)
            .field("cycles", &self.cycles)
            .field("render_pending", &self.scheduler.is_pending())
            .finish_non_exhaustive()
    }
}
