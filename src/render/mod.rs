//! Markdown to sanitized HTML.
//!
//! Rendering is two injected stages run in order:
//! - a parse function turning Document Text into raw HTML
//! - a sanitize function restricting that HTML to an allow-list profile
//!
//! [`MarkdownRenderer::default`] wires in comrak (GitHub-Flavored Markdown)
//! and ammonia (see [`html_profile`]).

mod sample;
mod sanitize;

use std::fmt;

use comrak::{Options, markdown_to_html};
use thiserror::Error;

pub use sample::SAMPLE;
pub use sanitize::html_profile;

/// Failure of one of the renderer's injected stages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("markdown parse failed: {0}")]
    Parse(String),
    #[error("html sanitize failed: {0}")]
    Sanitize(String),
}

type Stage = Box<dyn Fn(&str) -> Result<String, RenderError>>;

/// Pure transform from Document Text to HTML that is safe to display as-is.
pub struct MarkdownRenderer {
    parse: Stage,
    sanitize: Stage,
}

impl MarkdownRenderer {
    /// Build a renderer from a parse stage and a sanitize stage.
    pub fn new<P, S>(parse: P, sanitize: S) -> Self
    where
        P: Fn(&str) -> Result<String, RenderError> + 'static,
        S: Fn(&str) -> Result<String, RenderError> + 'static,
    {
        Self {
            parse: Box::new(parse),
            sanitize: Box::new(sanitize),
        }
    }

    /// Render `text` to sanitized HTML.
    ///
    /// An empty string is an empty document and renders to an empty string.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the parse or sanitize stage.
    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        let raw = (self.parse)(text)?;
        (self.sanitize)(&raw)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        let profile = html_profile();
        Self::new(
            |text| Ok(parse_gfm(text)),
            move |html| Ok(profile.clean(html).to_string()),
        )
    }
}

impl fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownRenderer").finish_non_exhaustive()
    }
}

/// Parse GitHub-Flavored Markdown into unsanitized HTML.
///
/// Soft line breaks become `<br />`, headings get anchor ids, and raw HTML is
/// passed through untouched so the sanitizer decides what survives.
pub fn parse_gfm(text: &str) -> String {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.shortcodes = true;
    options.extension.header_ids = Some(String::new());

    options.render.hardbreaks = true;
    options.render.unsafe_ = true;

    markdown_to_html(text, &options)
}
