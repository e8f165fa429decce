//! The display surface for Rendered HTML.
//!
//! [`Preview`] owns the HTML installed by the most recent render cycle. It can
//! also be serialized into a standalone page so a browser can act as the
//! display (see [`Preview::page`]).

use std::fs;
use std::io;
use std::path::Path;

/// Seconds between browser reloads of a mirrored page.
const PAGE_REFRESH_SECS: u32 = 1;

const PAGE_BASE_CSS: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Helvetica,Arial,sans-serif;\
max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.6;color:#1f2328;background:#ffffff;}\
body.dark{color:#e6edf3;background:#0d1117;}\
a.anchor{display:none;}\
pre{padding:1rem;overflow:auto;border-radius:6px;background:#f6f8fa;}\
body.dark pre{background:#161b22;}\
table{border-collapse:collapse;}th,td{border:1px solid #d0d7de;padding:.3rem .8rem;}\
blockquote{margin:0;padding:0 1rem;color:#59636e;border-left:.25rem solid #d0d7de;}";

/// In-memory display surface holding the current Rendered HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    html: String,
    dark: bool,
    revision: u64,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed HTML wholesale with a new render result.
    pub fn install(&mut self, html: String) {
        self.html = html;
        self.revision += 1;
    }

    /// Rewrite the installed HTML in place (post-processing of the same cycle).
    pub(crate) fn replace_content(&mut self, html: String) {
        self.html = html;
    }

    /// The currently displayed HTML.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// How many times HTML has been installed.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn is_dark(&self) -> bool {
        self.dark
    }

    pub const fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }

    /// Wrap the installed HTML into a standalone page using `stylesheet` for
    /// code highlighting.
    pub fn page(&self, stylesheet: &str) -> String {
        let body_class = if self.dark { " class=\"dark\"" } else { "" };
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <meta http-equiv=\"refresh\" content=\"{PAGE_REFRESH_SECS}\">\n\
             <title>gitmd preview</title>\n<style>\n{PAGE_BASE_CSS}\n{stylesheet}\n</style>\n\
             </head>\n<body{body_class}>\n{}\n</body>\n</html>\n",
            self.html
        )
    }

    /// Write [`Preview::page`] to `path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_page(&self, path: &Path, stylesheet: &str) -> io::Result<()> {
        fs::write(path, self.page(stylesheet))
    }
}
