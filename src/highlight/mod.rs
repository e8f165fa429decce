//! Syntax highlighting for rendered code blocks.
//!
//! Uses syntect's class-based HTML generator, so colors come from a
//! stylesheet generated for the active theme ([`stylesheet`]). Switching
//! themes swaps the stylesheet without touching the Rendered HTML.

use std::sync::OnceLock;

use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;
use tracing::debug;

use crate::preview::Preview;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("no syntax for language `{0}`")]
    UnknownLanguage(String),
    #[error("could not detect a syntax from the first line")]
    Undetected,
    #[error(transparent)]
    Syntect(#[from] syntect::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

impl HighlightBackground {
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Highlight every code block currently installed on `preview`.
///
/// Labelled blocks use their `language-X` class; unlabelled blocks are
/// detected from their first line (shebang or modeline). Blocks that cannot
/// be resolved, or that fail to highlight, are left as they are; the
/// remaining blocks are still processed. Blocks that were already
/// highlighted are not matched again.
pub fn highlight_code_blocks(preview: &mut Preview) {
    let html = preview.html();
    let mut out = String::with_capacity(html.len() * 2);
    let mut copied_to = 0;
    let mut highlighted_any = false;

    for caps in code_block_pattern().captures_iter(html) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let lang = caps.get(1).map(|m| m.as_str());
        let code = unescape_html(body.as_str());
        let result = match lang {
            Some(lang) => highlight_block(&unescape_html(lang), &code),
            None => highlight_detected(&code),
        };
        match result {
            Ok(spans) => {
                out.push_str(&html[copied_to..whole.start()]);
                out.push_str("<pre class=\"hl-code\">");
                match lang {
                    Some(lang) => {
                        out.push_str("<code class=\"language-");
                        out.push_str(lang);
                        out.push_str("\">");
                    }
                    None => out.push_str("<code>"),
                }
                out.push_str(&spans);
                out.push_str("</code></pre>");
                copied_to = whole.end();
                highlighted_any = true;
            }
            Err(err) => debug!(language = lang.unwrap_or("-"), %err, "code block left unhighlighted"),
        }
    }

    if highlighted_any {
        out.push_str(&html[copied_to..]);
        preview.replace_content(out);
    }
}

/// Highlight `code` as `language`, producing classed `<span>` markup.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownLanguage`] when no syntax matches, or the
/// underlying syntect error if a line fails to parse.
pub fn highlight_block(language: &str, code: &str) -> Result<String, HighlightError> {
    let syntax_set = syntax_set();
    let syntax = syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language))
        .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
    classed_spans(syntax, code)
}

/// Highlight `code` with the syntax its first line announces.
///
/// # Errors
///
/// Returns [`HighlightError::Undetected`] when the first line names no known
/// syntax, or the underlying syntect error if a line fails to parse.
pub fn highlight_detected(code: &str) -> Result<String, HighlightError> {
    let first_line = code.lines().next().unwrap_or_default();
    let syntax = syntax_set()
        .find_syntax_by_first_line(first_line)
        .ok_or(HighlightError::Undetected)?;
    classed_spans(syntax, code)
}

fn classed_spans(syntax: &SyntaxReference, code: &str) -> Result<String, HighlightError> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// CSS coloring highlighted blocks for the given background.
pub fn stylesheet(background: HighlightBackground) -> &'static str {
    static LIGHT: OnceLock<String> = OnceLock::new();
    static DARK: OnceLock<String> = OnceLock::new();
    let cell = match background {
        HighlightBackground::Light => &LIGHT,
        HighlightBackground::Dark => &DARK,
    };
    cell.get_or_init(|| {
        css_for_theme_with_class_style(theme(background), CLASS_STYLE).unwrap_or_else(|err| {
            debug!(%err, "theme stylesheet generation failed");
            String::new()
        })
    })
}

/// Guess the terminal background from `COLORFGBG`.
pub fn detect_background() -> HighlightBackground {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_from_colorfgbg)
        .unwrap_or(HighlightBackground::Dark)
}

/// Background named by a `COLORFGBG` value (`fg;bg` or `fg;default;bg`).
pub fn background_from_colorfgbg(value: &str) -> Option<HighlightBackground> {
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let bg = bg_str.trim().parse::<u8>().ok()?;

    if bg >= 7 {
        Some(HighlightBackground::Light)
    } else {
        Some(HighlightBackground::Dark)
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme(background: HighlightBackground) -> &'static Theme {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    static FALLBACK: OnceLock<Theme> = OnceLock::new();
    let theme_set = THEME_SET.get_or_init(ThemeSet::load_defaults);
    let preferred = match background {
        HighlightBackground::Dark => {
            ["base16-ocean.dark", "base16-eighties.dark", "Solarized (dark)"].as_slice()
        }
        HighlightBackground::Light => {
            ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"].as_slice()
        }
    };

    preferred
        .iter()
        .find_map(|name| theme_set.themes.get(*name))
        .or_else(|| theme_set.themes.values().next())
        .unwrap_or_else(|| FALLBACK.get_or_init(Theme::default))
}

fn code_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<pre><code(?: class="language-([^"\s]+)[^"]*")?>(.*?)</code></pre>"#)
            .expect("code block pattern is valid")
    })
}

fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview_with(html: &str) -> Preview {
        let mut preview = Preview::new();
        preview.install(html.to_string());
        preview
    }

    #[test]
    fn test_highlight_rust_produces_classed_spans() {
        let html = highlight_block("rust", "fn main() {\n    let x = 1;\n}\n").unwrap();
        assert!(html.contains("<span class=\"hl-"), "{html}");
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_unknown_language_is_an_error() {
        let err = highlight_block("nope-lang", "text").unwrap_err();
        assert!(matches!(err, HighlightError::UnknownLanguage(lang) if lang == "nope-lang"));
    }

    #[test]
    fn test_pass_rewrites_labelled_block() {
        let mut preview =
            preview_with("<p>x</p><pre><code class=\"language-rust\">fn main() {}\n</code></pre>");
        highlight_code_blocks(&mut preview);

        let html = preview.html();
        assert!(html.starts_with("<p>x</p><pre class=\"hl-code\">"), "{html}");
        assert!(html.contains("<code class=\"language-rust\"><span"));
        assert!(html.ends_with("</code></pre>"));
    }

    #[test]
    fn test_pass_skips_unknown_language_and_keeps_going() {
        let mut preview = preview_with(concat!(
            "<pre><code class=\"language-rust\">let a = 1;\n</code></pre>",
            "<pre><code class=\"language-klingon\">qapla'\n</code></pre>",
            "<pre><code class=\"language-python\">def f():\n    pass\n</code></pre>",
        ));
        highlight_code_blocks(&mut preview);

        let html = preview.html();
        assert_eq!(html.matches("<pre class=\"hl-code\">").count(), 2, "{html}");
        assert!(
            html.contains("<pre><code class=\"language-klingon\">qapla'\n</code></pre>"),
            "unknown block should be untouched: {html}"
        );
    }

    #[test]
    fn test_pass_is_idempotent() {
        let mut preview =
            preview_with("<pre><code class=\"language-js\">const a = 1;\n</code></pre>");
        highlight_code_blocks(&mut preview);
        let once = preview.html().to_string();
        highlight_code_blocks(&mut preview);
        assert_eq!(preview.html(), once);
    }

    #[test]
    fn test_pass_detects_unlabelled_shebang_block() {
        let mut preview =
            preview_with("<pre><code>#!/usr/bin/env python\nprint(1)\n</code></pre>");
        highlight_code_blocks(&mut preview);

        let html = preview.html();
        assert!(html.starts_with("<pre class=\"hl-code\"><code><span"), "{html}");
        assert!(html.contains("hl-python"), "{html}");
    }

    #[test]
    fn test_pass_leaves_undetectable_unlabelled_block_alone() {
        let source = "<pre><code>plain\n</code></pre>";
        let mut preview = preview_with(source);
        highlight_code_blocks(&mut preview);
        assert_eq!(preview.html(), source);
    }

    #[test]
    fn test_highlight_detected_without_hint_is_an_error() {
        let err = highlight_detected("just words\n").unwrap_err();
        assert!(matches!(err, HighlightError::Undetected));
    }

    #[test]
    fn test_pass_unescapes_before_highlighting() {
        let mut preview =
            preview_with("<pre><code class=\"language-rust\">if a &lt; b &amp;&amp; c {}\n</code></pre>");
        highlight_code_blocks(&mut preview);
        let html = preview.html();
        assert!(!html.contains("&amp;lt;"), "double escaped: {html}");
        assert!(html.contains("&lt;"), "{html}");
    }

    #[test]
    fn test_unescape_handles_amp_last() {
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
        assert_eq!(unescape_html("a &lt;b&gt; &quot;c&quot;"), "a <b> \"c\"");
    }

    #[test]
    fn test_stylesheets_differ_by_background() {
        let light = stylesheet(HighlightBackground::Light);
        let dark = stylesheet(HighlightBackground::Dark);
        assert!(light.contains(".hl-"), "{light}");
        assert_ne!(light, dark);
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        assert_eq!(background_from_colorfgbg("15;0"), Some(HighlightBackground::Dark));
    }

    #[test]
    fn test_colorfgbg_light_background() {
        assert_eq!(background_from_colorfgbg("0;15"), Some(HighlightBackground::Light));
    }

    #[test]
    fn test_colorfgbg_unparseable_is_none() {
        assert_eq!(background_from_colorfgbg("default"), None);
        assert_eq!(background_from_colorfgbg(""), None);
    }

    #[test]
    fn test_toggled_flips_background() {
        assert_eq!(HighlightBackground::Light.toggled(), HighlightBackground::Dark);
        assert!(HighlightBackground::Light.toggled().is_dark());
    }
}
