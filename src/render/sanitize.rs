use ammonia::Builder;

/// The "HTML profile" allow-list applied to parsed markdown.
///
/// Starts from ammonia's defaults (no scripts, styles, event handlers or
/// unsafe URL schemes) and adds what rendered GFM needs: task-list
/// checkboxes, heading anchors, and the `language-*` class on code blocks.
pub fn html_profile() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_tags(["input"])
        .add_tag_attributes("input", ["type", "checked", "disabled"])
        .add_tag_attributes("a", ["id", "class", "aria-hidden"])
        .add_tag_attributes("code", ["class"])
        .add_tag_attributes("sup", ["class"])
        .add_tag_attributes("section", ["class"])
        .add_tags(["section"]);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_strips_style_element() {
        let clean = html_profile()
            .clean("<style>body{display:none}</style><p>ok</p>")
            .to_string();
        assert_eq!(clean, "<p>ok</p>");
    }

    #[test]
    fn test_profile_strips_iframe() {
        let clean = html_profile()
            .clean("<iframe src=\"https://example.com\"></iframe><em>x</em>")
            .to_string();
        assert!(!clean.contains("iframe"), "{clean}");
        assert!(clean.contains("<em>x</em>"));
    }

    #[test]
    fn test_profile_drops_unknown_input_attributes() {
        let clean = html_profile()
            .clean("<input type=\"checkbox\" onclick=\"x()\" disabled=\"\">")
            .to_string();
        assert!(clean.contains("type=\"checkbox\""), "{clean}");
        assert!(!clean.contains("onclick"), "{clean}");
    }

    #[test]
    fn test_profile_keeps_code_class() {
        let clean = html_profile()
            .clean("<pre><code class=\"language-js\">x</code></pre>")
            .to_string();
        assert_eq!(clean, "<pre><code class=\"language-js\">x</code></pre>");
    }
}
