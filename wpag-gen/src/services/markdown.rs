//! Markdown → HTML rendering for post bodies
//!
//! Fenced code blocks get Prism-compatible classes
//! (`<pre class="language-x line-numbers"><code class="language-x">`).

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Render Markdown to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            let lang = match &kind {
                CodeBlockKind::Fenced(info) => sanitize_language(info),
                CodeBlockKind::Indented => String::new(),
            };
            let open = if lang.is_empty() {
                "<pre class=\"line-numbers\"><code>".to_string()
            } else {
                format!(
                    "<pre class=\"language-{lang} line-numbers\"><code class=\"language-{lang}\">"
                )
            };
            Event::Html(CowStr::from(open))
        }
        Event::End(TagEnd::CodeBlock) => Event::Html(CowStr::from("</code></pre>\n")),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// First word of a fence info string, restricted to class-safe characters
fn sanitize_language(info: &str) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect()
}

/// Extract an article title from generated Markdown
///
/// Uses the first non-empty line with heading markers stripped, falling
/// back to `fallback` when the text has no usable line.
pub fn extract_title(markdown: &str, fallback: &str) -> String {
    markdown
        .lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.trim().to_string())
}

/// Drop the first line when it is the title, so the body does not repeat it
pub fn strip_title_line(markdown: &str, title: &str) -> String {
    let mut lines = markdown.lines().skip_while(|l| l.trim().is_empty());
    match lines.next() {
        Some(first) if first.trim().trim_start_matches('#').trim() == title => {
            lines.collect::<Vec<_>>().join("\n").trim_start().to_string()
        }
        _ => markdown.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let html = markdown_to_html("## 概要\n\n本文です。");
        assert!(html.contains("<h2>概要</h2>"));
        assert!(html.contains("<p>本文です。</p>"));
    }

    #[test]
    fn test_fenced_code_gets_prism_classes() {
        let html = markdown_to_html("```python\nprint(\"<hi>\")\n```\n");
        assert!(html.contains(
            "<pre class=\"language-python line-numbers\"><code class=\"language-python\">"
        ));
        assert!(html.contains("&lt;hi&gt;"));
        assert!(html.contains("</code></pre>"));
    }

    #[test]
    fn test_fence_without_language() {
        let html = markdown_to_html("```\nplain\n```\n");
        assert!(html.contains("<pre class=\"line-numbers\"><code>"));
    }

    #[test]
    fn test_language_is_sanitized() {
        assert_eq!(sanitize_language("js\" onload=\"x"), "js");
        assert_eq!(sanitize_language("c++ {.numberLines}"), "c++");
    }

    #[test]
    fn test_lists() {
        let html = markdown_to_html("- a\n- b\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>a</li>"));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("\n# Hooks入門\n\n本文", "fallback"), "Hooks入門");
        assert_eq!(extract_title("Plain title\nbody", "fallback"), "Plain title");
        assert_eq!(extract_title("   \n\n", " fallback "), "fallback");
    }

    #[test]
    fn test_strip_title_line() {
        let md = "# Title\n\nBody text";
        assert_eq!(strip_title_line(md, "Title"), "Body text");
        assert_eq!(strip_title_line("Other\nBody", "Title"), "Other\nBody");
    }
}
