// Markdown segmentation for the documentation pages.
// Separates fenced code blocks from prose and renders prose to simple HTML.

use std::sync::LazyLock;

use regex::Regex;

/// Language assumed for fences without one.
pub const DEFAULT_CODE_LANG: &str = "javascript";

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(\w+)?\n([\s\S]*?)```").expect("fence pattern")
});

/// Ordered prose rewrites. Headings run deepest first so `###` is not taken for `#`.
static INLINE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?m)^### (.*)$", "<h3>$1</h3>"),
        (r"(?m)^## (.*)$", "<h2>$1</h2>"),
        (r"(?m)^# (.*)$", "<h1>$1</h1>"),
        (r"\*\*(.*?)\*\*", "<strong>$1</strong>"),
        (r"\*(.*?)\*", "<em>$1</em>"),
        (r"`([^`]+)`", "<code>$1</code>"),
        (
            r"\[([^\]]+)\]\(([^)]+)\)",
            r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
        ),
        (r"(?m)^\* (.*)$", "<li>$1</li>"),
        (r"(?m)^- (.*)$", "<li>$1</li>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("inline pattern"), replacement)
    })
    .collect()
});

/// A run of Markdown: prose, or one fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose { text: String },
    Code { lang: String, code: String },
}

/// Split Markdown into prose and fenced code segments, in document order.
///
/// Whitespace-only prose between blocks is dropped. Code is trimmed.
pub fn split_segments(markdown: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCE.captures_iter(markdown) {
        let Some(whole) = caps.get(0) else { continue };

        push_prose(&mut segments, &markdown[last..whole.start()]);
        segments.push(Segment::Code {
            lang: caps
                .get(1)
                .map_or(DEFAULT_CODE_LANG, |m| m.as_str())
                .to_string(),
            code: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        });

        last = whole.end();
    }

    push_prose(&mut segments, &markdown[last..]);
    segments
}

fn push_prose(segments: &mut Vec<Segment>, text: &str) {
    if !text.trim().is_empty() {
        segments.push(Segment::Prose {
            text: text.to_string(),
        });
    }
}

/// Render a prose segment to HTML.
///
/// Covers headings, emphasis, inline code, links and list items. Blocks
/// separated by a blank line become paragraphs unless they already hold a
/// heading or list item. Input is trusted repository content and is not escaped.
pub fn render_prose(text: &str) -> String {
    let html = INLINE_RULES
        .iter()
        .fold(text.to_string(), |html, (rule, replacement)| {
            rule.replace_all(&html, *replacement).into_owned()
        });

    html.split("\n\n")
        .map(|block| {
            if block.contains("<h") || block.contains("<li") {
                block.to_string()
            } else {
                format!("<p>{}</p>", block)
            }
        })
        .collect()
}
