//! Plain-text snippet derivation for memo listings.
//!
//! # Responsibility
//! - Reduce memo content to a short, markup-free excerpt.
//!
//! # Invariants
//! - Snippets are at most 64 characters of text plus a `...` marker.
//! - Structurally broken content fails instead of producing a partial
//!   snippet.

use crate::markup::parser::{parse, Node, ParseError};
use crate::markup::tokenizer::tokenize;
use once_cell::sync::Lazy;
use regex::Regex;

const SNIPPET_MAX_CHARS: usize = 64;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static INLINE_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_`~]+").expect("valid inline symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Computes the short plain-text excerpt attached to full memo views.
///
/// Parses the content first, so malformed markup surfaces as a
/// [`ParseError`] rather than leaking into the excerpt.
pub fn memo_snippet(content: &str) -> Result<String, ParseError> {
    let nodes = parse(&tokenize(content))?;

    let mut pieces: Vec<&str> = Vec::new();
    for node in &nodes {
        match node {
            Node::Heading { text, .. }
            | Node::TaskItem { text, .. }
            | Node::Blockquote { text }
            | Node::Paragraph { text } => pieces.push(text),
            Node::CodeBlock { content, .. } => pieces.push(content),
        }
    }

    let joined = pieces.join(" ");
    let without_images = MARKDOWN_IMAGE_RE.replace_all(&joined, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = INLINE_SYMBOL_RE.replace_all(&without_links, "");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();

    let mut snippet: String = trimmed.chars().take(SNIPPET_MAX_CHARS).collect();
    if trimmed.chars().count() > SNIPPET_MAX_CHARS {
        snippet.push_str("...");
    }

    Ok(snippet)
}

#[cfg(test)]
mod tests {
    use super::memo_snippet;
    use crate::markup::parser::ParseError;

    #[test]
    fn strips_markup_and_joins_blocks() {
        let snippet = memo_snippet("# Plan\n\nread the **draft** at [site](https://a.b)").unwrap();
        assert_eq!(snippet, "Plan read the draft at site");
    }

    #[test]
    fn truncates_long_content_with_marker() {
        let content = "word ".repeat(40);
        let snippet = memo_snippet(&content).unwrap();
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 64 + 3);
    }

    #[test]
    fn short_content_has_no_marker() {
        assert_eq!(memo_snippet("just enough").unwrap(), "just enough");
    }

    #[test]
    fn malformed_content_fails() {
        let err = memo_snippet("```\nno closing fence").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedCodeBlock { .. }));
    }
}
