//! Payload derivation from memo content.
//!
//! # Responsibility
//! - Recompute the content-derived payload parts (tags, property flags)
//!   whenever memo content is written.
//!
//! # Invariants
//! - Tags keep first-seen order and casing; duplicates are dropped.
//! - Text inside code blocks never contributes tags or link flags.

use crate::markup::parser::{parse, Node, ParseError};
use crate::markup::tokenizer::tokenize;
use crate::model::memo::{MemoPayload, MemoProperty};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([\w/-]+)").expect("valid tag regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\([^)]+\)|https?://\S+").expect("valid link regex"));
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]+`").expect("valid inline code regex"));

/// Collects `#tag` markers from parsed nodes, first-seen order, deduplicated.
pub fn extract_tags(nodes: &[Node]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for text in text_blocks(nodes) {
        for captures in TAG_RE.captures_iter(text) {
            let tag = captures[1].to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

/// Computes the content property flags exposed through memo payloads.
pub fn derive_property(nodes: &[Node]) -> MemoProperty {
    let mut property = MemoProperty::default();

    for node in nodes {
        match node {
            Node::CodeBlock { .. } => property.has_code = true,
            Node::TaskItem { complete, .. } => {
                property.has_task_list = true;
                if !complete {
                    property.has_incomplete_tasks = true;
                }
            }
            _ => {}
        }
    }

    for text in text_blocks(nodes) {
        if LINK_RE.is_match(text) {
            property.has_link = true;
        }
        if INLINE_CODE_RE.is_match(text) {
            property.has_code = true;
        }
    }

    property
}

/// Parses content and rebuilds the content-derived payload parts.
///
/// The returned payload never carries a location; author-supplied location
/// data survives rewrites at the service layer.
pub fn derive_payload(content: &str) -> Result<MemoPayload, ParseError> {
    let nodes = parse(&tokenize(content))?;
    let property = derive_property(&nodes);

    Ok(MemoPayload {
        tags: extract_tags(&nodes),
        property: (property != MemoProperty::default()).then_some(property),
        location: None,
    })
}

fn text_blocks(nodes: &[Node]) -> impl Iterator<Item = &str> {
    nodes.iter().filter_map(|node| match node {
        Node::Heading { text, .. }
        | Node::TaskItem { text, .. }
        | Node::Blockquote { text }
        | Node::Paragraph { text } => Some(text.as_str()),
        Node::CodeBlock { .. } => None,
    })
}
