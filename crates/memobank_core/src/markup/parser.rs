//! Block parser producing the node tree attached to full memo views.
//!
//! # Responsibility
//! - Turn line tokens into block nodes.
//! - Reject structurally broken content instead of guessing.
//!
//! # Invariants
//! - Consecutive text lines merge into one paragraph.
//! - A code fence opened without a closing fence is a parse error.

use crate::markup::tokenizer::LineToken;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Block node of parsed memo content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Heading {
        level: u8,
        text: String,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    TaskItem {
        complete: bool,
        text: String,
    },
    Blockquote {
        text: String,
    },
    Paragraph {
        text: String,
    },
}

/// Structural parse failure.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A ``` fence was opened and never closed.
    UnterminatedCodeBlock { opened_at_line: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedCodeBlock { opened_at_line } => {
                write!(f, "unterminated code block opened at line {opened_at_line}")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses line tokens into a block node tree.
pub fn parse(tokens: &[LineToken]) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut quote: Vec<&str> = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        match &tokens[index] {
            LineToken::Text { text } => {
                flush_quote(&mut quote, &mut nodes);
                paragraph.push(text.trim());
            }
            LineToken::BlockquoteLine { text } => {
                flush_paragraph(&mut paragraph, &mut nodes);
                quote.push(text);
            }
            LineToken::Blank => {
                flush_paragraph(&mut paragraph, &mut nodes);
                flush_quote(&mut quote, &mut nodes);
            }
            LineToken::Heading { level, text } => {
                flush_paragraph(&mut paragraph, &mut nodes);
                flush_quote(&mut quote, &mut nodes);
                nodes.push(Node::Heading {
                    level: *level,
                    text: text.clone(),
                });
            }
            LineToken::TaskItem { complete, text } => {
                flush_paragraph(&mut paragraph, &mut nodes);
                flush_quote(&mut quote, &mut nodes);
                nodes.push(Node::TaskItem {
                    complete: *complete,
                    text: text.clone(),
                });
            }
            LineToken::CodeLine { text } => {
                // Only reachable when callers hand-build tokens; treated as text.
                flush_quote(&mut quote, &mut nodes);
                paragraph.push(text.as_str());
            }
            LineToken::CodeFence { language } => {
                flush_paragraph(&mut paragraph, &mut nodes);
                flush_quote(&mut quote, &mut nodes);
                let opened_at_line = index + 1;
                let (block, consumed) =
                    parse_code_block(language.clone(), &tokens[index + 1..], opened_at_line)?;
                nodes.push(block);
                index += consumed;
            }
        }
        index += 1;
    }

    flush_paragraph(&mut paragraph, &mut nodes);
    flush_quote(&mut quote, &mut nodes);
    Ok(nodes)
}

fn parse_code_block(
    language: Option<String>,
    rest: &[LineToken],
    opened_at_line: usize,
) -> Result<(Node, usize), ParseError> {
    let mut lines = Vec::new();
    for (offset, token) in rest.iter().enumerate() {
        match token {
            LineToken::CodeFence { .. } => {
                return Ok((
                    Node::CodeBlock {
                        language,
                        content: lines.join("\n"),
                    },
                    offset + 1,
                ));
            }
            LineToken::CodeLine { text } => lines.push(text.as_str()),
            // Fence-aware tokenization only emits code lines here.
            _ => {}
        }
    }

    Err(ParseError::UnterminatedCodeBlock { opened_at_line })
}

fn flush_paragraph(lines: &mut Vec<&str>, nodes: &mut Vec<Node>) {
    if lines.is_empty() {
        return;
    }
    nodes.push(Node::Paragraph {
        text: lines.join(" "),
    });
    lines.clear();
}

fn flush_quote(lines: &mut Vec<&str>, nodes: &mut Vec<Node>) {
    if lines.is_empty() {
        return;
    }
    nodes.push(Node::Blockquote {
        text: lines.join(" "),
    });
    lines.clear();
}

#[cfg(test)]
mod tests {
    use super::{parse, Node, ParseError};
    use crate::markup::tokenizer::tokenize;

    #[test]
    fn merges_text_lines_into_paragraphs() {
        let nodes = parse(&tokenize("first line\nsecond line\n\nnext block")).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Paragraph {
                    text: "first line second line".to_string()
                },
                Node::Paragraph {
                    text: "next block".to_string()
                },
            ]
        );
    }

    #[test]
    fn parses_mixed_blocks_in_order() {
        let content = "# plan\n- [ ] write\n- [x] read\n> keep it short\n\nclosing words";
        let nodes = parse(&tokenize(content)).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Heading {
                    level: 1,
                    text: "plan".to_string()
                },
                Node::TaskItem {
                    complete: false,
                    text: "write".to_string()
                },
                Node::TaskItem {
                    complete: true,
                    text: "read".to_string()
                },
                Node::Blockquote {
                    text: "keep it short".to_string()
                },
                Node::Paragraph {
                    text: "closing words".to_string()
                },
            ]
        );
    }

    #[test]
    fn code_block_keeps_raw_lines() {
        let nodes = parse(&tokenize("```rust\nlet x = 1;\n\nlet y = 2;\n```")).unwrap();
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                language: Some("rust".to_string()),
                content: "let x = 1;\n\nlet y = 2;".to_string(),
            }]
        );
    }

    #[test]
    fn unterminated_code_block_is_an_error() {
        let err = parse(&tokenize("text\n```\nlet x = 1;")).unwrap_err();
        assert_eq!(err, ParseError::UnterminatedCodeBlock { opened_at_line: 2 });
    }
}
