//! Memo content markup pipeline.
//!
//! # Responsibility
//! - Tokenize raw memo text into line tokens and parse them into a block
//!   node tree for full-view API responses.
//! - Derive content projections: plain-text snippets and payload data
//!   (tags, property flags) recomputed on memo writes.
//!
//! # Invariants
//! - Tokenization never fails; structural errors surface at parse time.
//! - Derivation helpers are pure and never touch storage.

pub mod parser;
pub mod payload;
pub mod snippet;
pub mod tokenizer;

pub use parser::{parse, Node, ParseError};
pub use payload::{derive_payload, derive_property, extract_tags};
pub use snippet::memo_snippet;
pub use tokenizer::{tokenize, LineToken};
