//! Storage-side domain model for memos and their satellite records.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repository layer.
//! - Keep enum/string encodings for persisted columns in one place.
//!
//! # Invariants
//! - `Memo::uid` is stable and never reused for another memo.
//! - A memo's parent reference, when set, points at an existing memo id.
//! - Satellite records (`MemoRelation`, `MemoOrganizer`) never outlive
//!   their memo rows; deletion cascades at the storage layer.

pub mod memo;
