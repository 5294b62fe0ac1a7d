//! API message shapes for memo responses.
//!
//! # Responsibility
//! - Define the wire-facing memo projection and its nested messages.
//! - Own the resource-name encoding between internal numeric ids and
//!   external string names.

use crate::markup::Node;
use crate::model::memo::{MemoId, UserId};
use serde::{Deserialize, Serialize};

/// Prefix of external memo resource names.
pub const MEMO_NAME_PREFIX: &str = "memos/";
/// Prefix of external user resource names.
pub const USER_NAME_PREFIX: &str = "users/";

/// Renders the external resource name of a memo.
pub fn format_memo_name(id: MemoId) -> String {
    format!("{MEMO_NAME_PREFIX}{id}")
}

/// Renders the external resource name of a user.
pub fn format_user_name(id: UserId) -> String {
    format!("{USER_NAME_PREFIX}{id}")
}

/// Extracts the internal memo id from an external resource name.
pub fn parse_memo_name(name: &str) -> Option<MemoId> {
    name.strip_prefix(MEMO_NAME_PREFIX)?.parse().ok()
}

/// Response-shaping parameter controlling how much derived data
/// accompanies a memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemoView {
    /// Bare fields only; no enrichment fetches, no parsing.
    #[default]
    Lightweight,
    /// All enrichments populated: relations, resources, reactions, parsed
    /// nodes, snippet.
    Full,
}

/// API-side lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiState {
    #[default]
    Unspecified,
    Normal,
    Archived,
}

/// API-side visibility level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiVisibility {
    #[default]
    Unspecified,
    Private,
    Protected,
    Public,
}

/// API-side relation type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiRelationType {
    #[default]
    Unspecified,
    Reference,
    Comment,
}

/// Content property flags in API shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMemoProperty {
    pub has_link: bool,
    pub has_task_list: bool,
    pub has_code: bool,
    pub has_incomplete_tasks: bool,
}

/// Geolocation in API shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiLocation {
    pub placeholder: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Directed relation edge in API shape; both ends are external names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMemoRelation {
    pub memo: String,
    pub related_memo: String,
    pub relation_type: ApiRelationType,
}

/// Attachment reference served by the external resource subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    pub name: String,
    pub filename: String,
    pub content_type: String,
}

/// Reaction served by the external reaction subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReaction {
    pub creator: String,
    pub content: String,
}

/// Externally visible memo projection.
///
/// Recomputed per request; enrichment fields are populated only for
/// [`MemoView::Full`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMemo {
    /// External resource name, `memos/<id>`.
    pub name: String,
    /// Stable unique string id.
    pub uid: String,
    pub state: ApiState,
    /// Creator resource name, `users/<id>`.
    pub creator: String,
    /// Creation time, epoch seconds.
    pub create_time: i64,
    /// Last update time, epoch seconds.
    pub update_time: i64,
    /// Time shown in listings; creation time unless the workspace displays
    /// update times.
    pub display_time: i64,
    /// Raw markup source text.
    pub content: String,
    pub visibility: ApiVisibility,
    pub pinned: bool,
    /// Parent memo resource name for comment-style threads.
    pub parent: Option<String>,
    pub tags: Vec<String>,
    pub property: Option<ApiMemoProperty>,
    pub location: Option<ApiLocation>,
    pub relations: Vec<ApiMemoRelation>,
    pub resources: Vec<ApiResource>,
    pub reactions: Vec<ApiReaction>,
    /// Parsed content block tree.
    pub nodes: Vec<Node>,
    /// Short plain-text excerpt of the content.
    pub snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{format_memo_name, format_user_name, parse_memo_name};

    #[test]
    fn resource_names_use_fixed_prefixes() {
        assert_eq!(format_memo_name(42), "memos/42");
        assert_eq!(format_user_name(7), "users/7");
    }

    #[test]
    fn memo_name_parsing_rejects_foreign_names() {
        assert_eq!(parse_memo_name("memos/42"), Some(42));
        assert_eq!(parse_memo_name("users/42"), None);
        assert_eq!(parse_memo_name("memos/abc"), None);
    }
}
