//! Memo domain model.
//!
//! # Responsibility
//! - Define the memo record plus its relation and organizer satellites.
//! - Own the string encodings used for enum-valued columns.
//!
//! # Invariants
//! - `Memo::pinned` is derived from the creator's organizer row on read; it
//!   is never written through the memo table itself.
//! - `MemoPayload` is stored as a single JSON column and may be absent.

use serde::{Deserialize, Serialize};

/// Internal numeric memo identity (SQLite rowid).
pub type MemoId = i64;

/// Internal numeric user identity. Users are owned by an external subsystem;
/// only the id is referenced here.
pub type UserId = i64;

/// Memo lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    /// Live, visible record.
    Normal,
    /// Retained but hidden from default listings.
    Archived,
}

impl RowStatus {
    /// Column encoding used by the `memo.row_status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parses the column encoding. Returns `None` for unrecognized text.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NORMAL" => Some(Self::Normal),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl Default for RowStatus {
    fn default() -> Self {
        Self::Normal
    }
}

/// Memo visibility level, most restrictive first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Visible to the creator only.
    Private,
    /// Visible to signed-in users.
    Protected,
    /// Visible to everyone.
    Public,
}

impl Visibility {
    /// Column encoding used by the `memo.visibility` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Protected => "PROTECTED",
            Self::Public => "PUBLIC",
        }
    }

    /// Parses the column encoding. Returns `None` for unrecognized text.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PRIVATE" => Some(Self::Private),
            "PROTECTED" => Some(Self::Protected),
            "PUBLIC" => Some(Self::Public),
            _ => None,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Private
    }
}

/// Directed link type between two memos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    /// Source memo references the related memo.
    Reference,
    /// Source memo is a comment on the related memo.
    Comment,
}

impl RelationType {
    /// Column encoding used by the `memo_relation.type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "REFERENCE",
            Self::Comment => "COMMENT",
        }
    }

    /// Parses the column encoding. Returns `None` for unrecognized text.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REFERENCE" => Some(Self::Reference),
            "COMMENT" => Some(Self::Comment),
            _ => None,
        }
    }
}

/// Content-derived flags kept with the memo payload so listings can expose
/// them without re-parsing content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoProperty {
    pub has_link: bool,
    pub has_task_list: bool,
    pub has_code: bool,
    pub has_incomplete_tasks: bool,
}

/// Optional geolocation attached by the author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoLocation {
    /// Free-form place description shown alongside the coordinates.
    pub placeholder: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Nested memo payload persisted as one JSON column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoPayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<MemoProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<MemoLocation>,
}

impl MemoPayload {
    /// Returns whether the payload carries no data and can be stored as NULL.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.property.is_none() && self.location.is_none()
    }
}

/// Canonical memo record as read from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Internal numeric id.
    pub id: MemoId,
    /// Stable unique string id used for external lookups.
    pub uid: String,
    /// Id of the authoring user.
    pub creator_id: UserId,
    /// Creation time, epoch seconds.
    pub created_ts: i64,
    /// Last update time, epoch seconds.
    pub updated_ts: i64,
    pub row_status: RowStatus,
    /// Raw markup source text.
    pub content: String,
    pub visibility: Visibility,
    /// Derived from the creator's organizer row.
    pub pinned: bool,
    /// Parent memo id for comment-style threads.
    pub parent_id: Option<MemoId>,
    pub payload: Option<MemoPayload>,
}

impl Memo {
    /// Returns whether the memo is hidden from default listings.
    pub fn is_archived(&self) -> bool {
        self.row_status == RowStatus::Archived
    }
}

/// Directed, typed edge between two memos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoRelation {
    pub memo_id: MemoId,
    pub related_memo_id: MemoId,
    pub relation_type: RelationType,
}

/// Per-(memo, user) organization state, currently limited to the pin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoOrganizer {
    pub memo_id: MemoId,
    pub user_id: UserId,
    pub pinned: bool,
}

#[cfg(test)]
mod tests {
    use super::{MemoPayload, MemoProperty, RelationType, RowStatus, Visibility};

    #[test]
    fn column_encodings_round_trip() {
        for visibility in [Visibility::Private, Visibility::Protected, Visibility::Public] {
            assert_eq!(Visibility::parse(visibility.as_str()), Some(visibility));
        }
        for status in [RowStatus::Normal, RowStatus::Archived] {
            assert_eq!(RowStatus::parse(status.as_str()), Some(status));
        }
        for relation_type in [RelationType::Reference, RelationType::Comment] {
            assert_eq!(RelationType::parse(relation_type.as_str()), Some(relation_type));
        }
    }

    #[test]
    fn unknown_column_text_does_not_parse() {
        assert_eq!(Visibility::parse("public"), None);
        assert_eq!(RowStatus::parse(""), None);
        assert_eq!(RelationType::parse("LINK"), None);
    }

    #[test]
    fn payload_emptiness_tracks_all_fields() {
        assert!(MemoPayload::default().is_empty());

        let tagged = MemoPayload {
            tags: vec!["x".to_string()],
            ..MemoPayload::default()
        };
        assert!(!tagged.is_empty());

        let flagged = MemoPayload {
            property: Some(MemoProperty::default()),
            ..MemoPayload::default()
        };
        assert!(!flagged.is_empty());
    }
}
