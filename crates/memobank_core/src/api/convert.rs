//! Store→API conversion for memo records.
//!
//! # Responsibility
//! - Map storage enums and nested structures to their API counterparts.
//! - Assemble the full API memo message, enriching it per requested view.
//!
//! # Invariants
//! - Enum converters are total: absent/unrecognized storage input degrades
//!   to the `Unspecified` sentinel, never to an error.
//! - API→storage enum conversion defaults `Unspecified` to the most
//!   restrictive value.
//! - Assembly either fully succeeds for the requested view or fails with
//!   an error naming the failed step; there is no partial success.

use crate::api::message::{
    format_memo_name, format_user_name, ApiLocation, ApiMemo, ApiMemoProperty, ApiMemoRelation,
    ApiReaction, ApiRelationType, ApiResource, ApiState, ApiVisibility, MemoView,
};
use crate::markup;
use crate::markup::ParseError;
use crate::model::memo::{
    Memo, MemoLocation, MemoProperty, MemoRelation, RelationType, RowStatus, Visibility,
};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Workspace-level memo display settings, fetched through the settings
/// collaborator on every assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoRelatedSetting {
    /// Display memos with their update time instead of creation time.
    pub display_with_update_time: bool,
}

/// Collaborator seam consumed by memo assembly.
///
/// The workspace setting backs the display timestamp and is fetched for
/// every view; the listing calls are made only for [`MemoView::Full`],
/// keyed by the memo's external resource name.
pub trait AssemblyContext {
    fn memo_related_setting(&self) -> RepoResult<MemoRelatedSetting>;
    fn list_relations(&self, memo_name: &str) -> RepoResult<Vec<ApiMemoRelation>>;
    fn list_resources(&self, memo_name: &str) -> RepoResult<Vec<ApiResource>>;
    fn list_reactions(&self, memo_name: &str) -> RepoResult<Vec<ApiReaction>>;
}

/// Assembly failure naming the step that failed.
#[derive(Debug)]
pub enum ConvertError {
    Setting(RepoError),
    Relations(RepoError),
    Resources(RepoError),
    Reactions(RepoError),
    Parse(ParseError),
    Snippet(ParseError),
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setting(err) => {
                write!(f, "failed to get workspace memo related setting: {err}")
            }
            Self::Relations(err) => write!(f, "failed to list memo relations: {err}"),
            Self::Resources(err) => write!(f, "failed to list memo resources: {err}"),
            Self::Reactions(err) => write!(f, "failed to list memo reactions: {err}"),
            Self::Parse(err) => write!(f, "failed to parse memo content: {err}"),
            Self::Snippet(err) => write!(f, "failed to compute content snippet: {err}"),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Setting(err)
            | Self::Relations(err)
            | Self::Resources(err)
            | Self::Reactions(err) => Some(err),
            Self::Parse(err) | Self::Snippet(err) => Some(err),
        }
    }
}

/// Maps stored lifecycle state to its API value. `None` marks
/// absent/unrecognized stored input.
pub fn state_from_store(row_status: Option<RowStatus>) -> ApiState {
    match row_status {
        Some(RowStatus::Normal) => ApiState::Normal,
        Some(RowStatus::Archived) => ApiState::Archived,
        None => ApiState::Unspecified,
    }
}

/// Maps an API lifecycle state to storage. `Unspecified` degrades to the
/// live state.
pub fn state_to_store(state: ApiState) -> RowStatus {
    match state {
        ApiState::Normal => RowStatus::Normal,
        ApiState::Archived => RowStatus::Archived,
        ApiState::Unspecified => RowStatus::Normal,
    }
}

/// Maps stored visibility to its API value. `None` marks
/// absent/unrecognized stored input.
pub fn visibility_from_store(visibility: Option<Visibility>) -> ApiVisibility {
    match visibility {
        Some(Visibility::Private) => ApiVisibility::Private,
        Some(Visibility::Protected) => ApiVisibility::Protected,
        Some(Visibility::Public) => ApiVisibility::Public,
        None => ApiVisibility::Unspecified,
    }
}

/// Maps an API visibility to storage. `Unspecified` degrades to the most
/// restrictive level.
pub fn visibility_to_store(visibility: ApiVisibility) -> Visibility {
    match visibility {
        ApiVisibility::Private => Visibility::Private,
        ApiVisibility::Protected => Visibility::Protected,
        ApiVisibility::Public => Visibility::Public,
        ApiVisibility::Unspecified => Visibility::Private,
    }
}

/// Maps a stored relation type to its API value. `None` marks
/// absent/unrecognized stored input.
pub fn relation_type_from_store(relation_type: Option<RelationType>) -> ApiRelationType {
    match relation_type {
        Some(RelationType::Reference) => ApiRelationType::Reference,
        Some(RelationType::Comment) => ApiRelationType::Comment,
        None => ApiRelationType::Unspecified,
    }
}

/// Maps an API relation type to storage. `Unspecified` degrades to a plain
/// reference.
pub fn relation_type_to_store(relation_type: ApiRelationType) -> RelationType {
    match relation_type {
        ApiRelationType::Reference => RelationType::Reference,
        ApiRelationType::Comment => RelationType::Comment,
        ApiRelationType::Unspecified => RelationType::Reference,
    }
}

/// Copies property flags into API shape; absent input stays absent.
pub fn property_from_store(property: Option<&MemoProperty>) -> Option<ApiMemoProperty> {
    property.map(|property| ApiMemoProperty {
        has_link: property.has_link,
        has_task_list: property.has_task_list,
        has_code: property.has_code,
        has_incomplete_tasks: property.has_incomplete_tasks,
    })
}

/// Copies property flags into storage shape; absent input stays absent.
pub fn property_to_store(property: Option<&ApiMemoProperty>) -> Option<MemoProperty> {
    property.map(|property| MemoProperty {
        has_link: property.has_link,
        has_task_list: property.has_task_list,
        has_code: property.has_code,
        has_incomplete_tasks: property.has_incomplete_tasks,
    })
}

/// Copies a geolocation into API shape; absent input stays absent.
pub fn location_from_store(location: Option<&MemoLocation>) -> Option<ApiLocation> {
    location.map(|location| ApiLocation {
        placeholder: location.placeholder.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
    })
}

/// Copies a geolocation into storage shape; absent input stays absent.
pub fn location_to_store(location: Option<&ApiLocation>) -> Option<MemoLocation> {
    location.map(|location| MemoLocation {
        placeholder: location.placeholder.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
    })
}

/// Maps a stored relation row to its API message; both ends become
/// external resource names.
pub fn convert_relation_from_store(relation: &MemoRelation) -> ApiMemoRelation {
    ApiMemoRelation {
        memo: format_memo_name(relation.memo_id),
        related_memo: format_memo_name(relation.related_memo_id),
        relation_type: relation_type_from_store(Some(relation.relation_type)),
    }
}

/// Builds the API memo message from a store record.
///
/// The lightweight view performs no enrichment work. The full view lists
/// relations, resources, and reactions through the context, parses the
/// content into a node tree, and attaches a plain-text snippet. Any
/// failure aborts the whole conversion.
pub fn convert_memo_from_store<C: AssemblyContext>(
    ctx: &C,
    memo: &Memo,
    view: MemoView,
) -> Result<ApiMemo, ConvertError> {
    let setting = ctx.memo_related_setting().map_err(ConvertError::Setting)?;
    let display_time = if setting.display_with_update_time {
        memo.updated_ts
    } else {
        memo.created_ts
    };

    let name = format_memo_name(memo.id);
    let mut message = ApiMemo {
        name: name.clone(),
        uid: memo.uid.clone(),
        state: state_from_store(Some(memo.row_status)),
        creator: format_user_name(memo.creator_id),
        create_time: memo.created_ts,
        update_time: memo.updated_ts,
        display_time,
        content: memo.content.clone(),
        visibility: visibility_from_store(Some(memo.visibility)),
        pinned: memo.pinned,
        parent: memo.parent_id.map(format_memo_name),
        tags: Vec::new(),
        property: None,
        location: None,
        relations: Vec::new(),
        resources: Vec::new(),
        reactions: Vec::new(),
        nodes: Vec::new(),
        snippet: None,
    };

    if let Some(payload) = &memo.payload {
        message.tags = payload.tags.clone();
        message.property = property_from_store(payload.property.as_ref());
        message.location = location_from_store(payload.location.as_ref());
    }

    if view == MemoView::Full {
        message.relations = ctx.list_relations(&name).map_err(ConvertError::Relations)?;
        message.resources = ctx.list_resources(&name).map_err(ConvertError::Resources)?;
        message.reactions = ctx.list_reactions(&name).map_err(ConvertError::Reactions)?;
        message.nodes =
            markup::parse(&markup::tokenize(&memo.content)).map_err(ConvertError::Parse)?;
        message.snippet =
            Some(markup::memo_snippet(&memo.content).map_err(ConvertError::Snippet)?);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::{
        relation_type_from_store, relation_type_to_store, state_from_store, state_to_store,
        visibility_from_store, visibility_to_store,
    };
    use crate::api::message::{ApiRelationType, ApiState, ApiVisibility};
    use crate::model::memo::{RelationType, RowStatus, Visibility};

    #[test]
    fn defined_visibility_levels_round_trip() {
        for visibility in [Visibility::Private, Visibility::Protected, Visibility::Public] {
            let api = visibility_from_store(Some(visibility));
            assert_eq!(visibility_to_store(api), visibility);
        }
    }

    #[test]
    fn unspecified_visibility_is_lossy_toward_private() {
        // Absent storage input surfaces as the sentinel, which then maps to
        // the most restrictive level instead of back to absence.
        let api = visibility_from_store(None);
        assert_eq!(api, ApiVisibility::Unspecified);
        assert_eq!(visibility_to_store(api), Visibility::Private);
        assert_eq!(
            visibility_from_store(Some(visibility_to_store(api))),
            ApiVisibility::Private
        );
    }

    #[test]
    fn state_conversion_mirrors_visibility_pattern() {
        for status in [RowStatus::Normal, RowStatus::Archived] {
            assert_eq!(state_to_store(state_from_store(Some(status))), status);
        }
        assert_eq!(state_from_store(None), ApiState::Unspecified);
        assert_eq!(state_to_store(ApiState::Unspecified), RowStatus::Normal);
    }

    #[test]
    fn relation_type_conversion_defaults_to_reference() {
        for relation_type in [RelationType::Reference, RelationType::Comment] {
            assert_eq!(
                relation_type_to_store(relation_type_from_store(Some(relation_type))),
                relation_type
            );
        }
        assert_eq!(relation_type_from_store(None), ApiRelationType::Unspecified);
        assert_eq!(
            relation_type_to_store(ApiRelationType::Unspecified),
            RelationType::Reference
        );
    }
}
