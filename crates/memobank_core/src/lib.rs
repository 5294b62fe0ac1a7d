//! Core domain logic for memobank.
//! This crate is the single source of truth for memo business invariants.

pub mod api;
pub mod db;
pub mod logging;
pub mod markup;
pub mod model;
pub mod repo;
pub mod service;

pub use api::convert::{
    convert_memo_from_store, convert_relation_from_store, AssemblyContext, ConvertError,
    MemoRelatedSetting,
};
pub use api::message::{
    format_memo_name, format_user_name, parse_memo_name, ApiLocation, ApiMemo, ApiMemoProperty,
    ApiMemoRelation, ApiReaction, ApiRelationType, ApiResource, ApiState, ApiVisibility, MemoView,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markup::{Node, ParseError};
pub use model::memo::{
    Memo, MemoId, MemoLocation, MemoOrganizer, MemoPayload, MemoProperty, MemoRelation,
    RelationType, RowStatus, UserId, Visibility,
};
pub use repo::memo_repo::{MemoCreate, MemoFilter, MemoRepository, MemoUpdate, SqliteMemoRepository};
pub use repo::organizer_repo::{
    MemoOrganizerFilter, OrganizerRepository, SqliteOrganizerRepository,
};
pub use repo::relation_repo::{
    MemoRelationFilter, RelationRepository, SqliteRelationRepository,
};
pub use repo::{RepoError, RepoResult};
pub use service::memo_service::{
    CreateMemoRequest, MemoService, MemoServiceError, StoreAssemblyContext,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
