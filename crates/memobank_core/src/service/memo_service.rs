//! Memo use-case service.
//!
//! # Responsibility
//! - Provide memo create/update/get/list APIs returning assembled API
//!   messages.
//! - Rebuild the content-derived payload (tags, property flags) on every
//!   content write, preserving author-supplied location data.
//! - Manage pin state and relation replacement for one memo.
//!
//! # Invariants
//! - Content writes never persist without a successfully derived payload.
//! - Replace-relations is delete-then-insert over the memo's outgoing
//!   edges.

use crate::api::convert::{
    convert_memo_from_store, convert_relation_from_store, AssemblyContext, ConvertError,
    MemoRelatedSetting,
};
use crate::api::message::{parse_memo_name, ApiMemo, ApiMemoRelation, ApiReaction, ApiResource, MemoView};
use crate::markup;
use crate::model::memo::{
    MemoId, MemoLocation, MemoOrganizer, MemoRelation, RelationType, UserId, Visibility,
};
use crate::repo::memo_repo::{MemoCreate, MemoFilter, MemoRepository, MemoUpdate, SqliteMemoRepository};
use crate::repo::organizer_repo::{OrganizerRepository, SqliteOrganizerRepository};
use crate::repo::relation_repo::{
    MemoRelationFilter, RelationRepository, SqliteRelationRepository,
};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// Target memo does not exist.
    MemoNotFound(MemoId),
    /// Content could not be parsed while rebuilding the payload.
    InvalidContent(markup::ParseError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Store→API assembly failure.
    Convert(ConvertError),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoNotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidContent(err) => write!(f, "invalid memo content: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Convert(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MemoNotFound(_) => None,
            Self::InvalidContent(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Convert(err) => Some(err),
        }
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::MemoNotFound(id) => Self::MemoNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ConvertError> for MemoServiceError {
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
    }
}

/// Request model for creating one memo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateMemoRequest {
    pub creator_id: UserId,
    pub content: String,
    pub visibility: Visibility,
    /// Parent memo id for comment-style threads.
    pub parent_id: Option<MemoId>,
    /// Author-supplied geolocation, carried into the payload.
    pub location: Option<MemoLocation>,
}

/// Store-backed [`AssemblyContext`].
///
/// Relations are served from the local relation table. Resource and
/// reaction listings belong to external subsystems; until a deployment
/// wires them in, they resolve to empty collections. The workspace setting
/// is a snapshot supplied by the embedding application.
pub struct StoreAssemblyContext<'conn> {
    conn: &'conn Connection,
    setting: MemoRelatedSetting,
}

impl<'conn> StoreAssemblyContext<'conn> {
    pub fn new(conn: &'conn Connection, setting: MemoRelatedSetting) -> Self {
        Self { conn, setting }
    }
}

impl AssemblyContext for StoreAssemblyContext<'_> {
    fn memo_related_setting(&self) -> RepoResult<MemoRelatedSetting> {
        Ok(self.setting)
    }

    fn list_relations(&self, memo_name: &str) -> RepoResult<Vec<ApiMemoRelation>> {
        let Some(memo_id) = parse_memo_name(memo_name) else {
            return Ok(Vec::new());
        };

        let repo = SqliteRelationRepository::new(self.conn);
        let relations = repo.list_relations(&MemoRelationFilter {
            memo_id: Some(memo_id),
            ..MemoRelationFilter::default()
        })?;

        Ok(relations.iter().map(convert_relation_from_store).collect())
    }

    fn list_resources(&self, _memo_name: &str) -> RepoResult<Vec<ApiResource>> {
        Ok(Vec::new())
    }

    fn list_reactions(&self, _memo_name: &str) -> RepoResult<Vec<ApiReaction>> {
        Ok(Vec::new())
    }
}

/// Memo service facade over the repository layer.
pub struct MemoService<'conn, C: AssemblyContext> {
    conn: &'conn Connection,
    ctx: C,
}

impl<'conn, C: AssemblyContext> MemoService<'conn, C> {
    /// Creates a service over a migrated connection and a collaborator
    /// context.
    pub fn new(conn: &'conn Connection, ctx: C) -> Self {
        Self { conn, ctx }
    }

    /// Creates one memo, deriving payload data from its content, and
    /// returns the lightweight API message.
    pub fn create_memo(&self, request: &CreateMemoRequest) -> Result<ApiMemo, MemoServiceError> {
        let mut payload =
            markup::derive_payload(&request.content).map_err(MemoServiceError::InvalidContent)?;
        payload.location = request.location.clone();

        let repo = SqliteMemoRepository::new(self.conn);
        let memo = repo.create_memo(&MemoCreate {
            uid: Uuid::new_v4().to_string(),
            creator_id: request.creator_id,
            content: request.content.clone(),
            visibility: request.visibility,
            parent_id: request.parent_id,
            payload: (!payload.is_empty()).then_some(payload),
        })?;

        info!(
            "event=memo_create module=service status=ok id={} creator_id={}",
            memo.id, memo.creator_id
        );
        Ok(convert_memo_from_store(&self.ctx, &memo, MemoView::Lightweight)?)
    }

    /// Replaces memo content, rebuilding the derived payload while keeping
    /// the author-supplied location.
    pub fn update_memo_content(
        &self,
        id: MemoId,
        content: impl Into<String>,
    ) -> Result<ApiMemo, MemoServiceError> {
        let content = content.into();
        let mut payload =
            markup::derive_payload(&content).map_err(MemoServiceError::InvalidContent)?;

        let repo = SqliteMemoRepository::new(self.conn);
        let existing = repo.get_memo(id)?.ok_or(MemoServiceError::MemoNotFound(id))?;
        payload.location = existing.payload.and_then(|existing| existing.location);

        repo.update_memo(
            id,
            &MemoUpdate {
                content: Some(content),
                payload: Some(payload),
                ..MemoUpdate::default()
            },
        )?;

        let updated = repo.get_memo(id)?.ok_or(MemoServiceError::MemoNotFound(id))?;
        Ok(convert_memo_from_store(&self.ctx, &updated, MemoView::Lightweight)?)
    }

    /// Changes memo visibility.
    pub fn set_memo_visibility(
        &self,
        id: MemoId,
        visibility: Visibility,
    ) -> Result<(), MemoServiceError> {
        let repo = SqliteMemoRepository::new(self.conn);
        repo.update_memo(
            id,
            &MemoUpdate {
                visibility: Some(visibility),
                ..MemoUpdate::default()
            },
        )?;
        Ok(())
    }

    /// Gets one memo assembled for the requested view.
    pub fn get_memo(&self, id: MemoId, view: MemoView) -> Result<ApiMemo, MemoServiceError> {
        let repo = SqliteMemoRepository::new(self.conn);
        let memo = repo.get_memo(id)?.ok_or(MemoServiceError::MemoNotFound(id))?;
        Ok(convert_memo_from_store(&self.ctx, &memo, view)?)
    }

    /// Lists memos assembled for the requested view.
    ///
    /// Callers needing only summaries should request the lightweight view;
    /// the full view performs per-memo enrichment work.
    pub fn list_memos(
        &self,
        filter: &MemoFilter,
        view: MemoView,
    ) -> Result<Vec<ApiMemo>, MemoServiceError> {
        let repo = SqliteMemoRepository::new(self.conn);
        let memos = repo.list_memos(filter)?;

        let mut messages = Vec::with_capacity(memos.len());
        for memo in &memos {
            messages.push(convert_memo_from_store(&self.ctx, memo, view)?);
        }
        Ok(messages)
    }

    /// Pins or unpins one memo for one user.
    pub fn set_memo_pinned(
        &self,
        memo_id: MemoId,
        user_id: UserId,
        pinned: bool,
    ) -> Result<MemoOrganizer, MemoServiceError> {
        let repo = SqliteOrganizerRepository::new(self.conn);
        let organizer = repo.upsert_organizer(&MemoOrganizer {
            memo_id,
            user_id,
            pinned,
        })?;
        Ok(organizer)
    }

    /// Replaces the outgoing relation edges of one memo.
    pub fn set_memo_relations(
        &self,
        memo_id: MemoId,
        relations: &[(MemoId, RelationType)],
    ) -> Result<Vec<ApiMemoRelation>, MemoServiceError> {
        let repo = SqliteRelationRepository::new(self.conn);
        repo.delete_relations(&MemoRelationFilter {
            memo_id: Some(memo_id),
            ..MemoRelationFilter::default()
        })?;

        let mut messages = Vec::with_capacity(relations.len());
        for (related_memo_id, relation_type) in relations {
            let created = repo.create_relation(&MemoRelation {
                memo_id,
                related_memo_id: *related_memo_id,
                relation_type: *relation_type,
            })?;
            messages.push(convert_relation_from_store(&created));
        }
        Ok(messages)
    }

    /// Hard-deletes one memo; relations and organizer rows cascade.
    pub fn delete_memo(&self, id: MemoId) -> Result<(), MemoServiceError> {
        let repo = SqliteMemoRepository::new(self.conn);
        repo.delete_memo(id)?;
        info!("event=memo_delete module=service status=ok id={id}");
        Ok(())
    }
}
