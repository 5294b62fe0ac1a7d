//! Memo organizer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-(memo, user) organization state (the pin flag).
//! - Keep the conjunctive filter semantics shared with other repositories.
//!
//! # Invariants
//! - One row per (memo_id, user_id); upsert only overwrites `pinned`.
//! - Delete is idempotent; matching zero rows is success.

use crate::model::memo::{MemoId, MemoOrganizer, UserId};
use crate::repo::filter::SqlFilter;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Conjunctive criteria for listing or deleting organizer rows.
///
/// Absent fields do not filter, so user id 0 remains a filterable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoOrganizerFilter {
    pub memo_id: Option<MemoId>,
    pub user_id: Option<UserId>,
}

/// Repository interface for memo organizer rows.
pub trait OrganizerRepository {
    /// Inserts or overwrites the pin flag for one (memo, user) pair.
    ///
    /// Returns the caller-supplied value as confirmation; the row is not
    /// re-read after the write.
    fn upsert_organizer(&self, upsert: &MemoOrganizer) -> RepoResult<MemoOrganizer>;
    /// Lists rows matching every present criterion. Returns an empty list,
    /// never an error, when nothing matches.
    fn list_organizers(&self, filter: &MemoOrganizerFilter) -> RepoResult<Vec<MemoOrganizer>>;
    /// Deletes rows matching every present criterion and returns the
    /// affected count.
    fn delete_organizers(&self, filter: &MemoOrganizerFilter) -> RepoResult<usize>;
}

/// SQLite-backed organizer repository.
pub struct SqliteOrganizerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OrganizerRepository for SqliteOrganizerRepository<'_> {
    fn upsert_organizer(&self, upsert: &MemoOrganizer) -> RepoResult<MemoOrganizer> {
        self.conn.execute(
            "INSERT INTO memo_organizer (
                memo_id,
                user_id,
                pinned
            ) VALUES (?1, ?2, ?3)
            ON CONFLICT (memo_id, user_id) DO UPDATE
            SET pinned = excluded.pinned;",
            params![upsert.memo_id, upsert.user_id, bool_to_int(upsert.pinned)],
        )?;

        Ok(*upsert)
    }

    fn list_organizers(&self, filter: &MemoOrganizerFilter) -> RepoResult<Vec<MemoOrganizer>> {
        let sql_filter = build_filter(filter);
        let sql = format!(
            "SELECT
                memo_id,
                user_id,
                pinned
             FROM memo_organizer
             WHERE {};",
            sql_filter.clause()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(sql_filter.into_values()))?;
        let mut list = Vec::new();

        while let Some(row) = rows.next()? {
            list.push(MemoOrganizer {
                memo_id: row.get("memo_id")?,
                user_id: row.get("user_id")?,
                pinned: parse_pinned(row.get("pinned")?)?,
            });
        }

        Ok(list)
    }

    fn delete_organizers(&self, filter: &MemoOrganizerFilter) -> RepoResult<usize> {
        let sql_filter = build_filter(filter);
        let sql = format!(
            "DELETE FROM memo_organizer WHERE {};",
            sql_filter.clause()
        );

        let deleted = self
            .conn
            .execute(&sql, params_from_iter(sql_filter.into_values()))?;
        Ok(deleted)
    }
}

fn build_filter(filter: &MemoOrganizerFilter) -> SqlFilter {
    let mut sql_filter = SqlFilter::new();
    if let Some(memo_id) = filter.memo_id {
        sql_filter.push("memo_id = ?", Value::Integer(memo_id));
    }
    if let Some(user_id) = filter.user_id {
        sql_filter.push("user_id = ?", Value::Integer(user_id));
    }
    sql_filter
}

fn parse_pinned(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid pinned value `{other}` in memo_organizer.pinned"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
