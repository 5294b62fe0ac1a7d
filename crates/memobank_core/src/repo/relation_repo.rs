//! Memo relation repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and query directed, typed edges between memos.
//! - Keep the conjunctive filter semantics shared with other repositories.
//!
//! # Invariants
//! - Create returns the persisted row, not the caller's input.
//! - Delete is idempotent; matching zero rows is success.
//! - Edge uniqueness and memo foreign keys are enforced by the table.

use crate::model::memo::{MemoId, MemoRelation, RelationType};
use crate::repo::filter::SqlFilter;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Conjunctive criteria for listing or deleting relations.
///
/// Absent fields do not filter; an all-absent filter matches every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoRelationFilter {
    pub memo_id: Option<MemoId>,
    pub related_memo_id: Option<MemoId>,
    pub relation_type: Option<RelationType>,
}

/// Repository interface for memo relation edges.
pub trait RelationRepository {
    /// Inserts one relation edge and returns the persisted row.
    ///
    /// Constraint violations (unknown memo ids, duplicate edges) propagate
    /// as storage errors.
    fn create_relation(&self, create: &MemoRelation) -> RepoResult<MemoRelation>;
    /// Lists rows matching every present criterion. Returns an empty list,
    /// never an error, when nothing matches. Ordering is unspecified.
    fn list_relations(&self, filter: &MemoRelationFilter) -> RepoResult<Vec<MemoRelation>>;
    /// Deletes rows matching every present criterion and returns the
    /// affected count.
    fn delete_relations(&self, filter: &MemoRelationFilter) -> RepoResult<usize>;
}

/// SQLite-backed relation repository.
pub struct SqliteRelationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RelationRepository for SqliteRelationRepository<'_> {
    fn create_relation(&self, create: &MemoRelation) -> RepoResult<MemoRelation> {
        let (memo_id, related_memo_id, type_text): (i64, i64, String) = self.conn.query_row(
            "INSERT INTO memo_relation (
                memo_id,
                related_memo_id,
                type
            ) VALUES (?1, ?2, ?3)
            RETURNING memo_id, related_memo_id, type;",
            params![
                create.memo_id,
                create.related_memo_id,
                create.relation_type.as_str(),
            ],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(MemoRelation {
            memo_id,
            related_memo_id,
            relation_type: parse_relation_type(&type_text)?,
        })
    }

    fn list_relations(&self, filter: &MemoRelationFilter) -> RepoResult<Vec<MemoRelation>> {
        let sql_filter = build_filter(filter);
        let sql = format!(
            "SELECT
                memo_id,
                related_memo_id,
                type
             FROM memo_relation
             WHERE {};",
            sql_filter.clause()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(sql_filter.into_values()))?;
        let mut list = Vec::new();

        while let Some(row) = rows.next()? {
            let type_text: String = row.get("type")?;
            list.push(MemoRelation {
                memo_id: row.get("memo_id")?,
                related_memo_id: row.get("related_memo_id")?,
                relation_type: parse_relation_type(&type_text)?,
            });
        }

        Ok(list)
    }

    fn delete_relations(&self, filter: &MemoRelationFilter) -> RepoResult<usize> {
        let sql_filter = build_filter(filter);
        let sql = format!(
            "DELETE FROM memo_relation WHERE {};",
            sql_filter.clause()
        );

        let deleted = self
            .conn
            .execute(&sql, params_from_iter(sql_filter.into_values()))?;
        Ok(deleted)
    }
}

fn build_filter(filter: &MemoRelationFilter) -> SqlFilter {
    let mut sql_filter = SqlFilter::new();
    if let Some(memo_id) = filter.memo_id {
        sql_filter.push("memo_id = ?", Value::Integer(memo_id));
    }
    if let Some(related_memo_id) = filter.related_memo_id {
        sql_filter.push("related_memo_id = ?", Value::Integer(related_memo_id));
    }
    if let Some(relation_type) = filter.relation_type {
        sql_filter.push("type = ?", Value::Text(relation_type.as_str().to_string()));
    }
    sql_filter
}

fn parse_relation_type(value: &str) -> RepoResult<RelationType> {
    RelationType::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid relation type `{value}` in memo_relation.type"
        ))
    })
}
