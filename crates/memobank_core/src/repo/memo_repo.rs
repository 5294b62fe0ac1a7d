//! Memo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `memo` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `pinned` is derived per row by joining the creator's organizer entry.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updates always bump `updated_ts`.

use crate::model::memo::{Memo, MemoId, MemoPayload, RowStatus, UserId, Visibility};
use crate::repo::filter::SqlFilter;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MEMO_SELECT_SQL: &str = "SELECT
    memo.id AS id,
    memo.uid AS uid,
    memo.creator_id AS creator_id,
    memo.created_ts AS created_ts,
    memo.updated_ts AS updated_ts,
    memo.row_status AS row_status,
    memo.content AS content,
    memo.visibility AS visibility,
    memo.payload AS payload,
    memo.parent_id AS parent_id,
    IFNULL(memo_organizer.pinned, 0) AS pinned
FROM memo
LEFT JOIN memo_organizer
    ON memo_organizer.memo_id = memo.id
   AND memo_organizer.user_id = memo.creator_id";

/// Write model for creating one memo. Timestamps and lifecycle state are
/// assigned by storage defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoCreate {
    /// Stable unique string id, generated by the caller.
    pub uid: String,
    pub creator_id: UserId,
    pub content: String,
    pub visibility: Visibility,
    pub parent_id: Option<MemoId>,
    pub payload: Option<MemoPayload>,
}

/// Conjunctive criteria plus pagination for memo listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoFilter {
    pub id: Option<MemoId>,
    pub uid: Option<String>,
    pub creator_id: Option<UserId>,
    pub row_status: Option<RowStatus>,
    pub visibility: Option<Visibility>,
    pub parent_id: Option<MemoId>,
    /// Restricts results to memos pinned by their creator.
    pub pinned_only: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Partial update for one memo. Absent fields keep their stored value;
/// `payload` replaces the whole column when present (an empty payload
/// clears it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoUpdate {
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub row_status: Option<RowStatus>,
    pub payload: Option<MemoPayload>,
}

/// Repository interface for memo CRUD operations.
pub trait MemoRepository {
    /// Inserts one memo and returns the persisted row re-read from storage.
    fn create_memo(&self, create: &MemoCreate) -> RepoResult<Memo>;
    /// Gets one memo by internal id.
    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Lists memos matching every present criterion, pinned first, newest
    /// first within each group.
    fn list_memos(&self, filter: &MemoFilter) -> RepoResult<Vec<Memo>>;
    /// Applies a partial update and bumps `updated_ts`.
    fn update_memo(&self, id: MemoId, update: &MemoUpdate) -> RepoResult<()>;
    /// Hard-deletes one memo; relations and organizer rows cascade.
    fn delete_memo(&self, id: MemoId) -> RepoResult<()>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn create_memo(&self, create: &MemoCreate) -> RepoResult<Memo> {
        self.conn.execute(
            "INSERT INTO memo (
                uid,
                creator_id,
                content,
                visibility,
                payload,
                parent_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                create.uid.as_str(),
                create.creator_id,
                create.content.as_str(),
                create.visibility.as_str(),
                encode_payload(create.payload.as_ref())?,
                create.parent_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_memo(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created memo {id} not found in read-back"))
        })
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL}\nWHERE memo.id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn list_memos(&self, filter: &MemoFilter) -> RepoResult<Vec<Memo>> {
        let sql_filter = build_filter(filter);
        let mut sql = format!("{MEMO_SELECT_SQL}\nWHERE {}", sql_filter.clause());
        let mut bind_values = sql_filter.into_values();

        sql.push_str(" ORDER BY pinned DESC, memo.created_ts DESC, memo.id DESC");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if filter.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(filter.offset)));
            }
        } else if filter.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(filter.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memos = Vec::new();

        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn update_memo(&self, id: MemoId, update: &MemoUpdate) -> RepoResult<()> {
        let mut sets: Vec<&'static str> = vec!["updated_ts = (strftime('%s', 'now'))"];
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(content) = &update.content {
            sets.push("content = ?");
            bind_values.push(Value::Text(content.clone()));
        }
        if let Some(visibility) = update.visibility {
            sets.push("visibility = ?");
            bind_values.push(Value::Text(visibility.as_str().to_string()));
        }
        if let Some(row_status) = update.row_status {
            sets.push("row_status = ?");
            bind_values.push(Value::Text(row_status.as_str().to_string()));
        }
        if let Some(payload) = &update.payload {
            match encode_payload(Some(payload))? {
                Some(json) => {
                    sets.push("payload = ?");
                    bind_values.push(Value::Text(json));
                }
                None => sets.push("payload = NULL"),
            }
        }

        bind_values.push(Value::Integer(id));
        let sql = format!("UPDATE memo SET {} WHERE id = ?;", sets.join(", "));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::MemoNotFound(id));
        }

        Ok(())
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memo WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::MemoNotFound(id));
        }

        Ok(())
    }
}

fn build_filter(filter: &MemoFilter) -> SqlFilter {
    let mut sql_filter = SqlFilter::new();
    if let Some(id) = filter.id {
        sql_filter.push("memo.id = ?", Value::Integer(id));
    }
    if let Some(uid) = &filter.uid {
        sql_filter.push("memo.uid = ?", Value::Text(uid.clone()));
    }
    if let Some(creator_id) = filter.creator_id {
        sql_filter.push("memo.creator_id = ?", Value::Integer(creator_id));
    }
    if let Some(row_status) = filter.row_status {
        sql_filter.push(
            "memo.row_status = ?",
            Value::Text(row_status.as_str().to_string()),
        );
    }
    if let Some(visibility) = filter.visibility {
        sql_filter.push(
            "memo.visibility = ?",
            Value::Text(visibility.as_str().to_string()),
        );
    }
    if let Some(parent_id) = filter.parent_id {
        sql_filter.push("memo.parent_id = ?", Value::Integer(parent_id));
    }
    if filter.pinned_only {
        sql_filter.push("IFNULL(memo_organizer.pinned, 0) = ?", Value::Integer(1));
    }
    sql_filter
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let row_status_text: String = row.get("row_status")?;
    let row_status = RowStatus::parse(&row_status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid row status `{row_status_text}` in memo.row_status"
        ))
    })?;

    let visibility_text: String = row.get("visibility")?;
    let visibility = Visibility::parse(&visibility_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid visibility `{visibility_text}` in memo.visibility"
        ))
    })?;

    let payload = match row.get::<_, Option<String>>("payload")? {
        Some(json) => Some(serde_json::from_str::<MemoPayload>(&json).map_err(|err| {
            RepoError::InvalidData(format!("invalid payload json in memo.payload: {err}"))
        })?),
        None => None,
    };

    let pinned = match row.get::<_, i64>("pinned")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid pinned value `{other}` in memo_organizer.pinned"
            )));
        }
    };

    Ok(Memo {
        id: row.get("id")?,
        uid: row.get("uid")?,
        creator_id: row.get("creator_id")?,
        created_ts: row.get("created_ts")?,
        updated_ts: row.get("updated_ts")?,
        row_status,
        content: row.get("content")?,
        visibility,
        pinned,
        parent_id: row.get("parent_id")?,
        payload,
    })
}

fn encode_payload(payload: Option<&MemoPayload>) -> RepoResult<Option<String>> {
    match payload {
        Some(payload) if !payload.is_empty() => {
            let json = serde_json::to_string(payload).map_err(|err| {
                RepoError::InvalidData(format!("failed to encode memo payload: {err}"))
            })?;
            Ok(Some(json))
        }
        _ => Ok(None),
    }
}
