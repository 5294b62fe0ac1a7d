//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for memos, relations,
//!   and organizers.
//! - Isolate SQLite query details from service/API orchestration.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Filtered list/delete queries share one conjunctive filter convention:
//!   absent (`None`) criteria do not filter, present values match exactly.

use crate::db::DbError;
use crate::model::memo::MemoId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) mod filter;
pub mod memo_repo;
pub mod organizer_repo;
pub mod relation_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MemoNotFound(MemoId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MemoNotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MemoNotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
