//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide stable persistence APIs over the `samples` and `wells` tables.
//! - Keep SQL details inside the persistence boundary.
//! - Surface constraint violations as a distinct signal so the ledger can
//!   translate them into domain conflicts.
//!
//! # Invariants
//! - Every write is a single SQL statement; a failed write persists nothing.
//! - Repositories refuse connections without the expected schema.

use crate::db::DbError;
use crate::model::SampleId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sample_repo;
pub mod well_repo;

pub use sample_repo::{SampleRepository, SqliteSampleRepository};
pub use well_repo::{SqliteWellRepository, WellRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for sample/well persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// A uniqueness, range, or foreign-key constraint rejected the write.
    /// The table's constraints arbitrate conflicting concurrent writes.
    ConstraintViolation(String),
    /// Referenced row is absent.
    NotFound(SampleId),
    /// Persisted state does not parse back into a valid domain value.
    InvalidData(String),
    /// Connection has no schema applied (`PRAGMA user_version` is 0).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Schema version matches but a required table is missing.
    MissingRequiredTable(&'static str),
    /// Any other storage failure.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::NotFound(id) => write!(f, "sample not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version is {actual_version}, expected {expected_version}; \
                 open connections through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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
        match value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(message.unwrap_or_else(|| err.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Verifies that `conn` carries the migrated schema and the given table.
///
/// Shared by repository constructors so that a raw, unmigrated connection is
/// rejected up front instead of failing on first query.
pub(crate) fn verify_schema(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    let present: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if !present {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}
