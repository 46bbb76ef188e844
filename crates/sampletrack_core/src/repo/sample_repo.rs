//! Sample repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, look up, and re-tube samples in the `samples` table.
//!
//! # Invariants
//! - `insert` returns the persisted row including its store-assigned id.
//! - Duplicate tube barcodes surface as `RepoError::ConstraintViolation`,
//!   never as a generic storage fault.

use crate::model::{Sample, SampleId};
use crate::repo::{verify_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SAMPLE_SELECT_SQL: &str = "SELECT id, customer_sample_name, tube_barcode FROM samples";

/// Repository interface for sample persistence.
pub trait SampleRepository {
    /// Inserts a new sample, letting the store assign its id.
    fn insert(&self, customer_sample_name: &str, tube_barcode: &str) -> RepoResult<Sample>;
    /// Point lookup by store-assigned id.
    fn find_by_id(&self, id: SampleId) -> RepoResult<Option<Sample>>;
    /// Point lookup by current tube barcode.
    fn find_by_tube_barcode(&self, tube_barcode: &str) -> RepoResult<Option<Sample>>;
    /// Moves a sample to a different tube by rewriting its barcode.
    fn update_tube_barcode(&self, id: SampleId, tube_barcode: &str) -> RepoResult<()>;
}

/// SQLite-backed sample repository.
pub struct SqliteSampleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSampleRepository<'conn> {
    /// Wraps a migrated connection, rejecting one without the expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn, "samples")?;
        Ok(Self { conn })
    }
}

impl SampleRepository for SqliteSampleRepository<'_> {
    fn insert(&self, customer_sample_name: &str, tube_barcode: &str) -> RepoResult<Sample> {
        self.conn.execute(
            "INSERT INTO samples (customer_sample_name, tube_barcode) VALUES (?1, ?2);",
            params![customer_sample_name, tube_barcode],
        )?;

        Ok(Sample {
            id: self.conn.last_insert_rowid(),
            customer_sample_name: customer_sample_name.to_string(),
            tube_barcode: tube_barcode.to_string(),
        })
    }

    fn find_by_id(&self, id: SampleId) -> RepoResult<Option<Sample>> {
        let sample = self
            .conn
            .query_row(
                &format!("{SAMPLE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_sample_row,
            )
            .optional()?;
        Ok(sample)
    }

    fn find_by_tube_barcode(&self, tube_barcode: &str) -> RepoResult<Option<Sample>> {
        let sample = self
            .conn
            .query_row(
                &format!("{SAMPLE_SELECT_SQL} WHERE tube_barcode = ?1;"),
                [tube_barcode],
                parse_sample_row,
            )
            .optional()?;
        Ok(sample)
    }

    fn update_tube_barcode(&self, id: SampleId, tube_barcode: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE samples SET tube_barcode = ?1 WHERE id = ?2;",
            params![tube_barcode, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

pub(crate) fn parse_sample_row(row: &Row<'_>) -> rusqlite::Result<Sample> {
    Ok(Sample {
        id: row.get("id")?,
        customer_sample_name: row.get("customer_sample_name")?,
        tube_barcode: row.get("tube_barcode")?,
    })
}
