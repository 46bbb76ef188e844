//! Well repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert well rows and list a plate's wells joined to their samples.
//!
//! # Invariants
//! - Composite-key collisions (same plate, row, col) surface as
//!   `RepoError::ConstraintViolation`.
//! - Listing returns wells ordered by row, then column.

use crate::barcode::WellPosition;
use crate::model::{Sample, Well};
use crate::repo::{verify_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for well persistence.
pub trait WellRepository {
    /// Inserts one well row; the composite primary key enforces position
    /// exclusivity.
    fn insert(&self, well: &Well) -> RepoResult<()>;
    /// Lists all occupied wells of a plate with their owning samples.
    fn list_by_plate(&self, plate_barcode: &str) -> RepoResult<Vec<(Well, Sample)>>;
}

/// SQLite-backed well repository.
pub struct SqliteWellRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWellRepository<'conn> {
    /// Wraps a migrated connection, rejecting one without the expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn, "wells")?;
        Ok(Self { conn })
    }
}

impl WellRepository for SqliteWellRepository<'_> {
    fn insert(&self, well: &Well) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO wells (plate_barcode, row, col, sample_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                well.plate_barcode,
                well.position.row(),
                well.position.col(),
                well.sample_id,
            ],
        )?;

        Ok(())
    }

    fn list_by_plate(&self, plate_barcode: &str) -> RepoResult<Vec<(Well, Sample)>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.plate_barcode, w.row, w.col, w.sample_id,
                    s.customer_sample_name, s.tube_barcode
             FROM wells w
             JOIN samples s ON s.id = w.sample_id
             WHERE w.plate_barcode = ?1
             ORDER BY w.row ASC, w.col ASC;",
        )?;

        let mut rows = stmt.query([plate_barcode])?;
        let mut wells = Vec::new();
        while let Some(row) = rows.next()? {
            wells.push(parse_joined_row(row)?);
        }

        Ok(wells)
    }
}

fn parse_joined_row(row: &Row<'_>) -> RepoResult<(Well, Sample)> {
    let plate_barcode: String = row.get(0)?;
    let grid_row: u8 = row.get(1)?;
    let grid_col: u8 = row.get(2)?;
    let sample_id: i64 = row.get(3)?;

    let position = WellPosition::from_row_col(grid_row, grid_col).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "well ({plate_barcode}, {grid_row}, {grid_col}) is outside the plate grid"
        ))
    })?;

    let well = Well {
        plate_barcode,
        position,
        sample_id,
    };
    let sample = Sample {
        id: sample_id,
        customer_sample_name: row.get(4)?,
        tube_barcode: row.get(5)?,
    };

    Ok((well, sample))
}
