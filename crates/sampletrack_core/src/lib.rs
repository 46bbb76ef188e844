//! Core ledger logic for laboratory sample tracking.
//! This crate is the single source of truth for container/sample invariants.

pub mod barcode;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use barcode::{is_plate_barcode, is_tube_barcode, WellPosition};
pub use db::{open_db, open_db_in_memory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{Sample, SampleId, Well};
pub use repo::{
    RepoError, RepoResult, SampleRepository, SqliteSampleRepository, SqliteWellRepository,
    WellRepository,
};
pub use report::{ContainerReport, PlateReport, PlateWell, TubeReport};
pub use service::{Ledger, LedgerError, LedgerResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
