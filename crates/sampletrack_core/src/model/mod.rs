//! Domain models shared across the ledger.

pub mod sample;
pub mod well;

pub use sample::{Sample, SampleId};
pub use well::Well;
