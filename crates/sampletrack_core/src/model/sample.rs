//! Sample domain model.
//!
//! # Responsibility
//! - Define the canonical record for a received laboratory sample.
//!
//! # Invariants
//! - `id` is assigned by the store at receipt and never changes.
//! - `tube_barcode` always names the tube currently holding the sample;
//!   it is globally unique and mutated only by tube transfer.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a sample.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Always positive for persisted samples.
pub type SampleId = i64;

/// Canonical record for a sample registered through receipt.
///
/// Tube occupancy (`tube_barcode`) and plate occupancy ([`Well`] rows) are
/// independent: a sample keeps its tube while appearing in any number of
/// wells.
///
/// [`Well`]: crate::model::well::Well
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Stable identity assigned at receipt, strictly increasing per store.
    pub id: SampleId,
    /// Free-form name supplied by the customer; not required to be unique.
    pub customer_sample_name: String,
    /// Barcode of the tube currently holding this sample (`NT<number>`).
    pub tube_barcode: String,
}
