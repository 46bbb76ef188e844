//! Well domain model.

use crate::barcode::WellPosition;
use crate::model::sample::SampleId;
use serde::{Deserialize, Serialize};

/// One occupied position on a plate.
///
/// Identity is the composite (`plate_barcode`, position); at most one well
/// row exists per position. Wells are created by plate placement and never
/// updated or removed. Many wells may reference the same sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    /// Barcode of the plate this well belongs to (`DN<number>`). Plates are
    /// implicit: the barcode is a grouping key, there is no plate record.
    pub plate_barcode: String,
    /// Grid coordinate within the plate.
    pub position: WellPosition,
    /// Sample occupying this well.
    pub sample_id: SampleId,
}
