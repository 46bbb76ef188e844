//! Container query reports and their text rendering.
//!
//! # Responsibility
//! - Define the structured results of `list_samples_in`.
//! - Render them into the human-readable layout the front end prints.

use crate::barcode::WellPosition;
use crate::model::SampleId;
use serde::Serialize;
use std::fmt::Write as _;

/// Result of querying a tube: the single sample it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TubeReport {
    pub barcode: String,
    pub sample_id: SampleId,
    pub customer_sample_name: String,
}

/// One occupied well inside a [`PlateReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateWell {
    pub position: WellPosition,
    pub sample_id: SampleId,
    pub customer_sample_name: String,
}

/// Result of querying a plate: its occupied wells in row, column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateReport {
    pub barcode: String,
    pub wells: Vec<PlateWell>,
}

/// Report for either container kind, as returned by `list_samples_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerReport {
    Tube(TubeReport),
    Plate(PlateReport),
}

impl ContainerReport {
    /// Renders the report into display text.
    pub fn render(&self) -> String {
        match self {
            Self::Tube(report) => render_tube(report),
            Self::Plate(report) => render_plate(report),
        }
    }
}

fn render_tube(report: &TubeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "======== Tube: {} ========", report.barcode);
    let _ = writeln!(out, "Sample ID: {}", report.sample_id);
    let _ = writeln!(
        out,
        "Customer Sample Name: {}",
        report.customer_sample_name
    );
    out
}

fn render_plate(report: &PlateReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "======== Plate: {} ========", report.barcode);
    for well in &report.wells {
        let _ = writeln!(out, "Well position: {}", well.position);
        let _ = writeln!(out, "Sample ID: {}", well.sample_id);
        let _ = writeln!(out, "Customer Sample Name: {}", well.customer_sample_name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ContainerReport, PlateReport, PlateWell, TubeReport};
    use crate::barcode::WellPosition;

    #[test]
    fn tube_report_renders_all_fields() {
        let report = ContainerReport::Tube(TubeReport {
            barcode: "NT1".to_string(),
            sample_id: 42,
            customer_sample_name: "Alice".to_string(),
        });

        let text = report.render();
        assert!(text.contains("======== Tube: NT1 ========"));
        assert!(text.contains("Sample ID: 42"));
        assert!(text.contains("Customer Sample Name: Alice"));
    }

    #[test]
    fn plate_report_renders_one_block_per_well() {
        let report = ContainerReport::Plate(PlateReport {
            barcode: "DN7".to_string(),
            wells: vec![
                PlateWell {
                    position: WellPosition::parse("A1").unwrap(),
                    sample_id: 1,
                    customer_sample_name: "S1".to_string(),
                },
                PlateWell {
                    position: WellPosition::parse("B2").unwrap(),
                    sample_id: 2,
                    customer_sample_name: "S2".to_string(),
                },
            ],
        });

        let text = report.render();
        assert!(text.contains("======== Plate: DN7 ========"));
        assert!(text.contains("Well position: A1"));
        assert!(text.contains("Well position: B2"));
        assert_eq!(text.matches("Sample ID:").count(), 2);
    }
}
