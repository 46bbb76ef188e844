//! Container/sample ledger: the four invariant-preserving operations.
//!
//! # Responsibility
//! - Receipt, plate placement, tube transfer, and container lookup.
//! - Reject malformed input before any store access.
//! - Translate store-level constraint violations into domain conflicts.
//!
//! # Invariants
//! - A tube barcode is bound to at most one sample at any time.
//! - A (plate, row, col) position holds at most one well row, regardless of
//!   which sample occupies it.
//! - Every operation is all-or-nothing; no partial state is persisted.
//! - Barcodes are normalized to uppercase before validation and storage.

use crate::barcode::{self, WellPosition};
use crate::model::{Sample, SampleId, Well};
use crate::repo::{RepoError, SampleRepository, WellRepository};
use crate::report::{ContainerReport, PlateReport, PlateWell, TubeReport};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain error for ledger operations.
///
/// Every variant carries the offending value so callers can surface it
/// verbatim. All variants are caller-correctable; none warrant a retry loop.
#[derive(Debug)]
pub enum LedgerError {
    /// Tube barcode does not match `NT<number>`.
    TubeBarcodeBadFormat(String),
    /// Plate barcode does not match `DN<number>`.
    PlateBarcodeBadFormat(String),
    /// Well position does not match `[A-H][1-9][0-9]*` or lies outside the
    /// 8x12 grid. Out-of-grid positions are a format error, not a distinct
    /// kind.
    WellPositionBadFormat(String),
    /// Sample id is not a positive integer.
    SampleIdBadFormat(SampleId),
    /// Container barcode matches neither the tube nor the plate grammar.
    BarcodeBadFormat(String),
    /// No sample exists with the given id.
    SampleNotFound(SampleId),
    /// No sample currently lives in the given tube.
    TubeNotFound(String),
    /// The plate has no occupied wells (or was never used).
    OccupiedWellsNotFound(String),
    /// The tube already received a sample.
    SampleAlreadyReceived(String),
    /// The well position already holds a sample, same or different.
    WellPositionOccupied {
        position: String,
        plate_barcode: String,
    },
    /// The destination tube of a transfer already holds a sample.
    OccupiedDestinationTube(String),
    /// Storage failure unrelated to a domain conflict.
    Repo(RepoError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TubeBarcodeBadFormat(barcode) => {
                write!(
                    f,
                    "tube barcode wrong format, expected NT<number>, got `{barcode}`"
                )
            }
            Self::PlateBarcodeBadFormat(barcode) => {
                write!(
                    f,
                    "plate barcode wrong format, expected DN<number>, got `{barcode}`"
                )
            }
            Self::WellPositionBadFormat(position) => {
                write!(
                    f,
                    "well position wrong format, expected A1..H12, got `{position}`"
                )
            }
            Self::SampleIdBadFormat(id) => {
                write!(f, "sample id {id} bad format, expected positive number")
            }
            Self::BarcodeBadFormat(barcode) => {
                write!(
                    f,
                    "bad barcode format, expected DN<number> for plate or NT<number> for tube, \
                     got `{barcode}`"
                )
            }
            Self::SampleNotFound(id) => write!(f, "sample id {id} not found"),
            Self::TubeNotFound(barcode) => write!(f, "tube {barcode} not found"),
            Self::OccupiedWellsNotFound(barcode) => {
                write!(f, "occupied wells not found for {barcode}")
            }
            Self::SampleAlreadyReceived(barcode) => {
                write!(f, "sample already received for {barcode}")
            }
            Self::WellPositionOccupied {
                position,
                plate_barcode,
            } => write!(
                f,
                "position {position} already occupied in plate {plate_barcode}"
            ),
            Self::OccupiedDestinationTube(barcode) => {
                write!(f, "tube {barcode} already occupied")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ledger facade over the sample and well repositories.
///
/// Holds no entity state of its own; every read re-queries the store, and
/// conflicting concurrent writes are arbitrated by the store's constraints.
pub struct Ledger<S: SampleRepository, W: WellRepository> {
    samples: S,
    wells: W,
}

impl<S: SampleRepository, W: WellRepository> Ledger<S, W> {
    /// Creates a ledger over the provided repository implementations.
    ///
    /// Both repositories are expected to wrap the same underlying store.
    pub fn new(samples: S, wells: W) -> Self {
        Self { samples, wells }
    }

    /// Registers a new sample arriving in a fresh tube.
    ///
    /// # Errors
    /// - [`LedgerError::TubeBarcodeBadFormat`] when the barcode is malformed.
    /// - [`LedgerError::SampleAlreadyReceived`] when the tube is already
    ///   bound to a sample; a tube cannot receive twice without an
    ///   intervening transfer.
    pub fn record_receipt(
        &self,
        customer_sample_name: &str,
        tube_barcode: &str,
    ) -> LedgerResult<Sample> {
        let tube_barcode = barcode::normalize(tube_barcode);
        if !barcode::is_tube_barcode(&tube_barcode) {
            return Err(LedgerError::TubeBarcodeBadFormat(tube_barcode));
        }

        let sample = self
            .samples
            .insert(customer_sample_name, &tube_barcode)
            .map_err(|err| match err {
                RepoError::ConstraintViolation(_) => {
                    warn!("event=record_receipt module=ledger status=conflict tube={tube_barcode}");
                    LedgerError::SampleAlreadyReceived(tube_barcode.clone())
                }
                other => other.into(),
            })?;

        info!(
            "event=record_receipt module=ledger status=ok sample_id={} tube={}",
            sample.id, sample.tube_barcode
        );
        Ok(sample)
    }

    /// Places an existing sample into one well of a plate.
    ///
    /// Placement is an association, not a move: the sample keeps its tube
    /// and may be placed into any number of other wells. The plate itself is
    /// implicit; a previously unused barcode denotes an empty plate.
    ///
    /// # Errors
    /// - Format errors for sample id, plate barcode, and well position,
    ///   checked in that order before any store access.
    /// - [`LedgerError::SampleNotFound`] when the sample id is unknown.
    /// - [`LedgerError::WellPositionOccupied`] when the position already
    ///   holds a well row, whether for this sample or another.
    pub fn add_to_plate(
        &self,
        sample_id: SampleId,
        plate_barcode: &str,
        well_position: &str,
    ) -> LedgerResult<Well> {
        if sample_id <= 0 {
            return Err(LedgerError::SampleIdBadFormat(sample_id));
        }

        let plate_barcode = barcode::normalize(plate_barcode);
        if !barcode::is_plate_barcode(&plate_barcode) {
            return Err(LedgerError::PlateBarcodeBadFormat(plate_barcode));
        }

        let well_position = barcode::normalize(well_position);
        let position = WellPosition::parse(&well_position)
            .ok_or_else(|| LedgerError::WellPositionBadFormat(well_position.clone()))?;

        if self.samples.find_by_id(sample_id)?.is_none() {
            return Err(LedgerError::SampleNotFound(sample_id));
        }

        let well = Well {
            plate_barcode,
            position,
            sample_id,
        };
        self.wells.insert(&well).map_err(|err| match err {
            RepoError::ConstraintViolation(_) => {
                warn!(
                    "event=add_to_plate module=ledger status=conflict plate={} position={}",
                    well.plate_barcode, well.position
                );
                LedgerError::WellPositionOccupied {
                    position: well.position.to_string(),
                    plate_barcode: well.plate_barcode.clone(),
                }
            }
            other => other.into(),
        })?;

        info!(
            "event=add_to_plate module=ledger status=ok sample_id={} plate={} position={}",
            well.sample_id, well.plate_barcode, well.position
        );
        Ok(well)
    }

    /// Moves a sample from its current tube into an empty destination tube.
    ///
    /// Only the sample's `tube_barcode` changes; id and name are untouched.
    /// After the transfer the source tube is empty. Transferring a tube onto
    /// itself is rejected as an occupied destination: the occupancy check
    /// does not special-case the source.
    ///
    /// # Errors
    /// - [`LedgerError::TubeBarcodeBadFormat`] naming whichever barcode is
    ///   malformed (source checked first).
    /// - [`LedgerError::OccupiedDestinationTube`] when the destination holds
    ///   a sample, including the race where it fills between the occupancy
    ///   check and the commit.
    /// - [`LedgerError::TubeNotFound`] when the source tube is empty.
    pub fn tube_transfer(
        &self,
        source_tube_barcode: &str,
        destination_tube_barcode: &str,
    ) -> LedgerResult<()> {
        let source = barcode::normalize(source_tube_barcode);
        if !barcode::is_tube_barcode(&source) {
            return Err(LedgerError::TubeBarcodeBadFormat(source));
        }

        let destination = barcode::normalize(destination_tube_barcode);
        if !barcode::is_tube_barcode(&destination) {
            return Err(LedgerError::TubeBarcodeBadFormat(destination));
        }

        if self.samples.find_by_tube_barcode(&destination)?.is_some() {
            return Err(LedgerError::OccupiedDestinationTube(destination));
        }

        let sample = self
            .samples
            .find_by_tube_barcode(&source)?
            .ok_or_else(|| LedgerError::TubeNotFound(source.clone()))?;

        self.samples
            .update_tube_barcode(sample.id, &destination)
            .map_err(|err| match err {
                // Lost the race: another writer took the destination between
                // the occupancy check and this commit. The UNIQUE constraint
                // on tube_barcode is the arbiter.
                RepoError::ConstraintViolation(_) => {
                    warn!(
                        "event=tube_transfer module=ledger status=conflict destination={destination}"
                    );
                    LedgerError::OccupiedDestinationTube(destination.clone())
                }
                other => other.into(),
            })?;

        info!(
            "event=tube_transfer module=ledger status=ok sample_id={} source={source} destination={destination}",
            sample.id
        );
        Ok(())
    }

    /// Reports the contents of a tube or plate, dispatching on the barcode
    /// grammar. The tube grammar is checked first; the `NT`/`DN` prefixes
    /// are disjoint, so the order never causes ambiguity.
    ///
    /// # Errors
    /// - [`LedgerError::TubeNotFound`] for an empty tube.
    /// - [`LedgerError::OccupiedWellsNotFound`] for a plate without occupied
    ///   wells; a never-used barcode and an empty plate are indistinguishable
    ///   because plates have no record of their own.
    /// - [`LedgerError::BarcodeBadFormat`] when neither grammar matches.
    pub fn list_samples_in(&self, container_barcode: &str) -> LedgerResult<ContainerReport> {
        let container_barcode = barcode::normalize(container_barcode);

        if barcode::is_tube_barcode(&container_barcode) {
            return self.tube_report(container_barcode).map(ContainerReport::Tube);
        }

        if barcode::is_plate_barcode(&container_barcode) {
            return self
                .plate_report(container_barcode)
                .map(ContainerReport::Plate);
        }

        Err(LedgerError::BarcodeBadFormat(container_barcode))
    }

    fn tube_report(&self, tube_barcode: String) -> LedgerResult<TubeReport> {
        let sample = self
            .samples
            .find_by_tube_barcode(&tube_barcode)?
            .ok_or_else(|| LedgerError::TubeNotFound(tube_barcode.clone()))?;

        Ok(TubeReport {
            barcode: tube_barcode,
            sample_id: sample.id,
            customer_sample_name: sample.customer_sample_name,
        })
    }

    fn plate_report(&self, plate_barcode: String) -> LedgerResult<PlateReport> {
        let wells_and_samples = self.wells.list_by_plate(&plate_barcode)?;
        if wells_and_samples.is_empty() {
            return Err(LedgerError::OccupiedWellsNotFound(plate_barcode));
        }

        let wells = wells_and_samples
            .into_iter()
            .map(|(well, sample)| PlateWell {
                position: well.position,
                sample_id: well.sample_id,
                customer_sample_name: sample.customer_sample_name,
            })
            .collect();

        Ok(PlateReport {
            barcode: plate_barcode,
            wells,
        })
    }
}
