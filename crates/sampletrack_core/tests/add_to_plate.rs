use rusqlite::Connection;
use sampletrack_core::db::open_db_in_memory;
use sampletrack_core::{
    ContainerReport, Ledger, LedgerError, Sample, SqliteSampleRepository, SqliteWellRepository,
};

fn ledger(
    conn: &Connection,
) -> Ledger<SqliteSampleRepository<'_>, SqliteWellRepository<'_>> {
    Ledger::new(
        SqliteSampleRepository::try_new(conn).unwrap(),
        SqliteWellRepository::try_new(conn).unwrap(),
    )
}

fn receive(
    ledger: &Ledger<SqliteSampleRepository<'_>, SqliteWellRepository<'_>>,
    name: &str,
    tube: &str,
) -> Sample {
    ledger.record_receipt(name, tube).unwrap()
}

#[test]
fn places_sample_into_a_well() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "test", "NT123");

    let well = ledger.add_to_plate(sample.id, "DN1", "A1").unwrap();
    assert_eq!(well.plate_barcode, "DN1");
    assert_eq!(well.position.to_string(), "A1");
    assert_eq!(well.sample_id, sample.id);
}

#[test]
fn lowercase_position_and_plate_are_equivalent_to_uppercase() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "Alice", "NT1");

    let well = ledger.add_to_plate(sample.id, "dn1", "a1").unwrap();
    assert_eq!(well.plate_barcode, "DN1");
    assert_eq!(well.position.to_string(), "A1");

    // Same position uppercase collides with the lowercase placement.
    let err = ledger.add_to_plate(sample.id, "DN1", "A1").unwrap_err();
    assert!(matches!(err, LedgerError::WellPositionOccupied { .. }));
}

#[test]
fn one_sample_may_occupy_many_wells() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "test", "NT123");

    for position in ["A1", "A2", "B2", "B3"] {
        ledger.add_to_plate(sample.id, "DN1", position).unwrap();
    }
    ledger.add_to_plate(sample.id, "DN2", "H12").unwrap();

    // Placement is an association, not a move: the tube still reports the sample.
    match ledger.list_samples_in("NT123").unwrap() {
        ContainerReport::Tube(report) => assert_eq!(report.sample_id, sample.id),
        other => panic!("expected tube report, got {other:?}"),
    }
}

#[test]
fn occupied_position_rejects_same_and_different_sample() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample_one = receive(&ledger, "test", "NT123");
    let sample_two = receive(&ledger, "test second sample", "NT333");

    ledger.add_to_plate(sample_one.id, "DN1", "A1").unwrap();

    let same = ledger.add_to_plate(sample_one.id, "DN1", "A1").unwrap_err();
    assert!(matches!(
        same,
        LedgerError::WellPositionOccupied { ref position, ref plate_barcode }
            if position == "A1" && plate_barcode == "DN1"
    ));

    let different = ledger.add_to_plate(sample_two.id, "DN1", "A1").unwrap_err();
    assert!(matches!(
        different,
        LedgerError::WellPositionOccupied { .. }
    ));
}

#[test]
fn unknown_sample_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    let err = ledger.add_to_plate(993, "DN1", "A1").unwrap_err();
    assert!(matches!(err, LedgerError::SampleNotFound(993)));
}

#[test]
fn non_positive_sample_id_is_a_format_error() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    for bad in [-1, 0] {
        let err = ledger.add_to_plate(bad, "DN1", "A1").unwrap_err();
        assert!(matches!(err, LedgerError::SampleIdBadFormat(id) if id == bad));
    }
}

#[test]
fn malformed_plate_barcode_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "test", "NT123");

    for bad in ["DN_1", "DN", "PR1", "1DN"] {
        let err = ledger.add_to_plate(sample.id, bad, "A1").unwrap_err();
        assert!(
            matches!(err, LedgerError::PlateBarcodeBadFormat(_)),
            "expected plate format error for `{bad}`"
        );
    }
}

#[test]
fn malformed_or_out_of_grid_position_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "test", "NT123");

    // Grammar violations and out-of-grid coordinates share one error kind.
    for bad in ["1", "A", "A0", "A13", "Z1", "Z100", "I1"] {
        let err = ledger.add_to_plate(sample.id, "DN1", bad).unwrap_err();
        assert!(
            matches!(err, LedgerError::WellPositionBadFormat(_)),
            "expected position format error for `{bad}`"
        );
    }

    let wells: i64 = conn
        .query_row("SELECT COUNT(*) FROM wells;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(wells, 0);
}

#[test]
fn corner_positions_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let sample = receive(&ledger, "test", "NT123");

    ledger.add_to_plate(sample.id, "DN1", "A1").unwrap();
    ledger.add_to_plate(sample.id, "DN1", "H12").unwrap();
}
