//! Interactive front end for the sample ledger.
//!
//! # Responsibility
//! - Collect command names and arguments from stdin.
//! - Invoke ledger operations and print rendered results or errors.
//!
//! All domain logic lives in `sampletrack_core`; this binary only gathers
//! input and displays output.

use sampletrack_core::{
    default_log_level, init_logging, open_db, open_db_in_memory, Ledger, SqliteSampleRepository,
    SqliteWellRepository,
};
use std::io::{self, BufRead, Write};

fn main() {
    if let Ok(log_dir) = std::env::var("SAMPLETRACK_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("error: could not open database: {err}");
            std::process::exit(1);
        }
    };

    let samples = match SqliteSampleRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let wells = match SqliteWellRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let ledger = Ledger::new(samples, wells);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(command) = prompt(&mut lines, "Enter your command (type 'exit' to quit): ")
        else {
            break;
        };

        match command.to_ascii_lowercase().as_str() {
            "" => {}
            "exit" | "quit" => break,
            "record_receipt" => {
                let Some(name) = prompt(&mut lines, "customer_sample_name: ") else {
                    break;
                };
                let Some(tube) = prompt(&mut lines, "tube_barcode: ") else {
                    break;
                };
                match ledger.record_receipt(&name, &tube) {
                    Ok(sample) => println!(
                        "received sample {} ({}) in tube {}",
                        sample.id, sample.customer_sample_name, sample.tube_barcode
                    ),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "add_to_plate" => {
                let Some(id_text) = prompt(&mut lines, "sample_id: ") else {
                    break;
                };
                let Ok(sample_id) = id_text.parse::<i64>() else {
                    eprintln!("error: sample_id must be an integer, got `{id_text}`");
                    continue;
                };
                let Some(plate) = prompt(&mut lines, "plate_barcode: ") else {
                    break;
                };
                let Some(position) = prompt(&mut lines, "well_position: ") else {
                    break;
                };
                match ledger.add_to_plate(sample_id, &plate, &position) {
                    Ok(well) => println!(
                        "placed sample {} at {} on plate {}",
                        well.sample_id, well.position, well.plate_barcode
                    ),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "tube_transfer" => {
                let Some(source) = prompt(&mut lines, "source_tube_barcode: ") else {
                    break;
                };
                let Some(destination) = prompt(&mut lines, "destination_tube_barcode: ") else {
                    break;
                };
                match ledger.tube_transfer(&source, &destination) {
                    Ok(()) => println!("transferred {source} -> {destination}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "list_samples_in" => {
                let Some(container) = prompt(&mut lines, "container_barcode: ") else {
                    break;
                };
                match ledger.list_samples_in(&container) {
                    Ok(report) => print!("{}", report.render()),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            other => eprintln!(
                "unknown command `{other}`; expected record_receipt, add_to_plate, \
                 tube_transfer, list_samples_in, or exit"
            ),
        }
    }
}

/// Prints `message` and reads one trimmed line; `None` on EOF or read error.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    message: &str,
) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();
    match lines.next()? {
        Ok(line) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
