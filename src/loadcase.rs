use crate::error::{RadialError, Result};
use crate::network::{Bus, Case, Line};

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Bus data file name within a case directory.
pub const BUS_FILE: &str = "Bus.txt";
/// Line data file name within a case directory.
pub const LINE_FILE: &str = "Line.txt";

/// Reads `Bus.txt` and `Line.txt` from the case directory `case_dir`.
pub fn load_case(case_dir: &Path) -> Result<Case> {
    let name = case_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_case_files(
        &name,
        &case_dir.join(BUS_FILE),
        &case_dir.join(LINE_FILE),
    )
}

pub fn load_case_files(name: &str, bus_path: &Path, line_path: &Path) -> Result<Case> {
    let bus = read_bus_file(bus_path)?;
    let line = read_line_file(line_path)?;
    log::info!(
        "read {} buses from {} and {} lines from {}",
        bus.len(),
        bus_path.display(),
        line.len(),
        line_path.display()
    );
    Ok(Case {
        name: name.to_string(),
        bus,
        line,
    })
}

/// Reads tab separated bus records:
/// `BusNum, BusType, PG, QG, PL, QL, Voltage, Angle`.
pub fn read_bus_file(path: &Path) -> Result<Vec<Bus>> {
    read_records(path)
}

/// Reads tab separated line records:
/// `FromNode, ToNode, Resistance, Reactance, Susceptance`.
pub fn read_line_file(path: &Path) -> Result<Vec<Line>> {
    read_records(path)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(|err| parse_error(path, err))?;
    rdr.deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|err| parse_error(path, err))
}

fn parse_error(path: &Path, err: csv::Error) -> RadialError {
    RadialError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
