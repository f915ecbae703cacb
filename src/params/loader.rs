//! Load parameter sets from JSON or CSV files

use super::InvestmentParameters;
use crate::error::LoadError;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a single parameter set from a JSON file.
///
/// Missing fields take their default values.
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<InvestmentParameters, LoadError> {
    let file = File::open(path)?;
    let params = serde_json::from_reader(BufReader::new(file))?;
    Ok(params)
}

/// Load one parameter set per row from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<InvestmentParameters>, LoadError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<InvestmentParameters>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for result in csv_reader.deserialize() {
        let row: InvestmentParameters = result?;
        scenarios.push(row);
    }

    log::debug!("loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}
