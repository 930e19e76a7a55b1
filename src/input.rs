//! Common routines for handling input data.
use crate::model::Model;
use crate::series::PeriodSeries;
use crate::units::Power;
use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub mod demand;
use demand::read_scenarios;
pub mod plant;
use plant::read_plants;
pub mod renewable;
use renewable::read_renewables;

/// Get the error message to show when an input file is invalid
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a series of type `T`s from a CSV file.
///
/// The file must contain at least one record.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let records = read_csv_records(file_path).with_context(|| input_err_msg(file_path))?;
    ensure!(
        !records.is_empty(),
        "{}: CSV file cannot be empty",
        input_err_msg(file_path)
    );

    Ok(records)
}

/// Read a series of type `T`s from a CSV file, if it exists
pub fn read_csv_optional<T: DeserializeOwned>(file_path: &Path) -> Result<Option<Vec<T>>> {
    if !file_path.exists() {
        return Ok(None);
    }

    read_csv(file_path).map(Some)
}

fn read_csv_records<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }

    Ok(records)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Assemble a [`PeriodSeries`] from `(period, value)` pairs given in any order.
///
/// Every period from 1 to the largest period must appear exactly once.
fn period_series_from_pairs<I>(pairs: I) -> Result<PeriodSeries>
where
    I: IntoIterator<Item = (usize, Power)>,
{
    let mut values = BTreeMap::new();
    for (period, value) in pairs {
        ensure!(period >= 1, "Periods are numbered from 1 (got {period})");
        ensure!(
            values.insert(period, value).is_none(),
            "More than one value given for period {period}"
        );
    }

    for (expected, &period) in (1..).zip(values.keys()) {
        ensure!(period == expected, "No value given for period {expected}");
    }

    PeriodSeries::new(values.into_values().collect())
}

/// Load a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The fully validated model, or an error identifying the offending file.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = crate::model::ModelParameters::from_path(model_dir)?;
    let fleet = read_plants(model_dir)?;
    let scenarios = read_scenarios(model_dir)?;
    let renewables = read_renewables(model_dir)?;

    Model::new(model_dir, parameters, fleet, scenarios, renewables)
}
