//! Code for reading renewable availability.
use super::*;
use serde::Deserialize;

const RENEWABLES_FILE_NAME: &str = "renewables.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct RenewableRaw {
    period: usize,
    availability: Power,
}

/// Read renewable availability from `renewables.csv`, if present.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The availability in each period, or `None` if the model has no renewables file.
pub fn read_renewables(model_dir: &Path) -> Result<Option<PeriodSeries>> {
    let file_path = model_dir.join(RENEWABLES_FILE_NAME);
    let Some(rows) = read_csv_optional::<RenewableRaw>(&file_path)? else {
        return Ok(None);
    };

    let pairs = rows.into_iter().map(|row| (row.period, row.availability));
    let series = period_series_from_pairs(pairs).with_context(|| input_err_msg(&file_path))?;

    Ok(Some(series))
}
