//! The module responsible for writing output data to disk.
use crate::analysis::CorrelationRecord;
use crate::optimisation::Solution;
use crate::optimisation::problem::SolveStatus;
use crate::parameter_set::ParameterSet;
use crate::plant::PlantID;
use crate::series::ScenarioID;
use crate::sweep::{Combination, SweepResults};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "ucsweep_results";

/// The output file name for per-combination KPIs
const KPIS_FILE_NAME: &str = "kpis.csv";

/// The output file name for per-plant KPIs
const PLANT_KPIS_FILE_NAME: &str = "plant_kpis.csv";

/// The output file name for the designated plant's trajectories
const TRAJECTORIES_FILE_NAME: &str = "trajectories.csv";

/// The output file name for the volatility correlations
const CORRELATIONS_FILE_NAME: &str = "correlations.csv";

/// The output file name for full schedules
const SCHEDULES_FILE_NAME: &str = "debug_schedules.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing data that was deleted, false if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the KPIs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct KpiRow {
    scenario_id: ScenarioID,
    lambda: f64,
    alpha: f64,
    status: SolveStatus,
    objective: Option<f64>,
    total_slack: Option<f64>,
}

/// Represents a row in the per-plant KPIs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PlantKpiRow {
    scenario_id: ScenarioID,
    lambda: f64,
    alpha: f64,
    plant_id: PlantID,
    production: f64,
    periods_on: usize,
    startups: usize,
}

/// Represents a row in the trajectories CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TrajectoryRow {
    scenario_id: ScenarioID,
    lambda: f64,
    alpha: f64,
    period: usize,
    output: f64,
}

/// Represents a row in the correlations CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CorrelationRow {
    lambda: f64,
    alpha: f64,
    scenario_id: ScenarioID,
    correlation: f64,
}

/// Represents a row in the debug schedules CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ScheduleRow {
    scenario_id: ScenarioID,
    lambda: f64,
    alpha: f64,
    period: usize,
    plant_id: PlantID,
    on: bool,
    startup: bool,
    output: f64,
}

/// Open a CSV writer for the given file in the output folder
fn new_writer(output_path: &Path, file_name: &str) -> Result<csv::Writer<File>> {
    let file_path = output_path.join(file_name);
    csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    schedules_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        Ok(Self {
            schedules_writer: new_writer(output_path, SCHEDULES_FILE_NAME)?,
        })
    }

    /// Write the full schedule for one combination
    fn write_schedule(
        &mut self,
        combination: &Combination,
        solution: &Solution,
        fleet: &ParameterSet,
    ) -> Result<()> {
        for (period, plant_idx, decision) in solution.iter_decisions() {
            let row = ScheduleRow {
                scenario_id: combination.scenario_id.clone(),
                lambda: combination.lambda.value(),
                alpha: combination.alpha.value(),
                period,
                plant_id: fleet.plants()[plant_idx].id.clone(),
                on: decision.on,
                startup: decision.startup,
                output: decision.output.value(),
            };
            self.schedules_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.schedules_writer.flush()?;

        Ok(())
    }
}

/// An object for writing sweep results to file
pub struct DataWriter {
    output_path: PathBuf,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Prepare the output folder and write run metadata
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `model_path` - Path to the model being run
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, model_path: &Path, save_debug_info: bool) -> Result<Self> {
        write_metadata(output_path, model_path).context("Failed to save metadata")?;

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            output_path: output_path.to_path_buf(),
            debug_writer,
        })
    }

    /// Write the full schedule for one combination, if debug info is enabled
    pub fn write_debug_schedule(
        &mut self,
        combination: &Combination,
        solution: &Solution,
        fleet: &ParameterSet,
    ) -> Result<()> {
        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_schedule(combination, solution, fleet)?;
        }

        Ok(())
    }

    /// Write KPIs for every combination, plus per-plant KPIs for optimal combinations
    pub fn write_kpis(&self, results: &SweepResults, fleet: &ParameterSet) -> Result<()> {
        let mut kpis_writer = new_writer(&self.output_path, KPIS_FILE_NAME)?;
        let mut plant_kpis_writer = new_writer(&self.output_path, PLANT_KPIS_FILE_NAME)?;
        for record in results.values().flat_map(|grid| grid.iter()) {
            kpis_writer.serialize(KpiRow {
                scenario_id: record.scenario_id.clone(),
                lambda: record.lambda.value(),
                alpha: record.alpha.value(),
                status: record.status,
                objective: record.objective().map(|obj| obj.value()),
                total_slack: record.total_slack().map(|slack| slack.value()),
            })?;

            let Some(kpis) = &record.kpis else {
                continue;
            };
            for (plant, plant_kpis) in fleet.plants().iter().zip(&kpis.plants) {
                plant_kpis_writer.serialize(PlantKpiRow {
                    scenario_id: record.scenario_id.clone(),
                    lambda: record.lambda.value(),
                    alpha: record.alpha.value(),
                    plant_id: plant.id.clone(),
                    production: plant_kpis.production.value(),
                    periods_on: plant_kpis.periods_on,
                    startups: plant_kpis.startups,
                })?;
            }
        }

        kpis_writer.flush()?;
        plant_kpis_writer.flush()?;

        Ok(())
    }

    /// Write the designated plant's trajectory for every optimal combination
    pub fn write_trajectories(&self, results: &SweepResults) -> Result<()> {
        let mut writer = new_writer(&self.output_path, TRAJECTORIES_FILE_NAME)?;
        for record in results.values().flat_map(|grid| grid.iter()) {
            let Some(trajectory) = record.trajectory() else {
                continue;
            };
            for (period, output) in (1..).zip(trajectory) {
                writer.serialize(TrajectoryRow {
                    scenario_id: record.scenario_id.clone(),
                    lambda: record.lambda.value(),
                    alpha: record.alpha.value(),
                    period,
                    output: output.value(),
                })?;
            }
        }
        writer.flush()?;

        Ok(())
    }

    /// Write the volatility correlations
    pub fn write_correlations(&self, records: &[CorrelationRecord]) -> Result<()> {
        let mut writer = new_writer(&self.output_path, CORRELATIONS_FILE_NAME)?;
        for record in records {
            writer.serialize(CorrelationRow {
                lambda: record.lambda.value(),
                alpha: record.alpha.value(),
                scenario_id: record.scenario_id.clone(),
                correlation: record.correlation,
            })?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
