//! The model represents the static input data provided by the user.
use crate::input::input_err_msg;
use crate::parameter_set::ParameterSet;
use crate::series::{PeriodSeries, ScenarioMap};
use crate::sweep::Sweep;
use crate::units::{Dimensionless, MoneyPerPower};
use anyhow::{Context, Result, ensure};
use std::path::{Path, PathBuf};

pub mod parameters;
pub use parameters::ModelParameters;

/// The number of periods shared by all scenarios
fn horizon(scenarios: &ScenarioMap) -> usize {
    scenarios.values().next().map_or(0, PeriodSeries::num_periods)
}

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// The plant fleet
    pub fleet: ParameterSet,
    /// Demand series for each scenario
    pub scenarios: ScenarioMap,
    /// Renewable availability, if provided
    pub renewables: Option<PeriodSeries>,
    /// The penetration factors to sweep over
    pub alphas: Vec<Dimensionless>,
    /// Index of the plant whose trajectory is recorded
    pub designated_plant: Option<usize>,
}

impl Model {
    /// Assemble a model from its parts, checking that they are consistent with one another
    pub fn new(
        model_path: &Path,
        parameters: ModelParameters,
        fleet: ParameterSet,
        scenarios: ScenarioMap,
        renewables: Option<PeriodSeries>,
    ) -> Result<Self> {
        let model_file = model_path.join("model.toml");
        let alphas = parameters.alphas().with_context(|| input_err_msg(&model_file))?;
        let designated_plant = parameters
            .designated_plant
            .as_ref()
            .map(|id| fleet.index_of(id))
            .transpose()
            .with_context(|| input_err_msg(&model_file))?;

        let num_periods = horizon(&scenarios);
        match &renewables {
            Some(renewables) => ensure!(
                renewables.num_periods() == num_periods,
                "Renewable availability covers {} periods but demand covers {num_periods}",
                renewables.num_periods()
            ),
            None => ensure!(
                alphas.iter().all(|alpha| alpha.value() == 0.0),
                "Non-zero values of alpha require a renewables.csv file"
            ),
        }

        Ok(Self {
            model_path: model_path.to_path_buf(),
            parameters,
            fleet,
            scenarios,
            renewables,
            alphas,
            designated_plant,
        })
    }

    /// Number of periods in the horizon
    pub fn num_periods(&self) -> usize {
        horizon(&self.scenarios)
    }

    /// The slack penalties to sweep over
    pub fn lambdas(&self) -> &[MoneyPerPower] {
        &self.parameters.lambdas
    }

    /// Set up a sweep over every scenario, slack penalty and penetration factor
    pub fn sweep(&self, log_to_console: bool) -> Sweep<'_> {
        Sweep {
            parameters: &self.fleet,
            scenarios: &self.scenarios,
            renewables: self.renewables.as_ref(),
            lambdas: self.lambdas(),
            alphas: &self.alphas,
            options: self.parameters.formulation_options(),
            solver_options: self.parameters.solver_options(log_to_console),
            designated_plant: self.designated_plant,
        }
    }
}
