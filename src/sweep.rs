//! The sweep driver: solves one problem for every combination of demand scenario, slack penalty
//! and renewable penetration factor.
use crate::analysis::correlation_table;
use crate::model::Model;
use crate::optimisation::problem::{SolveStatus, SolverOptions};
use crate::optimisation::{FormulationOptions, ModelBuilder, SolvedProblem, Solution};
use crate::output::DataWriter;
use crate::parameter_set::ParameterSet;
use crate::series::{PeriodSeries, ScenarioID, ScenarioMap};
use crate::units::{Dimensionless, MoneyPerPower};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use itertools::iproduct;
use log::{LevelFilter, debug, info, warn};
use std::path::Path;

pub mod kpi;
use kpi::{KpiGrid, KpiRecord, ScheduleKpis};

/// Run the sweep for a model and write the results.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write the full schedule for every combination
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let mut writer = DataWriter::create(output_path, &model.model_path, debug_model)?;

    // HiGHS writes straight to the console, so only let it do so when asked for verbose output
    let log_to_console = log::max_level() >= LevelFilter::Debug;

    info!(
        "Sweeping {} scenarios, {} values of λ and {} values of α over {} periods",
        model.scenarios.len(),
        model.lambdas().len(),
        model.alphas.len(),
        model.num_periods()
    );
    let results = model
        .sweep(log_to_console)
        .run(|combination, solution| {
            writer.write_debug_schedule(combination, solution, &model.fleet)
        })?;

    writer.write_kpis(&results, &model.fleet)?;
    if model.designated_plant.is_some() {
        writer.write_trajectories(&results)?;
        let correlations =
            correlation_table(&model.scenarios, &results, model.parameters.analysis_window);
        writer.write_correlations(&correlations)?;
    }
    writer.flush()?;

    Ok(())
}

/// One combination of the sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination<'a> {
    /// The demand scenario
    pub scenario_id: &'a ScenarioID,
    /// The slack penalty
    pub lambda: MoneyPerPower,
    /// The renewable penetration factor
    pub alpha: Dimensionless,
}

/// Everything needed to run a sweep
pub struct Sweep<'a> {
    /// The plant fleet
    pub parameters: &'a ParameterSet,
    /// Demand series for each scenario
    pub scenarios: &'a ScenarioMap,
    /// Renewable availability, if any
    pub renewables: Option<&'a PeriodSeries>,
    /// Slack penalties to sweep over
    pub lambdas: &'a [MoneyPerPower],
    /// Penetration factors to sweep over
    pub alphas: &'a [Dimensionless],
    /// How the problem is formulated
    pub options: FormulationOptions,
    /// Options passed to the solver
    pub solver_options: SolverOptions,
    /// Index of the plant whose trajectory is recorded
    pub designated_plant: Option<usize>,
}

/// KPI grids for each scenario, in scenario order
pub type SweepResults = IndexMap<ScenarioID, KpiGrid>;

impl Sweep<'_> {
    /// Run the sweep.
    ///
    /// Combinations are visited in the order scenario, λ, α. A fresh problem is built and solved
    /// for each one. Non-optimal outcomes are logged and recorded without stopping the sweep.
    ///
    /// # Arguments
    ///
    /// * `on_solution` - Called with every optimal schedule (e.g. to write debug output)
    ///
    /// # Returns
    ///
    /// The KPI grid for each scenario, or an error if a problem could not be built.
    pub fn run<F>(&self, mut on_solution: F) -> Result<SweepResults>
    where
        F: FnMut(&Combination, &Solution) -> Result<()>,
    {
        ensure!(!self.lambdas.is_empty(), "No slack penalties given");
        ensure!(!self.alphas.is_empty(), "No penetration factors given");
        ensure!(
            self.renewables.is_some() || self.alphas.iter().all(|alpha| alpha.value() == 0.0),
            "Non-zero penetration factors require a renewable series"
        );

        let mut results = SweepResults::new();
        for (scenario_id, demand) in self.scenarios {
            info!(
                "Solving scenario {scenario_id} for {} combinations",
                self.lambdas.len() * self.alphas.len()
            );

            let mut grid = KpiGrid::new(self.lambdas, self.alphas);
            for (&lambda, &alpha) in iproduct!(self.lambdas, self.alphas) {
                let combination = Combination {
                    scenario_id,
                    lambda,
                    alpha,
                };
                let record = self
                    .solve_combination(&combination, demand, &mut on_solution)
                    .with_context(|| {
                        format!("Failed for scenario {scenario_id} with λ={lambda}, α={alpha}")
                    })?;
                grid.push(record);
            }

            info!("Objective values for scenario {scenario_id}:\n{}", grid.objective_table());
            results.insert(scenario_id.clone(), grid);
        }

        Ok(results)
    }

    /// Build and solve the problem for one combination
    fn solve_combination<F>(
        &self,
        combination: &Combination,
        demand: &PeriodSeries,
        on_solution: &mut F,
    ) -> Result<KpiRecord>
    where
        F: FnMut(&Combination, &Solution) -> Result<()>,
    {
        let mut builder = ModelBuilder::new(self.parameters, demand)
            .with_slack_penalty(combination.lambda)
            .with_options(self.options);
        if let Some(renewables) = self.renewables {
            builder = builder.with_renewables(renewables, combination.alpha);
        }

        let problem = builder.build()?;
        debug!(
            "Solving λ={}, α={} ({} columns, {} rows)",
            combination.lambda,
            combination.alpha,
            problem.problem().num_cols(),
            problem.problem().num_rows()
        );

        let (status, kpis) = match problem.solve(&self.solver_options) {
            SolvedProblem::Optimal(solution) => {
                on_solution(combination, &solution)?;
                let kpis = ScheduleKpis::from_solution(&solution, self.designated_plant);
                (SolveStatus::Optimal, Some(kpis))
            }
            SolvedProblem::NotOptimal(status, message) => {
                warn!(
                    "No optimal schedule for scenario {} with λ={}, α={}: {status}{}",
                    combination.scenario_id,
                    combination.lambda,
                    combination.alpha,
                    message.map(|msg| format!(" ({msg})")).unwrap_or_default()
                );
                (status, None)
            }
        };

        Ok(KpiRecord {
            scenario_id: combination.scenario_id.clone(),
            lambda: combination.lambda,
            alpha: combination.alpha,
            status,
            kpis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{series, toy_demand, toy_parameters};
    use crate::units::{Money, Power};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_sweep_toy(toy_parameters: ParameterSet, toy_demand: PeriodSeries) {
        let scenarios: ScenarioMap = [
            ("base".into(), toy_demand),
            ("peak".into(), series(&[100.0, 90.0, 300.0, 160.0, 140.0])),
        ]
        .into_iter()
        .collect();
        let renewables = series(&[40.0; 5]);
        let lambdas = [MoneyPerPower(10.0)];
        let alphas = [Dimensionless(0.0), Dimensionless(0.5)];
        let sweep = Sweep {
            parameters: &toy_parameters,
            scenarios: &scenarios,
            renewables: Some(&renewables),
            lambdas: &lambdas,
            alphas: &alphas,
            options: FormulationOptions::default(),
            solver_options: SolverOptions::default(),
            designated_plant: Some(1),
        };

        let mut num_solutions = 0;
        let results = sweep
            .run(|_, _| {
                num_solutions += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(num_solutions, 2);
        assert_eq!(results.len(), 2);

        let base = &results["base"];
        let record = base.get(0, 0).unwrap();
        assert_eq!(record.status, SolveStatus::Optimal);
        assert_approx_eq!(f64, record.objective().unwrap().value(), 6050.0, epsilon = 1e-4);
        let kpis = record.kpis.as_ref().unwrap();
        assert_eq!(kpis.plants[0].periods_on, 5);
        assert_eq!(kpis.plants[0].startups, 0);
        assert_eq!(kpis.plants[1].periods_on, 4);
        assert_eq!(kpis.plants[1].startups, 1);
        let production: Power = kpis.plants.iter().map(|plant| plant.production).sum();
        assert_approx_eq!(f64, production.value(), 630.0, epsilon = 1e-4);
        assert_approx_eq!(f64, kpis.total_slack.value(), 0.0, epsilon = 1e-4);
        let trajectory = record.trajectory().unwrap();
        assert_eq!(trajectory.len(), 5);
        assert_approx_eq!(f64, trajectory[0].value(), 0.0, epsilon = 1e-4);

        let record = base.get(0, 1).unwrap();
        assert_approx_eq!(f64, record.objective().unwrap().value(), 5080.0, epsilon = 1e-4);

        // Peak demand exceeds the fleet's capacity, which is recorded rather than raised
        for record in results["peak"].iter() {
            assert_eq!(record.status, SolveStatus::Infeasible);
            assert_eq!(record.objective(), None::<Money>);
            assert!(record.trajectory().is_none());
        }
    }

    #[rstest]
    fn test_sweep_alpha_without_renewables(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
    ) {
        let scenarios: ScenarioMap = [("base".into(), toy_demand)].into_iter().collect();
        let sweep = Sweep {
            parameters: &toy_parameters,
            scenarios: &scenarios,
            renewables: None,
            lambdas: &[MoneyPerPower(10.0)],
            alphas: &[Dimensionless(0.5)],
            options: FormulationOptions::default(),
            solver_options: SolverOptions::default(),
            designated_plant: None,
        };
        assert!(sweep.run(|_, _| Ok(())).is_err());
    }

    #[rstest]
    fn test_sweep_build_error_has_context(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
    ) {
        let scenarios: ScenarioMap = [("base".into(), toy_demand)].into_iter().collect();
        let sweep = Sweep {
            parameters: &toy_parameters,
            scenarios: &scenarios,
            renewables: None,
            lambdas: &[MoneyPerPower(-1.0)],
            alphas: &[Dimensionless(0.0)],
            options: FormulationOptions::default(),
            solver_options: SolverOptions::default(),
            designated_plant: None,
        };
        let err = sweep.run(|_, _| Ok(())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed for scenario base with λ=-1, α=0"
        );
    }
}
