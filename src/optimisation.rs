//! Code for building and solving the unit-commitment problem.
//!
//! A fresh problem is built for every combination of demand scenario, slack penalty and renewable
//! penetration factor. Nothing is shared between problems except the read-only input data.
use crate::parameter_set::ParameterSet;
use crate::plant::InitialCondition;
use crate::series::PeriodSeries;
use crate::units::{Dimensionless, Money, MoneyPerPower, Power};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use itertools::iproduct;
use log::debug;
use serde_string_enum::DeserializeLabeledStringEnum;

pub mod constraints;
use constraints::add_common_constraints;
pub mod formulation;
use formulation::{Formulation, RollingRange};
pub mod problem;
use problem::{
    LinearProblem, PrimalSolution, Sense, SolveOutcome, SolveStatus, SolverOptions, Variable,
    VariableKind,
};

/// Values of binary variables at or above this threshold are read as 1
const BINARY_THRESHOLD: f64 = 0.5;

/// The type of the output variables
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputVariable {
    /// Output can take any value between the plant's limits
    #[default]
    #[string = "continuous"]
    Continuous,
    /// Output is restricted to whole units
    #[string = "integer"]
    Integer,
}

impl OutputVariable {
    fn kind(self) -> VariableKind {
        match self {
            Self::Continuous => VariableKind::Continuous,
            Self::Integer => VariableKind::Integer,
        }
    }
}

/// The variables for one plant in one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitVariables {
    /// Whether the plant is on
    pub on: Variable,
    /// Whether the plant is started in this period
    pub startup: Variable,
    /// Whether the plant is stopped in this period (three-binary formulation only)
    pub shutdown: Option<Variable>,
    /// The plant's output
    pub output: Variable,
}

/// The on/off state of a plant in the period before some period
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviousState {
    /// The pre-horizon state, which is a fixed 0 or 1
    Fixed(f64),
    /// The on/off variable of the previous period
    Variable(Variable),
}

/// A map for easy lookup of variables in the problem.
///
/// The entries are ordered (see [`IndexMap`]).
///
/// We use this data structure for two things:
///
/// 1. In order define constraints for the optimisation
/// 2. To keep track of the combination of parameters that each variable corresponds to, for when we
///    are reading the results of the optimisation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableMap {
    unit_vars: IndexMap<(usize, usize), UnitVariables>,
    slack_vars: IndexMap<usize, Variable>,
}

impl VariableMap {
    /// Get the variables for the given plant index and period.
    ///
    /// # Panics
    ///
    /// If the plant or period is not part of the problem.
    pub fn unit(&self, plant_idx: usize, period: usize) -> UnitVariables {
        *self
            .unit_vars
            .get(&(plant_idx, period))
            .expect("No variables found for given plant and period")
    }

    /// Get the slack variable for the given period
    pub fn slack(&self, period: usize) -> Variable {
        *self
            .slack_vars
            .get(&period)
            .expect("No slack variable found for given period")
    }

    /// The plant's state in the period before `period`
    pub fn previous_state(
        &self,
        plant_idx: usize,
        period: usize,
        init: &InitialCondition,
    ) -> PreviousState {
        if period == 1 {
            PreviousState::Fixed(init.state())
        } else {
            PreviousState::Variable(self.unit(plant_idx, period - 1).on)
        }
    }
}

/// Settings which select how the problem is formulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormulationOptions {
    /// How minimum up and down times are encoded
    pub formulation: Formulation,
    /// Which periods receive rolling-sum constraints
    pub rolling_range: RollingRange,
    /// The type of the output variables
    pub output_variable: OutputVariable,
}

/// Builds unit-commitment problems from input data.
///
/// Call [`ModelBuilder::build`] to get an independent problem; the builder itself holds no
/// mutable state and may be reused.
pub struct ModelBuilder<'a> {
    parameters: &'a ParameterSet,
    demand: &'a PeriodSeries,
    renewables: Option<&'a PeriodSeries>,
    alpha: Dimensionless,
    slack_penalty: MoneyPerPower,
    options: FormulationOptions,
}

impl<'a> ModelBuilder<'a> {
    /// Create a new [`ModelBuilder`] for the given fleet and demand series
    pub fn new(parameters: &'a ParameterSet, demand: &'a PeriodSeries) -> Self {
        Self {
            parameters,
            demand,
            renewables: None,
            alpha: Dimensionless(0.0),
            slack_penalty: MoneyPerPower(0.0),
            options: FormulationOptions::default(),
        }
    }

    /// Credit a fraction `alpha` of the renewable series against demand
    pub fn with_renewables(self, renewables: &'a PeriodSeries, alpha: Dimensionless) -> Self {
        Self {
            renewables: Some(renewables),
            alpha,
            ..self
        }
    }

    /// Penalise each unit of excess production with the given cost
    pub fn with_slack_penalty(self, slack_penalty: MoneyPerPower) -> Self {
        Self {
            slack_penalty,
            ..self
        }
    }

    /// Use the given formulation options
    pub fn with_options(self, options: FormulationOptions) -> Self {
        Self { options, ..self }
    }

    /// Check the parameters which can't be checked when the input data are loaded
    fn validate(&self) -> Result<()> {
        ensure!(
            self.alpha.value().is_finite() && (0.0..=1.0).contains(&self.alpha.value()),
            "Renewable penetration factor must be between 0 and 1 (got {})",
            self.alpha
        );
        ensure!(
            self.slack_penalty.is_finite() && self.slack_penalty >= MoneyPerPower(0.0),
            "Slack penalty must be a finite, non-negative number (got {})",
            self.slack_penalty
        );
        if let Some(renewables) = self.renewables {
            ensure!(
                renewables.num_periods() == self.demand.num_periods(),
                "Renewable series covers {} periods but demand covers {}",
                renewables.num_periods(),
                self.demand.num_periods()
            );
        }

        Ok(())
    }

    /// The demand to be met by dispatchable plants in a period, after renewables are credited
    fn residual_demand(&self, period: usize) -> Power {
        let credit = self
            .renewables
            .map_or(Power(0.0), |renewables| self.alpha * renewables.get(period));

        self.demand.get(period) - credit
    }

    /// Build the problem.
    ///
    /// Fails only if the inputs are inconsistent. Whether the problem is feasible is only known
    /// once it is solved.
    pub fn build(&self) -> Result<UnitCommitmentProblem> {
        self.validate()?;

        let num_periods = self.demand.num_periods();
        let strategy = self.options.formulation.strategy(self.options.rolling_range);
        let mut problem = LinearProblem::new(Sense::Minimise);
        let variables = add_variables(
            &mut problem,
            self.parameters,
            num_periods,
            self.slack_penalty,
            self.options.output_variable,
            strategy.uses_shutdown_indicator(),
        );

        let residual_demand: Vec<Power> = self
            .demand
            .periods()
            .map(|period| self.residual_demand(period))
            .collect();
        add_common_constraints(&mut problem, &variables, self.parameters, &residual_demand);
        strategy.add_constraints(&mut problem, &variables, self.parameters, num_periods);

        debug!(
            "Built {:?} problem with {} columns and {} rows",
            self.options.formulation,
            problem.num_cols(),
            problem.num_rows()
        );

        Ok(UnitCommitmentProblem {
            problem,
            variables,
            num_plants: self.parameters.len(),
            num_periods,
        })
    }
}

/// Add variables to the optimisation problem.
///
/// The objective coefficients are set here: variable cost on output, no-load cost on the on/off
/// state, startup cost on the startup indicator and the slack penalty on excess production.
///
/// # Returns
///
/// A [`VariableMap`] with the problem's variables as values.
fn add_variables(
    problem: &mut LinearProblem,
    parameters: &ParameterSet,
    num_periods: usize,
    slack_penalty: MoneyPerPower,
    output_variable: OutputVariable,
    with_shutdown: bool,
) -> VariableMap {
    let mut variables = VariableMap::default();

    for ((plant_idx, plant), period) in iproduct!(parameters.iter(), 1..=num_periods) {
        // Transitions can't happen while the state is pinned by history
        let transition_max = if plant.initial_condition().is_pinned(period) {
            0.0
        } else {
            1.0
        };

        let on = problem.add_column(
            VariableKind::Binary,
            plant.no_load_cost.value(),
            0.0..=1.0,
        );
        let startup = problem.add_column(
            VariableKind::Binary,
            plant.startup_cost.value(),
            0.0..=transition_max,
        );
        let shutdown = with_shutdown
            .then(|| problem.add_column(VariableKind::Binary, 0.0, 0.0..=transition_max));
        let output = problem.add_column(
            output_variable.kind(),
            plant.variable_cost.value(),
            0.0..=plant.max_output.value(),
        );

        let vars = UnitVariables {
            on,
            startup,
            shutdown,
            output,
        };
        let existing = variables.unit_vars.insert((plant_idx, period), vars).is_some();
        assert!(!existing, "Duplicate entry for var");
    }

    for period in 1..=num_periods {
        let slack = problem.add_column(VariableKind::Continuous, slack_penalty.value(), 0.0..);
        variables.slack_vars.insert(period, slack);
    }

    variables
}

/// A fully built problem, ready to be solved
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCommitmentProblem {
    problem: LinearProblem,
    variables: VariableMap,
    num_plants: usize,
    num_periods: usize,
}

impl UnitCommitmentProblem {
    /// The underlying matrix formulation
    pub fn problem(&self) -> &LinearProblem {
        &self.problem
    }

    /// The variables of the problem
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Solve the problem, consuming it
    pub fn solve(self, options: &SolverOptions) -> SolvedProblem {
        match self.problem.solve(options) {
            SolveOutcome::Optimal(solution) => SolvedProblem::Optimal(Solution {
                solution,
                variables: self.variables,
                num_plants: self.num_plants,
                num_periods: self.num_periods,
            }),
            SolveOutcome::Infeasible => SolvedProblem::NotOptimal(SolveStatus::Infeasible, None),
            SolveOutcome::Unbounded => SolvedProblem::NotOptimal(SolveStatus::Unbounded, None),
            SolveOutcome::SolverError(msg) => {
                SolvedProblem::NotOptimal(SolveStatus::SolverError, Some(msg))
            }
        }
    }
}

/// The result of solving a [`UnitCommitmentProblem`]
#[derive(Debug)]
pub enum SolvedProblem {
    /// An optimal schedule was found
    Optimal(Solution),
    /// No optimal schedule was found, with an optional message from the solver
    NotOptimal(SolveStatus, Option<String>),
}

impl SolvedProblem {
    /// The status of the solve
    pub fn status(&self) -> SolveStatus {
        match self {
            Self::Optimal(_) => SolveStatus::Optimal,
            Self::NotOptimal(status, _) => *status,
        }
    }
}

/// The decisions for one plant in one period of an optimal schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDecision {
    /// Whether the plant is on
    pub on: bool,
    /// Whether the plant is started in this period
    pub startup: bool,
    /// Whether the plant is stopped in this period, if the formulation has shutdown indicators
    pub shutdown: Option<bool>,
    /// The plant's output
    pub output: Power,
}

/// An optimal solution to the unit-commitment problem
#[derive(Debug)]
pub struct Solution {
    solution: PrimalSolution,
    variables: VariableMap,
    num_plants: usize,
    num_periods: usize,
}

impl Solution {
    /// The objective value (total system cost including slack penalties)
    pub fn objective_value(&self) -> Money {
        Money(self.solution.objective_value)
    }

    /// The raw value of every column
    pub fn values(&self) -> &[f64] {
        &self.solution.values
    }

    /// Number of periods in the horizon
    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    /// Number of plants
    pub fn num_plants(&self) -> usize {
        self.num_plants
    }

    fn value(&self, var: Variable) -> f64 {
        self.solution.values[var.index()]
    }

    fn is_set(&self, var: Variable) -> bool {
        self.value(var) >= BINARY_THRESHOLD
    }

    /// The decisions for the given plant in the given period
    pub fn decision(&self, plant_idx: usize, period: usize) -> UnitDecision {
        let vars = self.variables.unit(plant_idx, period);
        UnitDecision {
            on: self.is_set(vars.on),
            startup: self.is_set(vars.startup),
            shutdown: vars.shutdown.map(|var| self.is_set(var)),
            output: Power(self.value(vars.output)),
        }
    }

    /// Excess production in the given period
    pub fn slack(&self, period: usize) -> Power {
        Power(self.value(self.variables.slack(period)))
    }

    /// Iterate over the decisions for every period and plant.
    ///
    /// # Returns
    ///
    /// An iterator of tuples containing the period, plant index and decisions.
    pub fn iter_decisions(&self) -> impl Iterator<Item = (usize, usize, UnitDecision)> + '_ {
        iproduct!(1..=self.num_periods, 0..self.num_plants)
            .map(|(period, plant_idx)| (period, plant_idx, self.decision(plant_idx, period)))
    }

    /// Iterate over the slack for every period
    pub fn iter_slack(&self) -> impl Iterator<Item = (usize, Power)> + '_ {
        (1..=self.num_periods).map(|period| (period, self.slack(period)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, series, toy_demand, toy_parameters};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    const EPSILON: f64 = 1e-4;

    fn options(
        formulation: Formulation,
        rolling_range: RollingRange,
        output_variable: OutputVariable,
    ) -> FormulationOptions {
        FormulationOptions {
            formulation,
            rolling_range,
            output_variable,
        }
    }

    fn solve(builder: &ModelBuilder) -> Solution {
        match builder.build().unwrap().solve(&SolverOptions::default()) {
            SolvedProblem::Optimal(solution) => solution,
            SolvedProblem::NotOptimal(status, _) => panic!("Expected optimal solution, got {status}"),
        }
    }

    /// Check that a solution respects minimum durations, production limits and demand
    fn check_schedule(
        solution: &Solution,
        parameters: &ParameterSet,
        demand: &PeriodSeries,
        residual: impl Fn(usize) -> f64,
    ) {
        let num_periods = demand.num_periods();
        for (plant_idx, plant) in parameters.iter() {
            let init = plant.initial_condition();
            let mut previous = init.is_on;
            for period in 1..=num_periods {
                let decision = solution.decision(plant_idx, period);

                if init.is_pinned(period) {
                    assert_eq!(decision.on, init.is_on);
                }

                // Indicators match the transitions
                assert_eq!(decision.startup, decision.on && !previous);
                if let Some(shutdown) = decision.shutdown {
                    assert_eq!(shutdown, !decision.on && previous);
                    assert!(!(shutdown && decision.startup));
                }

                // Minimum durations
                if decision.on && !previous {
                    let last = (period + plant.min_up_time - 1).min(num_periods);
                    for later in period..=last {
                        assert!(solution.decision(plant_idx, later).on);
                    }
                }
                if !decision.on && previous {
                    let last = (period + plant.min_down_time)
                        .saturating_sub(1)
                        .min(num_periods);
                    for later in period..=last {
                        assert!(!solution.decision(plant_idx, later).on);
                    }
                }

                // Production limits
                let output = decision.output.value();
                if decision.on {
                    assert!(output >= plant.min_output.value() - EPSILON);
                    assert!(output <= plant.max_output.value() + EPSILON);
                } else {
                    assert!(output.abs() <= EPSILON);
                }

                previous = decision.on;
            }
        }

        for period in 1..=num_periods {
            let production: f64 = (0..parameters.len())
                .map(|plant_idx| solution.decision(plant_idx, period).output.value())
                .sum();
            let slack = solution.slack(period).value();
            assert!(slack >= -EPSILON);
            assert_approx_eq!(f64, production - slack, residual(period), epsilon = EPSILON);
        }
    }

    #[rstest]
    fn test_toy_optimum(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
        #[values(Formulation::RollingSum, Formulation::Pairwise)] formulation: Formulation,
        #[values(RollingRange::Full, RollingRange::SkipPinned)] rolling_range: RollingRange,
        #[values(OutputVariable::Continuous, OutputVariable::Integer)]
        output_variable: OutputVariable,
        #[values(1.0, 10.0)] slack_penalty: f64,
    ) {
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_slack_penalty(MoneyPerPower(slack_penalty))
            .with_options(options(formulation, rolling_range, output_variable));
        let solution = solve(&builder);

        assert_approx_eq!(f64, solution.objective_value().value(), 6050.0, epsilon = EPSILON);
        for period in 1..=5 {
            assert!(solution.decision(0, period).on);
            assert_eq!(solution.decision(1, period).on, period > 1);
        }
        assert!(solution.decision(1, 2).startup);
        assert_approx_eq!(f64, solution.slack(1).value(), 0.0, epsilon = EPSILON);
        check_schedule(&solution, &toy_parameters, &toy_demand, |period| {
            toy_demand.get(period).value()
        });
    }

    #[rstest]
    fn test_toy_optimum_with_renewables(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
        #[values(Formulation::RollingSum, Formulation::Pairwise)] formulation: Formulation,
    ) {
        let renewables = series(&[40.0; 5]);
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_renewables(&renewables, Dimensionless(0.5))
            .with_slack_penalty(MoneyPerPower(10.0))
            .with_options(options(
                formulation,
                RollingRange::Full,
                OutputVariable::Continuous,
            ));
        let solution = solve(&builder);

        assert_approx_eq!(f64, solution.objective_value().value(), 5080.0, epsilon = EPSILON);

        // Plant 0 is no longer needed in the last period
        assert!(solution.decision(0, 4).on);
        assert!(!solution.decision(0, 5).on);
        check_schedule(&solution, &toy_parameters, &toy_demand, |period| {
            toy_demand.get(period).value() - 20.0
        });
    }

    #[rstest]
    fn test_formulations_agree(
        toy_parameters: ParameterSet,
        #[values(0.1, 100.0)] slack_penalty: f64,
        #[values(0.0, 1.0)] alpha: f64,
    ) {
        let demand = series(&[100.0, 10.0, 150.0, 10.0, 100.0, 10.0, 150.0, 60.0]);
        let renewables = series(&[0.0, 20.0, 40.0, 5.0, 0.0, 10.0, 30.0, 60.0]);
        let objectives: Vec<f64> = [
            (Formulation::RollingSum, RollingRange::Full),
            (Formulation::RollingSum, RollingRange::SkipPinned),
            (Formulation::Pairwise, RollingRange::Full),
        ]
        .into_iter()
        .map(|(formulation, rolling_range)| {
            let builder = ModelBuilder::new(&toy_parameters, &demand)
                .with_renewables(&renewables, Dimensionless(alpha))
                .with_slack_penalty(MoneyPerPower(slack_penalty))
                .with_options(options(
                    formulation,
                    rolling_range,
                    OutputVariable::Continuous,
                ));
            let solution = solve(&builder);
            check_schedule(&solution, &toy_parameters, &demand, |period| {
                demand.get(period).value() - alpha * renewables.get(period).value()
            });
            solution.objective_value().value()
        })
        .collect();

        for objective in &objectives[1..] {
            assert_approx_eq!(f64, *objective, objectives[0], epsilon = EPSILON);
        }
    }

    #[rstest]
    fn test_build_is_repeatable(toy_parameters: ParameterSet, toy_demand: PeriodSeries) {
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_slack_penalty(MoneyPerPower(10.0));
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[rstest]
    fn test_variable_layout(toy_parameters: ParameterSet, toy_demand: PeriodSeries) {
        let problem = ModelBuilder::new(&toy_parameters, &toy_demand)
            .build()
            .unwrap();

        // u, v, w and x for each plant and period, then a slack per period
        assert_eq!(problem.problem().num_cols(), 2 * 5 * 4 + 5);
        let vars = problem.variables().unit(0, 1);
        assert_eq!(vars.on.index(), 0);
        assert_eq!(vars.output.index(), 3);
        assert_eq!(problem.variables().slack(1).index(), 40);

        // Transitions are fixed at zero while plant 0 is pinned on
        let columns = problem.problem().columns();
        let upper = |var: Variable| columns[var.index()].upper;
        assert_approx_eq!(f64, upper(problem.variables().unit(0, 2).startup), 0.0);
        assert_approx_eq!(f64, upper(problem.variables().unit(0, 3).startup), 1.0);

        let pairwise = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_options(options(
                Formulation::Pairwise,
                RollingRange::Full,
                OutputVariable::Continuous,
            ))
            .build()
            .unwrap();
        assert_eq!(pairwise.problem().num_cols(), 2 * 5 * 3 + 5);
        assert!(pairwise.variables().unit(1, 3).shutdown.is_none());
    }

    #[rstest]
    fn test_pairwise_startup_indicator_is_forced(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
    ) {
        let problem = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_slack_penalty(MoneyPerPower(10.0))
            .with_options(options(
                Formulation::Pairwise,
                RollingRange::Full,
                OutputVariable::Continuous,
            ))
            .build()
            .unwrap();
        let linear = problem.problem().clone();
        let variables = problem.variables().clone();
        let SolvedProblem::Optimal(solution) = problem.solve(&SolverOptions::default()) else {
            panic!("Expected optimal solution");
        };
        let mut values = solution.values().to_vec();
        assert!(linear.max_violation(&values) < EPSILON);

        // Clearing the startup indicator for a genuine startup must violate a row
        let startup = variables.unit(1, 2).startup;
        assert_approx_eq!(f64, values[startup.index()], 1.0, epsilon = EPSILON);
        values[startup.index()] = 0.0;
        assert!(linear.max_violation(&values) > 0.5);
    }

    #[rstest]
    fn test_infeasible(
        #[values(Formulation::RollingSum, Formulation::Pairwise)] formulation: Formulation,
    ) {
        let plants = ["small0", "small1"]
            .into_iter()
            .map(|id| crate::plant::Plant {
                id: id.into(),
                min_output: Power(5.0),
                max_output: Power(10.0),
                min_up_time: 1,
                min_down_time: 1,
                startup_cost: Money(1.0),
                no_load_cost: Money(1.0),
                variable_cost: MoneyPerPower(1.0),
                periods_on: 1,
                periods_off: 0,
            })
            .collect();
        let parameters = ParameterSet::new(plants).unwrap();
        let demand = series(&[15.0, 100.0, 15.0]);
        let problem = ModelBuilder::new(&parameters, &demand)
            .with_slack_penalty(MoneyPerPower(10.0))
            .with_options(options(
                formulation,
                RollingRange::Full,
                OutputVariable::Continuous,
            ))
            .build()
            .unwrap();

        let solved = problem.solve(&SolverOptions::default());
        assert_eq!(solved.status(), SolveStatus::Infeasible);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn test_bad_alpha(
        toy_parameters: ParameterSet,
        toy_demand: PeriodSeries,
        #[case] alpha: f64,
    ) {
        let renewables = series(&[0.0; 5]);
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_renewables(&renewables, Dimensionless(alpha));
        assert!(builder.build().is_err());
    }

    #[rstest]
    fn test_bad_slack_penalty(toy_parameters: ParameterSet, toy_demand: PeriodSeries) {
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_slack_penalty(MoneyPerPower(-1.0));
        assert_error!(
            builder.build(),
            "Slack penalty must be a finite, non-negative number (got -1)"
        );
    }

    #[rstest]
    fn test_renewable_length_mismatch(toy_parameters: ParameterSet, toy_demand: PeriodSeries) {
        let renewables = series(&[0.0; 4]);
        let builder = ModelBuilder::new(&toy_parameters, &toy_demand)
            .with_renewables(&renewables, Dimensionless(0.5));
        assert_error!(
            builder.build(),
            "Renewable series covers 4 periods but demand covers 5"
        );
    }
}
