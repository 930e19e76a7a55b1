//! Code for adding the constraints shared by every formulation.
use super::VariableMap;
use super::problem::LinearProblem;
use crate::parameter_set::ParameterSet;
use crate::units::Power;
use itertools::iproduct;

/// Add the constraints which don't depend on how minimum durations are encoded.
///
/// # Arguments:
///
/// * `problem` - The optimisation problem
/// * `variables` - The variables in the problem
/// * `parameters` - The plant fleet
/// * `residual_demand` - Demand left for dispatchable plants in each period, in period order
pub fn add_common_constraints(
    problem: &mut LinearProblem,
    variables: &VariableMap,
    parameters: &ParameterSet,
    residual_demand: &[Power],
) {
    let num_periods = residual_demand.len();
    add_initial_status_constraints(problem, variables, parameters, num_periods);
    add_production_limit_constraints(problem, variables, parameters, num_periods);
    add_demand_constraints(problem, variables, parameters, residual_demand);
}

/// Pin each plant's state to its period-0 state for as long as its history requires.
///
/// For plant `g` with `n` pinned periods:
///
/// ```text
/// u[g, t] = u0[g]  for t in 1..=min(n, T)
/// ```
fn add_initial_status_constraints(
    problem: &mut LinearProblem,
    variables: &VariableMap,
    parameters: &ParameterSet,
    num_periods: usize,
) {
    for (plant_idx, plant) in parameters.iter() {
        let init = plant.initial_condition();
        let state = init.state();
        for period in 1..=init.pinned_periods.min(num_periods) {
            let on = variables.unit(plant_idx, period).on;
            problem.add_row(state..=state, [(on, 1.0)]);
        }
    }
}

/// Tie each plant's output to its on/off state.
///
/// For plant `g` in period `t`:
///
/// ```text
/// x[g, t] - q[g] * u[g, t] >= 0
/// x[g, t] - Q[g] * u[g, t] <= 0
/// ```
fn add_production_limit_constraints(
    problem: &mut LinearProblem,
    variables: &VariableMap,
    parameters: &ParameterSet,
    num_periods: usize,
) {
    for ((plant_idx, plant), period) in iproduct!(parameters.iter(), 1..=num_periods) {
        let vars = variables.unit(plant_idx, period);
        problem.add_row(
            0.0..,
            [(vars.output, 1.0), (vars.on, -plant.min_output.value())],
        );
        problem.add_row(
            ..=0.0,
            [(vars.output, 1.0), (vars.on, -plant.max_output.value())],
        );
    }
}

/// Require production to cover residual demand, with any excess absorbed by the slack.
///
/// For period `t`:
///
/// ```text
/// sum_g x[g, t] - s[t] = d[t] - alpha * p[t]
/// ```
fn add_demand_constraints(
    problem: &mut LinearProblem,
    variables: &VariableMap,
    parameters: &ParameterSet,
    residual_demand: &[Power],
) {
    for (period, demand) in (1..).zip(residual_demand.iter().copied()) {
        let outputs = (0..parameters.len())
            .map(|plant_idx| (variables.unit(plant_idx, period).output, 1.0));
        let slack = (variables.slack(period), -1.0);
        let rhs = demand.value();
        problem.add_row(rhs..=rhs, outputs.chain([slack]));
    }
}
