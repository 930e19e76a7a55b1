//! Strategies for encoding minimum up and down times.
//!
//! Two formulations are supported. Both share the variables and constraints in
//! [`super::constraints`] and differ only in how a plant's on/off trajectory is kept consistent
//! with its minimum durations.
use super::problem::{LinearProblem, Variable};
use super::{PreviousState, VariableMap};
use crate::parameter_set::ParameterSet;
use crate::plant::Plant;
use serde_string_enum::DeserializeLabeledStringEnum;

/// How minimum up and down times are encoded
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formulation {
    /// Startup and shutdown indicators with rolling-window sums
    #[default]
    #[string = "rolling_sum"]
    RollingSum,
    /// Pairwise constraints between the state in a period and later periods
    #[string = "pairwise"]
    Pairwise,
}

/// Which periods receive rolling-window constraints in the rolling-sum formulation
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollingRange {
    /// Every period of the horizon
    #[default]
    #[string = "full"]
    Full,
    /// Omit constraints which are trivially satisfied while the state is pinned by history
    #[string = "skip_pinned"]
    SkipPinned,
}

impl Formulation {
    /// Get the strategy which adds this formulation's constraints
    pub fn strategy(self, rolling_range: RollingRange) -> Box<dyn MinimumDurationStrategy> {
        match self {
            Self::RollingSum => Box::new(RollingSumStrategy { rolling_range }),
            Self::Pairwise => Box::new(PairwiseStrategy),
        }
    }
}

/// Trait defining the interface for minimum-duration formulations
pub trait MinimumDurationStrategy {
    /// Whether the formulation needs a shutdown indicator for every plant and period
    fn uses_shutdown_indicator(&self) -> bool;

    /// Add the formulation's constraints to the problem
    fn add_constraints(
        &self,
        problem: &mut LinearProblem,
        variables: &VariableMap,
        parameters: &ParameterSet,
        num_periods: usize,
    );
}

/// Add a row whose terms may include the state of the previous period.
///
/// If the previous state is the fixed pre-horizon state, its contribution is moved to the bounds.
fn add_row_with_previous(
    problem: &mut LinearProblem,
    (lower, upper): (f64, f64),
    mut terms: Vec<(Variable, f64)>,
    (previous, coeff): (PreviousState, f64),
) {
    match previous {
        PreviousState::Fixed(state) => {
            let offset = coeff * state;
            problem.add_row((lower - offset)..=(upper - offset), terms);
        }
        PreviousState::Variable(var) => {
            terms.push((var, coeff));
            problem.add_row(lower..=upper, terms);
        }
    }
}

/// The first period of a window of `length` periods ending at `period`
fn window_start(period: usize, length: usize) -> usize {
    // A zero duration still covers the current period
    (period + 1).saturating_sub(length.max(1)).max(1)
}

/// Three-binary formulation with rolling-window sums
pub struct RollingSumStrategy {
    /// Which periods receive rolling-window constraints
    pub rolling_range: RollingRange,
}

impl RollingSumStrategy {
    /// The first periods which receive minimum up- and down-time rows for the given plant
    fn first_periods(&self, plant: &Plant, num_periods: usize) -> (usize, usize) {
        let init = plant.initial_condition();
        match self.rolling_range {
            RollingRange::Full => (1, 1),
            RollingRange::SkipPinned => {
                let after_pinned = (init.pinned_periods + 1).min(num_periods);
                if init.is_on {
                    (after_pinned, 1)
                } else {
                    (1, after_pinned)
                }
            }
        }
    }
}

impl MinimumDurationStrategy for RollingSumStrategy {
    fn uses_shutdown_indicator(&self) -> bool {
        true
    }

    fn add_constraints(
        &self,
        problem: &mut LinearProblem,
        variables: &VariableMap,
        parameters: &ParameterSet,
        num_periods: usize,
    ) {
        for (plant_idx, plant) in parameters.iter() {
            let init = plant.initial_condition();
            let shutdown = |period| {
                variables
                    .unit(plant_idx, period)
                    .shutdown
                    .expect("Rolling-sum formulation requires shutdown indicators")
            };

            // u[t] - u[t-1] - v[t] + w[t] = 0 and v[t] + w[t] <= 1
            for period in 1..=num_periods {
                let vars = variables.unit(plant_idx, period);
                add_row_with_previous(
                    problem,
                    (0.0, 0.0),
                    vec![
                        (vars.on, 1.0),
                        (vars.startup, -1.0),
                        (shutdown(period), 1.0),
                    ],
                    (variables.previous_state(plant_idx, period, &init), -1.0),
                );
                problem.add_row(..=1.0, [(vars.startup, 1.0), (shutdown(period), 1.0)]);
            }

            let (first_up, first_down) = self.first_periods(plant, num_periods);

            // sum(v[k] for k in window) - u[t] <= 0
            for period in first_up..=num_periods {
                let start = window_start(period, plant.min_up_time);
                let startups =
                    (start..=period).map(|k| (variables.unit(plant_idx, k).startup, 1.0));
                let on = (variables.unit(plant_idx, period).on, -1.0);
                problem.add_row(..=0.0, startups.chain([on]));
            }

            // sum(w[k] for k in window) + u[t] <= 1
            for period in first_down..=num_periods {
                let start = window_start(period, plant.min_down_time);
                let shutdowns = (start..=period).map(|k| (shutdown(k), 1.0));
                let on = (variables.unit(plant_idx, period).on, 1.0);
                problem.add_row(..=1.0, shutdowns.chain([on]));
            }
        }
    }
}

/// Formulation linking the state in each period to every later period within the minimum
/// duration.
///
/// A startup in period `t` forces the plant on in each period `τ` of `t+1..=t+L-1`:
///
/// ```text
/// u[t] - u[t-1] - u[τ] <= 0
/// ```
///
/// and a shutdown forces it off in the following `l-1` periods:
///
/// ```text
/// u[t-1] - u[t] + u[τ] <= 1
/// ```
pub struct PairwiseStrategy;

impl PairwiseStrategy {
    /// Add the rows which make the startup indicator equal `u[t] AND NOT u[t-1]`
    fn add_startup_rows(
        problem: &mut LinearProblem,
        variables: &VariableMap,
        plant_idx: usize,
        num_periods: usize,
        previous: impl Fn(usize) -> PreviousState,
    ) {
        for period in 1..=num_periods {
            let vars = variables.unit(plant_idx, period);

            // u[t] - u[t-1] - o[t] <= 0
            add_row_with_previous(
                problem,
                (f64::NEG_INFINITY, 0.0),
                vec![(vars.on, 1.0), (vars.startup, -1.0)],
                (previous(period), -1.0),
            );

            // o[t] - u[t] <= 0
            problem.add_row(..=0.0, [(vars.startup, 1.0), (vars.on, -1.0)]);

            // o[t] + u[t-1] <= 1
            add_row_with_previous(
                problem,
                (f64::NEG_INFINITY, 1.0),
                vec![(vars.startup, 1.0)],
                (previous(period), 1.0),
            );
        }
    }
}

impl MinimumDurationStrategy for PairwiseStrategy {
    fn uses_shutdown_indicator(&self) -> bool {
        false
    }

    fn add_constraints(
        &self,
        problem: &mut LinearProblem,
        variables: &VariableMap,
        parameters: &ParameterSet,
        num_periods: usize,
    ) {
        for (plant_idx, plant) in parameters.iter() {
            let init = plant.initial_condition();
            let previous = |period| variables.previous_state(plant_idx, period, &init);
            Self::add_startup_rows(problem, variables, plant_idx, num_periods, previous);

            // A startup can't happen until an initially-off plant has finished its downtime
            let first_up = plant.min_down_time.saturating_sub(plant.periods_off) + 1;
            for period in first_up..=num_periods {
                let on = variables.unit(plant_idx, period).on;
                let last = (period + plant.min_up_time).saturating_sub(1).min(num_periods);
                for later in (period + 1)..=last {
                    let later_on = variables.unit(plant_idx, later).on;
                    add_row_with_previous(
                        problem,
                        (f64::NEG_INFINITY, 0.0),
                        vec![(on, 1.0), (later_on, -1.0)],
                        (previous(period), -1.0),
                    );
                }
            }

            // Likewise a shutdown can't happen until an initially-on plant has met its up time
            let first_down = plant.min_up_time.saturating_sub(plant.periods_on) + 1;
            for period in first_down..=num_periods {
                let on = variables.unit(plant_idx, period).on;
                let last = (period + plant.min_down_time)
                    .saturating_sub(1)
                    .min(num_periods);
                for later in (period + 1)..=last {
                    let later_on = variables.unit(plant_idx, later).on;
                    add_row_with_previous(
                        problem,
                        (f64::NEG_INFINITY, 1.0),
                        vec![(on, -1.0), (later_on, 1.0)],
                        (previous(period), 1.0),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 3, 1)]
    #[case(2, 3, 1)]
    #[case(5, 3, 3)]
    #[case(5, 1, 5)]
    #[case(5, 0, 5)]
    fn test_window_start(#[case] period: usize, #[case] length: usize, #[case] expected: usize) {
        assert_eq!(window_start(period, length), expected);
    }
}
