//! Plants are the dispatchable generating units whose on/off state and output are scheduled.
use crate::id::define_id_type;
use crate::units::{Money, MoneyPerPower, Power};
use anyhow::{Result, ensure};
use serde::Deserialize;

define_id_type! {PlantID}

/// Technical and cost data for a single generating unit.
///
/// Durations are given in periods. The history fields (`periods_on` and `periods_off`) describe the
/// state of the plant immediately before the first period of the horizon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Plant {
    /// A unique identifier for the plant
    #[serde(rename = "plant_id")]
    pub id: PlantID,
    /// Minimum output when the plant is on
    pub min_output: Power,
    /// Maximum output when the plant is on
    pub max_output: Power,
    /// Minimum number of consecutive periods the plant stays on once started
    pub min_up_time: usize,
    /// Minimum number of consecutive periods the plant stays off once stopped
    pub min_down_time: usize,
    /// Cost incurred each time the plant is started
    pub startup_cost: Money,
    /// Cost incurred for every period the plant is on, independent of output
    pub no_load_cost: Money,
    /// Cost per unit of output
    pub variable_cost: MoneyPerPower,
    /// Number of periods the plant had been continuously on before the horizon (0 if off)
    pub periods_on: usize,
    /// Number of periods the plant had been continuously off before the horizon (0 if on)
    pub periods_off: usize,
}

impl Plant {
    /// Check that the plant's parameters are internally consistent.
    ///
    /// Errors identify the plant and the offending field.
    pub fn validate(&self) -> Result<()> {
        let id = &self.id;
        ensure!(
            self.min_output.is_finite() && self.min_output >= Power(0.0),
            "Plant '{id}': `min_output` must be a finite, non-negative number (got {})",
            self.min_output
        );
        ensure!(
            self.max_output.is_finite() && self.max_output >= Power(0.0),
            "Plant '{id}': `max_output` must be a finite, non-negative number (got {})",
            self.max_output
        );
        ensure!(
            self.min_output <= self.max_output,
            "Plant '{id}': `min_output` ({}) exceeds `max_output` ({})",
            self.min_output,
            self.max_output
        );
        check_cost(id, "startup_cost", self.startup_cost.value())?;
        check_cost(id, "no_load_cost", self.no_load_cost.value())?;
        check_cost(id, "variable_cost", self.variable_cost.value())?;
        ensure!(
            self.periods_on == 0 || self.periods_off == 0,
            "Plant '{id}': `periods_on` ({}) and `periods_off` ({}) cannot both be non-zero",
            self.periods_on,
            self.periods_off
        );

        Ok(())
    }

    /// The state of the plant at the start of the horizon
    pub fn initial_condition(&self) -> InitialCondition {
        InitialCondition::resolve(
            self.min_up_time,
            self.min_down_time,
            self.periods_on,
            self.periods_off,
        )
    }
}

/// Check that a cost coefficient is finite and non-negative
fn check_cost(id: &PlantID, field: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "Plant '{id}': `{field}` must be a finite, non-negative number (got {value})"
    );

    Ok(())
}

/// The on/off state of a plant in the pre-horizon period 0, together with the number of leading
/// periods for which that state cannot change.
///
/// A plant which was started two periods ago and has a minimum up time of five periods still owes
/// three periods of operation. Constraints on the horizon only look forward from period 1, so this
/// obligation is expressed by pinning the state of the first three periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialCondition {
    /// Whether the plant is on in period 0
    pub is_on: bool,
    /// Number of leading periods whose on/off state must equal the period-0 state
    pub pinned_periods: usize,
}

impl InitialCondition {
    /// Resolve the initial condition from a plant's minimum durations and its history.
    ///
    /// # Arguments
    ///
    /// * `min_up_time` - Minimum consecutive periods on once started
    /// * `min_down_time` - Minimum consecutive periods off once stopped
    /// * `periods_on` - Periods the plant had already been on (0 if it was off)
    /// * `periods_off` - Periods the plant had already been off (0 if it was on)
    pub fn resolve(
        min_up_time: usize,
        min_down_time: usize,
        periods_on: usize,
        periods_off: usize,
    ) -> Self {
        let is_on = periods_on > 0;
        let pinned_periods = if is_on {
            min_up_time.saturating_sub(periods_on)
        } else {
            min_down_time.saturating_sub(periods_off)
        };

        Self {
            is_on,
            pinned_periods,
        }
    }

    /// The period-0 state as a 0/1 value
    pub fn state(&self) -> f64 {
        if self.is_on { 1.0 } else { 0.0 }
    }

    /// Whether the state in the given (1-based) period is fixed by history
    pub fn is_pinned(&self, period: usize) -> bool {
        period <= self.pinned_periods
    }
}
