//! Time series with one value per period of the horizon.
//!
//! Periods are numbered from 1 to `T`. Period 0 is the pre-horizon state and never appears in a
//! series.
use crate::id::define_id_type;
use crate::units::Power;
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use std::ops::RangeInclusive;

define_id_type! {ScenarioID}

/// Demand series for each named scenario, in the order they were defined
pub type ScenarioMap = IndexMap<ScenarioID, PeriodSeries>;

/// A non-negative quantity for each period `1..=T`
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSeries(Vec<Power>);

impl PeriodSeries {
    /// Create a new series from values for periods `1..=T`, in order.
    ///
    /// The series must be non-empty and all values must be finite and non-negative.
    pub fn new(values: Vec<Power>) -> Result<Self> {
        ensure!(!values.is_empty(), "Series must cover at least one period");
        for (idx, value) in values.iter().enumerate() {
            ensure!(
                value.is_finite() && *value >= Power(0.0),
                "Value for period {} must be a finite, non-negative number (got {value})",
                idx + 1
            );
        }

        Ok(Self(values))
    }

    /// The number of periods in the horizon (`T`)
    pub fn num_periods(&self) -> usize {
        self.0.len()
    }

    /// The periods covered by this series
    pub fn periods(&self) -> RangeInclusive<usize> {
        1..=self.0.len()
    }

    /// Get the value for the given period.
    ///
    /// # Panics
    ///
    /// If `period` is zero or beyond the end of the horizon.
    pub fn get(&self, period: usize) -> Power {
        assert!(period >= 1, "Period 0 is not part of the horizon");
        self.0[period - 1]
    }

    /// Iterate over periods and their values
    pub fn iter(&self) -> impl Iterator<Item = (usize, Power)> + '_ {
        self.0.iter().enumerate().map(|(idx, value)| (idx + 1, *value))
    }

    /// The values as a slice, starting with period 1
    pub fn values(&self) -> &[Power] {
        &self.0
    }
}
