//! Fixtures for tests

use crate::parameter_set::ParameterSet;
use crate::plant::Plant;
use crate::series::PeriodSeries;
use crate::units::{Money, MoneyPerPower, Power};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create a [`PeriodSeries`] from raw values
pub fn series(values: &[f64]) -> PeriodSeries {
    PeriodSeries::new(values.iter().copied().map(Power).collect()).unwrap()
}

#[fixture]
pub fn plant() -> Plant {
    Plant {
        id: "plant0".into(),
        min_output: Power(20.0),
        max_output: Power(100.0),
        min_up_time: 3,
        min_down_time: 2,
        startup_cost: Money(100.0),
        no_load_cost: Money(50.0),
        variable_cost: MoneyPerPower(10.0),
        periods_on: 1,
        periods_off: 0,
    }
}

#[fixture]
pub fn toy_plants(plant: Plant) -> Vec<Plant> {
    vec![
        plant,
        Plant {
            id: "plant1".into(),
            min_output: Power(30.0),
            max_output: Power(120.0),
            min_up_time: 2,
            min_down_time: 3,
            startup_cost: Money(120.0),
            no_load_cost: Money(60.0),
            variable_cost: MoneyPerPower(8.0),
            periods_on: 0,
            periods_off: 2,
        },
    ]
}

#[fixture]
pub fn toy_parameters(toy_plants: Vec<Plant>) -> ParameterSet {
    ParameterSet::new(toy_plants).unwrap()
}

#[fixture]
pub fn toy_demand() -> PeriodSeries {
    series(&[100.0, 90.0, 140.0, 160.0, 140.0])
}
