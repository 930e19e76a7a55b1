//! Code for reading demand scenarios.
use super::*;
use crate::series::{ScenarioID, ScenarioMap};
use indexmap::IndexMap;
use serde::Deserialize;

const DEMAND_FILE_NAME: &str = "demand.csv";

/// A row of the demand file
#[derive(Debug, Deserialize, PartialEq)]
struct DemandRaw {
    scenario_id: ScenarioID,
    period: usize,
    demand: Power,
}

/// Read demand scenarios from `demand.csv`.
///
/// Scenarios are kept in the order of their first appearance in the file. Every scenario must give
/// exactly one value for each period and all scenarios must cover the same horizon.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn read_scenarios(model_dir: &Path) -> Result<ScenarioMap> {
    let file_path = model_dir.join(DEMAND_FILE_NAME);
    let rows = read_csv(&file_path)?;

    read_scenarios_from_iter(rows).with_context(|| input_err_msg(&file_path))
}

fn read_scenarios_from_iter<I>(iter: I) -> Result<ScenarioMap>
where
    I: IntoIterator<Item = DemandRaw>,
{
    let mut pairs: IndexMap<ScenarioID, Vec<(usize, Power)>> = IndexMap::new();
    for row in iter {
        pairs
            .entry(row.scenario_id)
            .or_default()
            .push((row.period, row.demand));
    }

    let mut scenarios = ScenarioMap::new();
    for (scenario_id, pairs) in pairs {
        let series = period_series_from_pairs(pairs)
            .with_context(|| format!("Invalid demand for scenario '{scenario_id}'"))?;
        scenarios.insert(scenario_id, series);
    }

    let mut horizons = scenarios.iter().map(|(id, series)| (id, series.num_periods()));
    if let Some((first_id, num_periods)) = horizons.next() {
        for (id, other) in horizons {
            ensure!(
                other == num_periods,
                "All scenarios must cover the same periods (scenario '{first_id}' covers \
                {num_periods} but '{id}' covers {other})"
            );
        }
    }

    Ok(scenarios)
}
