//! Key performance indicators extracted from a solved schedule.
use crate::optimisation::Solution;
use crate::optimisation::problem::SolveStatus;
use crate::series::ScenarioID;
use crate::units::{Dimensionless, Money, MoneyPerPower, Power};

/// Indicators for one plant over the whole horizon
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlantKpis {
    /// Total output over the horizon
    pub production: Power,
    /// Number of periods the plant is on
    pub periods_on: usize,
    /// Number of startups within the horizon
    pub startups: usize,
}

/// Indicators for an optimal schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpis {
    /// Total cost, including slack penalties
    pub objective: Money,
    /// Excess production summed over all periods
    pub total_slack: Power,
    /// Indicators for each plant, in index order
    pub plants: Vec<PlantKpis>,
    /// Output of the designated plant in each period, if one was designated
    pub trajectory: Option<Vec<Power>>,
}

impl ScheduleKpis {
    /// Collect the indicators from a solution.
    ///
    /// A plant counts as on (or started) when the value of its binary variable is at least 0.5.
    pub fn from_solution(solution: &Solution, designated_plant: Option<usize>) -> Self {
        let mut plants = vec![PlantKpis::default(); solution.num_plants()];
        for (_, plant_idx, decision) in solution.iter_decisions() {
            let kpis = &mut plants[plant_idx];
            kpis.production = kpis.production + decision.output;
            kpis.periods_on += usize::from(decision.on);
            kpis.startups += usize::from(decision.startup);
        }

        let trajectory = designated_plant.map(|plant_idx| {
            (1..=solution.num_periods())
                .map(|period| solution.decision(plant_idx, period).output)
                .collect()
        });

        Self {
            objective: solution.objective_value(),
            total_slack: solution.iter_slack().map(|(_, slack)| slack).sum(),
            plants,
            trajectory,
        }
    }
}

/// The result of one combination of scenario, slack penalty and penetration factor
#[derive(Debug, Clone, PartialEq)]
pub struct KpiRecord {
    /// The demand scenario
    pub scenario_id: ScenarioID,
    /// The slack penalty
    pub lambda: MoneyPerPower,
    /// The renewable penetration factor
    pub alpha: Dimensionless,
    /// How the solve ended
    pub status: SolveStatus,
    /// Indicators, only present if the schedule is optimal
    pub kpis: Option<ScheduleKpis>,
}

impl KpiRecord {
    /// The objective value, or `None` if no optimal schedule was found
    pub fn objective(&self) -> Option<Money> {
        self.kpis.as_ref().map(|kpis| kpis.objective)
    }

    /// Total excess production, or `None` if no optimal schedule was found
    pub fn total_slack(&self) -> Option<Power> {
        self.kpis.as_ref().map(|kpis| kpis.total_slack)
    }

    /// The designated plant's trajectory, if available
    pub fn trajectory(&self) -> Option<&[Power]> {
        self.kpis
            .as_ref()
            .and_then(|kpis| kpis.trajectory.as_deref())
    }
}

/// The records for one scenario, laid out as a grid of slack penalties × penetration factors
#[derive(Debug, Clone, PartialEq)]
pub struct KpiGrid {
    lambdas: Vec<MoneyPerPower>,
    alphas: Vec<Dimensionless>,
    records: Vec<KpiRecord>,
}

impl KpiGrid {
    /// Create an empty grid for the given axes
    pub fn new(lambdas: &[MoneyPerPower], alphas: &[Dimensionless]) -> Self {
        Self {
            lambdas: lambdas.to_vec(),
            alphas: alphas.to_vec(),
            records: Vec::with_capacity(lambdas.len() * alphas.len()),
        }
    }

    /// Add the next record. Records must be pushed with α varying fastest.
    ///
    /// # Panics
    ///
    /// If the grid is already full or the record does not match the next grid position.
    pub fn push(&mut self, record: KpiRecord) {
        let idx = self.records.len();
        assert!(
            idx < self.lambdas.len() * self.alphas.len(),
            "KPI grid is already full"
        );
        let (lambda_idx, alpha_idx) = (idx / self.alphas.len(), idx % self.alphas.len());
        assert!(
            record.lambda == self.lambdas[lambda_idx] && record.alpha == self.alphas[alpha_idx],
            "Record does not match grid position"
        );
        self.records.push(record);
    }

    /// The slack penalties along the first axis
    pub fn lambdas(&self) -> &[MoneyPerPower] {
        &self.lambdas
    }

    /// The penetration factors along the second axis
    pub fn alphas(&self) -> &[Dimensionless] {
        &self.alphas
    }

    /// Get the record for the given slack penalty and penetration factor indices
    pub fn get(&self, lambda_idx: usize, alpha_idx: usize) -> Option<&KpiRecord> {
        if alpha_idx >= self.alphas.len() {
            return None;
        }

        self.records.get(lambda_idx * self.alphas.len() + alpha_idx)
    }

    /// Iterate over the records, with α varying fastest
    pub fn iter(&self) -> impl Iterator<Item = &KpiRecord> {
        self.records.iter()
    }

    /// Format the objective values as a table with a row per slack penalty.
    ///
    /// Combinations without an optimal schedule are shown as `-`.
    pub fn objective_table(&self) -> String {
        let header = self
            .alphas
            .iter()
            .map(|alpha| format!("{:>12}", format!("α={:.3}", alpha.value())))
            .collect::<String>();
        let mut table = format!("{:>10}{header}", "λ");
        for (lambda_idx, lambda) in self.lambdas.iter().enumerate() {
            table.push_str(&format!("\n{:>10}", lambda.value()));
            for alpha_idx in 0..self.alphas.len() {
                let cell = self
                    .get(lambda_idx, alpha_idx)
                    .and_then(KpiRecord::objective)
                    .map_or_else(|| "-".to_string(), |obj| format!("{:.2}", obj.value()));
                table.push_str(&format!("{cell:>12}"));
            }
        }

        table
    }
}
