//! The boundary between the formulation and the external solver.
//!
//! A [`LinearProblem`] is a plain matrix formulation: typed columns with bounds and objective
//! coefficients, ranged rows and an optimisation sense. It is translated into a HiGHS problem only
//! when solved, so the formulation can be inspected and compared without a solver.
use highs::{HighsModelStatus, RowProblem};
use log::debug;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::ops::{Bound, RangeBounds};

/// A decision variable in the optimisation
///
/// Note that this type does **not** include the value of the variable; it just refers to a
/// particular column of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(usize);

impl Variable {
    /// The index of the column in the problem
    pub fn index(self) -> usize {
        self.0
    }
}

/// The type tag of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// An integer column restricted to 0 or 1
    Binary,
    /// A general integer column
    Integer,
    /// A continuous column
    Continuous,
}

/// Whether the objective is minimised or maximised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    /// Minimise the objective
    #[default]
    Minimise,
    /// Maximise the objective
    Maximise,
}

/// A column of the problem
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The column's type
    pub kind: VariableKind,
    /// Lower bound (may be `-inf`)
    pub lower: f64,
    /// Upper bound (may be `inf`)
    pub upper: f64,
    /// Objective coefficient
    pub cost: f64,
}

/// A ranged linear constraint: `lower <= sum(coeff * var) <= upper`
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Lower bound (may be `-inf`)
    pub lower: f64,
    /// Upper bound (may be `inf`)
    pub upper: f64,
    /// The variables and coefficients in the row
    pub terms: Vec<(Variable, f64)>,
}

impl Row {
    /// The value of the row's left-hand side for the given column values
    fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values[var.0])
            .sum()
    }
}

/// Convert a range into a (lower, upper) pair, with open ends mapped to infinities
fn to_bound_pair<B: RangeBounds<f64>>(bounds: &B) -> (f64, f64) {
    let lower = match bounds.start_bound() {
        Bound::Included(x) | Bound::Excluded(x) => *x,
        Bound::Unbounded => f64::NEG_INFINITY,
    };
    let upper = match bounds.end_bound() {
        Bound::Included(x) | Bound::Excluded(x) => *x,
        Bound::Unbounded => f64::INFINITY,
    };

    (lower, upper)
}

/// A mixed-integer linear problem
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearProblem {
    sense: Sense,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl LinearProblem {
    /// Create an empty problem with the given sense
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            ..Self::default()
        }
    }

    /// Add a column with the given type, objective coefficient and bounds
    pub fn add_column<B: RangeBounds<f64>>(
        &mut self,
        kind: VariableKind,
        cost: f64,
        bounds: B,
    ) -> Variable {
        let (lower, upper) = to_bound_pair(&bounds);
        self.columns.push(Column {
            kind,
            lower,
            upper,
            cost,
        });

        Variable(self.columns.len() - 1)
    }

    /// Add a row with the given bounds
    pub fn add_row<B, I>(&mut self, bounds: B, terms: I)
    where
        B: RangeBounds<f64>,
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let (lower, upper) = to_bound_pair(&bounds);
        self.rows.push(Row {
            lower,
            upper,
            terms: terms.into_iter().collect(),
        });
    }

    /// The optimisation sense
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// The problem's columns, in the order they were added
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The problem's rows, in the order they were added
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Evaluate the objective for the given column values
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(values)
            .map(|(col, value)| col.cost * value)
            .sum()
    }

    /// The largest violation of any column bound, integrality requirement or row for the given
    /// column values. Zero means the values are feasible.
    ///
    /// # Panics
    ///
    /// If the number of values does not equal the number of columns.
    pub fn max_violation(&self, values: &[f64]) -> f64 {
        assert_eq!(values.len(), self.columns.len(), "Wrong number of values");

        let columns = self.columns.iter().zip(values).map(|(col, &value)| {
            let integrality = match col.kind {
                VariableKind::Continuous => 0.0,
                VariableKind::Binary | VariableKind::Integer => (value - value.round()).abs(),
            };
            excess(col.lower, col.upper, value).max(integrality)
        });
        let rows = self
            .rows
            .iter()
            .map(|row| excess(row.lower, row.upper, row.activity(values)));

        columns.chain(rows).fold(0.0, f64::max)
    }

    /// Pass the problem to HiGHS and solve it
    pub fn solve(&self, options: &SolverOptions) -> SolveOutcome {
        let mut problem = RowProblem::default();
        let cols: Vec<highs::Col> = self
            .columns
            .iter()
            .map(|col| match col.kind {
                VariableKind::Continuous => problem.add_column(col.cost, col.lower..=col.upper),
                VariableKind::Binary | VariableKind::Integer => {
                    problem.add_integer_column(col.cost, col.lower..=col.upper)
                }
            })
            .collect();
        for row in &self.rows {
            problem.add_row(
                row.lower..=row.upper,
                row.terms.iter().map(|(var, coeff)| (cols[var.0], *coeff)),
            );
        }

        let sense = match self.sense {
            Sense::Minimise => highs::Sense::Minimise,
            Sense::Maximise => highs::Sense::Maximise,
        };
        let mut model = problem.optimise(sense);
        options.apply(&mut model);

        let solved = match model.try_solve() {
            Ok(solved) => solved,
            Err(status) => {
                return SolveOutcome::SolverError(format!("Incoherent model: {status:?}"));
            }
        };

        let status = solved.status();
        debug!("HiGHS finished with model status {status:?}");
        match status {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective_value = self.objective_value(&values);
                SolveOutcome::Optimal(PrimalSolution {
                    values,
                    objective_value,
                })
            }
            // Unboundedness is ruled out by non-negative costs and bounded production, so an
            // ambiguous presolve result means the problem is infeasible
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                SolveOutcome::Infeasible
            }
            HighsModelStatus::Unbounded => SolveOutcome::Unbounded,
            status => SolveOutcome::SolverError(format!("Could not solve: {status:?}")),
        }
    }
}

/// How far `value` lies outside `[lower, upper]`
fn excess(lower: f64, upper: f64, value: f64) -> f64 {
    (lower - value).max(value - upper).max(0.0)
}

/// Configuration passed through to the solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Relative MIP gap at which the solver may stop (0 requires proven optimality)
    pub mip_rel_gap: f64,
    /// Absolute MIP gap at which the solver may stop (0 requires proven optimality)
    pub mip_abs_gap: f64,
    /// Whether to let HiGHS write its own log to the console
    pub log_to_console: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            mip_rel_gap: 0.0,
            mip_abs_gap: 0.0,
            log_to_console: false,
        }
    }
}

impl SolverOptions {
    /// Set the HiGHS options for a model
    fn apply(&self, model: &mut highs::Model) {
        model.set_option("mip_rel_gap", self.mip_rel_gap);
        model.set_option("mip_abs_gap", self.mip_abs_gap);
        model.set_option("output_flag", self.log_to_console);
        model.set_option("log_to_console", self.log_to_console);
    }
}

/// Values of all columns for an optimal solution
#[derive(Debug, Clone, PartialEq)]
pub struct PrimalSolution {
    /// The value of each column, in column order
    pub values: Vec<f64>,
    /// The objective value
    pub objective_value: f64,
}

/// The result of passing a problem to the solver
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// An optimal solution was found
    Optimal(PrimalSolution),
    /// The problem has no feasible solution
    Infeasible,
    /// The objective is unbounded
    Unbounded,
    /// The solver failed for another reason
    SolverError(String),
}

impl SolveOutcome {
    /// The status without any solution values
    pub fn status(&self) -> SolveStatus {
        match self {
            Self::Optimal(_) => SolveStatus::Optimal,
            Self::Infeasible => SolveStatus::Infeasible,
            Self::Unbounded => SolveStatus::Unbounded,
            Self::SolverError(_) => SolveStatus::SolverError,
        }
    }
}

/// The status reported for a solve
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum SolveStatus {
    /// An optimal solution was found
    #[string = "optimal"]
    Optimal,
    /// The problem has no feasible solution
    #[string = "infeasible"]
    Infeasible,
    /// The objective is unbounded
    #[string = "unbounded"]
    Unbounded,
    /// The solver failed for another reason
    #[string = "solver_error"]
    SolverError,
}
