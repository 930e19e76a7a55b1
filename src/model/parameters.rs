//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::analysis::alpha_grid;
use crate::input::{input_err_msg, read_toml};
use crate::optimisation::formulation::{Formulation, RollingRange};
use crate::optimisation::problem::SolverOptions;
use crate::optimisation::{FormulationOptions, OutputVariable};
use crate::plant::PlantID;
use crate::units::{Dimensionless, MoneyPerPower};
use anyhow::{Context, Result, bail, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_lambdas, Vec<MoneyPerPower>, vec![MoneyPerPower(10.0)]);
define_param_default!(default_analysis_window, usize, 24);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// Penalties applied to each unit of excess production
    #[serde(default = "default_lambdas")]
    pub lambdas: Vec<MoneyPerPower>,
    /// Explicit renewable penetration factors to sweep over
    pub alphas: Option<Vec<Dimensionless>>,
    /// Number of evenly spaced penetration factors from 0 to 1 (alternative to `alphas`)
    pub alpha_steps: Option<usize>,
    /// How minimum up and down times are encoded
    #[serde(default)]
    pub formulation: Formulation,
    /// Which periods receive rolling-window constraints
    #[serde(default)]
    pub rolling_range: RollingRange,
    /// The type of the output variables
    #[serde(default)]
    pub output_variable: OutputVariable,
    /// The plant whose trajectory is recorded and correlated with demand volatility
    pub designated_plant: Option<PlantID>,
    /// Bin width, in periods, for the volatility analysis
    #[serde(default = "default_analysis_window")]
    pub analysis_window: usize,
    /// Relative MIP gap at which the solver may stop.
    ///
    /// Zero requires the solver to prove optimality.
    #[serde(default)]
    pub mip_rel_gap: f64,
    /// Absolute MIP gap at which the solver may stop
    #[serde(default)]
    pub mip_abs_gap: f64,
}

/// Check that the `lambdas` parameter is valid
fn check_lambdas(lambdas: &[MoneyPerPower]) -> Result<()> {
    ensure!(!lambdas.is_empty(), "`lambdas` is empty");
    for lambda in lambdas {
        ensure!(
            lambda.is_finite() && *lambda >= MoneyPerPower(0.0),
            "`lambdas` must contain finite, non-negative values (got {lambda})"
        );
    }

    Ok(())
}

/// Check that explicitly given penetration factors are valid
fn check_alphas(alphas: &[Dimensionless]) -> Result<()> {
    ensure!(!alphas.is_empty(), "`alphas` is empty");
    for alpha in alphas {
        ensure!(
            (0.0..=1.0).contains(&alpha.value()),
            "`alphas` must contain values between 0 and 1 (got {alpha})"
        );
    }

    Ok(())
}

/// Check that a solver tolerance is valid
fn check_gap(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "`{name}` must be a finite, non-negative number"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_lambdas(&self.lambdas)?;

        // alphas and alpha_steps
        self.alphas()?;

        ensure!(self.analysis_window > 0, "`analysis_window` cannot be zero");
        check_gap("mip_rel_gap", self.mip_rel_gap)?;
        check_gap("mip_abs_gap", self.mip_abs_gap)?;

        if self.rolling_range == RollingRange::SkipPinned
            && self.formulation == Formulation::Pairwise
        {
            warn!("`rolling_range` has no effect with the pairwise formulation");
        }

        Ok(())
    }

    /// The penetration factors to sweep over.
    ///
    /// Either the explicit `alphas`, an evenly spaced grid of `alpha_steps` values or just zero.
    pub fn alphas(&self) -> Result<Vec<Dimensionless>> {
        match (&self.alphas, self.alpha_steps) {
            (Some(_), Some(_)) => bail!("Only one of `alphas` and `alpha_steps` may be given"),
            (Some(alphas), None) => {
                check_alphas(alphas)?;
                Ok(alphas.clone())
            }
            (None, Some(steps)) => alpha_grid(steps).context("Invalid value for `alpha_steps`"),
            (None, None) => Ok(vec![Dimensionless(0.0)]),
        }
    }

    /// Options selecting how each problem is formulated
    pub fn formulation_options(&self) -> FormulationOptions {
        FormulationOptions {
            formulation: self.formulation,
            rolling_range: self.rolling_range,
            output_variable: self.output_variable,
        }
    }

    /// Options passed through to the solver
    pub fn solver_options(&self, log_to_console: bool) -> SolverOptions {
        SolverOptions {
            mip_rel_gap: self.mip_rel_gap,
            mip_abs_gap: self.mip_abs_gap,
            log_to_console,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::fmt::Display;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Helper function to assert validation result based on expected validity
    fn assert_validation_result<T, U: Display>(
        result: Result<T>,
        expected_valid: bool,
        value: U,
        expected_error_fragment: &str,
    ) {
        if expected_valid {
            assert!(
                result.is_ok(),
                "Expected value {} to be valid, but got error: {:?}",
                value,
                result.err()
            );
        } else {
            assert!(
                result.is_err(),
                "Expected value {value} to be invalid, but it was accepted",
            );
            let error_message = format!("{:#}", result.err().unwrap());
            assert!(
                error_message.contains(expected_error_fragment),
                "Error message should mention the validation constraint, got: {error_message}",
            );
        }
    }

    fn params_from_str(toml: &str) -> ModelParameters {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_model_params_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "lambdas = [1.0, 10.0]
alpha_steps = 3
formulation = \"pairwise\"
designated_plant = \"gas1\""
            )
            .unwrap();
        }

        let model_params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(
            model_params.lambdas,
            [MoneyPerPower(1.0), MoneyPerPower(10.0)]
        );
        assert_eq!(model_params.formulation, Formulation::Pairwise);
        assert_eq!(model_params.rolling_range, RollingRange::Full);
        assert_eq!(model_params.designated_plant, Some("gas1".into()));
        assert_eq!(model_params.analysis_window, 24);
        let alphas = model_params.alphas().unwrap();
        assert_eq!(alphas.len(), 3);
        assert_approx_eq!(f64, alphas[1].value(), 0.5);
    }

    #[test]
    fn test_model_params_defaults() {
        let params = params_from_str("");
        assert_eq!(params.lambdas, [MoneyPerPower(10.0)]);
        assert_eq!(params.alphas().unwrap(), [Dimensionless(0.0)]);
        assert_eq!(
            params.formulation_options(),
            FormulationOptions::default()
        );
        assert_eq!(params.solver_options(false), SolverOptions::default());
    }

    #[test]
    fn test_model_params_bad_formulation() {
        assert!(toml::from_str::<ModelParameters>("formulation = \"big_m\"").is_err());
    }

    #[rstest]
    #[case("alphas = [0.0, 0.5]", true, "")]
    #[case("alpha_steps = 2", true, "")]
    #[case("alphas = [0.0]\nalpha_steps = 5", false, "Only one of")]
    #[case("alphas = []", false, "`alphas` is empty")]
    #[case("alphas = [1.5]", false, "between 0 and 1")]
    #[case("alpha_steps = 1", false, "At least two steps")]
    fn test_alphas(#[case] toml: &str, #[case] expected_valid: bool, #[case] fragment: &str) {
        let params = params_from_str(toml);
        assert_validation_result(params.alphas(), expected_valid, toml, fragment);
    }

    #[rstest]
    #[case(0.0, true)] // Valid: no penalty
    #[case(10.0, true)] // Valid default value
    #[case(-1.0, false)] // Invalid: negative value
    #[case(f64::INFINITY, false)] // Invalid: infinite value
    #[case(f64::NAN, false)] // Invalid: NaN value
    fn test_check_lambdas(#[case] value: f64, #[case] expected_valid: bool) {
        let result = check_lambdas(&[MoneyPerPower(value)]);
        assert_validation_result(
            result,
            expected_valid,
            value,
            "`lambdas` must contain finite, non-negative values",
        );
    }

    #[test]
    fn test_check_lambdas_empty() {
        assert!(check_lambdas(&[]).is_err());
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(1e-4, true)]
    #[case(-1e-4, false)]
    #[case(f64::NAN, false)]
    fn test_check_gap(#[case] value: f64, #[case] expected_valid: bool) {
        assert_validation_result(
            check_gap("mip_rel_gap", value),
            expected_valid,
            value,
            "`mip_rel_gap` must be a finite, non-negative number",
        );
    }

    #[test]
    fn test_validate_analysis_window() {
        let params = params_from_str("analysis_window = 0");
        assert!(params.validate().is_err());
    }
}
