//! Built-in parameter sets for the optimisation drivers
//!
//! Three kinds share a common base of target/tolerance settings:
//!
//! | Kind        | Type                          | Driver                              |
//! |-------------|-------------------------------|-------------------------------------|
//! | `random-gd` | [`GradientDescentParams`]     | random restarts + BFGS              |
//! | `devo`      | [`DifferentialEvolutionParams`] | modified differential evolution   |
//! | `shgo`      | [`GlobalOptimizationParams`]  | simplicial homology global optimiser |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ParamValue, ParameterSet};
use crate::{Error, Result};

/// Target functions the drivers know how to minimise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetName {
    /// SIC-POVM loss
    #[serde(rename = "SICPOVM")]
    SicPovm,
    /// Dark Machines benchmark, variant 2
    #[serde(rename = "dark_machines_2")]
    DarkMachines2,
    /// Dark Machines benchmark, variant 4
    #[serde(rename = "dark_machines_4")]
    DarkMachines4,
}

impl TargetName {
    /// Registry text for this target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SicPovm => "SICPOVM",
            Self::DarkMachines2 => "dark_machines_2",
            Self::DarkMachines4 => "dark_machines_4",
        }
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SICPOVM" => Ok(Self::SicPovm),
            "dark_machines_2" => Ok(Self::DarkMachines2),
            "dark_machines_4" => Ok(Self::DarkMachines4),
            other => Err(Error::InvalidParameter(format!(
                "unknown target '{other}' (expected SICPOVM, dark_machines_2 or dark_machines_4)"
            ))),
        }
    }
}

/// Sampling strategy of the global optimiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMethod {
    /// Simplicial complex sampling
    Simplicial,
    /// Sobol sequence
    Sobol,
    /// Halton sequence
    Halton,
}

impl SamplingMethod {
    /// Registry text for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simplicial => "simplicial",
            Self::Sobol => "sobol",
            Self::Halton => "halton",
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "simplicial" => Ok(Self::Simplicial),
            "sobol" => Ok(Self::Sobol),
            "halton" => Ok(Self::Halton),
            other => Err(Error::InvalidParameter(format!(
                "unknown sampling method '{other}' (expected simplicial, sobol or halton)"
            ))),
        }
    }
}

/// Settings shared by every optimisation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseParameters {
    target_name: TargetName,
    n_dims: u32,
}

impl BaseParameters {
    /// Gradient norm below which a local minimisation stops.
    pub const MINIMIZATION_GTOL: f64 = 1e-11;
    /// Function value below which a minimisation counts as a success.
    pub const MINIMIZATION_THRESHOLD: f64 = 1e-13;
    /// Seed for the drivers' random number generator.
    pub const SEED: i64 = 585_997;
    /// Maximum number of target function evaluations.
    pub const F_EVALS_MAX: i64 = 50_000_000;

    /// Create base parameters for a target and search-space dimension.
    #[must_use]
    pub const fn new(target_name: TargetName, n_dims: u32) -> Self {
        Self {
            target_name,
            n_dims,
        }
    }

    /// Target function name.
    #[must_use]
    pub const fn target_name(&self) -> TargetName {
        self.target_name
    }

    /// Dimension of the search space.
    #[must_use]
    pub const fn n_dims(&self) -> u32 {
        self.n_dims
    }

    /// Options handed to the local minimiser.
    ///
    /// Not a catalogued parameter. `ftol` is scaled by 0.1 relative to the
    /// success threshold and omitted for constrained runs.
    #[must_use]
    pub fn minimizer_options(&self, use_constraints: bool) -> BTreeMap<&'static str, ParamValue> {
        let mut options = BTreeMap::new();
        options.insert("gtol", ParamValue::Float(Self::MINIMIZATION_GTOL));
        options.insert("disp", ParamValue::Bool(false));
        if !use_constraints {
            options.insert("ftol", ParamValue::Float(Self::MINIMIZATION_THRESHOLD * 0.1));
            options.insert("maxls", ParamValue::Int(20));
        }
        options
    }

    fn fields(&self, use_constraints: bool) -> Vec<(String, ParamValue)> {
        vec![
            field("target_name", self.target_name.as_str()),
            field("n_dims", self.n_dims),
            field("use_constraints", use_constraints),
            field("minimization_gtol", Self::MINIMIZATION_GTOL),
            field("minimization_threshold", Self::MINIMIZATION_THRESHOLD),
            field("seed", Self::SEED),
            field("f_evals_max", Self::F_EVALS_MAX),
        ]
    }
}

fn field(name: &str, value: impl Into<ParamValue>) -> (String, ParamValue) {
    (name.to_string(), value.into())
}

/// Random-restart gradient descent (`random-gd`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientDescentParams {
    base: BaseParameters,
}

impl GradientDescentParams {
    /// Maximum number of initial vectors tried before aborting.
    pub const N_TRIALS: i64 = 100_000;

    /// Create gradient descent parameters.
    #[must_use]
    pub const fn new(target_name: TargetName, n_dims: u32) -> Self {
        Self {
            base: BaseParameters::new(target_name, n_dims),
        }
    }

    /// Shared base settings.
    #[must_use]
    pub const fn base(&self) -> &BaseParameters {
        &self.base
    }
}

impl ParameterSet for GradientDescentParams {
    fn kind_name(&self) -> String {
        "random-gd".to_string()
    }

    fn describe_fields(&self) -> Result<Vec<(String, ParamValue)>> {
        let mut fields = self.base.fields(false);
        fields.push(field("n_trials", Self::N_TRIALS));
        Ok(fields)
    }
}

/// Modified differential evolution (`devo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEvolutionParams {
    base: BaseParameters,
    use_minimizer: bool,
    pop_thinning_factor: f64,
}

impl DifferentialEvolutionParams {
    /// Default population thinning factor.
    pub const DEFAULT_POP_THINNING_FACTOR: f64 = 0.8;
    /// Generations per differential evolution round.
    pub const DE_MAXITER: i64 = 2;
    /// Mutation strategy.
    pub const DE_STRATEGY: &'static str = "best1exp";

    /// Create differential evolution parameters with the default thinning factor.
    #[must_use]
    pub const fn new(target_name: TargetName, n_dims: u32, use_minimizer: bool) -> Self {
        Self {
            base: BaseParameters::new(target_name, n_dims),
            use_minimizer,
            pop_thinning_factor: Self::DEFAULT_POP_THINNING_FACTOR,
        }
    }

    /// Override the population thinning factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the factor exceeds 1.0.
    pub fn with_pop_thinning_factor(mut self, factor: f64) -> Result<Self> {
        if factor > 1.0 || factor.is_nan() {
            return Err(Error::InvalidParameter(format!(
                "pop_thinning_factor must be <= 1.0, got {factor}"
            )));
        }
        self.pop_thinning_factor = factor;
        Ok(self)
    }

    /// Shared base settings.
    #[must_use]
    pub const fn base(&self) -> &BaseParameters {
        &self.base
    }

    /// Whether every candidate is polished by a local minimiser.
    #[must_use]
    pub const fn use_minimizer(&self) -> bool {
        self.use_minimizer
    }

    /// Fraction of the population kept between rounds.
    #[must_use]
    pub const fn pop_thinning_factor(&self) -> f64 {
        self.pop_thinning_factor
    }

    /// Population size: `max(15 * n_dims, 50)`.
    #[must_use]
    pub fn de_n_pop(&self) -> i64 {
        (15 * i64::from(self.base.n_dims)).max(50)
    }

    /// Number of rounds: `floor(1e8 / de_n_pop)`.
    #[must_use]
    pub fn n_trials(&self) -> i64 {
        100_000_000 / self.de_n_pop()
    }

    /// Relative distance below which population members are merged.
    #[must_use]
    pub fn max_rel_dist_threshold(&self) -> f64 {
        1e-7 * f64::from(self.base.n_dims)
    }
}

impl ParameterSet for DifferentialEvolutionParams {
    fn kind_name(&self) -> String {
        "devo".to_string()
    }

    fn describe_fields(&self) -> Result<Vec<(String, ParamValue)>> {
        let mut fields = self.base.fields(false);
        fields.extend([
            field("use_minimizer", self.use_minimizer),
            field("pop_thinning_factor", self.pop_thinning_factor),
            field("de_n_pop", self.de_n_pop()),
            field("n_trials", self.n_trials()),
            field("use_x0_insertion", true),
            field("de_maxiter", Self::DE_MAXITER),
            field("de_strategy", Self::DE_STRATEGY),
            field("max_rel_dist_threshold", self.max_rel_dist_threshold()),
        ]);
        Ok(fields)
    }
}

/// Simplicial homology global optimisation (`shgo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalOptimizationParams {
    base: BaseParameters,
    sampling_method: SamplingMethod,
    use_constraints: bool,
}

impl GlobalOptimizationParams {
    /// Create global optimisation parameters.
    #[must_use]
    pub const fn new(
        target_name: TargetName,
        n_dims: u32,
        sampling_method: SamplingMethod,
        use_constraints: bool,
    ) -> Self {
        Self {
            base: BaseParameters::new(target_name, n_dims),
            sampling_method,
            use_constraints,
        }
    }

    /// Shared base settings.
    #[must_use]
    pub const fn base(&self) -> &BaseParameters {
        &self.base
    }

    /// Sampling strategy.
    #[must_use]
    pub const fn sampling_method(&self) -> SamplingMethod {
        self.sampling_method
    }

    /// Whether the norm constraint is applied.
    #[must_use]
    pub const fn use_constraints(&self) -> bool {
        self.use_constraints
    }
}

impl ParameterSet for GlobalOptimizationParams {
    fn kind_name(&self) -> String {
        "shgo".to_string()
    }

    fn describe_fields(&self) -> Result<Vec<(String, ParamValue)>> {
        let mut fields = self.base.fields(self.use_constraints);
        fields.extend([
            field("sampling_method", self.sampling_method.as_str()),
            field("log_minimization_history", true),
            field("minimize_every_iter", true),
        ]);
        Ok(fields)
    }
}
