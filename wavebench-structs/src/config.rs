use crate::core::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Subset,
    Binary,
}

impl Encoding {
    pub fn token(&self) -> &'static str {
        match self {
            Encoding::Subset => "subset",
            Encoding::Binary => "binary",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    OrdersUnion,
    Default,
}

impl CrossoverType {
    pub fn token(&self) -> &'static str {
        match self {
            CrossoverType::OrdersUnion => "orders_union",
            CrossoverType::Default => "default",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    Warm,
    Random,
}

impl StartMode {
    pub fn token(&self) -> &'static str {
        match self {
            StartMode::Warm => "warm",
            StartMode::Random => "random",
        }
    }
}

/// Solver parameters for one experiment. The optional selectors pick solver
/// variants; unset means the solver default.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExperimentParameters {
    pub iterations: u32,
    pub generations: u32,
    pub population_size: u32,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub initial_seed: u64,
    pub encoding: Option<Encoding>,
    pub crossover_type: Option<CrossoverType>,
    pub start: Option<StartMode>,
    pub show_output: bool,
}

impl Default for ExperimentParameters {
    fn default() -> Self {
        Self {
            iterations: 1,
            generations: 50,
            population_size: 60,
            crossover_rate: 0.9,
            mutation_rate: 0.001,
            initial_seed: 12345,
            encoding: None,
            crossover_type: None,
            start: None,
            show_output: false,
        }
    }
}

impl ExperimentParameters {
    /// Canonical token string naming this parameter set. The token order is
    /// fixed (encoding, crossover, start, then the mandatory rates), so two
    /// parameter sets with equal effective values always serialize
    /// identically regardless of how they were assembled.
    pub fn canonical_string(&self) -> String {
        let mut s = String::new();
        if let Some(encoding) = &self.encoding {
            s.push_str(encoding.token());
            s.push('_');
        }
        if let Some(crossover) = &self.crossover_type {
            s.push_str(crossover.token());
            s.push('_');
        }
        if let Some(start) = &self.start {
            s.push_str(start.token());
            s.push('_');
        }
        s.push_str(&format!(
            "gen{}_pop{}_cr{}_mr{}",
            self.generations, self.population_size, self.crossover_rate, self.mutation_rate
        ));
        s
    }

    /// Grouping token for the (population size, crossover rate, mutation
    /// rate) combination, used by the analysis operations.
    pub fn combo_string(&self) -> String {
        format!(
            "pop{}_cr{}_mr{}",
            self.population_size, self.crossover_rate, self.mutation_rate
        )
    }
}

/// A configurable external command: the program plus any fixed leading
/// arguments (e.g. `java -jar solver.jar`). Contract arguments are appended
/// by the caller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstanceRef {
    pub dataset: String,
    pub id: String,
}

/// A batch plan: the JSON document naming everything one batch executes.
/// Materializing a plan into experiments is an explicit step performed by the
/// runner, never a side effect of loading the document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchPlan {
    pub batch_name: String,
    pub datasets_dir: PathBuf,
    pub experiments_dir: PathBuf,
    pub stats_dir: PathBuf,
    pub solver: CommandSpec,
    pub checker: CommandSpec,
    pub algorithm: Algorithm,
    pub runs: u64,
    #[serde(default)]
    pub parameters: ExperimentParameters,
    /// Optional parameter grid. When non-empty, each instance runs once per
    /// entry instead of once with the base parameters.
    #[serde(default)]
    pub variants: Vec<ExperimentParameters>,
    pub instances: Vec<InstanceRef>,
}

impl BatchPlan {
    /// Raw benchmark file for one instance reference.
    pub fn input_file(&self, dataset: &str, id: &str) -> PathBuf {
        self.datasets_dir
            .join(dataset)
            .join(format!("instance_{}.txt", id))
    }

    /// The effective parameter sets of this plan.
    pub fn parameter_sets(&self) -> Vec<ExperimentParameters> {
        if self.variants.is_empty() {
            vec![self.parameters.clone()]
        } else {
            self.variants.clone()
        }
    }
}
