use crate::config::ExperimentParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Descriptive statistics for one benchmark instance, as persisted in the
/// per-instance stats cache file. All nine numeric fields are required when
/// reading a cached record; `input_file` is informational only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstanceStats {
    #[serde(default)]
    pub input_file: String,
    pub aisles_count: u64,
    pub orders_count: u64,
    pub items_count: u64,
    pub wave_size_lb: u64,
    pub wave_size_ub: u64,
    pub mean_aisle_capacity: f64,
    pub mean_order_size: f64,
    pub mean_items_per_aisle: f64,
    pub mean_items_per_order: f64,
}

/// One benchmark problem. Immutable once its statistics are populated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Instance {
    pub dataset: String,
    pub id: String,
    pub input_file: PathBuf,
    pub stats: InstanceStats,
}

impl Instance {
    pub fn key(&self) -> String {
        format!("{}/{}", self.dataset, self.id)
    }

    /// Path component used under the solutions/results trees.
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.dataset, self.id)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[serde(rename = "gGA")]
    GenerationalGa,
    #[serde(rename = "ssGA")]
    SteadyStateGa,
    #[serde(rename = "greedy")]
    Greedy,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::GenerationalGa => "gGA",
            Algorithm::SteadyStateGa => "ssGA",
            Algorithm::Greedy => "greedy",
        }
    }

    /// Positional mode tokens passed to the solver process.
    pub fn mode_tokens(&self) -> &'static [&'static str] {
        match self {
            Algorithm::GenerationalGa => &["genetic", "generational"],
            Algorithm::SteadyStateGa => &["genetic", "steadyState"],
            Algorithm::Greedy => &["greedy"],
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The record persisted in the result cache. `objective_value` is null for
/// infeasible waves; `execution_time` is wall-clock seconds of the solver run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultRecord {
    #[serde(default)]
    pub objective_value: Option<f64>,
    pub feasibility: bool,
    pub execution_time: f64,
}

/// One (batch, instance, algorithm, parameter set, run index) trial.
///
/// The identity components never change after construction. The result fields
/// stay unset until the first completed computation, after which they mirror
/// the cached record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Experiment {
    pub batch_name: String,
    pub instance: Instance,
    pub algorithm: Algorithm,
    pub parameters: ExperimentParameters,
    pub run_id: u64,
    pub feasibility: Option<bool>,
    pub objective_value: Option<f64>,
    pub execution_time: Option<f64>,
}

impl Experiment {
    pub fn new(
        batch_name: String,
        instance: Instance,
        algorithm: Algorithm,
        parameters: ExperimentParameters,
        run_id: u64,
    ) -> Self {
        Self {
            batch_name,
            instance,
            algorithm,
            parameters,
            run_id,
            feasibility: None,
            objective_value: None,
            execution_time: None,
        }
    }

    /// Seed handed to the solver: run index offset by the configured base seed.
    pub fn seed(&self) -> u64 {
        self.run_id + self.parameters.initial_seed
    }

    pub fn canonical_string(&self) -> String {
        self.parameters.canonical_string()
    }

    fn variant_dir(&self) -> String {
        format!("{}_{}", self.algorithm.as_str(), self.canonical_string())
    }

    /// Where the solver writes its solution artifact. Distinct identities map
    /// to distinct paths; this is the basis of cache correctness.
    pub fn solution_file(&self, experiments_dir: &Path) -> PathBuf {
        experiments_dir
            .join(&self.batch_name)
            .join("solutions")
            .join(self.instance.dir_name())
            .join(self.variant_dir())
            .join(format!("run{}.txt", self.run_id))
    }

    /// Where the completed result record is cached.
    pub fn result_file(&self, experiments_dir: &Path) -> PathBuf {
        experiments_dir
            .join(&self.batch_name)
            .join("results")
            .join(self.instance.dir_name())
            .join(self.variant_dir())
            .join(format!("run{}.json", self.run_id))
    }

    pub fn apply_record(&mut self, record: &ResultRecord) {
        self.feasibility = Some(record.feasibility);
        self.objective_value = record.objective_value;
        self.execution_time = Some(record.execution_time);
    }

    /// The completed record, if one exists.
    pub fn record(&self) -> Option<ResultRecord> {
        match (self.feasibility, self.execution_time) {
            (Some(feasibility), Some(execution_time)) => Some(ResultRecord {
                objective_value: self.objective_value,
                feasibility,
                execution_time,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} run {}",
            self.batch_name,
            self.instance.key(),
            self.algorithm,
            self.run_id
        )
    }
}

/// Terminal state of one `run()` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// A well-formed cached record was reused; no external invocation.
    CacheHit,
    /// The solver ran, the checker concluded, and the record was persisted.
    Computed,
    /// The solver ran but the checker failed; nothing was persisted and the
    /// experiment stays retryable.
    Indeterminate,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunOutcome::CacheHit => "cache hit",
            RunOutcome::Computed => "computed",
            RunOutcome::Indeterminate => "indeterminate",
        };
        write!(f, "{}", s)
    }
}
