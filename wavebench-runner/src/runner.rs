use crate::checker::{CommandChecker, SolutionChecker};
use crate::error::{Error, Result};
use crate::instance_store::InstanceStore;
use crate::{result_cache, solver};
use std::fs;
use std::path::PathBuf;
use wavebench_structs::config::{BatchPlan, CommandSpec};
use wavebench_structs::core::{Experiment, ResultRecord, RunOutcome};

/// Executes experiments against the result cache: cache hit, or solve,
/// check, persist.
pub struct ExperimentRunner<C: SolutionChecker> {
    experiments_dir: PathBuf,
    solver: CommandSpec,
    checker: C,
}

impl<C: SolutionChecker> ExperimentRunner<C> {
    pub fn new(experiments_dir: PathBuf, solver: CommandSpec, checker: C) -> Self {
        Self {
            experiments_dir,
            solver,
            checker,
        }
    }

    /// Runs one experiment to a terminal state.
    ///
    /// A well-formed cached record short-circuits everything: no solver, no
    /// checker. On a miss the solver runs; nonzero exit propagates and
    /// leaves the cache untouched. A checker failure is absorbed as
    /// `Indeterminate` with no cache write, so the identity stays retryable.
    /// Only a conclusive verdict is persisted. Idempotent: a second call on
    /// a completed experiment reloads from cache.
    pub fn run(&self, experiment: &mut Experiment) -> Result<RunOutcome> {
        let result_file = experiment.result_file(&self.experiments_dir);
        if let Some(record) = result_cache::try_load(&result_file) {
            experiment.apply_record(&record);
            return Ok(RunOutcome::CacheHit);
        }

        let solution_file = experiment.solution_file(&self.experiments_dir);
        if let Some(parent) = solution_file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let execution_time = solver::invoke(&self.solver, experiment, &solution_file)?;

        let report = match self
            .checker
            .check(&experiment.instance.input_file, &solution_file)
        {
            Ok(report) => report,
            Err(e) => {
                println!("[runner] no verdict for {}: {}", experiment, e);
                return Ok(RunOutcome::Indeterminate);
            }
        };

        let record = ResultRecord {
            objective_value: report.is_feasible.then_some(report.objective_value),
            feasibility: report.is_feasible,
            execution_time,
        };
        result_cache::store(&result_file, &record)?;
        experiment.apply_record(&record);
        Ok(RunOutcome::Computed)
    }
}

/// Resolves every instance in the plan through the store and yields one
/// experiment per (instance, parameter set, run_id), run ids ascending.
pub fn materialize(plan: &BatchPlan, store: &mut InstanceStore) -> Result<Vec<Experiment>> {
    let parameter_sets = plan.parameter_sets();
    let mut experiments = Vec::new();
    for instance_ref in &plan.instances {
        let input_file = plan.input_file(&instance_ref.dataset, &instance_ref.id);
        let instance = store.load_or_compute(&instance_ref.dataset, &instance_ref.id, &input_file)?;
        for parameters in &parameter_sets {
            for run_id in 0..plan.runs {
                experiments.push(Experiment::new(
                    plan.batch_name.clone(),
                    instance.clone(),
                    plan.algorithm,
                    parameters.clone(),
                    run_id,
                ));
            }
        }
    }
    Ok(experiments)
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchSummary {
    pub computed: usize,
    pub cache_hits: usize,
    pub indeterminate: usize,
}

/// Runs every experiment in the plan sequentially, logging one line per
/// experiment. Indeterminate outcomes are counted and skipped; a fatal error
/// stops the batch.
pub fn run_batch(plan: &BatchPlan) -> Result<BatchSummary> {
    let mut store = InstanceStore::new(plan.stats_dir.clone());
    let mut experiments = materialize(plan, &mut store)?;
    let runner = ExperimentRunner::new(
        plan.experiments_dir.clone(),
        plan.solver.clone(),
        CommandChecker::new(plan.checker.clone()),
    );
    let mut summary = BatchSummary {
        computed: 0,
        cache_hits: 0,
        indeterminate: 0,
    };
    for experiment in experiments.iter_mut() {
        let outcome = runner.run(experiment)?;
        println!("[runner] {}: {}", experiment, outcome);
        match outcome {
            RunOutcome::CacheHit => summary.cache_hits += 1,
            RunOutcome::Computed => summary.computed += 1,
            RunOutcome::Indeterminate => summary.indeterminate += 1,
        }
    }
    println!(
        "[runner] batch {} done: {} computed, {} cache hits, {} indeterminate",
        plan.batch_name, summary.computed, summary.cache_hits, summary.indeterminate
    );
    Ok(summary)
}
