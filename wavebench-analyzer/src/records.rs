use wavebench_runner::error::Result;
use wavebench_runner::instance_store::InstanceStore;
use wavebench_runner::result_cache;
use wavebench_runner::runner::materialize;
use wavebench_structs::config::BatchPlan;
use wavebench_structs::core::Experiment;

/// Materializes the plan's experiments and populates them from the result
/// cache. Experiments without a cached record are dropped; the survivors
/// keep plan order (instance, then parameter set, then ascending run_id).
pub fn completed_records(plan: &BatchPlan) -> Result<Vec<Experiment>> {
    let mut store = InstanceStore::new(plan.stats_dir.clone());
    let mut experiments = materialize(plan, &mut store)?;
    experiments.retain_mut(|experiment| {
        match result_cache::try_load(&experiment.result_file(&plan.experiments_dir)) {
            Some(record) => {
                experiment.apply_record(&record);
                true
            }
            None => false,
        }
    });
    Ok(experiments)
}
