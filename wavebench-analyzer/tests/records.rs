use std::fs;
use std::path::Path;
use wavebench_analyzer::records::completed_records;
use wavebench_runner::instance_store::InstanceStore;
use wavebench_runner::result_cache;
use wavebench_runner::runner::materialize;
use wavebench_structs::config::{
    BatchPlan, CommandSpec, Encoding, ExperimentParameters, InstanceRef,
};
use wavebench_structs::core::{Algorithm, ResultRecord};

const INSTANCE_TEXT: &str = "2 5 2\n2 1 3 2 2\n1 3 4\n2 1 1 2 1\n1 3 2\n2 5\n";

fn command(program: &str) -> CommandSpec {
    CommandSpec {
        program: program.to_string(),
        args: vec![],
    }
}

fn sample_plan(dir: &Path, runs: u64) -> BatchPlan {
    let datasets = dir.join("datasets/a");
    fs::create_dir_all(&datasets).unwrap();
    fs::write(datasets.join("instance_0001.txt"), INSTANCE_TEXT).unwrap();
    fs::write(datasets.join("instance_0002.txt"), INSTANCE_TEXT).unwrap();
    BatchPlan {
        batch_name: "sbpo".to_string(),
        datasets_dir: dir.join("datasets"),
        experiments_dir: dir.join("experiments"),
        stats_dir: dir.join("stats"),
        solver: command("true"),
        checker: command("true"),
        algorithm: Algorithm::Greedy,
        runs,
        parameters: ExperimentParameters::default(),
        variants: vec![],
        instances: vec![
            InstanceRef {
                dataset: "a".to_string(),
                id: "0001".to_string(),
            },
            InstanceRef {
                dataset: "a".to_string(),
                id: "0002".to_string(),
            },
        ],
    }
}

fn seed_cache(plan: &BatchPlan, picks: &[(usize, Option<f64>)]) {
    let mut store = InstanceStore::new(plan.stats_dir.clone());
    let experiments = materialize(plan, &mut store).unwrap();
    for (index, objective_value) in picks {
        let record = ResultRecord {
            objective_value: *objective_value,
            feasibility: objective_value.is_some(),
            execution_time: 0.25,
        };
        result_cache::store(
            &experiments[*index].result_file(&plan.experiments_dir),
            &record,
        )
        .unwrap();
    }
}

#[test]
fn test_empty_cache_yields_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let plan = sample_plan(dir.path(), 2);
    assert_eq!(completed_records(&plan).unwrap(), vec![]);
}

#[test]
fn test_only_cached_experiments_survive() {
    let dir = tempfile::tempdir().unwrap();
    let plan = sample_plan(dir.path(), 3);
    // Plan order: a/0001 runs 0..3, then a/0002 runs 0..3.
    seed_cache(&plan, &[(0, Some(10.0)), (2, Some(12.0)), (4, Some(20.0))]);

    let records = completed_records(&plan).unwrap();
    let keys: Vec<(String, u64)> = records
        .iter()
        .map(|r| (r.instance.key(), r.run_id))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("a/0001".to_string(), 0),
            ("a/0001".to_string(), 2),
            ("a/0002".to_string(), 1),
        ]
    );
    assert_eq!(records[0].objective_value, Some(10.0));
    assert_eq!(records[2].objective_value, Some(20.0));
    assert!(records.iter().all(|r| r.execution_time == Some(0.25)));
}

#[test]
fn test_infeasible_records_still_count_as_completed() {
    let dir = tempfile::tempdir().unwrap();
    let plan = sample_plan(dir.path(), 1);
    seed_cache(&plan, &[(0, None)]);

    let records = completed_records(&plan).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].feasibility, Some(false));
    assert_eq!(records[0].objective_value, None);
}

#[test]
fn test_variant_records_keep_their_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let mut plan = sample_plan(dir.path(), 1);
    let mut subset = ExperimentParameters::default();
    subset.encoding = Some(Encoding::Subset);
    let mut binary = ExperimentParameters::default();
    binary.encoding = Some(Encoding::Binary);
    plan.variants = vec![subset, binary];

    // Plan order: a/0001 subset, a/0001 binary, a/0002 subset, a/0002 binary.
    seed_cache(&plan, &[(1, Some(5.0)), (2, Some(6.0))]);

    let records = completed_records(&plan).unwrap();
    let keys: Vec<(String, String)> = records
        .iter()
        .map(|r| (r.instance.key(), r.canonical_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (
                "a/0001".to_string(),
                "binary_gen50_pop60_cr0.9_mr0.001".to_string()
            ),
            (
                "a/0002".to_string(),
                "subset_gen50_pop60_cr0.9_mr0.001".to_string()
            ),
        ]
    );
}
