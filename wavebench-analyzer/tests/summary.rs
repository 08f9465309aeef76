use std::path::PathBuf;
use wavebench_analyzer::summary::{summarize, GroupKey};
use wavebench_structs::config::{CrossoverType, Encoding, ExperimentParameters, StartMode};
use wavebench_structs::core::{Algorithm, Experiment, Instance, InstanceStats, ResultRecord};

fn assert_close(left: f64, right: f64, tolerance: f64) {
    assert!(
        (left - right).abs() <= tolerance,
        "{} is not within {} of {}",
        left,
        tolerance,
        right
    );
}

fn sample_instance(dataset: &str, id: &str) -> Instance {
    Instance {
        dataset: dataset.to_string(),
        id: id.to_string(),
        input_file: PathBuf::from(format!("datasets/{}/instance_{}.txt", dataset, id)),
        stats: InstanceStats {
            input_file: String::new(),
            aisles_count: 2,
            orders_count: 2,
            items_count: 5,
            wave_size_lb: 2,
            wave_size_ub: 5,
            mean_aisle_capacity: 2.0,
            mean_order_size: 4.5,
            mean_items_per_aisle: 1.5,
            mean_items_per_order: 1.5,
        },
    }
}

fn completed(
    dataset: &str,
    algorithm: Algorithm,
    parameters: ExperimentParameters,
    run_id: u64,
    objective_value: Option<f64>,
    execution_time: f64,
) -> Experiment {
    let mut experiment = Experiment::new(
        "sbpo".to_string(),
        sample_instance(dataset, "0001"),
        algorithm,
        parameters,
        run_id,
    );
    experiment.apply_record(&ResultRecord {
        objective_value,
        feasibility: objective_value.is_some(),
        execution_time,
    });
    experiment
}

#[test]
fn test_group_key_parses_known_tokens() {
    assert_eq!(GroupKey::parse("instance"), Some(GroupKey::Instance));
    assert_eq!(GroupKey::parse("algorithm"), Some(GroupKey::Algorithm));
    assert_eq!(GroupKey::parse("encoding"), Some(GroupKey::Encoding));
    assert_eq!(GroupKey::parse("crossover"), Some(GroupKey::Crossover));
    assert_eq!(GroupKey::parse("start"), Some(GroupKey::Start));
    assert_eq!(GroupKey::parse("params"), Some(GroupKey::Params));
    assert_eq!(GroupKey::parse("dataset"), None);
}

#[test]
fn test_group_key_renders_unset_selectors_as_dash() {
    let experiment = completed(
        "a",
        Algorithm::GenerationalGa,
        ExperimentParameters::default(),
        0,
        Some(1.0),
        1.0,
    );
    assert_eq!(GroupKey::Instance.value(&experiment), "a/0001");
    assert_eq!(GroupKey::Algorithm.value(&experiment), "gGA");
    assert_eq!(GroupKey::Encoding.value(&experiment), "-");
    assert_eq!(GroupKey::Crossover.value(&experiment), "-");
    assert_eq!(GroupKey::Start.value(&experiment), "-");
    assert_eq!(GroupKey::Params.value(&experiment), "pop60_cr0.9_mr0.001");
}

#[test]
fn test_group_key_renders_set_selectors() {
    let mut parameters = ExperimentParameters::default();
    parameters.encoding = Some(Encoding::Binary);
    parameters.crossover_type = Some(CrossoverType::OrdersUnion);
    parameters.start = Some(StartMode::Random);
    let experiment = completed("a", Algorithm::SteadyStateGa, parameters, 0, Some(1.0), 1.0);
    assert_eq!(GroupKey::Encoding.value(&experiment), "binary");
    assert_eq!(GroupKey::Crossover.value(&experiment), "orders_union");
    assert_eq!(GroupKey::Start.value(&experiment), "random");
}

#[test]
fn test_summarize_groups_by_instance_and_algorithm() {
    let records = vec![
        completed(
            "a",
            Algorithm::GenerationalGa,
            ExperimentParameters::default(),
            0,
            Some(10.0),
            1.0,
        ),
        completed(
            "a",
            Algorithm::GenerationalGa,
            ExperimentParameters::default(),
            1,
            Some(14.0),
            3.0,
        ),
        completed(
            "b",
            Algorithm::GenerationalGa,
            ExperimentParameters::default(),
            0,
            Some(30.0),
            2.0,
        ),
    ];
    let rows = summarize(&records, &[GroupKey::Instance, GroupKey::Algorithm]);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].group, vec!["a/0001".to_string(), "gGA".to_string()]);
    assert_eq!(rows[0].objective_count, 2);
    assert_eq!(rows[0].objective_mean, Some(12.0));
    assert_eq!(rows[0].objective_max, Some(14.0));
    assert_close(rows[0].objective_std_dev.unwrap(), 8f64.sqrt(), 1e-12);
    assert_eq!(rows[0].time_count, 2);
    assert_eq!(rows[0].time_mean, Some(2.0));

    assert_eq!(rows[1].group, vec!["b/0001".to_string(), "gGA".to_string()]);
    assert_eq!(rows[1].objective_count, 1);
    assert_eq!(rows[1].objective_mean, Some(30.0));
    assert_eq!(rows[1].objective_std_dev, None);
}

#[test]
fn test_summarize_counts_infeasible_runs_in_time_only() {
    let records = vec![
        completed(
            "a",
            Algorithm::Greedy,
            ExperimentParameters::default(),
            0,
            Some(10.0),
            1.0,
        ),
        completed(
            "a",
            Algorithm::Greedy,
            ExperimentParameters::default(),
            1,
            None,
            5.0,
        ),
    ];
    let rows = summarize(&records, &[GroupKey::Instance]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].objective_count, 1);
    assert_eq!(rows[0].objective_mean, Some(10.0));
    assert_eq!(rows[0].time_count, 2);
    assert_eq!(rows[0].time_mean, Some(3.0));
    assert_eq!(rows[0].time_max, Some(5.0));
}

#[test]
fn test_summarize_orders_rows_by_group_value() {
    let records = vec![
        completed(
            "x",
            Algorithm::Greedy,
            ExperimentParameters::default(),
            0,
            Some(1.0),
            1.0,
        ),
        completed(
            "a",
            Algorithm::Greedy,
            ExperimentParameters::default(),
            0,
            Some(2.0),
            1.0,
        ),
        completed(
            "b",
            Algorithm::Greedy,
            ExperimentParameters::default(),
            0,
            Some(3.0),
            1.0,
        ),
    ];
    let rows = summarize(&records, &[GroupKey::Instance]);
    let groups: Vec<&str> = rows.iter().map(|row| row.group[0].as_str()).collect();
    assert_eq!(groups, vec!["a/0001", "b/0001", "x/0001"]);
}

#[test]
fn test_summarize_by_params_splits_combos() {
    let mut small = ExperimentParameters::default();
    small.population_size = 30;
    let records = vec![
        completed(
            "a",
            Algorithm::GenerationalGa,
            ExperimentParameters::default(),
            0,
            Some(10.0),
            1.0,
        ),
        completed("a", Algorithm::GenerationalGa, small, 0, Some(20.0), 1.0),
    ];
    let rows = summarize(&records, &[GroupKey::Params]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].group, vec!["pop30_cr0.9_mr0.001".to_string()]);
    assert_eq!(rows[0].objective_mean, Some(20.0));
    assert_eq!(rows[1].group, vec!["pop60_cr0.9_mr0.001".to_string()]);
    assert_eq!(rows[1].objective_mean, Some(10.0));
}
