use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wavebench_structs::core::Experiment;
use wavebench_utils::{max, mean, sample_std_dev};

/// One axis of the `summarize` grouping vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKey {
    Instance,
    Algorithm,
    Encoding,
    Crossover,
    Start,
    Params,
}

impl GroupKey {
    pub fn parse(token: &str) -> Option<GroupKey> {
        match token {
            "instance" => Some(GroupKey::Instance),
            "algorithm" => Some(GroupKey::Algorithm),
            "encoding" => Some(GroupKey::Encoding),
            "crossover" => Some(GroupKey::Crossover),
            "start" => Some(GroupKey::Start),
            "params" => Some(GroupKey::Params),
            _ => None,
        }
    }

    /// This experiment's value on the axis; unset variant selectors render
    /// as "-".
    pub fn value(&self, experiment: &Experiment) -> String {
        let p = &experiment.parameters;
        match self {
            GroupKey::Instance => experiment.instance.key(),
            GroupKey::Algorithm => experiment.algorithm.as_str().to_string(),
            GroupKey::Encoding => p
                .encoding
                .map(|e| e.token().to_string())
                .unwrap_or_else(|| "-".to_string()),
            GroupKey::Crossover => p
                .crossover_type
                .map(|c| c.token().to_string())
                .unwrap_or_else(|| "-".to_string()),
            GroupKey::Start => p
                .start
                .map(|s| s.token().to_string())
                .unwrap_or_else(|| "-".to_string()),
            GroupKey::Params => p.combo_string(),
        }
    }
}

/// Descriptive statistics for one group. Infeasible or incomplete records
/// contribute execution time but no objective sample, so the two counts can
/// differ.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub group: Vec<String>,
    pub objective_count: usize,
    pub objective_mean: Option<f64>,
    pub objective_std_dev: Option<f64>,
    pub objective_max: Option<f64>,
    pub time_count: usize,
    pub time_mean: Option<f64>,
    pub time_std_dev: Option<f64>,
    pub time_max: Option<f64>,
}

/// Groups records by the key tuple and computes descriptive rows, ordered by
/// group value.
pub fn summarize(records: &[Experiment], keys: &[GroupKey]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<Vec<String>, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let group = keys.iter().map(|key| key.value(record)).collect();
        let (objectives, times) = groups.entry(group).or_default();
        if let Some(objective) = record.objective_value {
            objectives.push(objective);
        }
        if let Some(time) = record.execution_time {
            times.push(time);
        }
    }
    groups
        .into_iter()
        .map(|(group, (objectives, times))| SummaryRow {
            group,
            objective_count: objectives.len(),
            objective_mean: mean(&objectives),
            objective_std_dev: sample_std_dev(&objectives),
            objective_max: max(&objectives),
            time_count: times.len(),
            time_mean: mean(&times),
            time_std_dev: sample_std_dev(&times),
            time_max: max(&times),
        })
        .collect()
}
