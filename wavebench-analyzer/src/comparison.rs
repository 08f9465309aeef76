use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wavebench_structs::core::Experiment;
use wavebench_utils::{kruskal_wallis, mean, shapiro_wilk, wilcoxon_signed_rank, TestResult};

/// Categorical parameter axes available for paired comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantField {
    Encoding,
    Crossover,
    Start,
}

impl VariantField {
    pub fn parse(token: &str) -> Option<VariantField> {
        match token {
            "encoding" => Some(VariantField::Encoding),
            "crossover" => Some(VariantField::Crossover),
            "start" => Some(VariantField::Start),
            _ => None,
        }
    }

    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            VariantField::Encoding => &["subset", "binary"],
            VariantField::Crossover => &["orders_union", "default"],
            VariantField::Start => &["warm", "random"],
        }
    }

    fn value(&self, experiment: &Experiment) -> Option<&'static str> {
        let p = &experiment.parameters;
        match self {
            VariantField::Encoding => p.encoding.map(|e| e.token()),
            VariantField::Crossover => p.crossover_type.map(|c| c.token()),
            VariantField::Start => p.start.map(|s| s.token()),
        }
    }
}

/// Paired comparison of two variant tokens within one (instance, algorithm)
/// cell. `wilcoxon` and the normality markers are `None` when the samples
/// are degenerate for the respective test.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PairedRow {
    pub instance: String,
    pub algorithm: String,
    pub left: String,
    pub right: String,
    pub runs: usize,
    pub left_mean: Option<f64>,
    pub right_mean: Option<f64>,
    pub wilcoxon: Option<TestResult>,
    pub left_shapiro: Option<TestResult>,
    pub right_shapiro: Option<TestResult>,
}

/// Builds one paired row per (instance, algorithm) cell, pairing objective
/// values of the two variants by ascending run_id. Cells where the two
/// sample vectors differ in length, or where either is empty, are skipped.
pub fn compare_paired(
    records: &[Experiment],
    field: VariantField,
    left: &str,
    right: &str,
) -> Vec<PairedRow> {
    let mut cells: BTreeMap<(String, String), (Vec<(u64, f64)>, Vec<(u64, f64)>)> = BTreeMap::new();
    for record in records {
        let objective = match record.objective_value {
            Some(value) => value,
            None => continue,
        };
        let token = match field.value(record) {
            Some(token) => token,
            None => continue,
        };
        if token != left && token != right {
            continue;
        }
        let cell = cells
            .entry((record.instance.key(), record.algorithm.as_str().to_string()))
            .or_default();
        if token == left {
            cell.0.push((record.run_id, objective));
        } else {
            cell.1.push((record.run_id, objective));
        }
    }

    let mut rows = Vec::new();
    for ((instance, algorithm), (mut left_samples, mut right_samples)) in cells {
        if left_samples.is_empty() || left_samples.len() != right_samples.len() {
            continue;
        }
        left_samples.sort_by_key(|(run_id, _)| *run_id);
        right_samples.sort_by_key(|(run_id, _)| *run_id);
        let left_values: Vec<f64> = left_samples.iter().map(|(_, value)| *value).collect();
        let right_values: Vec<f64> = right_samples.iter().map(|(_, value)| *value).collect();
        rows.push(PairedRow {
            instance,
            algorithm,
            left: left.to_string(),
            right: right.to_string(),
            runs: left_values.len(),
            left_mean: mean(&left_values),
            right_mean: mean(&right_values),
            wilcoxon: wilcoxon_signed_rank(&left_values, &right_values),
            left_shapiro: shapiro_wilk(&left_values),
            right_shapiro: shapiro_wilk(&right_values),
        });
    }
    rows
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GroupCell {
    pub params: String,
    pub runs: usize,
    pub mean: Option<f64>,
    pub shapiro: Option<TestResult>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GroupsRow {
    pub instance: String,
    pub algorithm: String,
    pub groups: Vec<GroupCell>,
    pub kruskal_wallis: Option<TestResult>,
}

/// Independent comparison across (population size, crossover rate, mutation
/// rate) combinations per (instance, algorithm) cell. Cells with fewer than
/// two non-empty combinations are skipped.
pub fn compare_groups(records: &[Experiment]) -> Vec<GroupsRow> {
    let mut cells: BTreeMap<(String, String), BTreeMap<String, Vec<f64>>> = BTreeMap::new();
    for record in records {
        let objective = match record.objective_value {
            Some(value) => value,
            None => continue,
        };
        cells
            .entry((record.instance.key(), record.algorithm.as_str().to_string()))
            .or_default()
            .entry(record.parameters.combo_string())
            .or_default()
            .push(objective);
    }

    let mut rows = Vec::new();
    for ((instance, algorithm), combos) in cells {
        if combos.len() < 2 {
            continue;
        }
        let samples: Vec<Vec<f64>> = combos.values().cloned().collect();
        let groups: Vec<GroupCell> = combos
            .iter()
            .map(|(params, values)| GroupCell {
                params: params.clone(),
                runs: values.len(),
                mean: mean(values),
                shapiro: shapiro_wilk(values),
            })
            .collect();
        rows.push(GroupsRow {
            instance,
            algorithm,
            groups,
            kruskal_wallis: kruskal_wallis(&samples),
        });
    }
    rows
}
