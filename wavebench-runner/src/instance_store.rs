use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use wavebench_structs::core::{Instance, InstanceStats};
use wavebench_utils::{dejsonify, jsonify};

/// Loads instances and their computed statistics, backed by a per-instance
/// JSON cache under the stats directory and an in-process memo.
pub struct InstanceStore {
    stats_dir: PathBuf,
    memo: HashMap<String, Instance>,
}

impl InstanceStore {
    pub fn new(stats_dir: PathBuf) -> Self {
        Self {
            stats_dir,
            memo: HashMap::new(),
        }
    }

    pub fn stats_file(&self, dataset: &str, id: &str) -> PathBuf {
        self.stats_dir
            .join(dataset)
            .join(format!("instance_{}.json", id))
    }

    /// Returns the instance, preferring (in order) the in-process memo, the
    /// on-disk stats cache, and a full recomputation from the raw file. Any
    /// unreadable or incomplete cache entry is a miss: stats are recomputed
    /// whole and rewritten, never merged field by field. A recomputed entry
    /// is persisted before returning.
    pub fn load_or_compute(
        &mut self,
        dataset: &str,
        id: &str,
        input_file: &Path,
    ) -> Result<Instance> {
        let key = format!("{}/{}", dataset, id);
        if let Some(instance) = self.memo.get(&key) {
            return Ok(instance.clone());
        }
        let stats_file = self.stats_file(dataset, id);
        let stats = match read_stats(&stats_file) {
            Ok(stats) => stats,
            Err(_) => {
                let stats = compute_stats(input_file)?;
                save_stats(&stats_file, &stats)?;
                stats
            }
        };
        let instance = Instance {
            dataset: dataset.to_string(),
            id: id.to_string(),
            input_file: input_file.to_path_buf(),
            stats,
        };
        self.memo.insert(key, instance.clone());
        Ok(instance)
    }
}

fn read_stats(path: &Path) -> Result<InstanceStats> {
    let content = fs::read_to_string(path).map_err(|e| Error::StatsUnavailable {
        path: path.display().to_string(),
        cause: e.to_string(),
    })?;
    dejsonify::<InstanceStats>(&content).map_err(|e| Error::StatsUnavailable {
        path: path.display().to_string(),
        cause: e.to_string(),
    })
}

fn save_stats(path: &Path, stats: &InstanceStats) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    fs::write(path, jsonify(stats)).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parses a raw instance file and derives its statistics.
///
/// Expected layout: a header `orders_count items_count aisles_count`, then
/// one pair-list line per order, one per aisle (`d` followed by `d`
/// `(item_id, quantity)` pairs), then `wave_size_lb wave_size_ub`.
pub fn compute_stats(input_file: &Path) -> Result<InstanceStats> {
    let content = fs::read_to_string(input_file).map_err(|e| parse_error(input_file, e))?;
    let mut lines = content.lines();

    let header = parse_integers(next_line(&mut lines, input_file)?, input_file)?;
    if header.len() != 3 {
        return Err(parse_error(
            input_file,
            format!("expected 3 header fields, found {}", header.len()),
        ));
    }
    let (orders_count, items_count, aisles_count) = (header[0], header[1], header[2]);
    if orders_count == 0 || aisles_count == 0 {
        return Err(parse_error(input_file, "zero orders or aisles"));
    }

    let mut total_order_size = 0;
    let mut total_order_items = 0;
    for _ in 0..orders_count {
        let (item_types, quantity) =
            parse_pair_list(next_line(&mut lines, input_file)?, input_file)?;
        total_order_items += item_types;
        total_order_size += quantity;
    }

    let mut total_aisle_capacity = 0;
    let mut total_aisle_items = 0;
    for _ in 0..aisles_count {
        let (item_types, quantity) =
            parse_pair_list(next_line(&mut lines, input_file)?, input_file)?;
        total_aisle_items += item_types;
        total_aisle_capacity += quantity;
    }

    let bounds = parse_integers(next_line(&mut lines, input_file)?, input_file)?;
    if bounds.len() != 2 {
        return Err(parse_error(
            input_file,
            format!("expected 2 wave size bounds, found {}", bounds.len()),
        ));
    }

    Ok(InstanceStats {
        input_file: input_file.display().to_string(),
        aisles_count,
        orders_count,
        items_count,
        wave_size_lb: bounds[0],
        wave_size_ub: bounds[1],
        mean_aisle_capacity: total_aisle_capacity as f64 / aisles_count as f64,
        mean_order_size: total_order_size as f64 / orders_count as f64,
        mean_items_per_aisle: total_aisle_items as f64 / aisles_count as f64,
        mean_items_per_order: total_order_items as f64 / orders_count as f64,
    })
}

fn parse_error(file: &Path, cause: impl ToString) -> Error {
    Error::Parse {
        file: file.display().to_string(),
        cause: cause.to_string(),
    }
}

fn next_line<'a>(lines: &mut std::str::Lines<'a>, file: &Path) -> Result<&'a str> {
    lines
        .next()
        .ok_or_else(|| parse_error(file, "unexpected end of file"))
}

fn parse_integers(line: &str, file: &Path) -> Result<Vec<u64>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|e| parse_error(file, format!("invalid integer {:?}: {}", token, e)))
        })
        .collect()
}

/// Decodes one `d (item, qty) ...` line; returns (item type count, quantity sum).
fn parse_pair_list(line: &str, file: &Path) -> Result<(u64, u64)> {
    let values = parse_integers(line, file)?;
    if values.is_empty() {
        return Err(parse_error(file, "empty pair list line"));
    }
    let item_types = values[0];
    let pairs = &values[1..];
    if pairs.len() % 2 != 0 || (pairs.len() / 2) as u64 != item_types {
        return Err(parse_error(
            file,
            format!(
                "pair list declares {} pairs but has {} values",
                item_types,
                pairs.len()
            ),
        ));
    }
    let quantity = pairs.chunks(2).map(|pair| pair[1]).sum();
    Ok((item_types, quantity))
}
