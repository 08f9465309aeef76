use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use wavebench_structs::core::ResultRecord;
use wavebench_utils::{dejsonify, jsonify};

/// Reads a cached record. A missing, malformed, or partially written file is
/// a miss, never an error; the caller recomputes and overwrites.
pub fn try_load(path: &Path) -> Option<ResultRecord> {
    let content = fs::read_to_string(path).ok()?;
    dejsonify::<ResultRecord>(&content).ok()
}

/// Persists a complete record as canonical JSON, creating parent directories
/// as needed. Only conclusive records reach this point.
pub fn store(path: &Path, record: &ResultRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    fs::write(path, jsonify(record)).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: e,
    })
}
