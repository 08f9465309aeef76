use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use wavebench_structs::config::CommandSpec;
use wavebench_utils::dejsonify;

/// Verdict for one solution artifact. `objective_value` is meaningful only
/// when `is_feasible` is true.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CheckReport {
    pub is_feasible: bool,
    #[serde(default)]
    pub objective_value: f64,
}

/// Feasibility oracle for solution artifacts. An `Err` means "no verdict",
/// never a feasibility answer; callers must not cache anything on failure.
pub trait SolutionChecker {
    fn check(&self, instance_file: &Path, solution_file: &Path) -> Result<CheckReport>;
}

/// Checker backed by an external command. The two paths are appended to the
/// configured args and the verdict is parsed from the last non-empty stdout
/// line.
pub struct CommandChecker {
    spec: CommandSpec,
}

impl CommandChecker {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

impl SolutionChecker for CommandChecker {
    fn check(&self, instance_file: &Path, solution_file: &Path) -> Result<CheckReport> {
        let output = Command::new(&self.spec.program)
            .args(&self.spec.args)
            .arg(instance_file)
            .arg(solution_file)
            .output()
            .map_err(|e| {
                Error::CheckerFailure(format!("failed to spawn {}: {}", self.spec.program, e))
            })?;
        if !output.status.success() {
            return Err(Error::CheckerFailure(format!(
                "{} exited with {}: {}",
                self.spec.program,
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let verdict = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| {
                Error::CheckerFailure(format!("{} produced no output", self.spec.program))
            })?;
        dejsonify::<CheckReport>(verdict.trim())
            .map_err(|e| Error::CheckerFailure(format!("unparseable verdict: {}", e)))
    }
}
