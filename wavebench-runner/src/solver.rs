use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use std::time::Instant;
use wavebench_structs::config::{CommandSpec, CrossoverType, Encoding, StartMode};
use wavebench_structs::core::Experiment;

/// Contract arguments for one experiment, appended after the solver's fixed
/// args: instance path, algorithm mode tokens, `output:` target, `params:`
/// pack, then variant flags for the non-default parameter values.
pub fn build_args(experiment: &Experiment, solution_file: &Path) -> Vec<String> {
    let mut args = vec![experiment.instance.input_file.display().to_string()];
    args.extend(
        experiment
            .algorithm
            .mode_tokens()
            .iter()
            .map(|token| token.to_string()),
    );
    args.push(format!("output:{}", solution_file.display()));
    let p = &experiment.parameters;
    args.push(format!(
        "params:{}/{}/{}/{}/{}/{}",
        experiment.seed(),
        p.iterations,
        p.generations,
        p.population_size,
        p.crossover_rate,
        p.mutation_rate
    ));
    if p.encoding == Some(Encoding::Binary) {
        args.push("binaryEncoding".to_string());
    }
    if p.crossover_type == Some(CrossoverType::Default) {
        args.push("defaultCrossover".to_string());
    }
    if p.start == Some(StartMode::Random) {
        args.push("randomStart".to_string());
    }
    if p.show_output {
        args.push("showOutput".to_string());
    }
    args
}

/// Runs the solver synchronously and returns wall-clock seconds. Nonzero
/// exit is fatal; stderr is carried in the error.
pub fn invoke(solver: &CommandSpec, experiment: &Experiment, solution_file: &Path) -> Result<f64> {
    let start = Instant::now();
    let output = Command::new(&solver.program)
        .args(&solver.args)
        .args(build_args(experiment, solution_file))
        .output()
        .map_err(|e| {
            Error::SolverProcessFailure(format!("failed to spawn {}: {}", solver.program, e))
        })?;
    let elapsed = start.elapsed().as_secs_f64();
    if !output.status.success() {
        return Err(Error::SolverProcessFailure(format!(
            "{} exited with {}: {}",
            solver.program,
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(elapsed)
}
