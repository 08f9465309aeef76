use std::fs;
use std::path::Path;
use wavebench_runner::checker::{CheckReport, CommandChecker, SolutionChecker};
use wavebench_structs::config::CommandSpec;

fn spec(program: &str, args: &[&str]) -> CommandSpec {
    CommandSpec {
        program: program.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_parses_stdout_verdict() {
    let checker = CommandChecker::new(spec(
        "sh",
        &["-c", "echo '{\"is_feasible\":true,\"objective_value\":12.5}'"],
    ));
    let report = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap();
    assert_eq!(
        report,
        CheckReport {
            is_feasible: true,
            objective_value: 12.5,
        }
    );
}

#[test]
fn test_takes_last_non_empty_stdout_line() {
    let checker = CommandChecker::new(spec(
        "sh",
        &["-c", "printf 'reading solution\\n{\"is_feasible\":false}\\n\\n'"],
    ));
    let report = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap();
    assert!(!report.is_feasible);
    assert_eq!(report.objective_value, 0.0);
}

#[test]
fn test_appends_instance_and_solution_paths() {
    let dir = tempfile::tempdir().unwrap();
    let solution_file = dir.path().join("solution.txt");
    fs::write(&solution_file, "0 1 2\n").unwrap();

    // $1 is the instance path, $2 the solution path; succeed only if the
    // solution artifact is readable.
    let checker = CommandChecker::new(spec(
        "sh",
        &[
            "-c",
            "cat \"$2\" > /dev/null && echo '{\"is_feasible\":true,\"objective_value\":3.0}'",
            "checker",
        ],
    ));
    let report = checker
        .check(Path::new("instance.txt"), &solution_file)
        .unwrap();
    assert_eq!(report.objective_value, 3.0);

    let missing = dir.path().join("missing.txt");
    assert!(checker.check(Path::new("instance.txt"), &missing).is_err());
}

#[test]
fn test_nonzero_exit_is_retryable_failure() {
    let checker = CommandChecker::new(spec("false", &[]));
    let err = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("exited"));
}

#[test]
fn test_unparseable_output_is_failure() {
    let checker = CommandChecker::new(spec("sh", &["-c", "echo nonsense"]));
    let err = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("unparseable"));
}

#[test]
fn test_empty_output_is_failure() {
    let checker = CommandChecker::new(spec("true", &[]));
    let err = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap_err();
    assert!(err.to_string().contains("no output"));
}

#[test]
fn test_missing_program_is_failure() {
    let checker = CommandChecker::new(spec("wavebench-no-such-checker", &[]));
    let err = checker
        .check(Path::new("instance.txt"), Path::new("solution.txt"))
        .unwrap_err();
    assert!(err.to_string().contains("failed to spawn"));
}
