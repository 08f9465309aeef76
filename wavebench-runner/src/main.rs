use anyhow::{anyhow, Result};
use clap::{arg, Command};
use std::fs;
use wavebench_runner::instance_store::InstanceStore;
use wavebench_runner::runner;
use wavebench_structs::config::BatchPlan;
use wavebench_utils::{dejsonify, jsonify};

fn cli() -> Command {
    Command::new("wavebench-runner")
        .about("Executes wave order picking experiment batches")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run_batch")
                .about("Runs every experiment in a batch plan")
                .arg(
                    arg!(<PLAN> "Batch plan json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("instance_stats")
                .about("Prints one stats record per instance in a batch plan")
                .arg(
                    arg!(<PLAN> "Batch plan json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("run_batch", sub_m)) => run_batch(sub_m.get_one::<String>("PLAN").unwrap().clone()),
        Some(("instance_stats", sub_m)) => {
            instance_stats(sub_m.get_one::<String>("PLAN").unwrap().clone())
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_batch(plan: String) -> Result<()> {
    let plan = load_plan(&plan);
    runner::run_batch(&plan)?;
    Ok(())
}

fn instance_stats(plan: String) -> Result<()> {
    let plan = load_plan(&plan);
    let mut store = InstanceStore::new(plan.stats_dir.clone());
    for instance_ref in &plan.instances {
        let input_file = plan.input_file(&instance_ref.dataset, &instance_ref.id);
        let instance = store.load_or_compute(&instance_ref.dataset, &instance_ref.id, &input_file)?;
        println!("{}", jsonify(&instance.stats));
    }
    Ok(())
}

fn load_plan(plan: &str) -> BatchPlan {
    let plan = if plan.ends_with(".json") {
        fs::read_to_string(plan).unwrap_or_else(|_| {
            eprintln!("Failed to read plan file: {}", plan);
            std::process::exit(1);
        })
    } else {
        plan.to_string()
    };

    dejsonify::<BatchPlan>(&plan).unwrap_or_else(|_| {
        eprintln!("Failed to parse plan");
        std::process::exit(1);
    })
}
