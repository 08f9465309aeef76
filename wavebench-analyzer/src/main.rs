use anyhow::{anyhow, Result};
use clap::{arg, Command};
use std::fs;
use wavebench_analyzer::comparison::{self, VariantField};
use wavebench_analyzer::records;
use wavebench_analyzer::summary::{self, GroupKey};
use wavebench_structs::config::BatchPlan;
use wavebench_utils::{dejsonify, jsonify};

fn cli() -> Command {
    Command::new("wavebench-analyzer")
        .about("Aggregates and compares wave order picking experiment results")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("summarize")
                .about("Prints one summary row per group of completed experiments")
                .arg(
                    arg!(<PLAN> "Batch plan json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--by [KEYS] "Comma separated group keys (instance, algorithm, encoding, crossover, start, params)")
                        .default_value("instance,algorithm")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("compare_paired")
                .about("Wilcoxon signed-rank comparison of two variants of a parameter field")
                .arg(
                    arg!(<PLAN> "Batch plan json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--field <FIELD> "Parameter field to compare (encoding, crossover, start)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--left <TOKEN> "Variant token treated as the left sample")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--right <TOKEN> "Variant token treated as the right sample")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("compare_groups")
                .about("Kruskal-Wallis comparison across parameter combinations")
                .arg(
                    arg!(<PLAN> "Batch plan json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("summarize", sub_m)) => summarize(
            sub_m.get_one::<String>("PLAN").unwrap().clone(),
            sub_m.get_one::<String>("by").unwrap().clone(),
        ),
        Some(("compare_paired", sub_m)) => compare_paired(
            sub_m.get_one::<String>("PLAN").unwrap().clone(),
            sub_m.get_one::<String>("field").unwrap().clone(),
            sub_m.get_one::<String>("left").unwrap().clone(),
            sub_m.get_one::<String>("right").unwrap().clone(),
        ),
        Some(("compare_groups", sub_m)) => {
            compare_groups(sub_m.get_one::<String>("PLAN").unwrap().clone())
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn summarize(plan: String, by: String) -> Result<()> {
    let plan = load_plan(&plan);
    let keys = parse_keys(&by)?;
    let records = records::completed_records(&plan)?;
    println!(
        "[analyzer] {} completed records in batch {}",
        records.len(),
        plan.batch_name
    );
    for row in summary::summarize(&records, &keys) {
        println!("{}", jsonify(&row));
    }
    Ok(())
}

fn compare_paired(plan: String, field: String, left: String, right: String) -> Result<()> {
    let plan = load_plan(&plan);
    let field = VariantField::parse(&field)
        .ok_or_else(|| anyhow!("Unknown variant field '{}'", field))?;
    for token in [&left, &right] {
        if !field.tokens().contains(&token.as_str()) {
            return Err(anyhow!("Unknown variant token '{}'", token));
        }
    }
    if left == right {
        return Err(anyhow!("Left and right variant tokens must differ"));
    }
    let records = records::completed_records(&plan)?;
    println!(
        "[analyzer] {} completed records in batch {}",
        records.len(),
        plan.batch_name
    );
    for row in comparison::compare_paired(&records, field, &left, &right) {
        println!("{}", jsonify(&row));
    }
    Ok(())
}

fn compare_groups(plan: String) -> Result<()> {
    let plan = load_plan(&plan);
    let records = records::completed_records(&plan)?;
    println!(
        "[analyzer] {} completed records in batch {}",
        records.len(),
        plan.batch_name
    );
    for row in comparison::compare_groups(&records) {
        println!("{}", jsonify(&row));
    }
    Ok(())
}

fn parse_keys(by: &str) -> Result<Vec<GroupKey>> {
    by.split(',')
        .map(|token| {
            let token = token.trim();
            GroupKey::parse(token).ok_or_else(|| anyhow!("Unknown group key '{}'", token))
        })
        .collect()
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
