use crate::cli;
use comfy_table::{Cell, ContentArrangement, Table};
use log::{info, warn};
use ncsat::solver::{Solver, Variant, get_solver};
use num_format::{Locale, ToFormattedString};
use std::{error::Error, path::PathBuf, time::Instant};

/// Runs all four solver variants on one instance and prints their metrics
/// side by side.
pub fn compare(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let _progress = cli::init_logging();

    let instance = cli::load_instance(&path)?;
    info!(
        "Comparing variants on {:?}: {} variables, {} clauses",
        path,
        instance.problem.num_vars,
        instance.problem.num_clauses()
    );

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Variant",
            "Status",
            "Time",
            "Decisions",
            "Backtracks",
            "Unit props",
            "Conflicts",
            "Vars elim",
            "Clauses elim",
        ]);

    let fmt = |count: u64| count.to_formatted_string(&Locale::en);
    let mut statuses = Vec::new();

    for variant in Variant::ALL {
        let mut solver = get_solver(
            variant,
            instance.problem.clauses.clone(),
            instance.problem.num_vars,
        )?;

        let start = Instant::now();
        let result = solver.solve();
        let elapsed = start.elapsed();
        statuses.push(result.status());

        let metrics = solver.metrics();
        let (vars_elim, clauses_elim) = match solver.preprocess_stats() {
            Some(stats) => (
                (stats.vars_eliminated as u64).to_formatted_string(&Locale::en),
                (stats.clauses_eliminated as u64).to_formatted_string(&Locale::en),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        table.add_row(vec![
            Cell::new(variant),
            Cell::new(result.status()),
            Cell::new(cli::human_duration(elapsed)),
            Cell::new(fmt(metrics.decisions)),
            Cell::new(fmt(metrics.backtracks)),
            Cell::new(fmt(metrics.unit_propagations)),
            Cell::new(fmt(metrics.conflicts)),
            Cell::new(vars_elim),
            Cell::new(clauses_elim),
        ]);
    }

    if statuses.windows(2).any(|pair| pair[0] != pair[1]) {
        warn!("Variants disagree on the status: {:?}", statuses);
    }

    println!("{table}");
    Ok(())
}
