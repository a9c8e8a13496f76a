use crate::cli::{self, RunStats};
use log::{error, info, warn};
use ncsat::{
    encoder,
    solver::{SolveResult, Solver, Variant, get_solver},
};
use std::{
    error::Error,
    path::{Path, PathBuf},
    time::Instant,
};

pub fn solve(
    path: PathBuf,
    variant: Variant,
    validate: bool,
    limit: Option<usize>,
    no_progress_bar: bool,
) -> Result<(), Box<dyn Error>> {
    let progress = cli::init_logging();

    let start = Instant::now();
    let mut stats = RunStats::new();
    let mut queue = cli::collect_instances(&path, limit)?;

    // Process the first instance alone to estimate the remaining runtime.
    let Some(first_file) = queue.pop() else {
        warn!("No instances found at {:?}", path);
        return Ok(());
    };
    let first_start = Instant::now();
    solve_file(&first_file, variant, validate, &mut stats).map_err(|e| {
        error!("Error while solving {:?}: {}", first_file, e);
        e
    })?;
    let first_duration = first_start.elapsed();

    if !queue.is_empty() {
        let bar = if !no_progress_bar && cli::should_use_progress_bar(queue.len(), first_duration)
        {
            let bar = cli::create_progress_bar(&progress, queue.len() + 1);
            bar.set_position(1); // Account for the first instance.
            Some(bar)
        } else {
            None
        };

        for path in queue {
            if let Err(e) = solve_file(&path, variant, validate, &mut stats) {
                error!("Error while solving {:?}: {}", path, e);
            }
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = &bar {
            bar.finish_with_message("done");
        }
    }

    stats.print_summary();
    info!("Total runtime: {}", cli::human_duration(start.elapsed()));

    Ok(())
}

/// Solves a single instance, updating stats and optionally verifying the model.
fn solve_file(
    path: &Path,
    variant: Variant,
    validate: bool,
    stats: &mut RunStats,
) -> Result<(), Box<dyn Error>> {
    info!("Solving {:?} with the {} solver", path, variant);
    let instance = cli::load_instance(path)?;
    stats.processed += 1;

    let mut solver = get_solver(
        variant,
        instance.problem.clauses.clone(),
        instance.problem.num_vars,
    )?;
    let start = Instant::now();
    let result = solver.solve();
    let elapsed = start.elapsed();

    match &result {
        SolveResult::Sat(model) => {
            stats.sat += 1;
            info!("SAT in {}", cli::human_duration(elapsed));

            if validate {
                match instance.problem.verify_model(model) {
                    Ok(()) => stats.verified += 1,
                    Err(msg) => {
                        warn!("Model verification failed: {}", msg);
                        stats.failed_verifications += 1;
                    }
                }
            }

            match &instance.grid {
                Some(grid) => {
                    let solved = encoder::decode_model(model, grid.n())?;
                    println!("{}", solved.render());
                }
                None => println!("{}", format_model(model)),
            }
        }
        SolveResult::Unsat => {
            stats.unsat += 1;
            info!("UNSAT in {}", cli::human_duration(elapsed));
        }
    }

    let metrics = solver.metrics();
    info!(
        "decisions={} backtracks={} unit_propagations={} conflicts={}",
        metrics.decisions, metrics.backtracks, metrics.unit_propagations, metrics.conflicts
    );

    Ok(())
}

fn format_model(model: &[i32]) -> String {
    use itertools::Itertools;
    model.iter().map(i32::to_string).join(" ")
}
