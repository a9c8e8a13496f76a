use crate::cli;
use log::{info, warn};
use ncsat::{
    encoder::{self, Grid},
    solver::{SolveResult, Solver, Variant, get_solver},
};
use std::{
    error::Error,
    io::{self, BufWriter, Write},
};

/// Generates a solvable puzzle: solves the empty grid, then keeps a random
/// subset of cells as clues. The output is in puzzle file format.
pub fn generate(size: usize, clues: Option<usize>, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
    let _progress = cli::init_logging();

    let empty = Grid::empty(size)?;
    let problem = encoder::encode(&empty);
    info!(
        "Searching for a full {}×{} solution ({} variables, {} clauses)",
        size,
        size,
        problem.num_vars,
        problem.num_clauses()
    );

    let mut solver = get_solver(Variant::Combined, problem.clauses.clone(), problem.num_vars)?;
    let model = match solver.solve() {
        SolveResult::Sat(model) => model,
        SolveResult::Unsat => {
            // Small grids genuinely have no non-consecutive solution.
            warn!("No {}×{} non-consecutive Sudoku exists", size, size);
            return Ok(());
        }
    };
    let solution = encoder::decode_model(&model, size)?;

    let num_clues = clues.unwrap_or(size * size).min(size * size);
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut cells: Vec<(usize, usize)> = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .collect();
    rng.shuffle(&mut cells);

    let mut puzzle = Grid::empty(size)?;
    for &(row, col) in cells.iter().take(num_clues) {
        puzzle.set_value(row, col, solution.value(row, col));
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    puzzle.write_plain(&mut writer)?;
    writer.flush()?;

    Ok(())
}
