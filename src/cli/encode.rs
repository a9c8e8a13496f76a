use crate::cli;
use log::info;
use ncsat::encoder::{self, Grid};
use std::{
    error::Error,
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

pub fn encode(puzzle: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let _progress = cli::init_logging();

    let text = std::fs::read_to_string(&puzzle)?;
    let grid = Grid::parse(&text)?;
    let problem = encoder::encode(&grid);
    info!(
        "Encoded {}×{} puzzle with {} clue(s): {} variables, {} clauses",
        grid.n(),
        grid.n(),
        grid.num_clues(),
        problem.num_vars,
        problem.num_clauses()
    );

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            problem.write_dimacs(&mut writer)?;
            writer.flush()?;
            info!("Wrote DIMACS CNF to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            problem.write_dimacs(&mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
