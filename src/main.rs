pub mod cli;

use clap::{Parser, Subcommand};
use ncsat::solver::Variant;
use std::{error::Error, path::PathBuf};

use crate::cli::{compare::compare, encode::encode, generate::generate, solve::solve};

#[derive(Parser)]
#[command(name = "ncsat", version, about = "Non-consecutive Sudoku SAT toolkit")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a puzzle file to DIMACS CNF
    Encode {
        /// Path to a puzzle file
        #[arg(value_name = "PUZZLE")]
        puzzle: PathBuf,
        /// Write the CNF to a file instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Solve a puzzle or DIMACS CNF file, or a directory of instances
    Solve {
        /// Path to a puzzle/CNF file or a directory of them
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Solver variant to run
        #[arg(short = 'v', long = "variant", value_name = "VARIANT", default_value = "combined", value_parser = cli::parse_variant)]
        variant: Variant,
        /// Validate models against every clause after solving
        #[arg(long)]
        validate: bool,
        /// Limit the number of instances to solve
        #[arg(short = 'l', long = "limit", value_name = "LIMIT")]
        limit: Option<usize>,
        /// Disable the progress bar
        #[arg(long = "no-bar")]
        no_progress_bar: bool,
    },
    /// Run all four solver variants on one instance and tabulate their metrics
    Compare {
        /// Path to a puzzle or CNF file
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Generate a solvable non-consecutive Sudoku puzzle
    Generate {
        /// Grid size (must be a perfect square)
        #[arg(value_name = "SIZE")]
        size: usize,
        /// Number of clues to keep (defaults to the full solution)
        #[arg(short = 'c', long = "clues", value_name = "CLUES")]
        clues: Option<usize>,
        /// Seed for reproducible output
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Command::Encode { puzzle, output } => {
            encode(puzzle, output)?;
        }
        Command::Solve {
            path,
            variant,
            validate,
            limit,
            no_progress_bar,
        } => {
            solve(path, variant, validate, limit, no_progress_bar)?;
        }
        Command::Compare { path } => {
            compare(path)?;
        }
        Command::Generate { size, clues, seed } => {
            generate(size, clues, seed)?;
        }
    }

    Ok(())
}
