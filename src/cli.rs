pub mod compare;
pub mod encode;
pub mod generate;
pub mod solve;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::info;
use memmap2::Mmap;
use ncsat::{
    Error, Problem,
    encoder::{self, Grid},
    parser,
    solver::Variant,
};
use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

/// Initializes env_logger behind an indicatif bridge, so log lines don't
/// tear through the progress bar.
pub fn init_logging() -> MultiProgress {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let level = logger.filter();

    let progress = MultiProgress::new();
    if indicatif_log_bridge::LogWrapper::new(progress.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }
    progress
}

pub fn parse_variant(s: &str) -> Result<Variant, Error> {
    s.parse()
}

/// A problem loaded from disk; puzzle instances keep their grid around for
/// pretty-printing the solution.
pub struct Instance {
    pub problem: Problem,
    pub grid: Option<Grid>,
}

/// Loads an instance, dispatching on the extension: `.cnf`/`.dimacs` files
/// parse as DIMACS, everything else as a puzzle grid.
pub fn load_instance(path: &Path) -> Result<Instance, Error> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };

    if is_dimacs(path) {
        Ok(Instance {
            problem: parser::parse_dimacs(&mmap)?,
            grid: None,
        })
    } else {
        let text = std::str::from_utf8(&mmap)
            .map_err(|_| Error::InvalidInput("puzzle file is not valid UTF-8".to_string()))?;
        let grid = Grid::parse(text)?;
        let problem = encoder::encode(&grid);
        Ok(Instance {
            problem,
            grid: Some(grid),
        })
    }
}

fn is_dimacs(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("cnf") | Some("dimacs")
    )
}

/// Collects the instance files to solve: the path itself, or the sorted
/// files of a directory.
pub fn collect_instances(path: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>, Error> {
    let mut queue = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let candidate = entry?.path();
            if candidate.is_file() {
                queue.push(candidate);
            }
        }
        queue.sort();
    } else {
        queue.push(path.to_path_buf());
    }

    if let Some(limit) = limit {
        queue.truncate(limit);
    }
    Ok(queue)
}

/// A progress bar is only worth drawing when the remaining work is long
/// enough to watch.
pub fn should_use_progress_bar(remaining: usize, first_duration: Duration) -> bool {
    remaining >= 2 && first_duration * remaining as u32 > Duration::from_secs(2)
}

pub fn create_progress_bar(progress: &MultiProgress, len: usize) -> ProgressBar {
    let bar = progress.add(ProgressBar::new(len as u64));
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .expect("static progress template"),
    );
    bar
}

pub fn human_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 0.000_001 {
        format!("{:.1}ns", total_secs * 1_000_000_000.0)
    } else if total_secs < 0.001 {
        format!("{:.1}µs", total_secs * 1_000_000.0)
    } else if total_secs < 1.0 {
        format!("{:.1}ms", total_secs * 1000.0)
    } else {
        format!("{:.1}s", total_secs)
    }
}

/// Tallies across a batch of solve runs.
#[derive(Default)]
pub struct RunStats {
    pub processed: usize,
    pub sat: usize,
    pub unsat: usize,
    pub verified: usize,
    pub failed_verifications: usize,
}

impl RunStats {
    pub fn new() -> Self {
        RunStats::default()
    }

    pub fn print_summary(&self) {
        info!(
            "Processed {} instance(s): {} SAT, {} UNSAT",
            self.processed, self.sat, self.unsat
        );
        if self.verified + self.failed_verifications > 0 {
            info!(
                "Verified {} model(s), {} failed verification",
                self.verified, self.failed_verifications
            );
        }
    }
}
