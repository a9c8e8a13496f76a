pub mod base;
pub mod combined;
pub mod preprocess;
pub mod watched;

pub use base::BaseDPLL;
pub use combined::CombinedDPLL;
pub use preprocess::{PreprocessStats, PreprocessingDPLL, Preprocessor};
pub use watched::WatchedLiteralsDPLL;

use crate::{clause::Clause, error::Error, metrics::SolverMetrics};
use std::str::FromStr;

/// A single-use SAT solver over a fixed clause set.
pub trait Solver {
    /// Decides the formula. Metrics are reset at the start of every call.
    fn solve(&mut self) -> SolveResult;

    /// The counters of the most recent [`solve`](Solver::solve) call.
    fn metrics(&self) -> &SolverMetrics;

    /// Clause-level simplification counters, for the variants that preprocess.
    fn preprocess_stats(&self) -> Option<PreprocessStats> {
        None
    }
}

/// The outcome of a solve: either a satisfying model (one signed DIMACS
/// literal per variable, in ascending variable order) or unsatisfiability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Sat(Vec<i32>),
    Unsat,
}

impl SolveResult {
    pub fn status(&self) -> &'static str {
        match self {
            SolveResult::Sat(_) => "SAT",
            SolveResult::Unsat => "UNSAT",
        }
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Sat(_))
    }

    pub fn model(&self) -> Option<&[i32]> {
        match self {
            SolveResult::Sat(model) => Some(model),
            SolveResult::Unsat => None,
        }
    }
}

/// The four solver flavors under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Base,
    Watched,
    Preprocessing,
    Combined,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Base,
        Variant::Watched,
        Variant::Preprocessing,
        Variant::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Watched => "watched",
            Variant::Preprocessing => "preprocessing",
            Variant::Combined => "combined",
        }
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Variant::Base),
            "watched" => Ok(Variant::Watched),
            "preprocessing" => Ok(Variant::Preprocessing),
            "combined" => Ok(Variant::Combined),
            unknown => Err(Error::InvalidVariant(unknown.to_string())),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the solver for a variant over `(clauses, num_vars)`.
///
/// Fails with [`Error::InternalInvariant`] if a clause references a variable
/// outside `0..num_vars`; the encoder and parser never produce one.
pub fn get_solver(
    variant: Variant,
    clauses: Vec<Clause>,
    num_vars: usize,
) -> Result<Box<dyn Solver>, Error> {
    for clause in &clauses {
        for &lit in &clause.0 {
            if lit.var() >= num_vars {
                return Err(Error::InternalInvariant("literal out of variable range"));
            }
        }
    }

    Ok(match variant {
        Variant::Base => Box::new(BaseDPLL::new(clauses, num_vars)),
        Variant::Watched => Box::new(WatchedLiteralsDPLL::new(clauses, num_vars)),
        Variant::Preprocessing => Box::new(PreprocessingDPLL::new(clauses, num_vars)),
        Variant::Combined => Box::new(CombinedDPLL::new(clauses, num_vars)),
    })
}
