use crate::{
    clause::Clause,
    metrics::SolverMetrics,
    partial_assignment::to_model,
    solver::{
        SolveResult, Solver,
        preprocess::{DEFAULT_RESOLVENT_BUDGET, PreprocessStats, Preprocessor},
        watched::WatchedLiteralsDPLL,
    },
};

/// The full pipeline: preprocessing as in [`PreprocessingDPLL`], then a
/// watched-literal search with phase saving enabled.
///
/// [`PreprocessingDPLL`]: crate::solver::preprocess::PreprocessingDPLL
pub struct CombinedDPLL {
    num_vars: usize,
    clauses: Vec<Clause>,
    resolvent_budget: usize,
    pub metrics: SolverMetrics,
    pub stats: PreprocessStats,
}

impl CombinedDPLL {
    pub fn new(clauses: Vec<Clause>, num_vars: usize) -> Self {
        CombinedDPLL {
            num_vars,
            clauses,
            resolvent_budget: DEFAULT_RESOLVENT_BUDGET,
            metrics: SolverMetrics::new(),
            stats: PreprocessStats::default(),
        }
    }
}

impl Solver for CombinedDPLL {
    fn solve(&mut self) -> SolveResult {
        self.metrics.reset();
        self.stats = PreprocessStats::default();

        let mut preprocessor = Preprocessor::new(self.num_vars, self.resolvent_budget);
        let reduced = preprocessor.run(self.clauses.clone(), &mut self.metrics);
        self.stats = preprocessor.stats;

        let Some(reduced) = reduced else {
            return SolveResult::Unsat;
        };

        if reduced.is_empty() {
            let mut model = to_model(&preprocessor.assignment);
            preprocessor.extend_model(&mut model);
            return SolveResult::Sat(model);
        }

        let mut search =
            WatchedLiteralsDPLL::with_assignment(reduced, self.num_vars, preprocessor.assignment.clone())
                .with_phase_saving();
        let result = search.solve();
        self.metrics.merge(search.metrics());

        match result {
            SolveResult::Sat(mut model) => {
                preprocessor.extend_model(&mut model);
                SolveResult::Sat(model)
            }
            SolveResult::Unsat => SolveResult::Unsat,
        }
    }

    fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }

    fn preprocess_stats(&self) -> Option<PreprocessStats> {
        Some(self.stats)
    }
}
