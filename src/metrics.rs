/// Counters tracking the work performed by a single solve.
///
/// All counters are monotonically non-decreasing during a solve and are reset
/// at the start of each `solve()` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolverMetrics {
    /// Branching steps (choice of a variable and first polarity attempt).
    pub decisions: u64,
    /// Branching steps whose first polarity failed, triggering the flip.
    pub backtracks: u64,
    /// Assignments forced by a unit clause.
    pub unit_propagations: u64,
    /// Terminal failures of unit propagation (empty clause derived or
    /// inconsistent forced assignment).
    pub conflicts: u64,
}

impl SolverMetrics {
    pub fn new() -> Self {
        SolverMetrics::default()
    }

    pub fn reset(&mut self) {
        *self = SolverMetrics::default();
    }

    /// Adds the counters of a delegate search into this one.
    pub fn merge(&mut self, other: &SolverMetrics) {
        self.decisions += other.decisions;
        self.backtracks += other.backtracks;
        self.unit_propagations += other.unit_propagations;
        self.conflicts += other.conflicts;
    }
}
