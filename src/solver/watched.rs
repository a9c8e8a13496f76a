use crate::{
    clause::{Clause, ClauseState},
    lit::VariableId,
    metrics::SolverMetrics,
    partial_assignment::{OptBool, PartialAssignment, to_model},
    solver::{SolveResult, Solver},
};
use std::collections::VecDeque;

/// DPLL with a two-watched-literal scheme.
///
/// Each clause watches its first two literals; an inverted index maps every
/// literal to the clauses watching it. When a literal is falsified only the
/// clauses watching it are re-examined. Watches stay in place, so every
/// propagation round additionally seeds its queue with a full scan for unit
/// clauses.
///
/// Search is iterative: assignments go onto a trail and chronological
/// backtracking flips the deepest open decision in place, restoring all
/// propagations made above it.
pub struct WatchedLiteralsDPLL {
    num_vars: usize,
    clauses: Vec<Clause>,
    /// Maps a literal code to the clauses watching that literal.
    watches: Vec<Vec<usize>>,
    seed: Vec<OptBool>,
    assignment: PartialAssignment,
    /// Last assigned polarity per variable, consulted at decision time.
    /// `None` disables phase saving and always branches on true first.
    phase: Option<Vec<OptBool>>,
    pub metrics: SolverMetrics,
}

impl WatchedLiteralsDPLL {
    pub fn new(clauses: Vec<Clause>, num_vars: usize) -> Self {
        Self::with_assignment(clauses, num_vars, vec![OptBool::Unassigned; num_vars])
    }

    /// Creates a solver whose search starts from the given assignment.
    pub fn with_assignment(clauses: Vec<Clause>, num_vars: usize, seed: Vec<OptBool>) -> Self {
        debug_assert_eq!(seed.len(), num_vars);
        let mut watches = vec![Vec::new(); num_vars * 2];
        for (idx, clause) in clauses.iter().enumerate() {
            for &lit in clause.0.iter().take(2) {
                watches[lit.code()].push(idx);
            }
        }

        WatchedLiteralsDPLL {
            num_vars,
            clauses,
            watches,
            assignment: PartialAssignment::with_seed(&seed),
            seed,
            phase: None,
            metrics: SolverMetrics::new(),
        }
    }

    /// Enables phase saving: decisions reuse the last polarity the chosen
    /// variable was assigned, defaulting to true.
    pub fn with_phase_saving(mut self) -> Self {
        self.phase = Some(vec![OptBool::Unassigned; self.num_vars]);
        self
    }

    /// Propagates unit clauses to fixpoint. Returns false on conflict.
    ///
    /// The queue is seeded with every clause that is currently unit; a clause
    /// that is already conflicting fails the round immediately. Whenever a
    /// unit literal is assigned, the clauses watching the newly falsified
    /// literal are re-examined and enqueued if they became unit.
    fn propagate(&mut self) -> bool {
        let mut queue: VecDeque<usize> = VecDeque::new();

        for (idx, clause) in self.clauses.iter().enumerate() {
            match clause.eval_with_partial(self.assignment.values()) {
                ClauseState::Conflicting => return false,
                ClauseState::Unit(_) => queue.push_back(idx),
                ClauseState::Satisfied | ClauseState::Unresolved => {}
            }
        }

        while let Some(idx) = queue.pop_front() {
            // Re-evaluate: the clause may have been satisfied (or resolved)
            // by an assignment made since it was enqueued.
            let lit = match self.clauses[idx].eval_with_partial(self.assignment.values()) {
                ClauseState::Conflicting => return false,
                ClauseState::Unit(lit) => lit,
                ClauseState::Satisfied | ClauseState::Unresolved => continue,
            };

            self.assignment.assign(lit.var(), lit.is_pos());
            self.save_phase(lit.var(), lit.is_pos());
            self.metrics.unit_propagations += 1;

            let falsified = lit.negated();
            for &watcher in &self.watches[falsified.code()] {
                match self.clauses[watcher].eval_with_partial(self.assignment.values()) {
                    ClauseState::Conflicting => return false,
                    ClauseState::Unit(_) => queue.push_back(watcher),
                    ClauseState::Satisfied | ClauseState::Unresolved => {}
                }
            }
        }

        true
    }

    /// DLIS over the clauses that are not yet satisfied, counting only
    /// unassigned literals per variable. `None` means every clause is
    /// satisfied.
    fn pick_branch_var(&self) -> Option<VariableId> {
        let values = self.assignment.values();
        let mut counts = vec![0u32; self.num_vars];

        'clauses: for clause in &self.clauses {
            for &lit in &clause.0 {
                let value = values[lit.var()];
                if value.is_some() && lit.eval_with(value.is_true()) {
                    continue 'clauses;
                }
            }
            for &lit in &clause.0 {
                if values[lit.var()].is_none() {
                    counts[lit.var()] += 1;
                }
            }
        }

        let mut best = None;
        let mut best_count = 0;
        for (var, &count) in counts.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best = Some(var);
            }
        }
        best
    }

    fn preferred_polarity(&self, var: VariableId) -> bool {
        match &self.phase {
            Some(phase) => phase[var].unwrap_or(true),
            None => true,
        }
    }

    fn save_phase(&mut self, var: VariableId, value: bool) {
        if let Some(phase) = &mut self.phase {
            phase[var] = OptBool::from(value);
        }
    }
}

impl Solver for WatchedLiteralsDPLL {
    fn solve(&mut self) -> SolveResult {
        self.metrics.reset();
        self.assignment = PartialAssignment::with_seed(&self.seed);
        if let Some(phase) = &mut self.phase {
            phase.fill(OptBool::Unassigned);
        }

        loop {
            if self.propagate() {
                let Some(var) = self.pick_branch_var() else {
                    // Every clause is satisfied; unassigned variables may
                    // take any value and default to false in the model.
                    return SolveResult::Sat(to_model(self.assignment.values()));
                };
                self.metrics.decisions += 1;
                let polarity = self.preferred_polarity(var);
                self.assignment.decide(var, polarity);
                self.save_phase(var, polarity);
            } else {
                self.metrics.conflicts += 1;
                match self.assignment.backtrack() {
                    Some((var, value)) => {
                        self.metrics.backtracks += 1;
                        self.save_phase(var, value);
                    }
                    None => return SolveResult::Unsat,
                }
            }
        }
    }

    fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tests::cnf;

    #[test]
    fn test_unit_chain_cascades_through_watches() {
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1], &[-1, 2], &[-2, 3], &[-3, 4]]), 4);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2, 3, 4]));
        assert_eq!(solver.metrics.unit_propagations, 4);
        assert_eq!(solver.metrics.decisions, 0);
    }

    #[test]
    fn test_contradicting_units_are_unsat() {
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1], &[-1]]), 1);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.metrics.conflicts >= 1);
    }

    #[test]
    fn test_decision_then_propagation() {
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1, 2], &[-1, 2], &[1, -2]]), 2);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2]));
        assert_eq!(solver.metrics.decisions, 1);
        assert_eq!(solver.metrics.unit_propagations, 1);
        assert_eq!(solver.metrics.backtracks, 0);
    }

    #[test]
    fn test_exhausting_both_polarities() {
        // All four sign patterns over two variables.
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]]), 2);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert_eq!(solver.metrics.decisions, 1);
        assert_eq!(solver.metrics.backtracks, 1);
        assert_eq!(solver.metrics.conflicts, 2);
    }

    #[test]
    fn test_model_defaults_unconstrained_variables_to_false() {
        // Variable 3 appears in no clause.
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1], &[-1, 2]]), 3);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2, -3]));
    }

    #[test]
    fn test_tautologies_are_harmless() {
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1, -1], &[-1, 2], &[1]]), 2);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2]));
    }

    #[test]
    fn test_solve_is_repeatable() {
        let mut solver = WatchedLiteralsDPLL::new(cnf(&[&[1, 2], &[-1, 2], &[1, -2]]), 2);
        let first = solver.solve();
        let first_metrics = *solver.metrics();
        let second = solver.solve();
        assert_eq!(first, second);
        assert_eq!(first_metrics, *solver.metrics());
    }

    #[test]
    fn test_phase_saving_flips_future_decisions() {
        // The all-negative model is found either way; phase saving only
        // changes the order in which polarities are explored.
        let clauses = cnf(&[&[-1, -2], &[-1, 2, -3], &[1, -2, -3]]);
        let mut plain = WatchedLiteralsDPLL::new(clauses.clone(), 3);
        let mut saving = WatchedLiteralsDPLL::new(clauses, 3).with_phase_saving();
        let a = plain.solve();
        let b = saving.solve();
        assert!(a.is_sat() && b.is_sat());
    }

    #[test]
    fn test_seeded_assignment_shows_up_in_model() {
        let seed = vec![OptBool::True, OptBool::Unassigned];
        let mut solver = WatchedLiteralsDPLL::with_assignment(cnf(&[&[2]]), 2, seed);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2]));
    }
}
