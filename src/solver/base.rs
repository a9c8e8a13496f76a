use crate::{
    clause::Clause,
    lit::{Lit, VariableId},
    metrics::SolverMetrics,
    partial_assignment::{OptBool, to_model},
    solver::{SolveResult, Solver},
};

/// Baseline DPLL.
///
/// Naive propagation: every assignment rewrites the clause set, dropping
/// satisfied clauses and stripping falsified literals. Branches with DLIS and
/// applies pure-literal elimination during search.
pub struct BaseDPLL {
    num_vars: usize,
    clauses: Vec<Clause>,
    seed: Vec<OptBool>,
    pub metrics: SolverMetrics,
}

impl BaseDPLL {
    pub fn new(clauses: Vec<Clause>, num_vars: usize) -> Self {
        Self::with_assignment(clauses, num_vars, vec![OptBool::Unassigned; num_vars])
    }

    /// Creates a solver whose search starts from the given assignment.
    /// Used to resume after preprocessing has forced part of the assignment.
    pub fn with_assignment(clauses: Vec<Clause>, num_vars: usize, seed: Vec<OptBool>) -> Self {
        debug_assert_eq!(seed.len(), num_vars);
        BaseDPLL {
            num_vars,
            clauses,
            seed,
            metrics: SolverMetrics::new(),
        }
    }

    fn search(&mut self, clauses: Vec<Clause>, mut values: Vec<OptBool>) -> Option<Vec<OptBool>> {
        let clauses = match propagate_units(clauses, &mut values, &mut self.metrics) {
            Some(clauses) => clauses,
            None => {
                self.metrics.conflicts += 1;
                return None;
            }
        };

        // Every clause satisfied.
        if clauses.is_empty() {
            return Some(values);
        }

        // Pure-literal elimination. Not a decision: the literal's polarity is
        // forced by the remaining clause set.
        if let Some(lit) = find_pure_literal(&clauses, self.num_vars) {
            values[lit.var()] = OptBool::from(lit.is_pos());
            return self.search(assign_literal(&clauses, lit), values);
        }

        // DLIS: branch on the variable of the most frequent literal.
        let var = self.pick_branch_var(&clauses);
        self.metrics.decisions += 1;

        let lit = Lit::new(var, true);
        let mut positive = values.clone();
        positive[var] = OptBool::True;
        if let Some(model) = self.search(assign_literal(&clauses, lit), positive) {
            return Some(model);
        }

        self.metrics.backtracks += 1;
        values[var] = OptBool::False;
        self.search(assign_literal(&clauses, lit.negated()), values)
    }

    /// DLIS: the variable whose most frequent literal has the highest count
    /// across the remaining clauses. Ties break towards the smallest literal.
    fn pick_branch_var(&self, clauses: &[Clause]) -> VariableId {
        let mut counts = vec![0u32; self.num_vars * 2];
        for clause in clauses {
            for &lit in &clause.0 {
                counts[lit.code()] += 1;
            }
        }

        let mut best = Lit::new(0, true);
        let mut best_count = 0;
        for (code, &count) in counts.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best = Lit(code as u32);
            }
        }
        debug_assert!(best_count > 0, "branching on an empty clause set");
        best.var()
    }
}

impl Solver for BaseDPLL {
    fn solve(&mut self) -> SolveResult {
        self.metrics.reset();
        let clauses = self.clauses.clone();
        let seed = self.seed.clone();
        match self.search(clauses, seed) {
            Some(values) => SolveResult::Sat(to_model(&values)),
            None => SolveResult::Unsat,
        }
    }

    fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }
}

/// Runs unit propagation to fixpoint over an owned clause set.
///
/// Scans for unit clauses, assigns their literals into `values` and rewrites
/// the clause set after every assignment. Returns `None` on conflict: an empty
/// clause, or a unit literal contradicting an existing assignment.
pub(crate) fn propagate_units(
    mut clauses: Vec<Clause>,
    values: &mut [OptBool],
    metrics: &mut SolverMetrics,
) -> Option<Vec<Clause>> {
    if clauses.iter().any(Clause::is_empty) {
        return None;
    }

    loop {
        let units: Vec<Lit> = clauses
            .iter()
            .filter(|clause| clause.len() == 1)
            .map(|clause| clause.0[0])
            .collect();
        if units.is_empty() {
            return Some(clauses);
        }

        for lit in units {
            let value = values[lit.var()];
            if value.is_some() {
                if value.is_true() == lit.is_pos() {
                    continue;
                }
                return None;
            }

            values[lit.var()] = OptBool::from(lit.is_pos());
            metrics.unit_propagations += 1;
            clauses = assign_literal(&clauses, lit);
            if clauses.iter().any(Clause::is_empty) {
                return None;
            }
        }
    }
}

/// Applies a literal to a clause set: drops clauses the literal satisfies and
/// strips its negation from the rest.
pub(crate) fn assign_literal(clauses: &[Clause], lit: Lit) -> Vec<Clause> {
    let falsified = lit.negated();
    let mut remaining = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if clause.0.contains(&lit) {
            continue;
        }
        remaining.push(Clause::new(
            clause.0.iter().copied().filter(|&l| l != falsified).collect(),
        ));
    }
    remaining
}

/// Finds a literal whose variable occurs in only one polarity, preferring the
/// smallest pure-positive variable, then the smallest pure-negative one.
pub(crate) fn find_pure_literal(clauses: &[Clause], num_vars: usize) -> Option<Lit> {
    let mut pos = vec![false; num_vars];
    let mut neg = vec![false; num_vars];
    for clause in clauses {
        for &lit in &clause.0 {
            if lit.is_pos() {
                pos[lit.var()] = true;
            } else {
                neg[lit.var()] = true;
            }
        }
    }

    (0..num_vars)
        .find(|&var| pos[var] && !neg[var])
        .map(|var| Lit::new(var, true))
        .or_else(|| {
            (0..num_vars)
                .find(|&var| neg[var] && !pos[var])
                .map(|var| Lit::new(var, false))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tests::cnf;

    #[test]
    fn test_unit_chain_propagates_without_decisions() {
        let mut solver = BaseDPLL::new(cnf(&[&[1], &[-1, 2], &[-2, 3], &[-3, 4]]), 4);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2, 3, 4]));
        assert_eq!(solver.metrics.unit_propagations, 4);
        assert_eq!(solver.metrics.decisions, 0);
        assert_eq!(solver.metrics.conflicts, 0);
    }

    #[test]
    fn test_contradicting_units_are_unsat() {
        let mut solver = BaseDPLL::new(cnf(&[&[1], &[-1]]), 1);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.metrics.conflicts >= 1);
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let mut solver = BaseDPLL::new(vec![Clause::new(Vec::new())], 2);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.metrics.conflicts >= 1);
    }

    #[test]
    fn test_pure_literals_solve_without_decisions() {
        let mut solver = BaseDPLL::new(cnf(&[&[1, 2], &[1, 3], &[2, -3]]), 3);
        let result = solver.solve();
        assert_eq!(result, SolveResult::Sat(vec![1, 2, -3]));
        assert_eq!(solver.metrics.decisions, 0);
    }

    #[test]
    fn test_branching_tries_positive_first() {
        // No units, no pure literals; DLIS picks variable 1 and tries true.
        let mut solver = BaseDPLL::new(cnf(&[&[1, 2], &[1, -2], &[-1, 2], &[-2, -3], &[3, -1, 2]]), 3);
        let result = solver.solve();
        assert!(result.is_sat());
        assert!(solver.metrics.decisions >= 1);
    }

    #[test]
    fn test_full_sign_table_is_unsat() {
        // All 8 sign patterns over 3 variables forbid every assignment.
        let clauses: Vec<Clause> = (0..8)
            .map(|mask| {
                Clause::from_dimacs(&[
                    if mask & 1 == 0 { 1 } else { -1 },
                    if mask & 2 == 0 { 2 } else { -2 },
                    if mask & 4 == 0 { 3 } else { -3 },
                ])
            })
            .collect();
        let mut solver = BaseDPLL::new(clauses, 3);
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.metrics.backtracks >= 1);
        assert!(solver.metrics.conflicts >= 2);
    }

    #[test]
    fn test_tautologies_are_harmless() {
        let mut solver = BaseDPLL::new(cnf(&[&[1, -1], &[-1, 2], &[1]]), 2);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2]));
    }

    #[test]
    fn test_seeded_assignment_shows_up_in_model() {
        let seed = vec![OptBool::True, OptBool::Unassigned];
        let mut solver = BaseDPLL::with_assignment(cnf(&[&[2]]), 2, seed);
        assert_eq!(solver.solve(), SolveResult::Sat(vec![1, 2]));
    }
}
