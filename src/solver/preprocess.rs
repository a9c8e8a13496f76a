use crate::{
    clause::Clause,
    lit::{Lit, VariableId},
    metrics::SolverMetrics,
    partial_assignment::{OptBool, to_model},
    solver::{
        SolveResult, Solver,
        base::{BaseDPLL, propagate_units},
    },
};
use log::debug;

/// Resolvent budget for bounded variable elimination: a variable is only
/// eliminated if it produces at most this many resolvents.
pub const DEFAULT_RESOLVENT_BUDGET: usize = 10;

/// Counters for the clause-level simplifications of the preprocessing pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessStats {
    /// Variables removed by bounded variable elimination.
    pub vars_eliminated: usize,
    /// Clauses removed by subsumption.
    pub clauses_eliminated: usize,
}

/// Four-pass simplification pipeline:
///
/// 1. exhaustive unit propagation
/// 2. pure-literal elimination
/// 3. subsumption elimination
/// 4. bounded variable elimination
///
/// Forced assignments accumulate in `assignment`; variables removed by
/// elimination are recorded together with their clauses so that a model of
/// the reduced formula can be extended to one of the original formula.
pub struct Preprocessor {
    num_vars: usize,
    resolvent_budget: usize,
    pub assignment: Vec<OptBool>,
    pub stats: PreprocessStats,
    /// Eliminated variables with the clauses they were resolved out of,
    /// in elimination order.
    eliminated: Vec<(VariableId, Vec<Clause>)>,
}

impl Preprocessor {
    pub fn new(num_vars: usize, resolvent_budget: usize) -> Self {
        Preprocessor {
            num_vars,
            resolvent_budget,
            assignment: vec![OptBool::Unassigned; num_vars],
            stats: PreprocessStats::default(),
            eliminated: Vec::new(),
        }
    }

    /// Runs the pipeline. Returns `None` if the formula is unsatisfiable.
    pub fn run(
        &mut self,
        clauses: Vec<Clause>,
        metrics: &mut SolverMetrics,
    ) -> Option<Vec<Clause>> {
        let normalized = clauses
            .into_iter()
            .map(|mut clause| {
                clause.normalize();
                clause
            })
            .collect();

        let clauses = match propagate_units(normalized, &mut self.assignment, metrics) {
            Some(clauses) => clauses,
            None => {
                metrics.conflicts += 1;
                return None;
            }
        };

        let clauses = self.pure_literal_elimination(clauses);
        let clauses = self.subsumption_elimination(clauses);
        let clauses = match self.bounded_variable_elimination(clauses) {
            Some(clauses) => clauses,
            None => {
                // An empty resolvent: the formula is unsatisfiable.
                metrics.conflicts += 1;
                return None;
            }
        };

        debug!(
            "preprocessing: {} clauses left, {} clauses subsumed, {} variables eliminated",
            clauses.len(),
            self.stats.clauses_eliminated,
            self.stats.vars_eliminated
        );
        Some(clauses)
    }

    /// Assigns every variable occurring in only one polarity and removes the
    /// clauses it satisfies. Single pass.
    fn pure_literal_elimination(&mut self, mut clauses: Vec<Clause>) -> Vec<Clause> {
        let mut pos = vec![false; self.num_vars];
        let mut neg = vec![false; self.num_vars];
        for clause in &clauses {
            for &lit in &clause.0 {
                if lit.is_pos() {
                    pos[lit.var()] = true;
                } else {
                    neg[lit.var()] = true;
                }
            }
        }

        let mut pure: Vec<Lit> = Vec::new();
        for var in 0..self.num_vars {
            if pos[var] && !neg[var] {
                pure.push(Lit::new(var, true));
            } else if neg[var] && !pos[var] {
                pure.push(Lit::new(var, false));
            }
        }

        for lit in pure {
            self.assignment[lit.var()] = OptBool::from(lit.is_pos());
            clauses.retain(|clause| !clause.0.contains(&lit));
        }
        clauses
    }

    /// Removes every clause strictly subsumed by another clause. Equal
    /// clauses do not subsume each other, so duplicates survive.
    pub(crate) fn subsumption_elimination(&mut self, clauses: Vec<Clause>) -> Vec<Clause> {
        let mut kept = Vec::with_capacity(clauses.len());
        'candidates: for (i, clause) in clauses.iter().enumerate() {
            for (j, other) in clauses.iter().enumerate() {
                if i != j && strictly_subsumes(other, clause) {
                    self.stats.clauses_eliminated += 1;
                    continue 'candidates;
                }
            }
            kept.push(clause.clone());
        }
        kept
    }

    /// Resolves out every variable whose positive×negative occurrence product
    /// stays within the resolvent budget, replacing its clauses by all
    /// non-tautological resolvents. Returns `None` when an empty resolvent is
    /// derived (the formula is unsatisfiable).
    fn bounded_variable_elimination(&mut self, mut clauses: Vec<Clause>) -> Option<Vec<Clause>> {
        for var in 0..self.num_vars {
            if self.assignment[var].is_some() {
                continue;
            }
            let pos_lit = Lit::new(var, true);
            let neg_lit = Lit::new(var, false);

            let pos: Vec<usize> = occurrences(&clauses, pos_lit);
            let neg: Vec<usize> = occurrences(&clauses, neg_lit);
            if pos.is_empty() && neg.is_empty() {
                continue;
            }
            if pos.len() * neg.len() > self.resolvent_budget {
                continue;
            }

            let mut resolvents: Vec<Clause> = Vec::with_capacity(pos.len() * neg.len());
            for &i in &pos {
                for &j in &neg {
                    let mut resolvent = Clause::new(
                        clauses[i]
                            .0
                            .iter()
                            .copied()
                            .filter(|&l| l != pos_lit)
                            .chain(clauses[j].0.iter().copied().filter(|&l| l != neg_lit))
                            .collect(),
                    );
                    resolvent.normalize();
                    if resolvent.is_empty() {
                        return None;
                    }
                    if !resolvent.is_tautology() {
                        resolvents.push(resolvent);
                    }
                }
            }

            let mut removed = Vec::with_capacity(pos.len() + neg.len());
            clauses.retain(|clause| {
                if clause.0.contains(&pos_lit) || clause.0.contains(&neg_lit) {
                    removed.push(clause.clone());
                    false
                } else {
                    true
                }
            });
            clauses.extend(resolvents);
            self.eliminated.push((var, removed));
            self.stats.vars_eliminated += 1;
        }
        Some(clauses)
    }

    /// Extends a model of the reduced formula to the eliminated variables,
    /// choosing each variable's value so that its resolved-out clauses are
    /// satisfied. Processes eliminations in reverse order.
    pub fn extend_model(&self, model: &mut [i32]) {
        for (var, clauses) in self.eliminated.iter().rev() {
            let pos_lit = Lit::new(*var, true);
            let needs_true = clauses
                .iter()
                .filter(|clause| clause.0.contains(&pos_lit))
                .any(|clause| {
                    !clause
                        .0
                        .iter()
                        .any(|&lit| lit.var() != *var && (model[lit.var()] > 0) == lit.is_pos())
                });
            model[*var] = if needs_true {
                *var as i32 + 1
            } else {
                -(*var as i32 + 1)
            };

            debug_assert!(
                clauses.iter().all(|clause| clause.satisfied_by(model)),
                "model extension left an eliminated clause unsatisfied"
            );
        }
    }
}

fn occurrences(clauses: &[Clause], lit: Lit) -> Vec<usize> {
    clauses
        .iter()
        .enumerate()
        .filter(|(_, clause)| clause.0.contains(&lit))
        .map(|(idx, _)| idx)
        .collect()
}

/// `small` strictly subsumes `big` iff its literal set is a proper subset.
/// Both clauses must be normalized.
fn strictly_subsumes(small: &Clause, big: &Clause) -> bool {
    small.len() < big.len() && is_subset_sorted(&small.0, &big.0)
}

fn is_subset_sorted(small: &[Lit], big: &[Lit]) -> bool {
    let mut iter = big.iter();
    small.iter().all(|lit| iter.any(|other| other == lit))
}

/// DPLL with heavy preprocessing: runs the [`Preprocessor`] pipeline, then
/// hands the reduced formula to [`BaseDPLL`] seeded with the forced
/// assignments.
pub struct PreprocessingDPLL {
    num_vars: usize,
    clauses: Vec<Clause>,
    resolvent_budget: usize,
    pub metrics: SolverMetrics,
    pub stats: PreprocessStats,
}

impl PreprocessingDPLL {
    pub fn new(clauses: Vec<Clause>, num_vars: usize) -> Self {
        PreprocessingDPLL {
            num_vars,
            clauses,
            resolvent_budget: DEFAULT_RESOLVENT_BUDGET,
            metrics: SolverMetrics::new(),
            stats: PreprocessStats::default(),
        }
    }
}

impl Solver for PreprocessingDPLL {
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
            BaseDPLL::with_assignment(reduced, self.num_vars, preprocessor.assignment.clone());
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
