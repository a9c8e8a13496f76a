use crate::{lit::Lit, partial_assignment::OptBool};

/// A disjunction of literals. The empty clause denotes falsity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(pub Vec<Lit>);

/// The state of a clause under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    /// At least one literal is true.
    Satisfied,
    /// Exactly one literal is unassigned and no literal is true.
    Unit(Lit),
    /// All literals are assigned and none is true.
    Conflicting,
    /// More than one literal is unassigned and no literal is true.
    Unresolved,
}

impl Clause {
    pub fn new(lits: Vec<Lit>) -> Self {
        Clause(lits)
    }

    /// Builds a clause from DIMACS-style literals (nonzero, 1-based, signed).
    pub fn from_dimacs(lits: &[i32]) -> Self {
        Clause(lits.iter().map(|&l| Lit::from(l)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts the literals and removes duplicates.
    pub fn normalize(&mut self) {
        self.0.sort_unstable();
        self.0.dedup();
    }

    /// Checks if the clause is a tautology (contains both a literal and its negation).
    /// Assumes the clause is sorted and contains unique literals.
    pub fn is_tautology(&self) -> bool {
        for i in 0..self.0.len().saturating_sub(1) {
            if self.0[i].var() == self.0[i + 1].var() {
                return true;
            }
        }
        false
    }

    /// Classifies the clause under the given partial assignment.
    pub fn eval_with_partial(&self, values: &[OptBool]) -> ClauseState {
        let mut unassigned = None;
        let mut num_unassigned = 0usize;

        for &lit in &self.0 {
            let value = values[lit.var()];
            if value.is_none() {
                num_unassigned += 1;
                unassigned = Some(lit);
            } else if lit.eval_with(value.is_true()) {
                return ClauseState::Satisfied;
            }
        }

        match (num_unassigned, unassigned) {
            (0, _) => ClauseState::Conflicting,
            (1, Some(lit)) => ClauseState::Unit(lit),
            _ => ClauseState::Unresolved,
        }
    }

    /// Checks if the clause is satisfied by the given model
    /// (one signed DIMACS literal per variable, in ascending variable order).
    pub fn satisfied_by(&self, model: &[i32]) -> bool {
        self.0
            .iter()
            .any(|&lit| (model[lit.var()] > 0) == lit.is_pos())
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(values: &[i8]) -> Vec<OptBool> {
        values
            .iter()
            .map(|&v| match v {
                0 => OptBool::Unassigned,
                1 => OptBool::True,
                _ => OptBool::False,
            })
            .collect()
    }

    #[test]
    fn test_is_tautology() {
        let cases: Vec<(Vec<i32>, bool)> = vec![
            (vec![1, -1], true),
            (vec![-2, 1, 1, 1, 2], true),
            (vec![-3, 3, 4], true),
            (vec![1, 2, 3], false),
            (vec![-1, -2, -3], false),
            (vec![1, -2, 3], false),
            (vec![], false),
        ];

        for (lits, expected) in cases {
            let mut clause = Clause::from_dimacs(&lits);
            clause.normalize();
            assert_eq!(
                clause.is_tautology(),
                expected,
                "Tautology check failed for clause {:?}",
                lits
            );
        }
    }

    #[test]
    fn test_eval_with_partial() {
        // (values per variable: 0=unassigned, 1=true, -1=false)
        let cases: Vec<(Vec<i32>, Vec<i8>, ClauseState)> = vec![
            (vec![1, 2], vec![1, 0], ClauseState::Satisfied),
            (vec![-1, 2], vec![1, 0], ClauseState::Unit(Lit::from(2))),
            (vec![-1, 2], vec![1, -1], ClauseState::Conflicting),
            (vec![1, 2], vec![0, 0], ClauseState::Unresolved),
            (vec![-1], vec![0], ClauseState::Unit(Lit::from(-1))),
            (vec![], vec![0], ClauseState::Conflicting),
        ];

        for (lits, values, expected) in cases {
            let clause = Clause::from_dimacs(&lits);
            assert_eq!(
                clause.eval_with_partial(&partial(&values)),
                expected,
                "Eval failed for clause {:?} under {:?}",
                lits,
                values
            );
        }
    }

    #[test]
    fn test_satisfied_by() {
        let clause = Clause::from_dimacs(&[1, -3]);
        assert!(clause.satisfied_by(&[1, -2, 3]));
        assert!(clause.satisfied_by(&[-1, 2, -3]));
        assert!(!clause.satisfied_by(&[-1, 2, 3]));
    }
}
