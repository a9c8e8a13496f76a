use crate::{clause::Clause, lit::Lit};
use std::io::{self, Write};

/// A CNF formula: a conjunction of clauses over variables `0..num_vars`.
pub struct Problem {
    pub num_vars: usize,
    pub clauses: Vec<Clause>,
}

impl Problem {
    pub fn new(num_vars: usize) -> Self {
        Problem {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Adds a clause, normalizing its literals (sorted, unique).
    /// Tautological clauses are ignored.
    pub fn add_clause(&mut self, lits: &[Lit]) {
        let mut clause = Clause::new(lits.to_vec());
        clause.normalize();
        if clause.is_tautology() {
            return;
        }
        self.clauses.push(clause);
    }

    /// Verifies that the given model (one signed DIMACS literal per variable)
    /// satisfies every clause of the problem.
    pub fn verify_model(&self, model: &[i32]) -> Result<(), String> {
        debug_assert_eq!(
            model.len(),
            self.num_vars,
            "Model length does not match number of variables."
        );

        for (i, clause) in self.clauses.iter().enumerate() {
            if !clause.satisfied_by(model) {
                return Err(format!("clause {} {} is unsatisfied", i, clause));
            }
        }
        Ok(())
    }

    /// Writes the problem in DIMACS CNF format:
    /// a `p cnf <vars> <clauses>` header, then one `0`-terminated line per clause.
    pub fn write_dimacs<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for &lit in &clause.0 {
                write!(writer, "{} ", lit.to_dimacs())?;
            }
            writeln!(writer, "0")?;
        }
        Ok(())
    }
}
