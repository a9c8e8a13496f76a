use crate::{error::Error, lit::Lit, problem::Problem};
use itertools::Itertools;
use std::io::{self, Write};

/// An N×N puzzle grid. `0` denotes an empty cell, values range over `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Parses a grid from plain text: N lines of N whitespace-separated
    /// integers in `[0, N]`. Blank lines are skipped. N must be a perfect
    /// square.
    pub fn parse(text: &str) -> Result<Grid, Error> {
        let mut rows: Vec<Vec<u32>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<u32>().map_err(|_| {
                        Error::InvalidInput(format!(
                            "line {}: '{}' is not a cell value",
                            line_no + 1,
                            token
                        ))
                    })
                })
                .collect::<Result<Vec<u32>, Error>>()?;
            rows.push(row);
        }

        let n = rows.len();
        if n == 0 {
            return Err(Error::InvalidInput("puzzle is empty".to_string()));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(Error::InvalidInput(format!(
                "grid is not square: {} rows but a row of {} cells",
                n,
                row.len()
            )));
        }
        check_box_dimension(n)?;
        if let Some(&value) = rows.iter().flatten().find(|&&value| value > n as u32) {
            return Err(Error::InvalidInput(format!(
                "cell value {} exceeds grid size {}",
                value, n
            )));
        }

        Ok(Grid {
            n,
            cells: rows.concat(),
        })
    }

    /// Creates an all-empty N×N grid.
    pub fn empty(n: usize) -> Result<Grid, Error> {
        check_box_dimension(n)?;
        Ok(Grid {
            n,
            cells: vec![0; n * n],
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Side length of a box: √N.
    #[inline]
    pub fn box_len(&self) -> usize {
        self.n.isqrt()
    }

    #[inline]
    pub fn value(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.n + col]
    }

    #[inline]
    pub fn set_value(&mut self, row: usize, col: usize, value: u32) {
        debug_assert!(value as usize <= self.n);
        self.cells[row * self.n + col] = value;
    }

    pub fn num_clues(&self) -> usize {
        self.cells.iter().filter(|&&value| value != 0).count()
    }

    /// Writes the grid in puzzle file format: one line per row,
    /// cells separated by single spaces, `0` for empty.
    pub fn write_plain<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in 0..self.n {
            for col in 0..self.n {
                if col > 0 {
                    write!(writer, " ")?;
                }
                write!(writer, "{}", self.value(row, col))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Renders the grid for terminal display, with box separators and `.`
    /// for empty cells.
    pub fn render(&self) -> String {
        let boxes = self.box_len();
        let width = self.n.to_string().len();
        let mut out = String::new();

        for row in 0..self.n {
            if row > 0 && row % boxes == 0 {
                let line_len = (width + 1) * self.n + 2 * (boxes - 1) - 1;
                out.push_str(&"-".repeat(line_len));
                out.push('\n');
            }
            for col in 0..self.n {
                if col > 0 && col % boxes == 0 {
                    out.push_str("| ");
                }
                let value = self.value(row, col);
                if value == 0 {
                    out.push_str(&format!("{:>width$} ", "."));
                } else {
                    out.push_str(&format!("{:>width$} ", value));
                }
            }
            // Trim the trailing space of the row.
            out.pop();
            out.push('\n');
        }
        out
    }
}

fn check_box_dimension(n: usize) -> Result<(), Error> {
    let root = n.isqrt();
    if n == 0 || root * root != n {
        return Err(Error::InvalidInput(format!(
            "grid size {} is not a perfect square",
            n
        )));
    }
    Ok(())
}

/// Encodes a puzzle as CNF over `N³` variables.
///
/// Variable numbering (1-based DIMACS): `var(r,c,v) = r·N² + c·N + v` with
/// `r,c ∈ [0,N-1]` and `v ∈ [1,N]`.
///
/// Rule families:
/// 1. exactly one value per cell
/// 2. each value exactly once per row
/// 3. each value exactly once per column
/// 4. each value exactly once per √N×√N box
/// 5. orthogonal neighbors never hold consecutive values
/// 6. one unit clause per clue
pub fn encode(grid: &Grid) -> Problem {
    let n = grid.n();
    let mut encoder = Encoder {
        grid,
        n,
        problem: Problem::new(n * n * n),
    };

    encoder.rule_cell_values();
    encoder.rule_rows();
    encoder.rule_cols();
    encoder.rule_boxes();
    encoder.rule_non_consecutive();
    encoder.rule_clues();

    encoder.problem
}

/// Decodes a satisfying model of [`encode`]'s CNF back into a completed grid.
pub fn decode_model(model: &[i32], n: usize) -> Result<Grid, Error> {
    if model.len() != n * n * n {
        return Err(Error::InternalInvariant(
            "model length does not match grid size",
        ));
    }

    let mut grid = Grid::empty(n)?;
    for row in 0..n {
        for col in 0..n {
            let value = (1..=n as u32)
                .find(|&value| {
                    let var = row * n * n + col * n + value as usize - 1;
                    model[var] > 0
                })
                .ok_or(Error::InternalInvariant(
                    "model assigns no value to a cell",
                ))?;
            grid.set_value(row, col, value);
        }
    }
    Ok(grid)
}

struct Encoder<'a> {
    grid: &'a Grid,
    n: usize,
    problem: Problem,
}

impl Encoder<'_> {
    /// The 0-based variable ID of "cell (r,c) holds value v".
    #[inline]
    fn var(&self, row: usize, col: usize, value: u32) -> usize {
        row * self.n * self.n + col * self.n + value as usize - 1
    }

    #[inline]
    fn lit(&self, row: usize, col: usize, value: u32, positive: bool) -> Lit {
        Lit::new(self.var(row, col, value), positive)
    }

    /// Emits one at-least-one clause over `lits` plus pairwise at-most-one
    /// clauses for every literal pair.
    fn exactly_one(&mut self, lits: &[Lit]) {
        self.problem.add_clause(lits);
        for (a, b) in lits.iter().copied().tuple_combinations() {
            self.problem.add_clause(&[a.negated(), b.negated()]);
        }
    }

    /// Rule 1: every cell holds exactly one value.
    fn rule_cell_values(&mut self) {
        for row in 0..self.n {
            for col in 0..self.n {
                let lits: Vec<Lit> = (1..=self.n as u32)
                    .map(|value| self.lit(row, col, value, true))
                    .collect();
                self.exactly_one(&lits);
            }
        }
    }

    /// Rule 2: every value appears exactly once in every row.
    fn rule_rows(&mut self) {
        for row in 0..self.n {
            for value in 1..=self.n as u32 {
                let lits: Vec<Lit> = (0..self.n)
                    .map(|col| self.lit(row, col, value, true))
                    .collect();
                self.exactly_one(&lits);
            }
        }
    }

    /// Rule 3: every value appears exactly once in every column.
    fn rule_cols(&mut self) {
        for col in 0..self.n {
            for value in 1..=self.n as u32 {
                let lits: Vec<Lit> = (0..self.n)
                    .map(|row| self.lit(row, col, value, true))
                    .collect();
                self.exactly_one(&lits);
            }
        }
    }

    /// Rule 4: every value appears exactly once in every √N×√N box.
    fn rule_boxes(&mut self) {
        let boxes = self.n.isqrt();
        for box_row in 0..boxes {
            for box_col in 0..boxes {
                let cells: Vec<(usize, usize)> = (0..boxes)
                    .cartesian_product(0..boxes)
                    .map(|(i, j)| (box_row * boxes + i, box_col * boxes + j))
                    .collect();
                for value in 1..=self.n as u32 {
                    let lits: Vec<Lit> = cells
                        .iter()
                        .map(|&(row, col)| self.lit(row, col, value, true))
                        .collect();
                    self.exactly_one(&lits);
                }
            }
        }
    }

    /// Rule 5: orthogonally adjacent cells never hold consecutive values.
    ///
    /// One clause is emitted per directed neighbor pair, so each constraint
    /// appears twice; the solvers do not rely on deduplication.
    fn rule_non_consecutive(&mut self) {
        let n = self.n;
        for row in 0..n {
            for col in 0..n {
                let mut neighbors: Vec<(usize, usize)> = Vec::with_capacity(4);
                if row > 0 {
                    neighbors.push((row - 1, col));
                }
                if row < n - 1 {
                    neighbors.push((row + 1, col));
                }
                if col > 0 {
                    neighbors.push((row, col - 1));
                }
                if col < n - 1 {
                    neighbors.push((row, col + 1));
                }

                for value in 1..=n as u32 {
                    for &(adj_row, adj_col) in &neighbors {
                        if value > 1 {
                            let clause = [
                                self.lit(row, col, value, false),
                                self.lit(adj_row, adj_col, value - 1, false),
                            ];
                            self.problem.add_clause(&clause);
                        }
                        if value < n as u32 {
                            let clause = [
                                self.lit(row, col, value, false),
                                self.lit(adj_row, adj_col, value + 1, false),
                            ];
                            self.problem.add_clause(&clause);
                        }
                    }
                }
            }
        }
    }

    /// Rule 6: one unit clause per given clue.
    fn rule_clues(&mut self) {
        for row in 0..self.n {
            for col in 0..self.n {
                let value = self.grid.value(row, col);
                if value != 0 {
                    let clause = [self.lit(row, col, value, true)];
                    self.problem.add_clause(&clause);
                }
            }
        }
    }
}
