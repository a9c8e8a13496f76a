use crate::{error::Error, lit::Lit, problem::Problem};

/// Parses DIMACS CNF format from a byte slice.
pub fn parse_dimacs(data: &[u8]) -> Result<Problem, Error> {
    let mut scanner = Scanner::new(data);

    scanner.skip_whitespace_and_comments();
    if !scanner.skip_expected(b"p") {
        return Err(invalid("expected problem line 'p cnf <vars> <clauses>'"));
    }
    scanner.skip_whitespace();
    if !scanner.skip_expected(b"cnf") {
        return Err(invalid("expected problem format 'cnf'"));
    }

    scanner.skip_whitespace();
    let num_vars = scanner
        .read_number()?
        .ok_or_else(|| invalid("expected number of variables"))?;
    scanner.skip_whitespace();
    let num_clauses = scanner
        .read_number()?
        .ok_or_else(|| invalid("expected number of clauses"))?;
    if num_vars < 0 || num_clauses < 0 {
        return Err(invalid("negative counts in problem line"));
    }

    let mut problem = Problem::new(num_vars as usize);

    // Reusable buffer to avoid an allocation per clause.
    let mut clause_buffer: Vec<Lit> = Vec::with_capacity(8);

    for _ in 0..num_clauses {
        clause_buffer.clear();

        loop {
            scanner.skip_whitespace_and_comments();
            let literal = scanner
                .read_number()?
                .ok_or_else(|| invalid("expected literal in clause"))?;

            // 0 terminates the clause.
            if literal == 0 {
                break;
            }

            let var = literal.unsigned_abs() as usize;
            if var > num_vars as usize {
                return Err(Error::InvalidInput(format!(
                    "literal {} exceeds declared variable count {}",
                    literal, num_vars
                )));
            }
            clause_buffer.push(Lit::from(literal as i32));
        }

        problem.add_clause(&clause_buffer);
    }

    Ok(problem)
}

fn invalid(msg: &str) -> Error {
    Error::InvalidInput(msg.to_string())
}

/// A cursor over a byte array with utility methods for parsing.
struct Scanner<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Scanner { data, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_whitespace())
        {
            self.position += 1;
        }
    }

    /// Skips whitespace and any `c ...` comment lines.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'c') {
                while self.peek().is_some_and(|byte| byte != b'\n') {
                    self.position += 1;
                }
            } else {
                return;
            }
        }
    }

    fn skip_expected(&mut self, expected: &[u8]) -> bool {
        if self.data.len() - self.position < expected.len() {
            return false;
        }
        if &self.data[self.position..self.position + expected.len()] != expected {
            return false;
        }
        self.position += expected.len();
        true
    }

    /// Reads an optionally-signed decimal number.
    /// Returns `Ok(None)` when the cursor is not positioned at a number.
    fn read_number(&mut self) -> Result<Option<i64>, Error> {
        let negative = if self.peek() == Some(b'-') {
            self.position += 1;
            true
        } else {
            false
        };

        let start = self.position;
        let mut num: i64 = 0;
        while let Some(byte) = self.peek() {
            if !byte.is_ascii_digit() {
                break;
            }
            num = num
                .checked_mul(10)
                .and_then(|n| n.checked_add((byte - b'0') as i64))
                .ok_or_else(|| invalid("number out of range"))?;
            self.position += 1;
        }

        if self.position == start {
            if negative {
                return Err(invalid("expected digits after '-'"));
            }
            return Ok(None);
        }
        Ok(Some(if negative { -num } else { num }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;

    #[test]
    fn test_parse_simple() {
        let problem = parse_dimacs(b"p cnf 3 2\n1 -3 0\n2 3 0\n").unwrap();
        assert_eq!(problem.num_vars, 3);
        assert_eq!(problem.clauses.len(), 2);
        assert_eq!(problem.clauses[0], Clause::from_dimacs(&[1, -3]));
        assert_eq!(problem.clauses[1], Clause::from_dimacs(&[2, 3]));
    }

    #[test]
    fn test_parse_skips_comments() {
        let data = b"c a puzzle instance\nc cnf with preamble\np cnf 2 1\nc inline\n-1 2 0\n";
        let problem = parse_dimacs(data).unwrap();
        assert_eq!(problem.num_vars, 2);
        assert_eq!(problem.clauses[0], Clause::from_dimacs(&[-1, 2]));
    }

    #[test]
    fn test_parse_ignores_trailing_content() {
        let problem = parse_dimacs(b"p cnf 2 1\n1 2 0\n%\n0\n").unwrap();
        assert_eq!(problem.clauses.len(), 1);
    }

    #[test]
    fn test_parse_rejects_out_of_range_literal() {
        assert!(matches!(
            parse_dimacs(b"p cnf 2 1\n1 3 0\n"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        assert!(matches!(
            parse_dimacs(b"1 2 0\n"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_round_trip_through_writer() {
        let mut problem = Problem::new(4);
        problem.add_clause(&[Lit::from(1)]);
        problem.add_clause(&[Lit::from(-1), Lit::from(2)]);
        problem.add_clause(&[Lit::from(-2), Lit::from(3), Lit::from(-4)]);

        let mut out = Vec::new();
        problem.write_dimacs(&mut out).unwrap();
        let reparsed = parse_dimacs(&out).unwrap();

        assert_eq!(reparsed.num_vars, problem.num_vars);
        assert_eq!(reparsed.clauses, problem.clauses);
    }
}
