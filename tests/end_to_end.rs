use ncsat::{
    encoder::{self, Grid},
    solver::{SolveResult, Solver, Variant, get_solver},
};
use std::io::Write;
use tempfile::NamedTempFile;

/// A complete 9×9 non-consecutive Sudoku solution (rows, columns and boxes
/// each hold 1..9 once; orthogonal neighbors never differ by 1).
const FULL_9X9: &str = "\
2 4 9 3 6 8 1 7 5
6 1 5 7 2 4 8 3 9
8 3 7 9 5 1 4 6 2
5 8 3 1 9 6 2 4 7
9 6 1 4 7 2 5 8 3
7 2 4 8 3 5 9 1 6
4 7 2 5 8 3 6 9 1
1 9 6 2 4 7 3 5 8
3 5 8 6 1 9 7 2 4
";

/// The same solution with 21 cells blanked out.
const PARTIAL_9X9: &str = "\
2 4 9 3 6 0 1 7 5
6 1 0 0 2 4 8 3 9
0 3 7 9 5 0 0 6 2
5 0 3 1 9 6 2 4 7
9 6 0 4 7 0 5 8 3
7 2 4 8 3 0 9 1 6
4 7 2 0 8 0 0 0 1
1 9 0 2 4 7 3 5 0
3 0 8 0 0 0 7 2 0
";

const EMPTY_4X4: &str = "0 0 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n";

/// Two cells of the same row fixed to the same value.
const CONTRADICTORY_4X4: &str = "1 0 1 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n";

/// Round-trips a puzzle through a temp file, the way the CLI reads them.
fn grid_from_file(content: &str) -> Grid {
    let mut file = NamedTempFile::new().expect("temp puzzle file");
    write!(file, "{}", content).expect("write puzzle");
    let text = std::fs::read_to_string(file.path()).expect("read puzzle back");
    Grid::parse(&text).expect("parse puzzle")
}

/// Checks the puzzle rules directly on a completed grid: every row, column
/// and box holds each value once, orthogonal neighbors are never consecutive,
/// and all clues are preserved.
fn assert_valid_solution(solution: &Grid, clues: &Grid) {
    let n = solution.n();
    let boxes = solution.box_len();

    for row in 0..n {
        let mut seen = vec![false; n + 1];
        for col in 0..n {
            let value = solution.value(row, col) as usize;
            assert!(value >= 1 && value <= n, "cell out of range");
            assert!(!seen[value], "row {} repeats {}", row, value);
            seen[value] = true;
        }
    }
    for col in 0..n {
        let mut seen = vec![false; n + 1];
        for row in 0..n {
            let value = solution.value(row, col) as usize;
            assert!(!seen[value], "column {} repeats {}", col, value);
            seen[value] = true;
        }
    }
    for box_row in 0..boxes {
        for box_col in 0..boxes {
            let mut seen = vec![false; n + 1];
            for i in 0..boxes {
                for j in 0..boxes {
                    let value = solution.value(box_row * boxes + i, box_col * boxes + j) as usize;
                    assert!(!seen[value], "box ({},{}) repeats {}", box_row, box_col, value);
                    seen[value] = true;
                }
            }
        }
    }
    for row in 0..n {
        for col in 0..n {
            let value = solution.value(row, col) as i64;
            if row + 1 < n {
                let below = solution.value(row + 1, col) as i64;
                assert_ne!((value - below).abs(), 1, "consecutive at ({},{})", row, col);
            }
            if col + 1 < n {
                let right = solution.value(row, col + 1) as i64;
                assert_ne!((value - right).abs(), 1, "consecutive at ({},{})", row, col);
            }
        }
    }
    for row in 0..n {
        for col in 0..n {
            let clue = clues.value(row, col);
            if clue != 0 {
                assert_eq!(solution.value(row, col), clue, "clue ({},{}) lost", row, col);
            }
        }
    }
}

#[test]
fn full_9x9_solution_is_sat_for_every_variant() {
    let grid = grid_from_file(FULL_9X9);
    let problem = encoder::encode(&grid);

    for variant in Variant::ALL {
        let mut solver =
            get_solver(variant, problem.clauses.clone(), problem.num_vars).expect("factory");
        let result = solver.solve();
        let SolveResult::Sat(model) = result else {
            panic!("variant {} returned UNSAT on a solved grid", variant);
        };

        problem
            .verify_model(&model)
            .unwrap_or_else(|msg| panic!("variant {}: {}", variant, msg));

        // With every cell given, the model is exactly the clues.
        let decoded = encoder::decode_model(&model, grid.n()).expect("decode");
        assert_eq!(decoded, grid, "variant {} altered a clue", variant);
    }
}

#[test]
fn partial_9x9_puzzle_is_solved_by_every_variant() {
    let clues = grid_from_file(PARTIAL_9X9);
    let problem = encoder::encode(&clues);

    for variant in Variant::ALL {
        let mut solver =
            get_solver(variant, problem.clauses.clone(), problem.num_vars).expect("factory");
        let result = solver.solve();
        let SolveResult::Sat(model) = result else {
            panic!("variant {} returned UNSAT on a solvable puzzle", variant);
        };

        problem
            .verify_model(&model)
            .unwrap_or_else(|msg| panic!("variant {}: {}", variant, msg));

        let decoded = encoder::decode_model(&model, clues.n()).expect("decode");
        assert_valid_solution(&decoded, &clues);
    }
}

#[test]
fn empty_4x4_is_unsat_for_every_variant() {
    // Inside a 2×2 box all four cells are mutually adjacent except the two
    // diagonal pairs, so at most one of the consecutive value pairs (1,2),
    // (2,3), (3,4) can be hidden on a diagonal. A 4×4 grid with box and
    // non-consecutive constraints therefore has no solution at all.
    let grid = grid_from_file(EMPTY_4X4);
    let problem = encoder::encode(&grid);

    for variant in Variant::ALL {
        let mut solver =
            get_solver(variant, problem.clauses.clone(), problem.num_vars).expect("factory");
        assert_eq!(
            solver.solve(),
            SolveResult::Unsat,
            "variant {} found a model for an impossible grid",
            variant
        );
    }
}

#[test]
fn contradictory_clues_are_unsat_for_every_variant() {
    let grid = grid_from_file(CONTRADICTORY_4X4);
    let problem = encoder::encode(&grid);

    for variant in Variant::ALL {
        let mut solver =
            get_solver(variant, problem.clauses.clone(), problem.num_vars).expect("factory");
        assert_eq!(
            solver.solve(),
            SolveResult::Unsat,
            "variant {} accepted two identical values in one row",
            variant
        );
    }
}

#[test]
fn encoding_is_deterministic_across_reads() {
    let first = encoder::encode(&grid_from_file(PARTIAL_9X9));
    let second = encoder::encode(&grid_from_file(PARTIAL_9X9));
    assert_eq!(first.clauses, second.clauses);
    assert_eq!(first.num_vars, second.num_vars);
}

#[test]
fn metrics_stay_within_expectations_on_clued_grids() {
    // Every hole in this puzzle is recovered by unit propagation alone, and
    // the base solver's propagation loop runs to fixpoint before branching.
    let clues = grid_from_file(PARTIAL_9X9);
    let problem = encoder::encode(&clues);

    let mut solver = get_solver(Variant::Base, problem.clauses.clone(), problem.num_vars)
        .expect("factory");
    assert!(solver.solve().is_sat());
    assert_eq!(solver.metrics().decisions, 0);
    assert_eq!(solver.metrics().unit_propagations, 729);
    assert_eq!(solver.metrics().conflicts, 0);
}
