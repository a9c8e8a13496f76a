use criterion::{Criterion, criterion_group, criterion_main};
use ncsat::{
    encoder::{self, Grid},
    solver::{Solver, Variant, get_solver},
};
use std::hint::black_box;

const EMPTY_4X4: &str = "0 0 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n";

fn bench_encode(c: &mut Criterion) {
    let grid = Grid::parse(EMPTY_4X4).expect("fixture grid");

    c.bench_function("encode_4x4", |b| {
        b.iter(|| encoder::encode(black_box(&grid)))
    });
}

fn bench_solve(c: &mut Criterion) {
    let grid = Grid::parse(EMPTY_4X4).expect("fixture grid");
    let problem = encoder::encode(&grid);

    for variant in Variant::ALL {
        c.bench_function(&format!("solve_4x4_{}", variant), |b| {
            b.iter(|| {
                let mut solver = get_solver(
                    variant,
                    black_box(problem.clauses.clone()),
                    problem.num_vars,
                )
                .expect("factory");
                solver.solve()
            })
        });
    }
}

criterion_group!(benches, bench_encode, bench_solve);
criterion_main!(benches);
