use cas_ast::{Expr, Settings};
use cas_solver::solve_equation;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn benchmark_closed_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("closed_forms");
    let x = Expr::var("x");

    group.bench_function("quadratic", |b| {
        let input = Expr::pow(&x, 2) - Expr::mul(5, &x) + 6;
        b.iter(|| black_box(solve_equation(&input, "x")))
    });

    group.bench_function("quartic_biquadratic", |b| {
        let input = Expr::pow(&x, 4) - Expr::mul(5, Expr::pow(&x, 2)) + 4;
        b.iter(|| black_box(solve_equation(&input, "x")))
    });

    group.finish();
}

fn benchmark_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");
    group.sample_size(10);
    let x = Expr::var("x");

    group.bench_function("sine_substitution", |b| {
        let s = Expr::sin(&x);
        let input = Expr::pow(&s, 2) + &s - 2;
        b.iter(|| black_box(solve_equation(&input, "x")))
    });

    group.bench_function("radical", |b| {
        let input = Expr::sqrt(&x) - &x + 2;
        b.iter(|| black_box(solve_equation(&input, "x")))
    });

    group.bench_function("newton_fallback", |b| {
        let _guard = Settings::scoped(|s| s.newton.step_count = (4, 4));
        let input = &x - Expr::cos(&x);
        b.iter(|| black_box(solve_equation(&input, "x")))
    });

    group.finish();
}

criterion_group!(benches, benchmark_closed_forms, benchmark_cascade);
criterion_main!(benches);
