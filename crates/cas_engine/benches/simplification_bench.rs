use cas_ast::Expr;
use cas_engine::Simplifier;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn benchmark_polynomial_simplification(c: &mut Criterion) {
    let mut group = c.benchmark_group("polynomial");

    group.bench_function("combine_like_terms_large", |b| {
        // x + 2x + 3x + ... + 20x
        let x = Expr::var("x");
        let input = (2..=20).fold(x.clone(), |acc, i| acc + Expr::int(i) * &x);
        let simplifier = Simplifier::with_default_rules();
        b.iter(|| black_box(simplifier.simplify(&input)))
    });

    group.finish();
}

fn benchmark_trig_simplification(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigonometry");

    group.sample_size(10);
    group.bench_function("pythagorean_identity_nested", |b| {
        // sin^2(x) + cos^2(x) + sin^2(2x) + cos^2(2x) + ...
        let x = Expr::var("x");
        let input = (1..=5)
            .map(|i| {
                let arg = Expr::int(i) * &x;
                Expr::pow(Expr::sin(&arg), 2) + Expr::pow(Expr::cos(&arg), 2)
            })
            .reduce(|acc, t| acc + t)
            .unwrap_or_else(|| Expr::int(0));
        let simplifier = Simplifier::with_default_rules();
        b.iter(|| black_box(simplifier.simplify(&input)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_polynomial_simplification,
    benchmark_trig_simplification
);
criterion_main!(benches);
