//! End-to-end solving: equations, statements and inversion soundness.

use cas_ast::{Expr, Number};
use cas_solver::{invert, solve, solve_equation, try_downcast};
use proptest::prelude::*;
use std::f64::consts::PI;

fn x() -> Expr {
    Expr::var("x")
}

/// Replace every free variable other than `x` (the family indices) by `k`.
fn at_index(e: &Expr, k: i64) -> Expr {
    e.free_vars()
        .into_iter()
        .filter(|v| &**v != "x")
        .fold(e.clone(), |acc, v| acc.substitute(&Expr::var(&v), &Expr::int(k)))
}

fn real_value(e: &Expr) -> Option<f64> {
    let n = e.eval_number()?;
    if !n.im().is_zero_within(1e-9) {
        return None;
    }
    n.re().to_f64().ok().filter(|v| v.is_finite())
}

#[test]
fn test_linear() {
    assert_eq!(solve_equation(&(x() + 3), "x").unwrap(), Expr::finite_set([-3]));
}

#[test]
fn test_quadratic() {
    let e = Expr::pow(x(), 2) - Expr::mul(5, x()) + 6;
    assert_eq!(solve_equation(&e, "x").unwrap(), Expr::finite_set([3, 2]));
}

#[test]
fn test_sine_quadratic_family() {
    let s = Expr::sin(x());
    let e = Expr::pow(&s, 2) + &s - 2;
    let set = solve_equation(&e, "x").unwrap();
    let fs = set.as_finite_set().expect("finite family set");
    assert!(!fs.is_empty());

    for (k, expected) in [(0, PI / 2.0), (1, PI / 2.0 + 2.0 * PI)] {
        let hit = fs
            .iter()
            .any(|r| real_value(&at_index(r, k)).is_some_and(|v| (v - expected).abs() < 1e-9));
        assert!(hit, "{} not produced by {}", expected, set);
    }
    // t = -2 is outside the range of sine and must not leak a real branch
    for r in fs.iter() {
        if let Some(v) = real_value(&at_index(r, 0)) {
            assert!((v.sin() - 1.0).abs() < 1e-9, "{} is not a root", r);
        }
    }
}

#[test]
fn test_set_operations() {
    let a = Expr::finite_set([1, 2, 3]);
    let b = Expr::finite_set([2, 3, 4]);
    assert_eq!(Expr::intersect_sets(&a, &b), Expr::finite_set([2, 3]));
    assert_eq!(Expr::subtract_sets(&a, &b), Expr::finite_set([1]));
}

#[test]
fn test_pole_is_not_a_root() {
    let e = Expr::div(x(), x() - 1);
    assert_eq!(solve_equation(&e, "x").unwrap(), Expr::finite_set([0]));
}

#[test]
fn test_numeric_root_downcasts() {
    let eq = Expr::mul(2, x()) - 1;
    let approx = Expr::number(Number::complex(Number::float(0.49999999), Number::float(1e-9)));
    assert_eq!(try_downcast(&eq, &x(), &approx), Expr::rational(1, 2));
}

#[test]
fn test_exponential_equation() {
    let e = Expr::pow(2, x()) - 8;
    assert_eq!(solve_equation(&e, "x").unwrap(), Expr::finite_set([3]));

    // 2^(x + 1) = 8
    let e = Expr::pow(2, x() + 1) - 8;
    let set = solve_equation(&e, "x").unwrap();
    let fs = set.as_finite_set().unwrap();
    assert!(fs.iter().any(|r| *r == Expr::int(2)), "{}", set);
}

#[test]
fn test_transcendental_root_stays_exact_form() {
    let e = Expr::pow(Expr::e(), x()) - 2;
    let set = solve_equation(&e, "x").unwrap();
    let fs = set.as_finite_set().unwrap();
    assert!(!fs.is_empty(), "{}", set);
    for r in fs.iter() {
        assert!(!r.is_number(), "{} was replaced by a rational", r);
    }
    let ln2 = std::f64::consts::LN_2;
    assert!(
        fs.iter()
            .any(|r| real_value(&at_index(r, 0)).is_some_and(|v| (v - ln2).abs() < 1e-12)),
        "{}",
        set
    );
}

#[test]
fn test_cubic_exact_roots() {
    // (x - 1)(x - 2)(x + 3) expanded
    let e = Expr::pow(x(), 3) - Expr::mul(7, x()) + 6;
    let set = solve_equation(&e, "x").unwrap();
    let fs = set.as_finite_set().unwrap();
    assert_eq!(fs.len(), 3, "{}", set);
    for root in [1, 2, -3] {
        assert!(
            fs.iter().any(|r| real_value(r).is_some_and(|v| (v - root as f64).abs() < 1e-9)),
            "{} missing from {}",
            root,
            set
        );
    }
}

#[test]
fn test_statement_combinations() {
    let quad = Expr::equals(Expr::pow(x(), 2), 4);
    let positive = Expr::greater(x(), 0);
    let set = solve(&Expr::and(quad, positive), "x").unwrap();
    assert_eq!(set.try_contains(&Expr::int(2)), Some(true));
    assert_eq!(set.try_contains(&Expr::int(-2)), Some(false));
}

/// Run with: cargo test -p cas_solver --test solve_tests debug_trace_cascade -- --nocapture
#[test]
fn debug_trace_cascade() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let e = Expr::sqrt(x()) - x() + 2;
    assert_eq!(solve_equation(&e, "x").unwrap(), Expr::finite_set([4]));
}

#[test]
fn test_unsolvable_is_empty_not_error() {
    let _guard = cas_ast::Settings::scoped(|s| s.allow_newton_fallback = false);
    let e = Expr::func(cas_ast::Func::Factorial, x()) - 3;
    assert_eq!(solve_equation(&e, "x").unwrap(), Expr::empty_set());
}

// =============================================================================
// Inversion soundness
// =============================================================================

fn arb_node() -> impl Strategy<Value = Expr> {
    let seed = (1i64..=4, -3i64..=3).prop_map(|(a, b)| Expr::mul(a, x()) + b);
    seed.prop_recursive(3, 8, 1, |inner| {
        prop_oneof![
            (inner.clone(), 1i64..=3).prop_map(|(e, k)| e + k),
            (inner.clone(), 1i64..=3).prop_map(|(e, k)| Expr::mul(k, e)),
            (inner.clone(), 2i64..=3).prop_map(|(e, n)| Expr::pow(e, n)),
            inner.clone().prop_map(|e| Expr::pow(Expr::e(), e)),
            inner.clone().prop_map(|e| Expr::ln(e)),
            inner.clone().prop_map(|e| Expr::sin(e)),
            inner.prop_map(|e| Expr::cos(e)),
        ]
    })
}

fn finite_value(e: &Expr) -> Option<Number> {
    let n = e.eval_number()?;
    let z = n.to_complex64();
    (z.re.is_finite() && z.im.is_finite()).then_some(n)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every inversion branch, complex ones included, maps back onto the
    /// target value for the first two members of each periodic family.
    #[test]
    fn test_inversion_is_sound(node in arb_node(), v in -3i64..=3) {
        let value = Expr::int(v);
        for r in invert(&node, &value, &x()).unwrap() {
            for k in [0, 1] {
                let r = at_index(&r, k);
                let Some(rv) = finite_value(&r) else { continue };
                let Some(image) = finite_value(&node.substitute(&x(), &r)) else { continue };
                prop_assert!(
                    image.approx_eq(&Number::int(v), 1e-6 * (1.0 + rv.magnitude())),
                    "{} at x = {} gives {}, expected {}", node, r, image, v
                );
            }
        }
    }
}
