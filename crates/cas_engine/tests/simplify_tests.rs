//! End-to-end simplification through the default rule set.

use cas_ast::{Domain, Expr};
use cas_engine::Simplifier;

fn x() -> Expr {
    Expr::var("x")
}

fn simplify(e: &Expr) -> Expr {
    Simplifier::with_default_rules().simplify(e)
}

#[test]
fn test_constant_arithmetic() {
    assert_eq!(simplify(&(Expr::int(2) + 2)), Expr::int(4));
    assert_eq!(simplify(&(Expr::int(1) / 2 + Expr::rational(1, 2))), Expr::int(1));
}

#[test]
fn test_identities() {
    assert_eq!(simplify(&(x() + 0)), x());
    assert_eq!(simplify(&(x() * 1)), x());
    assert_eq!(simplify(&(x() - x())), Expr::int(0));
}

#[test]
fn test_like_terms_and_factors() {
    assert_eq!(simplify(&(x() + x())), Expr::mul(2, x()));
    assert_eq!(simplify(&(Expr::int(2) * x() * 3)), Expr::mul(6, x()));
    assert_eq!(simplify(&(x() * x())), Expr::pow(x(), 2));
    assert_eq!(
        simplify(&(Expr::pow(x(), 2) * Expr::pow(x(), 3))),
        Expr::pow(x(), 5)
    );
}

#[test]
fn test_pythagorean_identity() {
    let e = Expr::pow(Expr::sin(x()), 2) + Expr::pow(Expr::cos(x()), 2);
    assert_eq!(simplify(&e), Expr::int(1));
}

#[test]
fn test_exact_trig_value() {
    assert_eq!(simplify(&Expr::sin(Expr::pi() / 2)), Expr::int(1));
    assert_eq!(simplify(&Expr::cos(Expr::pi())), Expr::int(-1));
}

#[test]
fn test_statements() {
    assert_eq!(
        simplify(&Expr::not(Expr::greater(x(), 1))),
        Expr::less_or_equal(x(), 1)
    );
    assert_eq!(simplify(&Expr::less(1, 2)), Expr::boolean(true));
    assert_eq!(simplify(&Expr::equals(x(), x())), Expr::boolean(true));
}

#[test]
fn test_set_operations() {
    let a = Expr::finite_set([1, 2, 3]);
    let b = Expr::finite_set([2, 3, 4]);
    assert_eq!(simplify(&Expr::intersection(&a, &b)), Expr::finite_set([2, 3]));
    assert_eq!(simplify(&Expr::set_minus(&a, &b)), Expr::finite_set([1]));

    let reals = Expr::special_set(Domain::Real);
    assert_eq!(simplify(&Expr::union(Expr::empty_set(), &reals)), reals);
}

#[test]
fn test_steps_are_recorded() {
    let s = Simplifier::with_default_rules();
    let (result, steps) = s.simplify_with_steps(&(x() + 0));
    assert_eq!(result, x());
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].rule_name, "Identity Property of Addition");
}

#[test]
fn test_disabled_rule_does_not_fire() {
    let mut s = Simplifier::with_default_rules();
    s.disable_rule("Identity Property of Addition");
    s.disable_rule("Fold Constants");
    s.disable_rule("Combine Like Terms");
    let e = x() + 0;
    assert_eq!(s.simplify(&e), e);
}

#[test]
fn test_unchanged_input_is_returned_by_identity() {
    let e = Expr::sin(x()) + Expr::var("y");
    let out = Simplifier::with_default_rules().simplify(&e);
    assert!(out.ptr_eq(&e));
}

#[test]
fn test_rule_names_are_unique() {
    let s = Simplifier::with_default_rules();
    let names = s.get_all_rule_names();
    assert!(names.contains(&"Pythagorean Identity".to_string()));
    assert!(names.len() > 30);
}

/// Run with: RUST_LOG=cas_engine=debug cargo test -p cas_engine --test simplify_tests -- --nocapture
#[test]
fn debug_trace_pythagorean() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let e = Expr::pow(Expr::sin(x()), 2) + Expr::pow(Expr::cos(x()), 2) - 1;
    assert_eq!(simplify(&e), Expr::int(0));
}
