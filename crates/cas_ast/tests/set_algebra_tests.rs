//! Set algebra properties
//!
//! Containment through the combinators must agree with containment in the
//! operands whenever both sides are decidable.

use cas_ast::{Domain, Expr, FiniteSet};
use proptest::prelude::*;

fn finite(xs: &[i64]) -> Expr {
    Expr::finite_set(xs.iter().copied())
}

fn arb_set() -> impl Strategy<Value = Expr> {
    prop_oneof![
        prop::collection::vec(-5i64..5, 0..6).prop_map(|xs| finite(&xs)),
        (-5i64..5, 0i64..6, any::<bool>(), any::<bool>())
            .prop_map(|(lo, len, lc, rc)| Expr::interval(lo, lc, lo + len, rc)),
        Just(Expr::special_set(Domain::Integer)),
        Just(Expr::special_set(Domain::Real)),
        (-5i64..5).prop_map(|k| Expr::conditional_set("x", Expr::greater(Expr::var("x"), k))),
    ]
}

fn arb_element() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (-6i64..6).prop_map(Expr::int),
        (-12i64..12).prop_map(|n| Expr::rational(n, 2)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn union_containment_agrees(a in arb_set(), b in arb_set(), e in arb_element()) {
        if let (Some(x), Some(y)) = (a.try_contains(&e), b.try_contains(&e)) {
            prop_assert_eq!(Expr::union(&a, &b).try_contains(&e), Some(x || y));
        }
    }

    #[test]
    fn intersection_containment_agrees(a in arb_set(), b in arb_set(), e in arb_element()) {
        if let (Some(x), Some(y)) = (a.try_contains(&e), b.try_contains(&e)) {
            prop_assert_eq!(Expr::intersection(&a, &b).try_contains(&e), Some(x && y));
        }
    }

    #[test]
    fn difference_containment_agrees(a in arb_set(), b in arb_set(), e in arb_element()) {
        if let (Some(x), Some(y)) = (a.try_contains(&e), b.try_contains(&e)) {
            prop_assert_eq!(Expr::set_minus(&a, &b).try_contains(&e), Some(x && !y));
        }
    }

    #[test]
    fn dedup_matches_distinct_values(xs in prop::collection::vec(-4i64..4, 0..12)) {
        let mut distinct = xs.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let set: FiniteSet = xs.iter().map(|&x| Expr::int(x)).collect();
        prop_assert_eq!(set.len(), distinct.len());
    }

    #[test]
    fn power_set_has_two_to_the_n_subsets(xs in prop::collection::vec(-20i64..20, 0..8)) {
        let set: FiniteSet = xs.iter().map(|&x| Expr::int(x)).collect();
        let subsets = set.power_set().map(<[FiniteSet]>::len);
        prop_assert_eq!(subsets, Some(1usize << set.len()));
    }
}

#[test]
fn test_dedup_literal() {
    assert_eq!(finite(&[1, 1, 2]).as_finite_set().map(FiniteSet::len), Some(2));
}

#[test]
fn test_interval_boundary() {
    let i = Expr::interval(1, true, 3, false);
    assert_eq!(i.contains(&Expr::int(2)), Ok(true));
    assert_eq!(i.contains(&Expr::int(3)), Ok(false));
}

#[test]
fn test_finite_intersection_and_difference() {
    let a = finite(&[1, 2, 3]);
    let b = finite(&[2, 3, 4]);
    assert_eq!(Expr::intersection(&a, &b).evaled(), finite(&[2, 3]));
    assert_eq!(Expr::set_minus(&a, &b).evaled(), finite(&[1]));
}

#[test]
fn test_rational_and_integer_keys_coincide() {
    let s = Expr::finite_set([Expr::rational(4, 2), Expr::int(2)]);
    assert_eq!(s.as_finite_set().map(FiniteSet::len), Some(1));
}

#[test]
fn test_conditional_sets_compare_up_to_renaming() {
    let a = Expr::conditional_set("x", Expr::less(Expr::var("x"), 0));
    let b = Expr::conditional_set("t", Expr::less(Expr::var("t"), 0));
    assert_eq!(a, b);
}
