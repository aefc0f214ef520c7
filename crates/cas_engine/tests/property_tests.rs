use cas_ast::Expr;
use cas_engine::Simplifier;
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (-5i64..=5).prop_map(Expr::int),
        Just(Expr::var("x")),
        Just(Expr::var("y")),
    ]
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    arb_leaf().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::sum(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::minus(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::mul(a, b)),
            inner.prop_map(|a| Expr::sin(a)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_idempotency(e in arb_expr()) {
        let s = Simplifier::with_default_rules();
        let once = s.simplify(&e);
        let twice = s.simplify(&once);
        prop_assert_eq!(&once, &twice, "simplify not idempotent on {}", e);
    }

    #[test]
    fn test_identity_add_zero(e in arb_expr()) {
        let s = Simplifier::with_default_rules();
        let with_zero = s.simplify(&Expr::sum(e.clone(), 0));
        prop_assert_eq!(with_zero, s.simplify(&e));
    }

    #[test]
    fn test_simplify_preserves_value(e in arb_expr(), xv in -3i64..=3, yv in -3i64..=3) {
        let s = Simplifier::with_default_rules();
        let out = s.simplify(&e);
        let at = |expr: &Expr| {
            expr.substitute(&Expr::var("x"), &Expr::int(xv))
                .substitute(&Expr::var("y"), &Expr::int(yv))
                .eval_number()
        };
        if let (Some(a), Some(b)) = (at(&e), at(&out)) {
            prop_assert!(a.approx_eq(&b, 1e-9), "{} = {} but {} = {}", e, a, out, b);
        }
    }
}
