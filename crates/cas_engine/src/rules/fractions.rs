use crate::rule::Rewrite;
use cas_ast::{Expr, Node, TargetKindSet};

define_rule!(
    /// Moves every division to the outermost position of a product/quotient
    /// chain so a single numerator and denominator remain.
    NestedFractionRule,
    "Simplify Nested Fraction",
    Some(TargetKindSet::DIV),
    |expr| {
        let Node::Div(num, den) = expr.node() else {
            return None;
        };
        if let Node::Div(a, b) = num.node() {
            return Some(Rewrite::simple(
                Expr::div(a, Expr::mul(b, den)),
                "(a/b)/c = a/(b*c)",
            ));
        }
        if let Node::Div(b, c) = den.node() {
            return Some(Rewrite::simple(
                Expr::div(Expr::mul(num, c), b),
                "a/(b/c) = (a*c)/b",
            ));
        }
        None
    }
);

define_rule!(
    MulFractionRule,
    "Multiply by Fraction",
    Some(TargetKindSet::MUL),
    |expr| {
        let Node::Mul(lhs, rhs) = expr.node() else {
            return None;
        };
        if let Node::Div(b, c) = rhs.node() {
            return Some(Rewrite::simple(
                Expr::div(Expr::mul(lhs, b), c),
                "a*(b/c) = (a*b)/c",
            ));
        }
        if let Node::Div(a, b) = lhs.node() {
            return Some(Rewrite::simple(
                Expr::div(Expr::mul(a, rhs), b),
                "(a/b)*c = (a*c)/b",
            ));
        }
        None
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(NestedFractionRule));
    simplifier.add_rule(Box::new(MulFractionRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    #[test]
    fn test_nested_fractions() {
        let (a, b, c) = (Expr::var("a"), Expr::var("b"), Expr::var("c"));
        let e = Expr::div(Expr::div(&a, &b), &c);
        assert_eq!(
            NestedFractionRule.apply(&e).unwrap().new_expr,
            Expr::div(&a, Expr::mul(&b, &c))
        );
        let e = Expr::div(&a, Expr::div(&b, &c));
        assert_eq!(
            NestedFractionRule.apply(&e).unwrap().new_expr,
            Expr::div(Expr::mul(&a, &c), &b)
        );
        let e = Expr::mul(&a, Expr::div(&b, &c));
        assert_eq!(
            MulFractionRule.apply(&e).unwrap().new_expr,
            Expr::div(Expr::mul(&a, &b), &c)
        );
    }
}
