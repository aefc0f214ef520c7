//! Equality and inequality normalization.

use crate::helpers::{is_nonzero_real, num};
use crate::rule::Rewrite;
use cas_ast::{Expr, LogicOp, Node, RelOp, TargetKindSet};

define_rule!(
    /// `a < b or a = b` is `a <= b`; same for `>`.
    MergeStrictWithEqualityRule,
    "Merge Strict Inequality with Equality",
    Some(TargetKindSet::LOGIC),
    |expr| {
        let Node::Logic(LogicOp::Or, lhs, rhs) = expr.node() else {
            return None;
        };
        let merged = |p: &Expr, q: &Expr| {
            let (Node::Relation(op, a, b), Node::Relation(RelOp::Equals, c, d)) = (p.node(), q.node())
            else {
                return None;
            };
            if a != c || b != d {
                return None;
            }
            let op = match op {
                RelOp::Less => RelOp::LessOrEqual,
                RelOp::Greater => RelOp::GreaterOrEqual,
                _ => return None,
            };
            Some(Expr::relation(op, a, b))
        };
        let result = merged(lhs, rhs).or_else(|| merged(rhs, lhs))?;
        Some(Rewrite::simple(result, "a < b or a = b is a <= b"))
    }
);

define_rule!(
    NegateInequalityRule,
    "Negate Inequality",
    Some(TargetKindSet::NOT),
    |expr| {
        let Node::Not(inner) = expr.node() else {
            return None;
        };
        let Node::Relation(op, a, b) = inner.node() else {
            return None;
        };
        let negated = op.negated()?;
        Some(Rewrite::simple(
            Expr::relation(negated, a, b),
            format!("not (a {} b) is a {} b", op.symbol(), negated.symbol()),
        ))
    }
);

define_rule!(
    NumberOnRightRule,
    "Number on Right Side",
    Some(TargetKindSet::RELATION),
    |expr| {
        match expr.node() {
            Node::Relation(op, a, b) if a.is_number() && !b.is_number() => Some(Rewrite::simple(
                Expr::relation(op.flipped(), b, a),
                "Move number to the right",
            )),
            _ => None,
        }
    }
);

define_rule!(
    /// `a < b and a > b` (or any pair of complementary relations) is false.
    ContradictoryInequalitiesRule,
    "Contradictory Inequalities",
    Some(TargetKindSet::LOGIC),
    |expr| {
        let Node::Logic(LogicOp::And, lhs, rhs) = expr.node() else {
            return None;
        };
        let (Node::Relation(p, a, b), Node::Relation(q, c, d)) = (lhs.node(), rhs.node()) else {
            return None;
        };
        let contradictory = a == c && b == d && p.is_strict() && q.is_strict() && p != q;
        contradictory.then(|| Rewrite::simple(Expr::boolean(false), "a < b and a > b is false"))
    }
);

define_rule!(
    PowerEqualsZeroRule,
    "Power Equals Zero",
    Some(TargetKindSet::RELATION),
    |expr| {
        let Node::Relation(RelOp::Equals, lhs, rhs) = expr.node() else {
            return None;
        };
        if !rhs.is_zero() {
            return None;
        }
        match lhs.node() {
            Node::Pow(base, exp) if num(exp).is_some_and(|n| n.is_positive()) => Some(
                Rewrite::simple(Expr::equals(base, 0), "a^n = 0 is a = 0 for n > 0"),
            ),
            _ => None,
        }
    }
);

define_rule!(
    /// `k*a rel 0` and `a/k rel 0` drop the constant `k`, flipping the
    /// relation when `k` is negative.
    StripConstantFactorRule,
    "Strip Constant Factor",
    Some(TargetKindSet::RELATION),
    |expr| {
        let Node::Relation(op, lhs, rhs) = expr.node() else {
            return None;
        };
        if !rhs.is_zero() {
            return None;
        }
        let (k, a) = match lhs.node() {
            Node::Mul(k, a) if is_nonzero_real(k) => (k, a),
            Node::Div(a, k) if is_nonzero_real(k) => (k, a),
            _ => return None,
        };
        let op = if num(k).is_some_and(|n| n.is_negative()) {
            op.flipped()
        } else {
            *op
        };
        Some(Rewrite::simple(Expr::relation(op, a, 0), "Divide both sides by a constant"))
    }
);

define_rule!(
    ReflexiveRelationRule,
    "Reflexive Relation",
    Some(TargetKindSet::RELATION),
    |expr| {
        let Node::Relation(op, a, b) = expr.node() else {
            return None;
        };
        if a != b || a.is_nan() {
            return None;
        }
        Some(Rewrite::simple(
            Expr::boolean(!op.is_strict()),
            format!("a {} a", op.symbol()),
        ))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(MergeStrictWithEqualityRule));
    simplifier.add_rule(Box::new(NegateInequalityRule));
    simplifier.add_rule(Box::new(NumberOnRightRule));
    simplifier.add_rule(Box::new(ContradictoryInequalitiesRule));
    simplifier.add_rule(Box::new(PowerEqualsZeroRule));
    simplifier.add_rule(Box::new(StripConstantFactorRule));
    simplifier.add_rule(Box::new(ReflexiveRelationRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_merge_with_equality() {
        let e = Expr::or(Expr::equals(x(), 1), Expr::less(x(), 1));
        assert_eq!(
            MergeStrictWithEqualityRule.apply(&e).unwrap().new_expr,
            Expr::less_or_equal(x(), 1)
        );
    }

    #[test]
    fn test_negate_inequality() {
        let e = Expr::not(Expr::greater(x(), 1));
        assert_eq!(
            NegateInequalityRule.apply(&e).unwrap().new_expr,
            Expr::less_or_equal(x(), 1)
        );
        // equality has no single-relation negation
        assert!(NegateInequalityRule.apply(&Expr::not(Expr::equals(x(), 1))).is_none());
    }

    #[test]
    fn test_number_on_right() {
        let e = Expr::less(3, x());
        assert_eq!(NumberOnRightRule.apply(&e).unwrap().new_expr, Expr::greater(x(), 3));
    }

    #[test]
    fn test_strip_negative_factor_flips() {
        let e = Expr::less(Expr::mul(-2, x()), 0);
        assert_eq!(
            StripConstantFactorRule.apply(&e).unwrap().new_expr,
            Expr::greater(x(), 0)
        );
    }

    #[test]
    fn test_reflexive() {
        assert_eq!(
            ReflexiveRelationRule.apply(&Expr::greater(x(), x())).unwrap().new_expr,
            Expr::boolean(false)
        );
        assert_eq!(
            ReflexiveRelationRule.apply(&Expr::less_or_equal(x(), x())).unwrap().new_expr,
            Expr::boolean(true)
        );
    }

    #[test]
    fn test_contradiction() {
        let e = Expr::and(Expr::less(x(), 1), Expr::greater(x(), 1));
        assert_eq!(
            ContradictoryInequalitiesRule.apply(&e).unwrap().new_expr,
            Expr::boolean(false)
        );
    }
}
