use crate::helpers::num;
use crate::rule::Rewrite;
use cas_ast::{Expr, Node, TargetKindSet};

define_rule!(
    PowOneRule,
    "Power of One",
    Some(TargetKindSet::POW),
    |expr| {
        match expr.node() {
            Node::Pow(base, exp) if exp.is_one() => Some(Rewrite::simple(base.clone(), "x^1 = x")),
            _ => None,
        }
    }
);

define_rule!(
    PowZeroRule,
    "Zero Exponent",
    Some(TargetKindSet::POW),
    |expr| {
        match expr.node() {
            Node::Pow(base, exp) if exp.is_zero() && !base.is_number() => {
                Some(Rewrite::simple(Expr::int(1), "x^0 = 1"))
            }
            _ => None,
        }
    }
);

define_rule!(
    OnePowRule,
    "One to Any Power",
    Some(TargetKindSet::POW),
    |expr| {
        match expr.node() {
            Node::Pow(base, exp) if base.is_one() && !exp.is_number() => {
                Some(Rewrite::simple(Expr::int(1), "1^x = 1"))
            }
            _ => None,
        }
    }
);

define_rule!(
    ZeroPowRule,
    "Zero to Positive Power",
    Some(TargetKindSet::POW),
    |expr| {
        let Node::Pow(base, exp) = expr.node() else {
            return None;
        };
        if base.is_zero() && num(exp).is_some_and(|n| n.is_positive()) {
            return Some(Rewrite::simple(Expr::int(0), "0^n = 0 for n > 0"));
        }
        None
    }
);

define_rule!(
    /// `(a^m)^n = a^(m*n)` for integer `n` and numeric `m`; a non-integer
    /// outer exponent would pick a different branch.
    PowerOfPowerRule,
    "Power of a Power",
    Some(TargetKindSet::POW),
    |expr| {
        let Node::Pow(inner, n) = expr.node() else {
            return None;
        };
        let Node::Pow(base, m) = inner.node() else {
            return None;
        };
        let n = num(n).filter(|n| n.is_integer())?;
        let m = num(m)?;
        Some(Rewrite::simple(
            Expr::pow(base, Expr::number(m * n)),
            "(a^m)^n = a^(m*n)",
        ))
    }
);

define_rule!(
    /// `(a*b)^n = a^n * b^n` when one factor is a number and `n` an integer.
    DistributeIntegerPowerRule,
    "Distribute Integer Power",
    Some(TargetKindSet::POW),
    |expr| {
        let Node::Pow(inner, n) = expr.node() else {
            return None;
        };
        let Node::Mul(a, b) = inner.node() else {
            return None;
        };
        num(n).filter(|n| n.is_integer())?;
        if !a.is_number() {
            return None;
        }
        Some(Rewrite::simple(
            Expr::mul(Expr::pow(a, n), Expr::pow(b, n)),
            "(k*a)^n = k^n * a^n",
        ))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(PowOneRule));
    simplifier.add_rule(Box::new(PowZeroRule));
    simplifier.add_rule(Box::new(OnePowRule));
    simplifier.add_rule(Box::new(ZeroPowRule));
    simplifier.add_rule(Box::new(PowerOfPowerRule));
    simplifier.add_rule(Box::new(DistributeIntegerPowerRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_trivial_exponents() {
        assert_eq!(PowOneRule.apply(&Expr::pow(x(), 1)).unwrap().new_expr, x());
        assert_eq!(PowZeroRule.apply(&Expr::pow(x(), 0)).unwrap().new_expr, Expr::int(1));
        assert_eq!(OnePowRule.apply(&Expr::pow(1, x())).unwrap().new_expr, Expr::int(1));
        assert_eq!(ZeroPowRule.apply(&Expr::pow(0, 3)).unwrap().new_expr, Expr::int(0));
        assert!(ZeroPowRule.apply(&Expr::pow(0, -1)).is_none());
    }

    #[test]
    fn test_power_of_power() {
        let e = Expr::pow(Expr::pow(x(), 2), 3);
        assert_eq!(PowerOfPowerRule.apply(&e).unwrap().new_expr, Expr::pow(x(), 6));
        // sqrt(x^2) is |x|, not x
        let e = Expr::pow(Expr::pow(x(), 2), Expr::rational(1, 2));
        assert!(PowerOfPowerRule.apply(&e).is_none());
    }
}
