//! Trigonometric identities: exact values at rational multiples of pi, the
//! Pythagorean identity, inverse compositions and parity.

use crate::helpers::{as_func, as_neg, is_int, pi_multiple};
use crate::rule::Rewrite;
use cas_ast::{Expr, Func, Node, TargetKindSet};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::ToPrimitive;

fn half_sqrt(n: i64) -> Expr {
    Expr::mul(Expr::rational(1, 2), Expr::sqrt(Expr::int(n)))
}

/// `q * pi` as a multiple of `pi/12` reduced into `[0, 24)`.
fn twelfths(q: &BigRational) -> Option<i64> {
    let k = q * BigRational::from_integer(BigInt::from(12));
    if !k.is_integer() {
        return None;
    }
    k.to_integer().mod_floor(&BigInt::from(24)).to_i64()
}

/// `sin(k * pi / 12)` for the angles with a closed form.
fn sin_twelfths(k: i64) -> Option<Expr> {
    if k >= 12 {
        return sin_twelfths(k - 12).map(Expr::negate);
    }
    let value = match k {
        0 | 12 => Expr::int(0),
        2 | 10 => Expr::rational(1, 2),
        3 | 9 => half_sqrt(2),
        4 | 8 => half_sqrt(3),
        6 => Expr::int(1),
        _ => return None,
    };
    Some(value)
}

fn tan_twelfths(k: i64) -> Option<Expr> {
    let value = match k % 12 {
        0 => Expr::int(0),
        2 => Expr::mul(Expr::rational(1, 3), Expr::sqrt(Expr::int(3))),
        3 => Expr::int(1),
        4 => Expr::sqrt(Expr::int(3)),
        8 => Expr::negate(Expr::sqrt(Expr::int(3))),
        9 => Expr::int(-1),
        10 => Expr::mul(Expr::rational(-1, 3), Expr::sqrt(Expr::int(3))),
        _ => return None,
    };
    Some(value)
}

define_rule!(
    TrigExactValueRule,
    "Evaluate Trigonometric Functions",
    Some(TargetKindSet::FUNC),
    |expr| {
        let Node::Func(f, arg) = expr.node() else {
            return None;
        };
        let k = twelfths(&pi_multiple(arg)?)?;
        let value = match f {
            Func::Sin => sin_twelfths(k)?,
            Func::Cos => sin_twelfths((k + 6) % 24)?,
            Func::Tan => tan_twelfths(k)?,
            _ => return None,
        };
        Some(Rewrite::simple(value, format!("{}({}) exact value", f.name(), arg)))
    }
);

define_rule!(
    /// `sin(a)^2 + cos(a)^2 = 1` in either order.
    PythagoreanIdentityRule,
    "Pythagorean Identity",
    Some(TargetKindSet::SUM),
    |expr| {
        let Node::Sum(lhs, rhs) = expr.node() else {
            return None;
        };
        let squared = |e: &Expr, f: Func| match e.node() {
            Node::Pow(b, exp) if is_int(exp, 2) => as_func(b, f).cloned(),
            _ => None,
        };
        let matches = |a: &Expr, b: &Expr| match (squared(a, Func::Sin), squared(b, Func::Cos)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
        (matches(lhs, rhs) || matches(rhs, lhs))
            .then(|| Rewrite::simple(Expr::int(1), "sin²(x) + cos²(x) = 1"))
    }
);

define_rule!(
    InverseTrigCompositionRule,
    "Inverse Trig Composition",
    Some(TargetKindSet::FUNC),
    |expr| {
        let Node::Func(outer, arg) = expr.node() else {
            return None;
        };
        let inverse = match outer {
            Func::Sin => Func::Arcsin,
            Func::Cos => Func::Arccos,
            Func::Tan => Func::Arctan,
            Func::Cotan => Func::Arccotan,
            _ => return None,
        };
        let x = as_func(arg, inverse)?;
        Some(Rewrite::simple(
            x.clone(),
            format!("{}({}(x)) = x", outer.name(), inverse.name()),
        ))
    }
);

define_rule!(
    TrigParityRule,
    "Trig Parity",
    Some(TargetKindSet::FUNC),
    |expr| {
        let Node::Func(f, arg) = expr.node() else {
            return None;
        };
        let x = as_neg(arg)?;
        let result = match f {
            Func::Sin | Func::Tan | Func::Cotan | Func::Csc => Expr::negate(Expr::func(*f, x)),
            Func::Cos | Func::Sec => Expr::func(*f, x),
            _ => return None,
        };
        Some(Rewrite::simple(result, format!("{} parity", f.name())))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(TrigExactValueRule));
    simplifier.add_rule(Box::new(PythagoreanIdentityRule));
    simplifier.add_rule(Box::new(InverseTrigCompositionRule));
    simplifier.add_rule(Box::new(TrigParityRule));
}
