//! # Helpers Module
//!
//! Shared predicates and destructuring helpers for rule files.
//!
//! ## Categories
//!
//! - **Numbers**: `num`, `is_int`, `numeric_coeff`
//! - **Destructuring**: `as_pow`, `as_func`, `as_neg`
//! - **Pi helpers**: `pi_multiple`

use cas_ast::{Expr, Func, Node, Number};
use num_rational::BigRational;
use num_traits::Zero;

/// The number a node holds, if it is a numeric leaf.
#[inline]
pub fn num(e: &Expr) -> Option<&Number> {
    e.as_number()
}

/// Whether `e` is the integer `n`.
pub fn is_int(e: &Expr, n: i64) -> bool {
    num(e).is_some_and(|x| x == &Number::int(n))
}

/// Whether `e` is a finite, non-zero real number.
pub fn is_nonzero_real(e: &Expr) -> bool {
    num(e).is_some_and(|n| n.is_finite_real() && !n.is_zero())
}

/// Split `k * t` into `(k, t)`; anything else is `(1, e)`.
pub fn numeric_coeff(e: &Expr) -> (Number, Expr) {
    if let Node::Mul(a, b) = e.node() {
        if let Some(k) = num(a) {
            return (k.clone(), b.clone());
        }
    }
    (Number::one(), e.clone())
}

/// Build `k * t`, collapsing the trivial coefficients.
pub fn with_coeff(k: Number, t: Expr) -> Expr {
    if k.is_one() {
        t
    } else if k.is_zero() {
        Expr::int(0)
    } else {
        Expr::mul(Expr::number(k), t)
    }
}

/// `(base, exponent)` of a power; anything else is `(e, 1)`.
pub fn as_pow(e: &Expr) -> (Expr, Expr) {
    match e.node() {
        Node::Pow(b, x) => (b.clone(), x.clone()),
        _ => (e.clone(), Expr::int(1)),
    }
}

/// `x` for `-1 * x`.
pub fn as_neg(e: &Expr) -> Option<&Expr> {
    match e.node() {
        Node::Mul(a, b) if is_int(a, -1) => Some(b),
        _ => None,
    }
}

pub fn as_func(e: &Expr, f: Func) -> Option<&Expr> {
    match e.node() {
        Node::Func(g, arg) if *g == f => Some(arg),
        _ => None,
    }
}

/// The rational `q` for which `e` is `q * pi`: `pi`, `k * pi`, `pi / k`,
/// `(k * pi) / m`, `k * (pi / m)`.
pub fn pi_multiple(e: &Expr) -> Option<BigRational> {
    let is_pi = |x: &Expr| x.as_constant() == Some(cas_ast::Constant::Pi);
    if is_pi(e) {
        return Some(BigRational::from_integer(1.into()));
    }
    if e.is_zero() {
        return Some(BigRational::zero());
    }
    match e.node() {
        Node::Mul(k, rest) => Some(num(k)?.to_ratio()? * pi_multiple(rest)?),
        Node::Div(n, d) => {
            let d = num(d)?.to_ratio()?;
            if d.is_zero() {
                return None;
            }
            Some(pi_multiple(n)? / d)
        }
        _ => None,
    }
}

/// Node count, used to prefer the simpler of two equal forms.
pub fn complexity(e: &Expr) -> usize {
    cas_ast::traversal::complexity(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_multiples() {
        let half = BigRational::new(1.into(), 2.into());
        assert_eq!(pi_multiple(&(Expr::pi() / 2)), Some(half));
        assert_eq!(
            pi_multiple(&(Expr::int(3) * Expr::pi())),
            Some(BigRational::from_integer(3.into()))
        );
        assert_eq!(pi_multiple(&Expr::var("x")), None);
    }

    #[test]
    fn coefficient_split() {
        let (k, t) = numeric_coeff(&(Expr::int(3) * Expr::var("x")));
        assert_eq!(k, Number::int(3));
        assert_eq!(t, Expr::var("x"));
        assert_eq!(with_coeff(Number::one(), t.clone()), t);
    }
}
