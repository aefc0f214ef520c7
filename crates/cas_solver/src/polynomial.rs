//! Closed-form polynomial roots.
//!
//! An expression is read as `sum c_k * x^k` with coefficients free of `x`
//! (products and integer powers are expanded up to
//! `Settings::max_expansion_terms`). Before dispatching on the degree:
//!
//! - a common factor `x^m` contributes the root `0` and is divided out,
//! - the GCD `g` of the remaining powers is factored out by solving in
//!   `y = x^g` and recovering `x` through the `g`-th roots of unity.
//!
//! Degrees up to 4 are solved by formula (quadratic, Cardano, Ferrari);
//! two-term polynomials of any degree are solved by inversion.

use crate::downcast::try_downcast;
use crate::invert::{invert, MAX_ROOTS_OF_UNITY};
use crate::tree::{contains, simplified};
use cas_ast::{settings, Expr, FiniteSet, Node, Number};
use cas_engine::CasError;
use num_integer::Integer;
use std::collections::BTreeMap;
use tracing::debug;

/// Power of `x` to its coefficient.
pub type Coeffs = BTreeMap<i64, Expr>;

/// Evaluated magnitude below which an intermediate counts as zero.
const NEAR_ZERO: f64 = 1e-10;

/// Coefficients of `e` as a polynomial in `x`, or `None` when `e` is not
/// one (or expanding it would exceed `cap` terms).
pub fn coefficients(e: &Expr, x: &Expr, cap: usize) -> Option<Coeffs> {
    if !contains(e, x) {
        return Some(Coeffs::from([(0, e.clone())]));
    }
    if e == x {
        return Some(Coeffs::from([(1, Expr::int(1))]));
    }
    match e.node() {
        Node::Sum(a, b) => Some(merge(coefficients(a, x, cap)?, coefficients(b, x, cap)?, false)),
        Node::Minus(a, b) => Some(merge(coefficients(a, x, cap)?, coefficients(b, x, cap)?, true)),
        Node::Mul(a, b) => convolve(&coefficients(a, x, cap)?, &coefficients(b, x, cap)?, cap),
        Node::Div(a, b) => {
            let num = coefficients(a, x, cap)?;
            if !contains(b, x) {
                return Some(num.into_iter().map(|(p, c)| (p, Expr::div(c, b))).collect());
            }
            // only a monomial denominator keeps the result polynomial
            let den = coefficients(b, x, cap)?;
            let mut den = den.into_iter();
            let ((q, d), None) = (den.next()?, den.next()) else {
                return None;
            };
            Some(num.into_iter().map(|(p, c)| (p - q, Expr::div(c, &d))).collect())
        }
        Node::Pow(base, exp) => {
            let n = exp.as_number().filter(|n| n.is_integer())?.to_i64()?;
            let base = coefficients(base, x, cap)?;
            if n >= 0 {
                let span = base.keys().map(|p| p.unsigned_abs()).max().unwrap_or(0);
                if span.saturating_mul(n.unsigned_abs()) > cap as u64 {
                    return None;
                }
                let mut acc = Coeffs::from([(0, Expr::int(1))]);
                for _ in 0..n {
                    acc = convolve(&acc, &base, cap)?;
                }
                Some(acc)
            } else {
                let mut terms = base.into_iter();
                let ((p, c), None) = (terms.next()?, terms.next()) else {
                    return None;
                };
                Some(Coeffs::from([(p.checked_mul(n)?, Expr::pow(c, n))]))
            }
        }
        _ => None,
    }
}

fn merge(mut a: Coeffs, b: Coeffs, subtract: bool) -> Coeffs {
    for (p, c) in b {
        let entry = a.remove(&p);
        let combined = match (entry, subtract) {
            (Some(prev), false) => Expr::sum(prev, c),
            (Some(prev), true) => Expr::minus(prev, c),
            (None, false) => c,
            (None, true) => Expr::negate(c),
        };
        a.insert(p, combined);
    }
    a
}

fn convolve(a: &Coeffs, b: &Coeffs, cap: usize) -> Option<Coeffs> {
    if a.len().saturating_mul(b.len()) > cap {
        return None;
    }
    let mut out = Coeffs::new();
    for (p, c) in a {
        for (q, d) in b {
            let term = Expr::mul(c, d);
            let power = p.checked_add(*q)?;
            let next = match out.remove(&power) {
                Some(prev) => Expr::sum(prev, term),
                None => term,
            };
            out.insert(power, next);
        }
    }
    Some(out.into_iter().map(|(p, c)| (p, simplified(&c))).collect())
}

/// Coefficients simplified, zero ones dropped.
fn normalized(raw: Coeffs) -> Coeffs {
    raw.into_iter()
        .map(|(p, c)| (p, simplified(&c)))
        .filter(|(_, c)| !c.is_zero())
        .collect()
}

/// Roots of `expr = 0` read as a polynomial in `x`.
///
/// `None` when `expr` is not a polynomial in `x` or its degree has no
/// closed form here.
pub fn solve_polynomial(expr: &Expr, x: &Expr) -> Option<Result<Expr, CasError>> {
    let cap = settings::with(|s| s.max_expansion_terms);
    let coeffs = normalized(coefficients(expr, x, cap)?);
    let (&min, _) = coeffs.first_key_value()?;

    let gcd = coeffs.keys().fold(0i64, |g, &p| g.gcd(&(p - min)));
    let g = if gcd == 0 { 1 } else { gcd };
    let reduced: Coeffs = coeffs.into_iter().map(|(p, c)| ((p - min) / g, c)).collect();
    let degree = reduced.keys().next_back().copied().unwrap_or(0);
    debug!(%expr, degree, power_gcd = g, zero_root = min > 0, "polynomial form");

    if reduced.len() > 2 && degree > 4 {
        return None;
    }
    let g = u32::try_from(g).ok().filter(|&g| g <= MAX_ROOTS_OF_UNITY)?;

    let y = Expr::var("%y");
    let c = |k: i64| reduced.get(&k).cloned().unwrap_or_else(|| Expr::int(0));
    let base_roots = if degree == 0 {
        Ok(Vec::new())
    } else if reduced.len() == 2 {
        let value = Expr::negate(Expr::div(c(0), c(degree)));
        invert(&Expr::pow(&y, degree), &value, &y)
    } else {
        match degree {
            2 => Ok(quadratic(c(2), c(1), c(0))),
            3 => Ok(cubic(c(3), c(2), c(1), c(0))),
            4 => Ok(quartic(c(4), c(3), c(2), c(1), c(0))),
            _ => return None,
        }
    };
    let base_roots = match base_roots {
        Ok(roots) => roots,
        Err(e) => return Some(Err(e)),
    };

    let mut roots = Vec::new();
    for r in base_roots {
        if g == 1 {
            roots.push(r);
            continue;
        }
        let principal = Expr::pow(&r, Expr::rational(1, i64::from(g)));
        for unit in Number::roots_of_unity(g) {
            roots.push(Expr::mul(Expr::number(unit), &principal));
        }
    }
    if min > 0 {
        roots.push(Expr::int(0));
    }
    let set: FiniteSet = roots
        .iter()
        .map(|r| try_downcast(expr, x, &simplified(r)))
        .collect();
    Some(Ok(Expr::from_finite(set)))
}

fn near_zero(e: &Expr) -> bool {
    e.is_zero() || e.eval_number().is_some_and(|n| n.is_zero_within(NEAR_ZERO))
}

fn cbrt(e: &Expr) -> Expr {
    simplified(&Expr::pow(e, Expr::rational(1, 3)))
}

fn sqrt(e: &Expr) -> Expr {
    simplified(&Expr::sqrt(e))
}

fn sq(e: &Expr) -> Expr {
    Expr::pow(e, 2)
}

/// `a x^2 + b x + c`.
pub fn quadratic(a: Expr, b: Expr, c: Expr) -> Vec<Expr> {
    if a.is_zero() {
        return linear(&b, &c);
    }
    if c.is_zero() {
        let mut roots = linear(&a, &b);
        roots.push(Expr::int(0));
        return roots;
    }
    let d = sqrt(&simplified(&(sq(&b) - Expr::int(4) * &a * &c)));
    let two_a = Expr::mul(2, &a);
    vec![
        (-&b - &d) / &two_a,
        (-&b + &d) / &two_a,
    ]
}

fn linear(a: &Expr, b: &Expr) -> Vec<Expr> {
    if a.is_zero() {
        return Vec::new();
    }
    vec![Expr::negate(Expr::div(b, a))]
}

/// `a x^3 + b x^2 + c x + d` by Cardano's formula.
pub fn cubic(a: Expr, b: Expr, c: Expr, d: Expr) -> Vec<Expr> {
    let d0 = simplified(&(sq(&b) - Expr::int(3) * &a * &c));
    let d1 = simplified(
        &(Expr::int(2) * Expr::pow(&b, 3) - Expr::int(9) * &a * &b * &c
            + Expr::int(27) * sq(&a) * &d),
    );
    let disc = sqrt(&simplified(&(sq(&d1) - Expr::int(4) * Expr::pow(&d0, 3))));
    let mut big_c = cbrt(&simplified(&((&d1 + &disc) / 2)));
    if near_zero(&big_c) {
        big_c = cbrt(&simplified(&((&d1 - &disc) / 2)));
    }
    if near_zero(&big_c) && near_zero(&d0) {
        return vec![Expr::negate(Expr::div(&b, Expr::mul(3, &a)))];
    }
    let sqrt3 = Expr::sqrt(3);
    let units = [
        Expr::int(1),
        (Expr::int(-1) + Expr::i() * &sqrt3) / 2,
        (Expr::int(-1) - Expr::i() * &sqrt3) / 2,
    ];
    units
        .iter()
        .map(|u| {
            let uc = u * &big_c;
            Expr::negate((&b + &uc + &d0 / &uc) / (Expr::int(3) * &a))
        })
        .collect()
}

/// `a x^4 + b x^3 + c x^2 + d x + e` by Ferrari's method.
pub fn quartic(a: Expr, b: Expr, c: Expr, d: Expr, e: Expr) -> Vec<Expr> {
    let alpha = simplified(&(Expr::int(-3) * sq(&b) / (Expr::int(8) * sq(&a)) + &c / &a));
    let beta = simplified(
        &(Expr::pow(&b, 3) / (Expr::int(8) * Expr::pow(&a, 3))
            - &b * &c / (Expr::int(2) * sq(&a))
            + &d / &a),
    );
    let gamma = simplified(
        &(Expr::int(-3) * Expr::pow(&b, 4) / (Expr::int(256) * Expr::pow(&a, 4))
            + &c * sq(&b) / (Expr::int(16) * Expr::pow(&a, 3))
            - &b * &d / (Expr::int(4) * sq(&a))
            + &e / &a),
    );
    let shift = simplified(&Expr::negate(Expr::div(&b, Expr::mul(4, &a))));
    let signs = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

    if near_zero(&beta) {
        // biquadratic in the depressed variable
        let inner = sqrt(&simplified(&(sq(&alpha) - Expr::int(4) * &gamma)));
        return signs
            .iter()
            .map(|&(s, t)| {
                let half = (-&alpha + Expr::int(s) * &inner) / 2;
                &shift + Expr::int(t) * Expr::sqrt(half)
            })
            .collect();
    }

    let p = simplified(&(-sq(&alpha) / 12 - &gamma));
    let q = simplified(
        &(-Expr::pow(&alpha, 3) / 108 + &alpha * &gamma / 3 - sq(&beta) / 8),
    );
    let r = simplified(&(-&q / 2 + Expr::sqrt(sq(&q) / 4 + Expr::pow(&p, 3) / 27)));
    let u = cbrt(&r);
    let five_sixths_alpha = Expr::rational(-5, 6) * &alpha;
    let y = if near_zero(&u) {
        simplified(&(five_sixths_alpha - cbrt(&q)))
    } else {
        simplified(&(five_sixths_alpha + &u - &p / (Expr::int(3) * &u)))
    };
    let w = sqrt(&simplified(&(&alpha + Expr::int(2) * &y)));
    signs
        .iter()
        .map(|&(s, t)| {
            let radicand = -(Expr::int(3) * &alpha
                + Expr::int(2) * &y
                + Expr::int(2 * s) * &beta / &w);
            &shift + (Expr::int(s) * &w + Expr::int(t) * Expr::sqrt(radicand)) / 2
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn solve(e: &Expr) -> Expr {
        solve_polynomial(e, &x()).unwrap().unwrap()
    }

    fn assert_roots_satisfy(e: &Expr, set: &Expr, expected: usize) {
        let fs = set.as_finite_set().unwrap();
        assert_eq!(fs.len(), expected, "{} has roots {}", e, set);
        for r in fs.iter() {
            let residual = e.substitute(&x(), r).eval_number().unwrap();
            assert!(residual.is_zero_within(1e-6), "{} at {} = {}", e, r, residual);
        }
    }

    #[test]
    fn test_coefficients_expand_products() {
        let e = (x() + 1) * (x() - 1);
        let c = normalized(coefficients(&e, &x(), 100).unwrap());
        assert_eq!(c.get(&2), Some(&Expr::int(1)));
        assert_eq!(c.get(&0), Some(&Expr::int(-1)));
        assert!(c.get(&1).is_none());
    }

    #[test]
    fn test_not_a_polynomial() {
        assert!(coefficients(&Expr::sin(x()), &x(), 100).is_none());
        assert!(coefficients(&Expr::pow(x(), Expr::rational(1, 2)), &x(), 100).is_none());
        assert!(solve_polynomial(&(Expr::int(1) / (x() + 1)), &x()).is_none());
    }

    #[test]
    fn test_expansion_cap() {
        let e = Expr::pow(x() + 1, 50);
        assert!(coefficients(&e, &x(), 20).is_none());
    }

    #[test]
    fn test_linear() {
        assert_eq!(solve(&(x() + 3)), Expr::finite_set([-3]));
    }

    #[test]
    fn test_quadratic() {
        let e = Expr::pow(x(), 2) - Expr::mul(5, x()) + 6;
        assert_eq!(solve(&e), Expr::finite_set([2, 3]));
    }

    #[test]
    fn test_common_power_adds_zero_root() {
        let e = Expr::pow(x(), 3) - x();
        assert_eq!(solve(&e), Expr::finite_set([0, 1, -1]));
    }

    #[test]
    fn test_power_gcd_uses_roots_of_unity() {
        let e = Expr::pow(x(), 4) - Expr::mul(5, Expr::pow(x(), 2)) + 4;
        assert_eq!(solve(&e), Expr::finite_set([1, -1, 2, -2]));
    }

    #[test]
    fn test_cubic_downcasts_to_exact_roots() {
        let e = Expr::pow(x(), 3) - Expr::mul(6, Expr::pow(x(), 2)) + Expr::mul(11, x()) - 6;
        assert_eq!(solve(&e), Expr::finite_set([1, 2, 3]));
    }

    #[test]
    fn test_quartic_roots() {
        let e = (x() - 1) * (x() - 2) * (x() - 3) * (x() + 5);
        assert_roots_satisfy(&e, &solve(&e), 4);
        let biquadratic = (x() - 1) * (x() - 2) * (x() - 3) * (x() - 4);
        assert_roots_satisfy(&biquadratic, &solve(&biquadratic), 4);
    }

    #[test]
    fn test_two_term_high_degree() {
        let e = Expr::pow(x(), 6) - 64;
        assert_roots_satisfy(&e, &solve(&e), 6);
    }

    #[test]
    fn test_nonzero_constant_has_no_roots() {
        assert_eq!(solve(&Expr::int(5)), Expr::empty_set());
    }
}
