//! Exponential rewrites.
//!
//! Linear form: every `base^(a x + b)` with `base` free of `x` becomes
//! `base^b * E^(a ln(base))` where `E = e^x`. Roots `E0` give `x = ln(E0)`.
//!
//! Multiplicative form: `x^p` terms with a common step `m` become `T^(p/m)`
//! where `T = x^m`. Roots `T0` are inverted through `x^m`.

use crate::invert::invert;
use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, linear_coefficients, simplified};
use cas_ast::symbol::create_temp;
use cas_ast::{Expr, FiniteSet, Node, Number};
use cas_engine::CasError;
use std::cmp::Ordering;
use tracing::debug;

pub struct ExponentialStrategy;

impl SolverStrategy for ExponentialStrategy {
    fn name(&self) -> &str {
        "Exponential"
    }

    fn apply(&self, expr: &Expr, x: &Expr, _ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        linear_form(expr, x).or_else(|| multiplicative_form(expr, x))
    }
}

fn linear_form(expr: &Expr, x: &Expr) -> Option<Result<Expr, CasError>> {
    let e_var = create_temp([expr]);
    let mut rewrote = false;
    let rewritten = expr.replace(|node| match node.node() {
        Node::Pow(base, exponent) if !contains(base, x) && contains(exponent, x) => {
            match linear_coefficients(exponent, x) {
                Some((a, b)) if !a.is_zero() && !contains(&a, x) => {
                    rewrote = true;
                    Expr::mul(
                        Expr::pow(base, b),
                        Expr::pow(&e_var, Expr::mul(Expr::ln(base), a)),
                    )
                }
                _ => node.clone(),
            }
        }
        _ => node.clone(),
    });
    if !rewrote || contains(&rewritten, x) {
        return None;
    }
    let rewritten = simplified(&rewritten);
    debug!(%expr, %rewritten, "exponential linear form");

    let roots = match solve_with_ctx(&rewritten, &e_var, &SolveCtx::default()) {
        Ok(set) => set,
        Err(e) => return Some(Err(e)),
    };
    let roots = roots.as_finite_set()?;
    let out: FiniteSet = roots
        .iter()
        .filter(|e0| e0.eval_number().map_or(true, |v| !v.is_zero()))
        .map(|e0| simplified(&Expr::ln(e0)))
        .collect();
    if out.is_empty() {
        return None;
    }
    Some(Ok(Expr::from_finite(out)))
}

fn multiplicative_form(expr: &Expr, x: &Expr) -> Option<Result<Expr, CasError>> {
    let mut exponents: Vec<Expr> = Vec::new();
    let mut powered = 0;
    for node in expr.nodes() {
        if let Node::Pow(base, p) = node.node() {
            if base == x && !contains(p, x) {
                powered += 1;
                if !exponents.contains(p) {
                    exponents.push(p.clone());
                }
            }
        }
    }
    if exponents.is_empty() {
        return None;
    }
    if expr.count_occurrences(x) > powered && !exponents.iter().any(Expr::is_one) {
        exponents.push(Expr::int(1));
    }
    let step = common_step(&exponents)?;

    let t = create_temp([expr]);
    let mut reduced = expr.clone();
    for p in &exponents {
        let target = Expr::pow(x, p);
        let power = simplified(&Expr::div(p, &step));
        reduced = reduced.substitute(&target, &Expr::pow(&t, power));
    }
    reduced = reduced.substitute(x, &Expr::pow(&t, simplified(&Expr::div(1, &step))));
    if contains(&reduced, x) {
        return None;
    }
    let reduced = simplified(&reduced);
    debug!(%expr, %step, %reduced, "exponential multiplicative form");

    let roots = match solve_with_ctx(&reduced, &t, &SolveCtx::default()) {
        Ok(set) => set,
        Err(e) => return Some(Err(e)),
    };
    let roots = roots.as_finite_set()?;
    let stepped = Expr::pow(x, &step);
    let mut out = FiniteSet::empty();
    for t0 in roots.iter() {
        match invert(&stepped, t0, x) {
            Ok(images) => out = out.unite(&images.into_iter().collect()),
            Err(e) => return Some(Err(e)),
        }
    }
    if out.is_empty() {
        return None;
    }
    Some(Ok(Expr::from_finite(out)))
}

/// The exponent every power is an integer multiple of: the smallest one for
/// rational exponents, or the single shared symbolic exponent. `None` when
/// the rewrite would leave nothing to gain.
fn common_step(exponents: &[Expr]) -> Option<Expr> {
    if exponents.iter().all(Expr::is_one) {
        return None;
    }
    let numbers: Option<Vec<&Number>> = exponents
        .iter()
        .map(|p| p.as_number().filter(|n| n.is_rational()))
        .collect();
    match numbers {
        Some(numbers) => {
            let smallest = numbers
                .into_iter()
                .filter(|n| n.is_positive())
                .min_by(|a, b| a.cmp_real(b).unwrap_or(Ordering::Equal))?;
            (!smallest.is_one() || exponents.iter().any(|p| p.as_number().is_some_and(|n| !n.is_integer())))
                .then(|| Expr::number(smallest.clone()))
        }
        None => {
            let first = &exponents[0];
            exponents.iter().all(|p| p == first).then(|| first.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn approx_members(set: &Expr) -> Vec<Number> {
        set.as_finite_set()
            .unwrap()
            .iter()
            .map(|r| r.eval_number().unwrap())
            .collect()
    }

    #[test]
    fn test_linear_exponent() {
        // 2^(x+1) = 8
        let e = Expr::pow(2, x() + 1) - 8;
        let set = ExponentialStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        let members = approx_members(&set);
        assert!(members.iter().any(|n| n.approx_eq(&Number::int(2), 1e-9)), "{}", set);
    }

    #[test]
    fn test_fractional_powers() {
        // x^(1/2) + x^(1/4) - 2 with T = x^(1/4)
        let e = Expr::pow(x(), Expr::rational(1, 2)) + Expr::pow(x(), Expr::rational(1, 4)) - 2;
        let set = ExponentialStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        let fs = set.as_finite_set().unwrap();
        assert!(fs.contains_key(&Expr::int(1)), "{}", set);
        assert!(fs.contains_key(&Expr::int(16)), "{}", set);
    }

    #[test]
    fn test_common_step() {
        let half = Expr::rational(1, 2);
        assert_eq!(common_step(&[half.clone(), Expr::int(1)]), Some(half));
        assert_eq!(common_step(&[Expr::int(1)]), None);
        assert_eq!(common_step(&[Expr::int(2), Expr::int(1)]), None);
        let a = Expr::var("a");
        assert_eq!(common_step(&[a.clone()]), Some(a.clone()));
        assert_eq!(common_step(&[a, Expr::int(2)]), None);
    }
}
