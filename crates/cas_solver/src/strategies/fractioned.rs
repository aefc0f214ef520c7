//! Radical elimination.
//!
//! Splits `expr` into `normal + mult * prod main_i^(1/q_i)` where each
//! `main_i^(p_i/q_i)` is a fractional power of an `x`-dependent base. With
//! `L = lcm(q_i)` the radicals clear by raising both sides to `L`:
//!
//! ```text
//! normal^L - (-mult)^L * prod main_i^(L/q_i) = 0
//! ```
//!
//! The cleared equation may gain roots; the caller's verification removes
//! them.

use super::{factors_of, product_of, Factor};
use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, simplified};
use cas_ast::Expr;
use cas_engine::nary::{AddView, Sign};
use cas_engine::CasError;
use num_integer::Integer;
use num_traits::ToPrimitive;
use tracing::debug;

pub struct FractionedStrategy;

/// `main^(1/q)` with `main = base^p`.
#[derive(Debug, Clone, PartialEq)]
struct Radical {
    main: Expr,
    q: i64,
}

impl SolverStrategy for FractionedStrategy {
    fn name(&self) -> &str {
        "Fractioned Powers"
    }

    fn apply(&self, expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        let mut normal = AddView { terms: Default::default() };
        let mut shape: Option<Vec<Radical>> = None;
        let mut multipliers = Vec::new();

        for (term, sign) in AddView::from_expr(expr).terms {
            let (radicals, rest) = split_radicals(&term, x)?;
            if radicals.is_empty() {
                normal.terms.push((term, sign));
                continue;
            }
            match &shape {
                Some(existing) if *existing != radicals => return None,
                Some(_) => {}
                None => shape = Some(radicals),
            }
            let rest = product_of(rest);
            multipliers.push(match sign {
                Sign::Pos => rest,
                Sign::Neg => Expr::negate(rest),
            });
        }
        let radicals = shape?;

        let l = radicals.iter().fold(1i64, |acc, r| acc.lcm(&r.q));
        let mult = multipliers
            .into_iter()
            .reduce(|acc, m| Expr::sum(acc, m))
            .unwrap_or_else(|| Expr::int(0));
        let cleared_radicals = radicals
            .iter()
            .map(|r| Expr::pow(&r.main, l / r.q))
            .reduce(|acc, f| Expr::mul(acc, f))
            .unwrap_or_else(|| Expr::int(1));
        let cleared = Expr::pow(normal.rebuild(), l)
            - Expr::mul(Expr::pow(Expr::negate(mult), l), cleared_radicals);
        let cleared = simplified(&cleared);
        if cleared == *expr {
            return None;
        }
        debug!(%expr, lcm = l, %cleared, "raised radicals");
        Some(solve_with_ctx(&cleared, x, ctx))
    }
}

/// Fractional powers of `x`-dependent bases in `term`, sorted by structural
/// hash, and the remaining factors. `None` when an `x`-dependent base carries
/// an exponent that is not an exact rational.
fn split_radicals(term: &Expr, x: &Expr) -> Option<(Vec<Radical>, Vec<Factor>)> {
    let mut radicals = Vec::new();
    let mut rest = Vec::new();
    for factor in factors_of(term) {
        if !contains(&factor.base, x) || factor.exponent.is_integer() {
            rest.push(factor);
            continue;
        }
        if !factor.exponent.is_rational() {
            return None;
        }
        let ratio = factor.exponent.to_ratio()?;
        let p = ratio.numer().to_i64()?;
        let q = ratio.denom().to_i64()?;
        let main = if p == 1 {
            factor.base
        } else {
            Expr::pow(factor.base, p)
        };
        radicals.push(Radical { main, q });
    }
    radicals.sort_by_key(|r| (r.main.structural_hash(), r.q));
    Some((radicals, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve_equation;
    use cas_ast::Number;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_split_radicals() {
        let e = Expr::mul(3, Expr::sqrt(x() + 1));
        let (radicals, rest) = split_radicals(&e, &x()).unwrap();
        assert_eq!(
            radicals,
            vec![Radical {
                main: x() + 1,
                q: 2
            }]
        );
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_float_exponent_is_not_a_radical() {
        let e = Expr::pow(x(), Expr::number(Number::float(0.3)));
        assert!(split_radicals(&e, &x()).is_none());
        let eq = &e - 2;
        assert!(FractionedStrategy.apply(&eq, &x(), &SolveCtx::default()).is_none());
    }

    #[test]
    fn test_square_root_equation_keeps_candidates() {
        // sqrt(x) = x - 2  =>  x^2 - 5x + 4 = 0
        let e = Expr::sqrt(x()) - x() + 2;
        let set = FractionedStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        assert_eq!(set, Expr::finite_set([1, 4]));
    }

    #[test]
    fn test_extraneous_root_dropped_by_full_solve() {
        let e = Expr::sqrt(x()) - x() + 2;
        assert_eq!(solve_equation(&e, "x").unwrap(), Expr::finite_set([4]));
    }

    #[test]
    fn test_mismatched_radicals_not_applicable() {
        let e = Expr::sqrt(x()) + Expr::pow(x() + 1, Expr::rational(1, 3)) - 1;
        assert!(FractionedStrategy.apply(&e, &x(), &SolveCtx::default()).is_none());
    }
}
