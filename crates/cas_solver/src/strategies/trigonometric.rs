//! Euler substitution for sines and cosines of linear arguments.
//!
//! With `t = e^(ix)`:
//!
//! ```text
//! sin(a x + b) = (t^a e^(ib) - t^(-a) e^(-ib)) / 2i
//! cos(a x + b) = (t^a e^(ib) + t^(-a) e^(-ib)) / 2
//! ```
//!
//! The algebraic equation in `t` is solved and every root `t0` maps back to
//! the family `x = -i ln(t0) + 2 pi n`.

use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, linear_coefficients, simplified};
use cas_ast::symbol::{create_temp, create_unique};
use cas_ast::{Expr, FiniteSet, Func, Node};
use cas_engine::CasError;
use tracing::debug;

pub struct TrigonometricStrategy;

impl SolverStrategy for TrigonometricStrategy {
    fn name(&self) -> &str {
        "Trigonometric to Exponential"
    }

    fn apply(&self, expr: &Expr, x: &Expr, _ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        let has_trig = expr.nodes().any(|n| {
            matches!(n.node(), Node::Func(Func::Sin | Func::Cos, arg) if contains(arg, x))
        });
        if !has_trig {
            return None;
        }

        let t = create_temp([expr]);
        let rewritten = expr.replace(|node| match node.node() {
            Node::Func(f @ (Func::Sin | Func::Cos), arg) if contains(arg, x) => {
                euler(*f, arg, x, &t).unwrap_or_else(|| node.clone())
            }
            _ => node.clone(),
        });
        if contains(&rewritten, x) {
            return None;
        }
        debug!(%expr, %rewritten, "euler substitution");

        let roots = match solve_with_ctx(&rewritten, &t, &SolveCtx::default()) {
            Ok(set) => set,
            Err(e) => return Some(Err(e)),
        };
        let roots = roots.as_finite_set()?;

        let n = create_unique(&(expr + &t), "n");
        let family: FiniteSet = roots
            .iter()
            .filter(|t0| !t0.is_zero() && t0.eval_number().map_or(true, |v| !v.is_zero()))
            .map(|t0| {
                let angle = Expr::negate(Expr::i()) * Expr::ln(t0);
                simplified(&(angle + Expr::mul(Expr::mul(2, Expr::pi()), &n)))
            })
            .collect();
        if family.is_empty() {
            return None;
        }
        Some(Ok(Expr::from_finite(family)))
    }
}

/// Exponential form of `f(arg)` when `arg = a x + b` with rational `a != 0`.
fn euler(f: Func, arg: &Expr, x: &Expr, t: &Expr) -> Option<Expr> {
    let (a, b) = linear_coefficients(arg, x)?;
    let a_num = a.as_number()?;
    if !a_num.is_rational() || a_num.is_zero() {
        return None;
    }
    let phase = |sign: i64| Expr::pow(Expr::e(), Expr::mul(Expr::mul(sign, Expr::i()), &b));
    let forward = Expr::mul(Expr::pow(t, &a), phase(1));
    let backward = Expr::mul(Expr::pow(t, Expr::negate(&a)), phase(-1));
    Some(match f {
        Func::Sin => Expr::div(forward - backward, Expr::mul(2, Expr::i())),
        _ => Expr::div(forward + backward, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_ast::Number;
    use std::f64::consts::PI;

    fn x() -> Expr {
        Expr::var("x")
    }

    /// Principal member of each family (`n_k := 0`), as real values.
    fn principal_values(set: &Expr) -> Vec<f64> {
        set.as_finite_set()
            .unwrap()
            .iter()
            .map(|r| {
                let mut at = r.clone();
                for name in r.free_vars() {
                    at = at.substitute(&Expr::var(&name), &Expr::int(0));
                }
                let v = at.eval_number().unwrap();
                assert!(v.im().is_zero_within(1e-9), "{} is not real", r);
                v.re().to_f64().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_euler_rewrites_linear_arguments() {
        let t = Expr::var("%1");
        let e = euler(Func::Cos, &Expr::mul(2, x()), &x(), &t).unwrap();
        assert!(!contains(&e, &x()));
        let at_one = e.substitute(&t, &Expr::int(1)).eval_number().unwrap();
        assert!(at_one.approx_eq(&Number::one(), 1e-12));
        assert!(euler(Func::Sin, &Expr::pow(x(), 2), &x(), &t).is_none());
    }

    #[test]
    fn test_sin_plus_cos() {
        let e = Expr::sin(x()) + Expr::cos(x()) - 1;
        let set = TrigonometricStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        let values = principal_values(&set);
        assert_eq!(values.len(), 2);
        for expected in [0.0, PI / 2.0] {
            assert!(
                values.iter().any(|v| (v - expected).abs() < 1e-9),
                "{} missing from {:?}",
                expected,
                values
            );
        }
    }

    #[test]
    fn test_not_applicable_without_trig() {
        let e = Expr::pow(x(), 2) - 1;
        assert!(TrigonometricStrategy.apply(&e, &x(), &SolveCtx::default()).is_none());
    }
}
