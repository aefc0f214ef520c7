use crate::downcast::try_downcast;
use crate::numeric::newton_roots;
use crate::strategy::{SolveCtx, SolverStrategy};
use cas_ast::{settings, Expr, FiniteSet, Number, Settings};
use cas_engine::CasError;
use tracing::debug;

/// Numeric fallback for single-variable equations, gated by
/// `allow_newton_fallback`. Roots are downcast to exact values when they
/// check out.
pub struct NewtonStrategy;

impl SolverStrategy for NewtonStrategy {
    fn name(&self) -> &str {
        "Newton"
    }

    fn apply(&self, expr: &Expr, x: &Expr, _ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        if !settings::with(|s| s.allow_newton_fallback) {
            return None;
        }
        let name = x.as_var()?;
        let free = expr.free_vars();
        if free.len() != 1 || !free.iter().all(|v| &**v == name) {
            return None;
        }

        let roots = newton_roots(expr, x);
        if roots.is_empty() {
            return None;
        }
        debug!(%expr, count = roots.len(), "newton roots");

        let numbers: Vec<Expr> = {
            let _raw = Settings::scoped(|s| s.downcasting_enabled = false);
            roots
                .into_iter()
                .map(|z| Expr::number(Number::from_complex64(z)))
                .collect()
        };
        let set: FiniteSet = numbers.iter().map(|r| try_downcast(expr, x, r)).collect();
        Some(Ok(Expr::from_finite(set)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_transcendental_root() {
        // x = cos(x) has a single real root near 0.739
        let e = x() - Expr::cos(x());
        let set = NewtonStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        let fs = set.as_finite_set().unwrap();
        assert!(
            fs.iter().any(|r| r
                .eval_number()
                .is_some_and(|n| n.approx_eq(&Number::float(0.7390851332151607), 1e-6))),
            "{}",
            set
        );
    }

    #[test]
    fn test_exact_roots_are_downcast() {
        let e = Expr::pow(x(), 3) - Expr::mul(2, x()) - 4;
        let set = NewtonStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        assert!(set.as_finite_set().unwrap().contains_key(&Expr::int(2)), "{}", set);
    }

    #[test]
    fn test_disabled_by_settings() {
        let _guard = Settings::scoped(|s| s.allow_newton_fallback = false);
        let e = x() - Expr::cos(x());
        assert!(NewtonStrategy.apply(&e, &x(), &SolveCtx::default()).is_none());
    }

    #[test]
    fn test_requires_a_single_variable() {
        let e = x() - Expr::cos(Expr::var("y"));
        assert!(NewtonStrategy.apply(&e, &x(), &SolveCtx::default()).is_none());
    }
}
