use crate::polynomial::solve_polynomial;
use crate::strategy::{SolveCtx, SolverStrategy};
use cas_ast::Expr;
use cas_engine::CasError;

/// `x = 0` after everything has been moved to one side.
pub struct IdentityStrategy;

impl SolverStrategy for IdentityStrategy {
    fn name(&self) -> &str {
        "Identity"
    }

    fn apply(&self, expr: &Expr, x: &Expr, _ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        (expr == x).then(|| Ok(Expr::finite_set([0])))
    }

    fn should_verify(&self) -> bool {
        false
    }
}

pub struct PolynomialStrategy;

impl SolverStrategy for PolynomialStrategy {
    fn name(&self) -> &str {
        "Polynomial"
    }

    fn apply(&self, expr: &Expr, x: &Expr, _ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        solve_polynomial(expr, x)
    }
}
