use cas_ast::Expr;
use cas_engine::CasError;

/// Per-call solving context threaded through the cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveCtx {
    /// Set when solving `sub - c = 0` produced by back-substitution; enables
    /// inversion around `sub` and disables further substitution.
    pub compensate: bool,
}

impl SolveCtx {
    pub fn compensating() -> Self {
        SolveCtx { compensate: true }
    }
}

pub trait SolverStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Attempts to solve `expr = 0` for `x`.
    /// Returns:
    /// - None: Strategy does not apply to this equation.
    /// - Some(Ok(set)): Strategy applied and produced a solution set.
    /// - Some(Err(e)): Strategy applied but encountered an error.
    fn apply(&self, expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Option<Result<Expr, CasError>>;

    /// Whether finite results should be checked by substitution.
    /// Defaults to true. Override to false for strategies whose roots are exact by construction.
    fn should_verify(&self) -> bool {
        true
    }
}
