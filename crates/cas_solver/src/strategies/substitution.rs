use crate::downcast::try_downcast;
use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, minimum_subtree, simplified};
use cas_ast::symbol::create_temp;
use cas_ast::Expr;
use cas_engine::CasError;
use tracing::debug;

/// Replace the minimal subtree holding every `x` by a temporary `t`, solve
/// for `t`, then back-solve `subtree = t0` for each root.
pub struct SubstitutionStrategy;

impl SolverStrategy for SubstitutionStrategy {
    fn name(&self) -> &str {
        "Substitution"
    }

    fn apply(&self, expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        if ctx.compensate {
            return None;
        }
        if !contains(expr, x) {
            return Some(Ok(Expr::empty_set()));
        }
        let sub = minimum_subtree(expr, x);
        if sub == *x || sub == *expr {
            return None;
        }

        let t = create_temp([expr]);
        let reduced = expr.substitute(&sub, &t);
        if contains(&reduced, x) {
            return None;
        }
        debug!(%sub, %t, %reduced, "substituting minimal subtree");

        let inner = match solve_with_ctx(&reduced, &t, &SolveCtx::default()) {
            Ok(set) => set,
            Err(e) => return Some(Err(e)),
        };
        let roots = inner.as_finite_set().filter(|fs| !fs.is_empty())?;

        let mut acc = Expr::empty_set();
        for t0 in roots.iter() {
            match solve_with_ctx(&(&sub - t0), x, &SolveCtx::compensating()) {
                Ok(set) => acc = Expr::unite_sets(&acc, &set),
                Err(e) => return Some(Err(e)),
            }
        }
        let result = simplified(&acc);

        match result.as_finite_set() {
            Some(fs) if fs.is_empty() => None,
            Some(fs) => Some(Ok(Expr::from_finite(fs.map(|r| try_downcast(expr, x, r))))),
            None if result.is_empty_set() == Some(true) => None,
            None => Some(Ok(result)),
        }
    }
}
