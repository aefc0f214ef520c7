//! Core solve dispatch pipeline.
//!
//! `solve_equation(expr, x)` solves `expr = 0` by trying each strategy in a
//! fixed order; the first one that applies without failing wins. Strategies
//! recurse into the cascade for sub-equations, bounded by
//! [`MAX_SOLVE_DEPTH`].

use crate::strategies::{
    CommonDenominatorStrategy, DecompositionStrategy, ExponentialStrategy, FractionedStrategy,
    IdentityStrategy, NewtonStrategy, PolynomialStrategy, SubstitutionStrategy,
    TrigonometricStrategy,
};
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, simplified};
use cas_ast::{settings, Expr};
use cas_engine::CasError;
use std::cell::RefCell;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Nesting limit for recursive solves. A branch that exceeds it yields the
/// empty set rather than an error.
pub const MAX_SOLVE_DEPTH: usize = 12;

thread_local! {
    static SOLVE_DEPTH: RefCell<usize> = const { RefCell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    /// Enter one level; the returned depth includes this call.
    fn enter() -> (DepthGuard, usize) {
        let depth = SOLVE_DEPTH.with(|d| {
            let mut depth = d.borrow_mut();
            *depth += 1;
            *depth
        });
        (DepthGuard, depth)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        SOLVE_DEPTH.with(|d| {
            let mut depth = d.borrow_mut();
            *depth = depth.saturating_sub(1);
        });
    }
}

fn strategies() -> &'static [Box<dyn SolverStrategy>] {
    static STRATEGIES: OnceLock<Vec<Box<dyn SolverStrategy>>> = OnceLock::new();
    STRATEGIES.get_or_init(|| {
        vec![
            Box::new(IdentityStrategy),
            Box::new(PolynomialStrategy),
            Box::new(DecompositionStrategy),
            Box::new(SubstitutionStrategy),
            Box::new(TrigonometricStrategy),
            Box::new(ExponentialStrategy),
            Box::new(CommonDenominatorStrategy),
            Box::new(FractionedStrategy),
            Box::new(NewtonStrategy),
        ]
    })
}

/// Solve `expr = 0` for the variable `var`.
pub fn solve_equation(expr: &Expr, var: &str) -> Result<Expr, CasError> {
    solve_with_ctx(expr, &Expr::var(var), &SolveCtx::default())
}

pub(crate) fn solve_with_ctx(expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Result<Expr, CasError> {
    let (_guard, depth) = DepthGuard::enter();
    if depth > MAX_SOLVE_DEPTH {
        debug!(%expr, depth, "solve depth exceeded, abandoning branch");
        return Ok(Expr::empty_set());
    }

    let expr = simplified(expr);
    debug!(%expr, %x, depth, compensate = ctx.compensate, "solving");

    for strategy in strategies() {
        match strategy.apply(&expr, x, ctx) {
            None => trace!(strategy = strategy.name(), "not applicable"),
            Some(Ok(set)) => {
                let set = if strategy.should_verify() {
                    verified(&expr, x, set)
                } else {
                    set
                };
                debug!(strategy = strategy.name(), %set, "solved");
                return Ok(set);
            }
            Some(Err(e)) if e.is_internal() => return Err(e),
            Some(Err(e)) => {
                debug!(strategy = strategy.name(), error = %e, "strategy failed, falling through");
            }
        }
    }
    debug!(%expr, "no strategy applied");
    Ok(Expr::empty_set())
}

/// Drop finite-set elements that provably fail `expr = 0`: the residual
/// evaluates to NaN or to a number away from zero. Symbolic elements stay.
fn verified(expr: &Expr, x: &Expr, set: Expr) -> Expr {
    let Some(fs) = set.as_finite_set() else {
        return set;
    };
    let tolerance = settings::with(|s| s.precision_error_common);
    let kept = fs.filter(|root| {
        if contains(root, x) {
            return true;
        }
        let Some(residual) = expr.substitute(x, root).eval_number() else {
            return true;
        };
        let scale = root.eval_number().map_or(1.0, |n| n.magnitude().max(1.0));
        let ok = !residual.is_nan() && residual.is_zero_within(tolerance * scale);
        if !ok {
            trace!(%root, %residual, "rejected by substitution");
        }
        ok
    });
    if kept.len() == fs.len() {
        set
    } else {
        Expr::from_finite(kept)
    }
}
