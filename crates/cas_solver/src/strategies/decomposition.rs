//! Structural decomposition of `expr = 0`.
//!
//! - `a * b = 0`: roots of either factor
//! - `a / b = 0`: roots of `a` minus the poles of `b`
//! - `base ^ p = 0`: roots of `base`
//! - `f(u) = 0`: inversion of the outer function
//! - `sub - c = 0` while compensating: inversion of `sub` around its one
//!   `x`-bearing child, then a recursive solve of that child

use crate::downcast::try_downcast;
use crate::invert::invert;
use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, simplified, split_constant};
use cas_ast::{Expr, FiniteSet, Node};
use cas_engine::CasError;
use tracing::debug;

pub struct DecompositionStrategy;

impl SolverStrategy for DecompositionStrategy {
    fn name(&self) -> &str {
        "Structural Decomposition"
    }

    fn apply(&self, expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        let plain = SolveCtx::default();
        match expr.node() {
            Node::Mul(a, b) => Some(both(a, b, x, &plain).map(|(sa, sb)| Expr::unite_sets(&sa, &sb))),
            Node::Div(a, b) => {
                Some(both(a, b, x, &plain).map(|(roots, poles)| Expr::subtract_sets(&roots, &poles)))
            }
            Node::Pow(base, _) if contains(base, x) => Some(solve_with_ctx(base, x, &plain)),
            Node::Func(..) | Node::Log(..) => Some(invert(expr, &Expr::int(0), x).map(|roots| {
                let set: FiniteSet = roots.iter().map(|r| try_downcast(expr, x, r)).collect();
                Expr::from_finite(set)
            })),
            _ if ctx.compensate => compensated(expr, x),
            _ => None,
        }
    }
}

fn both(a: &Expr, b: &Expr, x: &Expr, ctx: &SolveCtx) -> Result<(Expr, Expr), CasError> {
    Ok((solve_with_ctx(a, x, ctx)?, solve_with_ctx(b, x, ctx)?))
}

fn compensated(expr: &Expr, x: &Expr) -> Option<Result<Expr, CasError>> {
    let (sub, value) = split_constant(expr, x)?;
    if sub == *x {
        return Some(Ok(Expr::finite_set([value])));
    }

    if let Node::Piecewise(cases) = sub.node() {
        let mut acc = Expr::empty_set();
        for case in cases {
            let roots = match solve_with_ctx(&(&case.expr - &value), x, &SolveCtx::compensating()) {
                Ok(set) => set,
                Err(e) => return Some(Err(e)),
            };
            let admitted = match roots.as_finite_set() {
                Some(fs) => Expr::from_finite(fs.filter(|r| {
                    case.predicate.substitute(x, r).eval_bool() != Some(false)
                })),
                None => roots,
            };
            acc = Expr::unite_sets(&acc, &admitted);
        }
        return Some(Ok(acc));
    }

    let mut with_x = sub.children().into_iter().filter(|c| contains(c, x));
    let (Some(child), None) = (with_x.next(), with_x.next()) else {
        return None;
    };
    debug!(%sub, %value, %child, "compensated inversion");

    let images = match invert(&sub, &value, &child) {
        Ok(images) => images,
        Err(e) => return Some(Err(e)),
    };
    let mut acc = Expr::empty_set();
    for image in images {
        match solve_with_ctx(&(&child - &image), x, &SolveCtx::compensating()) {
            Ok(set) => acc = Expr::unite_sets(&acc, &set),
            Err(e) => return Some(Err(e)),
        }
    }
    Some(Ok(simplified(&acc)))
}
