//! Statements as solution sets.
//!
//! Relations go to the equation and inequality solvers; boolean connectives
//! combine the operand sets over the complex universe.

use crate::inequality::solve_inequality;
use crate::invert::invert;
use crate::solve_core::solve_equation;
use crate::tree::{contains, simplified};
use cas_ast::{Domain, Expr, FiniteSet, LogicOp, Node, RelOp};
use cas_engine::CasError;
use tracing::debug;

fn universe() -> Expr {
    Expr::special_set(Domain::Complex)
}

/// Values of `var` for which `statement` holds.
///
/// # Errors
///
/// Propagates inversion failures such as unsupported boolean connectives
/// under an `=`.
pub fn solve(statement: &Expr, var: &str) -> Result<Expr, CasError> {
    let x = Expr::var(var);
    let set = match statement.node() {
        Node::Boolean(true) => universe(),
        Node::Boolean(false) => Expr::empty_set(),
        Node::Variable(_) if *statement == x => Expr::finite_set([Expr::boolean(true)]),
        _ if !contains(statement, &x) => match statement.eval_bool() {
            Some(true) => universe(),
            Some(false) => Expr::empty_set(),
            None => Expr::conditional_set(var, statement),
        },

        Node::Relation(RelOp::Equals, a, b) => equality(a, b, &x, var)?,
        Node::Relation(op, a, b) => relation(*op, a, b, var)?,

        Node::Not(a) => Expr::subtract_sets(&universe(), &solve(a, var)?),
        Node::Logic(op, a, b) => {
            let (sa, sb) = (solve(a, var)?, solve(b, var)?);
            match op {
                LogicOp::And => Expr::intersect_sets(&sa, &sb),
                LogicOp::Or => Expr::unite_sets(&sa, &sb),
                LogicOp::Xor => Expr::unite_sets(
                    &Expr::subtract_sets(&sa, &sb),
                    &Expr::subtract_sets(&sb, &sa),
                ),
                LogicOp::Implies => {
                    Expr::unite_sets(&Expr::subtract_sets(&universe(), &sa), &sb)
                }
            }
        }

        Node::In(element, set) if *element == x => set.clone(),
        Node::In(element, set) if !contains(set, &x) => match set.as_finite_set() {
            Some(members) => {
                let mut acc = Expr::empty_set();
                for m in members.iter() {
                    acc = Expr::unite_sets(&acc, &solve_equation(&(element - m), var)?);
                }
                acc
            }
            None => Expr::conditional_set(var, statement),
        },

        _ => {
            debug!(%statement, "statement kind has no solver");
            Expr::empty_set()
        }
    };
    Ok(simplified(&set))
}

fn equality(a: &Expr, b: &Expr, x: &Expr, var: &str) -> Result<Expr, CasError> {
    if a.is_set() || b.is_set() {
        let (side, value) = if contains(a, x) { (a, b) } else { (b, a) };
        let roots: FiniteSet = invert(side, value, x)?.into_iter().collect();
        return Ok(Expr::from_finite(roots));
    }
    solve_equation(&(a - b), var)
}

/// Real-valued relations; non-strict ones add the real boundary roots.
fn relation(op: RelOp, a: &Expr, b: &Expr, var: &str) -> Result<Expr, CasError> {
    let diff = match op {
        RelOp::Greater | RelOp::GreaterOrEqual => a - b,
        _ => b - a,
    };
    let strict = solve_inequality(&diff, var)?;
    if op.is_strict() {
        return Ok(strict);
    }
    let boundary = real_boundary(solve_equation(&diff, var)?, &diff);
    Ok(Expr::unite_sets(&strict, &boundary))
}

/// Keep the roots of `diff = 0` that can be real. Indices introduced by the
/// solver (absent from `diff`) are sampled at 0; a root that still does not
/// evaluate depends on a free parameter and is kept.
fn real_boundary(roots: Expr, diff: &Expr) -> Expr {
    let Some(fs) = roots.as_finite_set() else {
        return roots;
    };
    let params = diff.free_vars();
    Expr::from_finite(fs.filter(|root| {
        let sample = root
            .free_vars()
            .into_iter()
            .filter(|v| !params.contains(v))
            .fold(root.clone(), |acc, v| acc.substitute(&Expr::var(&v), &Expr::int(0)));
        sample
            .eval_number()
            .map_or(true, |n| n.im().is_zero_within(1e-9))
    }))
}
