//! Shared tree helpers for the solver.

use cas_ast::{Expr, Node, Number};
use cas_engine::Simplifier;
use std::sync::OnceLock;

static SIMPLIFIER: OnceLock<Simplifier> = OnceLock::new();

/// The default-rule simplifier, built once per process.
pub fn simplifier() -> &'static Simplifier {
    SIMPLIFIER.get_or_init(Simplifier::with_default_rules)
}

pub fn simplified(e: &Expr) -> Expr {
    simplifier().simplify(e)
}

#[inline]
pub fn contains(e: &Expr, x: &Expr) -> bool {
    e.contains_node(x)
}

/// Smallest subtree that accounts for every occurrence of `x` in `expr`.
///
/// Walks the pre-order node sequence up to the first occurrence of `x` and
/// keeps the last candidate `s` for which
/// `count(expr, s) * count(s, x) == count(expr, x)`.
pub fn minimum_subtree(expr: &Expr, x: &Expr) -> Expr {
    let total = expr.count_occurrences(x);
    let mut best = x.clone();
    for node in expr.nodes() {
        if node == *x {
            break;
        }
        if !contains(&node, x) {
            continue;
        }
        if expr.count_occurrences(&node) * node.count_occurrences(x) == total {
            best = node;
        }
    }
    best
}

/// `(a, b)` with `e == a*x + b`, both free of `x`. `a` may be zero.
pub fn linear_coefficients(e: &Expr, x: &Expr) -> Option<(Expr, Expr)> {
    if !contains(e, x) {
        return Some((Expr::int(0), e.clone()));
    }
    if e == x {
        return Some((Expr::int(1), Expr::int(0)));
    }
    let combine = |l: &Expr, r: &Expr, sign: i64| {
        let (a1, b1) = linear_coefficients(l, x)?;
        let (a2, b2) = linear_coefficients(r, x)?;
        Some(if sign > 0 {
            (Expr::sum(a1, a2), Expr::sum(b1, b2))
        } else {
            (Expr::minus(a1, a2), Expr::minus(b1, b2))
        })
    };
    let (a, b) = match e.node() {
        Node::Sum(l, r) => combine(l, r, 1)?,
        Node::Minus(l, r) => combine(l, r, -1)?,
        Node::Mul(l, r) if !contains(l, x) => {
            let (a, b) = linear_coefficients(r, x)?;
            (Expr::mul(l, a), Expr::mul(l, b))
        }
        Node::Mul(l, r) if !contains(r, x) => {
            let (a, b) = linear_coefficients(l, x)?;
            (Expr::mul(a, r), Expr::mul(b, r))
        }
        Node::Div(l, r) if !contains(r, x) => {
            let (a, b) = linear_coefficients(l, x)?;
            (Expr::div(a, r), Expr::div(b, r))
        }
        _ => return None,
    };
    Some((simplified(&a), simplified(&b)))
}

/// Whether a numeric value is finite in both parts. Symbolic values pass.
pub fn is_finite_value(e: &Expr) -> bool {
    match e.eval_number() {
        Some(n) => is_finite_number(&n),
        None => true,
    }
}

pub fn is_finite_number(n: &Number) -> bool {
    let z = n.to_complex64();
    z.re.is_finite() && z.im.is_finite()
}

/// Split `sub - c`, `sub + c` and `c - sub` (with `c` free of `x`) into the
/// `x`-bearing side and the value it must equal.
pub fn split_constant(expr: &Expr, x: &Expr) -> Option<(Expr, Expr)> {
    match expr.node() {
        Node::Minus(sub, c) if contains(sub, x) && !contains(c, x) => Some((sub.clone(), c.clone())),
        Node::Minus(c, sub) if contains(sub, x) && !contains(c, x) => Some((sub.clone(), c.clone())),
        Node::Sum(sub, c) | Node::Sum(c, sub) if contains(sub, x) && !contains(c, x) => {
            Some((sub.clone(), simplified(&Expr::negate(c))))
        }
        _ => None,
    }
}
