//! Numeric evaluation.
//!
//! [`Expr::evaled`] folds everything that can be folded, including `pi`,
//! `e` and inexact function values. [`Expr::inner_simplified`] folds only
//! what stays exact, so `2^(1/2)` and `sin(1)` keep their symbolic form.
//! Both results are memoized on the node.
//!
//! A node whose folded number falls outside its codomain evaluates to NaN.

use crate::builtin::Constant;
use crate::cache;
use crate::expression::{Case, Expr, LogicOp, Node, RelOp, SetNode};
use crate::number::Number;
use crate::settings;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exact,
    Full,
}

impl Expr {
    /// Fully evaluated form.
    pub fn evaled(&self) -> Expr {
        memoized(self, self.evaled_cell(), Mode::Full)
    }

    /// Exact-only evaluated form.
    pub fn inner_simplified(&self) -> Expr {
        memoized(self, self.inner_simplified_cell(), Mode::Exact)
    }

    /// The evaluated number, if evaluation reaches one.
    pub fn eval_number(&self) -> Option<Number> {
        self.evaled().as_number().cloned()
    }

    /// The evaluated truth value, if evaluation reaches one.
    pub fn eval_bool(&self) -> Option<bool> {
        self.evaled().as_bool()
    }

    pub fn is_nan(&self) -> bool {
        self.as_number().is_some_and(Number::is_nan)
    }
}

fn memoized(e: &Expr, cell: &OnceLock<Option<Expr>>, mode: Mode) -> Expr {
    if let Some(cached) = cell.get() {
        return cached.clone().unwrap_or_else(|| e.clone());
    }
    let value = evaluate(e, mode);
    let stored = (!value.ptr_eq(e)).then(|| value.clone());
    let _ = cell.set(stored);
    value
}

fn eval_child(e: &Expr, mode: Mode) -> Expr {
    match mode {
        Mode::Full => e.evaled(),
        Mode::Exact => e.inner_simplified(),
    }
}

/// Keep an inexact result only when an input was already inexact.
fn accept(mode: Mode, result: Number, inputs: &[&Number]) -> Option<Number> {
    let ok = mode == Mode::Full
        || result.is_exact()
        || result.is_nan()
        || inputs.iter().any(|n| !n.is_exact());
    ok.then_some(result)
}

fn admit(e: &Expr, n: Number) -> Expr {
    if e.codomain().admits(&n) {
        Expr::number(n)
    } else {
        Expr::nan()
    }
}

fn evaluate(e: &Expr, mode: Mode) -> Expr {
    match e.node() {
        Node::Number(_) | Node::Boolean(_) => e.clone(),
        Node::Variable(name) => match (mode, Constant::from_name(name)) {
            (Mode::Full, Some(c)) => {
                Expr::number(cache::constant(c, settings::current().decimal_precision))
            }
            _ => e.clone(),
        },
        Node::Sum(a, b) => arithmetic(e, a, b, mode, |x, y| x + y),
        Node::Minus(a, b) => arithmetic(e, a, b, mode, |x, y| x - y),
        Node::Mul(a, b) => arithmetic(e, a, b, mode, |x, y| x * y),
        Node::Div(a, b) => arithmetic(e, a, b, mode, |x, y| x / y),
        Node::Pow(a, b) => arithmetic(e, a, b, mode, Number::pow),
        Node::Log(base, arg) => arithmetic(e, base, arg, mode, |b, x| x.log(b)),
        Node::Func(f, arg) => {
            let a = eval_child(arg, mode);
            match a.as_number() {
                Some(n) if n.is_nan() => Expr::nan(),
                Some(n) => match accept(mode, f.apply(n), &[n]) {
                    Some(r) => admit(e, r),
                    None => e.with_children(&[a.clone()]),
                },
                None => e.with_children(&[a]),
            }
        }
        Node::Derivative { .. }
        | Node::Integral { .. }
        | Node::Limit { .. }
        | Node::Tensor(_)
        | Node::Lambda(..) => e.map_children(|c| eval_child(c, mode)),
        Node::Not(a) => {
            let a = eval_child(a, mode);
            match a.as_bool() {
                Some(b) => Expr::boolean(!b),
                None => e.with_children(&[a]),
            }
        }
        Node::Logic(op, a, b) => {
            let (a, b) = (eval_child(a, mode), eval_child(b, mode));
            match (a.as_bool(), b.as_bool()) {
                (Some(x), Some(y)) => Expr::boolean(op.eval(x, y)),
                (Some(x), None) | (None, Some(x)) => match (op, x) {
                    (LogicOp::And, false) => Expr::boolean(false),
                    (LogicOp::Or, true) => Expr::boolean(true),
                    _ => implies_shortcut(e, *op, &a, &b),
                },
                _ => e.with_children(&[a, b]),
            }
        }
        Node::Relation(op, a, b) => {
            let (a, b) = (eval_child(a, mode), eval_child(b, mode));
            match compare(*op, &a, &b) {
                Some(v) => Expr::boolean(v),
                None => e.with_children(&[a, b]),
            }
        }
        Node::In(elem, set) => {
            let (elem, set) = (eval_child(elem, mode), eval_child(set, mode));
            match set.try_contains(&elem) {
                Some(v) => Expr::boolean(v),
                None => e.with_children(&[elem, set]),
            }
        }
        Node::Set(_) => {
            let rebuilt = e.map_children(|c| eval_child(c, mode));
            match rebuilt.as_set() {
                Some(s @ (SetNode::Union(_) | SetNode::Intersection(_) | SetNode::SetMinus(_))) => {
                    match s.as_finite() {
                        Some(fs) => Expr::from_finite(fs.clone()),
                        None => rebuilt,
                    }
                }
                _ => rebuilt,
            }
        }
        Node::Piecewise(cases) => piecewise(e, cases, mode),
        Node::Provided(expr, pred) => {
            let p = eval_child(pred, mode);
            match p.as_bool() {
                Some(true) => eval_child(expr, mode),
                Some(false) => Expr::nan(),
                None => e.with_children(&[eval_child(expr, mode), p]),
            }
        }
        Node::Application(f, arg) => {
            let (f, arg) = (eval_child(f, mode), eval_child(arg, mode));
            match f.node() {
                Node::Lambda(param, body) => {
                    eval_child(&body.substitute(&Expr::var(param), &arg), mode)
                }
                _ => e.with_children(&[f, arg]),
            }
        }
    }
}

fn arithmetic(
    e: &Expr,
    a: &Expr,
    b: &Expr,
    mode: Mode,
    op: impl Fn(&Number, &Number) -> Number,
) -> Expr {
    let (a, b) = (eval_child(a, mode), eval_child(b, mode));
    if a.is_nan() || b.is_nan() {
        return Expr::nan();
    }
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        if let Some(r) = accept(mode, op(x, y), &[x, y]) {
            return admit(e, r);
        }
    }
    e.with_children(&[a, b])
}

fn implies_shortcut(e: &Expr, op: LogicOp, a: &Expr, b: &Expr) -> Expr {
    if op == LogicOp::Implies && (a.as_bool() == Some(false) || b.as_bool() == Some(true)) {
        return Expr::boolean(true);
    }
    e.with_children(&[a.clone(), b.clone()])
}

fn compare(op: RelOp, a: &Expr, b: &Expr) -> Option<bool> {
    match (a.node(), b.node()) {
        (Node::Number(x), Node::Number(y)) => {
            if x.is_nan() || y.is_nan() {
                return Some(false);
            }
            if op == RelOp::Equals {
                if x.is_exact() && y.is_exact() {
                    return Some(x == y);
                }
                return Some(x.approx_eq(y, settings::current().zero_error_tolerance));
            }
            Some(op.holds(x.cmp_real(y)?))
        }
        (Node::Boolean(x), Node::Boolean(y)) if op == RelOp::Equals => Some(x == y),
        (Node::Set(_), Node::Set(_)) if op == RelOp::Equals => {
            let x = a.as_set()?.as_finite()?;
            let y = b.as_set()?.as_finite()?;
            Some(x == y)
        }
        _ => None,
    }
}

fn piecewise(e: &Expr, cases: &[Case], mode: Mode) -> Expr {
    let mut kept: Vec<Case> = Vec::new();
    for case in cases {
        let predicate = eval_child(&case.predicate, mode);
        match predicate.as_bool() {
            Some(false) => continue,
            Some(true) if kept.is_empty() => return eval_child(&case.expr, mode),
            _ => kept.push(Case {
                expr: eval_child(&case.expr, mode),
                predicate,
            }),
        }
    }
    if kept.is_empty() {
        return Expr::nan();
    }
    let children: Vec<Expr> = kept
        .iter()
        .flat_map(|c| [c.expr.clone(), c.predicate.clone()])
        .collect();
    if kept.len() == cases.len() {
        return e.with_children(&children);
    }
    Expr::piecewise(kept).with_codomain(e.codomain())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn exact_arithmetic_folds() {
        let e = Expr::rational(1, 3) + Expr::rational(1, 6);
        assert_eq!(e.evaled(), Expr::rational(1, 2));
        assert_eq!(e.inner_simplified(), Expr::rational(1, 2));
    }

    #[test]
    fn inner_simplified_keeps_irrational_forms() {
        let root = Expr::sqrt(2);
        assert_eq!(root.inner_simplified(), root);
        assert!(root.evaled().as_number().is_some());
        let half_pi = Expr::pi() / 2;
        assert_eq!(half_pi.inner_simplified(), half_pi);
    }

    #[test]
    fn constants_under_full_evaluation() {
        let s = Expr::sin(Expr::pi() / 2);
        assert_eq!(s.evaled(), Expr::int(1));
    }

    #[test]
    fn symbolic_parts_survive() {
        let e = Expr::var("x") + (Expr::int(2) * 3);
        assert_eq!(e.evaled(), Expr::var("x") + 6);
    }

    #[test]
    fn leaving_the_codomain_gives_nan() {
        let e = Expr::sqrt(-4).with_codomain(Domain::Real);
        assert!(e.evaled().is_nan());
        assert!(!Expr::sqrt(-4).evaled().is_nan());
    }

    #[test]
    fn relations_and_logic() {
        assert_eq!(Expr::less(1, 2).eval_bool(), Some(true));
        assert_eq!(Expr::and(Expr::less(2, 1), Expr::var("p")).eval_bool(), Some(false));
        assert_eq!(Expr::equals(Expr::rational(2, 4), Expr::rational(1, 2)).eval_bool(), Some(true));
        assert_eq!(Expr::less(Expr::i(), 2).eval_bool(), None);
    }

    #[test]
    fn piecewise_selects_first_true_case() {
        let x = Expr::int(-3);
        let abs = Expr::piecewise(vec![
            Case {
                expr: x.clone(),
                predicate: Expr::greater_or_equal(&x, 0),
            },
            Case {
                expr: -&x,
                predicate: Expr::boolean(true),
            },
        ]);
        assert_eq!(abs.evaled(), Expr::int(3));
    }

    #[test]
    fn provided_false_is_nan() {
        let e = Expr::provided(5, Expr::less(3, 1));
        assert!(e.evaled().is_nan());
    }

    #[test]
    fn application_of_lambda() {
        let f = Expr::lambda("t", Expr::var("t") * Expr::var("t"));
        assert_eq!(Expr::apply(f, 7).evaled(), Expr::int(49));
    }
}
