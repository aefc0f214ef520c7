//! Node inversion.
//!
//! `invert(n, v, x)` lists expressions `r` such that `n[x := r]` evaluates
//! to `v`. Each node kind isolates the single child that contains `x` by
//! applying the inverse operation to `v` and recursing into that child.
//! Periodic and branch ambiguity is carried by freshly minted indexed
//! variables (`n_1`, `r_1`, ...).
//!
//! The target `x` may be any subtree, not only a variable: compensated
//! solving inverts a node around one of its direct children.

use crate::tree::{contains, is_finite_value, simplified};
use cas_ast::symbol::create_unique;
use cas_ast::{AstError, Case, Domain, Expr, Func, Node, Number, SetNode};
use cas_engine::CasError;
use std::f64::consts::PI;
use tracing::trace;

/// Above this degree, `x^n = v` yields only the principal root.
pub(crate) const MAX_ROOTS_OF_UNITY: u32 = 32;

/// All `r` with `node[target := r] == value`, dropping non-finite candidates.
pub fn invert(node: &Expr, value: &Expr, target: &Expr) -> Result<Vec<Expr>, CasError> {
    let value = simplified(value);
    if node == target {
        return Ok(vec![value]);
    }
    let candidates = invert_node(node, &value, target)?;
    Ok(candidates
        .into_iter()
        .filter(|c| {
            let keep = is_finite_value(c);
            trace!(node = %node, candidate = %c, keep, "inversion candidate");
            keep
        })
        .collect())
}

fn invert_node(node: &Expr, value: &Expr, x: &Expr) -> Result<Vec<Expr>, CasError> {
    let v = value;
    match node.node() {
        Node::Number(_) | Node::Boolean(_) => Err(AstError::InternalError(format!(
            "cannot invert the constant {} for {}",
            node, x
        ))
        .into()),
        Node::Variable(_) => Ok(Vec::new()),

        Node::Sum(a, b) => {
            if contains(a, x) {
                invert(a, &(v - b), x)
            } else {
                invert(b, &(v - a), x)
            }
        }
        Node::Minus(a, b) => {
            if contains(a, x) {
                invert(a, &(v + b), x)
            } else {
                invert(b, &(a - v), x)
            }
        }
        Node::Mul(a, b) => {
            if contains(a, x) {
                invert(a, &(v / b), x)
            } else {
                invert(b, &(v / a), x)
            }
        }
        Node::Div(a, b) => {
            if contains(a, x) {
                invert(a, &(v * b), x)
            } else {
                invert(b, &(a / v), x)
            }
        }
        Node::Pow(base, exp) => invert_pow(base, exp, v, x),
        Node::Func(f, arg) => invert_func(node, *f, arg, v, x),
        Node::Log(base, arg) => {
            if contains(base, x) {
                invert(base, &Expr::pow(arg, Expr::div(1, v)), x)
            } else {
                invert(arg, &Expr::pow(base, v), x)
            }
        }

        Node::Derivative { expr, var, order } => {
            if !contains(expr, x) {
                return Ok(Vec::new());
            }
            invert(expr, &Expr::integral(v, var, *order), x)
        }
        Node::Integral { expr, var, order } => {
            if !contains(expr, x) {
                return Ok(Vec::new());
            }
            invert(expr, &Expr::derivative(v, var, *order), x)
        }
        Node::Limit { .. } => Ok(Vec::new()),

        Node::Not(a) => invert(a, &Expr::not(v), x),
        Node::Logic(op, ..) => Err(CasError::not_supported(
            format!("inverting '{}'", op.symbol()),
            "1.2",
        )),
        Node::Relation(op, ..) => Err(CasError::not_supported(
            format!("inverting the relation '{}'", op.symbol()),
            "1.2",
        )),
        Node::In(..) => Err(CasError::not_supported("inverting set membership", "1.2")),

        Node::Set(set) => invert_set(node, set, v, x),
        Node::Tensor(_) => Ok(Vec::new()),

        Node::Piecewise(cases) => invert_piecewise(cases, v, x),
        Node::Provided(expr, predicate) => Ok(invert(expr, v, x)?
            .into_iter()
            .map(|r| Expr::provided(&r, guard_at(predicate, x, &r)))
            .collect()),
        Node::Application(..) | Node::Lambda(..) => Ok(Vec::new()),
    }
}

/// A guard on `x` restated for the candidate `r`.
fn guard_at(predicate: &Expr, x: &Expr, r: &Expr) -> Expr {
    if x.as_var().is_some() {
        predicate.substitute(x, r)
    } else {
        predicate.clone()
    }
}

fn invert_pow(base: &Expr, exp: &Expr, v: &Expr, x: &Expr) -> Result<Vec<Expr>, CasError> {
    if !contains(base, x) {
        return invert(exp, &Expr::log(base, v), x);
    }
    let degree = exp
        .as_number()
        .filter(|n| n.is_integer() && n.is_positive())
        .and_then(Number::to_i64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n <= MAX_ROOTS_OF_UNITY);
    match degree {
        Some(n) => {
            let principal = Expr::pow(v, Expr::rational(1, i64::from(n)));
            let mut out = Vec::new();
            for unit in Number::roots_of_unity(n) {
                out.extend(invert(base, &Expr::mul(Expr::number(unit), &principal), x)?);
            }
            Ok(out)
        }
        None => invert(base, &Expr::pow(v, Expr::div(1, exp)), x),
    }
}

/// Real numeric value outside `[-1, 1]`.
fn outside_unit_range(v: &Expr) -> bool {
    v.eval_number()
        .filter(Number::is_real)
        .and_then(|n| n.to_f64().ok())
        .is_some_and(|f| f.abs() > 1.0)
}

/// Whether `v` lies in `[lo, hi]`; unevaluable values count as inside.
fn real_part_within(v: &Expr, lo: f64, hi: f64) -> bool {
    match v.eval_number().and_then(|n| n.re().to_f64().ok()) {
        Some(re) => re >= lo - 1e-12 && re <= hi + 1e-12,
        None => true,
    }
}

fn period(multiple: i64, n: &Expr) -> Expr {
    Expr::mul(Expr::mul(multiple, Expr::pi()), n)
}

fn invert_func(node: &Expr, f: Func, arg: &Expr, v: &Expr, x: &Expr) -> Result<Vec<Expr>, CasError> {
    let fresh = |prefix: &str| create_unique(&(node + v), prefix);
    let branches: Vec<Expr> = match f {
        Func::Sin => {
            if outside_unit_range(v) {
                return Ok(Vec::new());
            }
            let n = fresh("n");
            let asin = Expr::func(Func::Arcsin, v);
            vec![
                &asin + period(2, &n),
                Expr::pi() - &asin + period(2, &n),
            ]
        }
        Func::Cos => {
            if outside_unit_range(v) {
                return Ok(Vec::new());
            }
            let n = fresh("n");
            let acos = Expr::func(Func::Arccos, v);
            vec![&acos + period(2, &n), -&acos + period(2, &n)]
        }
        Func::Tan => vec![Expr::func(Func::Arctan, v) + period(1, &fresh("n"))],
        Func::Cotan => vec![Expr::func(Func::Arccotan, v) + period(1, &fresh("n"))],
        Func::Sec => return invert_func(node, Func::Cos, arg, &simplified(&Expr::div(1, v)), x),
        Func::Csc => return invert_func(node, Func::Sin, arg, &simplified(&Expr::div(1, v)), x),

        Func::Arcsin | Func::Arctan | Func::Arccotan => {
            if !real_part_within(v, -PI / 2.0, PI / 2.0) {
                return Ok(Vec::new());
            }
            let forward = match f {
                Func::Arcsin => Func::Sin,
                Func::Arctan => Func::Tan,
                _ => Func::Cotan,
            };
            vec![Expr::func(forward, v)]
        }
        Func::Arccos => {
            if !real_part_within(v, 0.0, PI) {
                return Ok(Vec::new());
            }
            vec![Expr::cos(v)]
        }
        Func::Arcsec => vec![Expr::func(Func::Sec, v)],
        Func::Arccsc => vec![Expr::func(Func::Csc, v)],

        Func::Abs => {
            let r = fresh("r");
            let rotated = Expr::mul(v, Expr::pow(Expr::e(), Expr::mul(Expr::i(), &r)));
            let real_r = Expr::in_set(&r, Expr::special_set(Domain::Real));
            return Ok(invert(arg, &rotated, x)?
                .into_iter()
                .map(|c| Expr::provided(c, &real_r))
                .collect());
        }
        Func::Signum => {
            let r = fresh("r");
            let positive_r = Expr::greater(&r, 0);
            return Ok(invert(arg, &Expr::mul(v, &r), x)?
                .into_iter()
                .map(|c| Expr::provided(c, &positive_r))
                .collect());
        }
        Func::Factorial => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for branch in branches {
        out.extend(invert(arg, &branch, x)?);
    }
    Ok(out)
}

fn invert_set(node: &Expr, set: &SetNode, v: &Expr, x: &Expr) -> Result<Vec<Expr>, CasError> {
    match set {
        SetNode::Finite(_) | SetNode::Conditional(_) | SetNode::Interval(_) => Ok(Vec::new()),
        SetNode::Special(_) => Ok(vec![node.clone()]),
        SetNode::Union(pair) => {
            let (with_x, other) = if contains(pair.left(), x) {
                (pair.left(), pair.right())
            } else {
                (pair.right(), pair.left())
            };
            let (Some(target), Some(known)) = (v.as_finite_set(), other.as_finite_set()) else {
                return invert(with_x, &Expr::subtract_sets(v, other), x);
            };
            match (known.is_subset_of(v), known.power_set()) {
                (Some(false), _) => Ok(Vec::new()),
                (Some(true), Some(subsets)) => {
                    // the x side must cover what `known` misses and may
                    // overlap any part of `known`
                    let rest = target.subtract(known);
                    let mut out = Vec::new();
                    for overlap in subsets {
                        out.extend(invert(with_x, &Expr::from_finite(rest.unite(overlap)), x)?);
                    }
                    Ok(out)
                }
                _ => invert(with_x, &Expr::subtract_sets(v, other), x),
            }
        }
        SetNode::Intersection(_) => Err(CasError::not_supported("inverting an intersection", "1.3")),
        SetNode::SetMinus(_) => Err(CasError::not_supported("inverting a set difference", "1.3")),
    }
}

/// Each case contributes its roots guarded by its own predicate and by the
/// failure of every earlier predicate.
fn invert_piecewise(cases: &[Case], v: &Expr, x: &Expr) -> Result<Vec<Expr>, CasError> {
    let mut earlier_failed = Expr::boolean(true);
    let mut out = Vec::new();
    for case in cases {
        let guard = simplified(&Expr::and(&case.predicate, &earlier_failed));
        for r in invert(&case.expr, v, x)? {
            let at_r = simplified(&guard_at(&guard, x, &r));
            if at_r.as_bool() == Some(false) {
                continue;
            }
            out.push(Expr::provided(&r, at_r));
        }
        earlier_failed = Expr::and(earlier_failed, Expr::not(&case.predicate));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn at_zero(e: &Expr) -> Expr {
        let mut out = e.clone();
        for name in e.free_vars() {
            if name.starts_with("n_") {
                out = out.substitute(&Expr::var(&name), &Expr::int(0));
            }
        }
        out
    }

    #[test]
    fn test_linear_inversion() {
        let e = Expr::mul(2, x()) + 3;
        let roots = invert(&e, &Expr::int(7), &x()).unwrap();
        assert_eq!(roots, vec![Expr::int(2)]);
    }

    #[test]
    fn test_square_has_two_roots() {
        let roots = invert(&Expr::pow(x(), 2), &Expr::int(9), &x()).unwrap();
        assert_eq!(roots.len(), 2);
        for r in &roots {
            let back = Expr::pow(r, 2).eval_number().unwrap();
            assert!(back.approx_eq(&Number::int(9), 1e-9));
        }
    }

    #[test]
    fn test_exponent_inversion_uses_log() {
        let roots = invert(&Expr::pow(2, x()), &Expr::int(8), &x()).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].eval_number().unwrap().approx_eq(&Number::int(3), 1e-9));
    }

    #[test]
    fn test_sine_family() {
        let roots = invert(&Expr::sin(x()), &Expr::int(1), &x()).unwrap();
        assert_eq!(roots.len(), 2);
        let half_pi = Number::real(PI / 2.0);
        for r in &roots {
            let v = at_zero(r).eval_number().unwrap();
            assert!(v.approx_eq(&half_pi, 1e-9), "{} is not pi/2", r);
        }
    }

    #[test]
    fn test_sine_out_of_range_has_no_roots() {
        assert!(invert(&Expr::sin(x()), &Expr::int(-2), &x()).unwrap().is_empty());
        assert!(invert(&Expr::cos(x()), &Expr::int(3), &x()).unwrap().is_empty());
    }

    #[test]
    fn test_arcsin_out_of_branch() {
        let e = Expr::func(Func::Arcsin, x());
        assert!(invert(&e, &Expr::int(4), &x()).unwrap().is_empty());
        assert_eq!(invert(&e, &Expr::int(0), &x()).unwrap().len(), 1);
    }

    #[test]
    fn test_log_in_argument() {
        let roots = invert(&Expr::log(2, x()), &Expr::int(5), &x()).unwrap();
        assert_eq!(roots, vec![Expr::int(32)]);
    }

    #[test]
    fn test_not_supported_connectives() {
        let e = Expr::and(x(), true);
        let err = invert(&e, &Expr::boolean(true), &x()).unwrap_err();
        assert!(matches!(err, CasError::NotSupported { milestone: "1.2", .. }));
    }

    #[test]
    fn test_constant_is_internal_error() {
        let err = invert_node(&Expr::int(3), &Expr::int(1), &x()).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_factorial_has_no_inverse() {
        let e = Expr::func(Func::Factorial, x());
        assert!(invert(&e, &Expr::int(6), &x()).unwrap().is_empty());
    }

    #[test]
    fn test_inverts_around_a_subtree() {
        let s = Expr::sin(x());
        let e = Expr::mul(3, &s);
        assert_eq!(invert(&e, &Expr::int(3), &s).unwrap(), vec![Expr::int(1)]);
    }

    #[test]
    fn test_union_enumerates_overlaps() {
        let e = Expr::union(x(), Expr::finite_set([1]));
        let v = Expr::finite_set([1, 2]);
        let roots = invert(&e, &v, &x()).unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&Expr::finite_set([2])));
        assert!(roots.contains(&Expr::finite_set([1, 2])));

        let not_covered = Expr::finite_set([2]);
        assert!(invert(&e, &not_covered, &x()).unwrap().is_empty());
    }

    #[test]
    fn test_abs_is_guarded_by_real_rotation() {
        let roots = invert(&Expr::func(Func::Abs, x()), &Expr::int(2), &x()).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(matches!(roots[0].node(), Node::Provided(..)));
    }
}
