//! Real inequalities `expr > 0` in one variable.
//!
//! The real roots and poles of `expr` cut the real line into open
//! intervals on which the sign is constant. Each interval is sign-tested at
//! an interior point and the satisfying ones are united. Anything that
//! cannot be decided this way (other free variables, symbolic roots,
//! infinite root families) comes back as a conditional set.

use crate::numeric::eval_at;
use crate::solve_core::solve_equation;
use crate::tree::{contains, simplified};
use cas_ast::{Domain, Expr, Node, Number};
use cas_engine::CasError;
use num_complex::Complex64;
use tracing::debug;

/// Imaginary parts below this count as real.
const REAL_TOLERANCE: f64 = 1e-9;

/// A point where the sign of the expression may change.
struct Cut {
    at: f64,
    exact: Expr,
}

/// Solve `expr > 0` for `var` over the reals.
pub fn solve_inequality(expr: &Expr, var: &str) -> Result<Expr, CasError> {
    let x = Expr::var(var);
    let expr = simplified(expr);
    let undecided = || Expr::conditional_set(var, Expr::greater(&expr, 0));

    if expr.free_vars().iter().any(|v| &**v != var) {
        return Ok(undecided());
    }
    if !contains(&expr, &x) {
        return Ok(match positive_at(&expr, &x, 0.0) {
            Some(true) => Expr::special_set(Domain::Real),
            Some(false) => Expr::empty_set(),
            None => undecided(),
        });
    }

    let mut cuts = Vec::new();
    let roots = solve_equation(&expr, var)?;
    if !collect_real(&roots, &mut cuts) {
        return Ok(undecided());
    }
    for den in denominators(&expr, &x) {
        let poles = solve_equation(&den, var)?;
        if !collect_real(&poles, &mut cuts) {
            return Ok(undecided());
        }
    }
    cuts.sort_by(|a, b| a.at.total_cmp(&b.at));
    cuts.dedup_by(|a, b| (a.at - b.at).abs() < REAL_TOLERANCE);
    debug!(%expr, cuts = cuts.len(), "sign partition");

    let mut edges = Vec::with_capacity(cuts.len() + 2);
    edges.push(Cut {
        at: f64::NEG_INFINITY,
        exact: Expr::number(Number::float(f64::NEG_INFINITY)),
    });
    edges.extend(cuts);
    edges.push(Cut {
        at: f64::INFINITY,
        exact: Expr::number(Number::float(f64::INFINITY)),
    });

    let mut out = Expr::empty_set();
    for pair in edges.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        let probe = match (lo.at.is_finite(), hi.at.is_finite()) {
            (true, true) => (lo.at + hi.at) / 2.0,
            (true, false) => lo.at + 1.0,
            (false, true) => hi.at - 1.0,
            (false, false) => 0.0,
        };
        match positive_at(&expr, &x, probe) {
            Some(true) => {
                let piece = Expr::interval(&lo.exact, false, &hi.exact, false);
                out = Expr::unite_sets(&out, &piece);
            }
            Some(false) => {}
            None => return Ok(undecided()),
        }
    }
    Ok(out)
}

/// Sign at a real point. Non-real values lie outside the real domain and
/// count as not positive; `None` when the expression cannot be evaluated.
fn positive_at(expr: &Expr, x: &Expr, at: f64) -> Option<bool> {
    let v = eval_at(expr, x, Complex64::new(at, 0.0))?;
    if v.re.is_nan() || v.im.is_nan() {
        return Some(false);
    }
    Some(v.im.abs() < REAL_TOLERANCE && v.re > 0.0)
}

/// Push the real numeric members of `set`; `false` when the set is not a
/// finite set of numbers.
fn collect_real(set: &Expr, cuts: &mut Vec<Cut>) -> bool {
    let Some(fs) = set.as_finite_set() else {
        return false;
    };
    for r in fs.iter() {
        let Some(n) = r.eval_number() else {
            return false;
        };
        let z = n.to_complex64();
        if z.im.abs() < REAL_TOLERANCE && z.re.is_finite() {
            cuts.push(Cut {
                at: z.re,
                exact: r.clone(),
            });
        }
    }
    true
}

/// Subexpressions that divide `expr` and depend on `x`.
fn denominators(expr: &Expr, x: &Expr) -> Vec<Expr> {
    let mut out: Vec<Expr> = Vec::new();
    for node in expr.nodes() {
        let den = match node.node() {
            Node::Div(_, d) if contains(d, x) => d.clone(),
            Node::Pow(b, p) if contains(b, x) && p.as_number().is_some_and(|n| n.is_negative()) => {
                b.clone()
            }
            _ => continue,
        };
        if !out.contains(&den) {
            out.push(den);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn member(set: &Expr, v: f64) -> Option<bool> {
        set.try_contains(&Expr::number(Number::float(v)))
    }

    #[test]
    fn test_quadratic_outside_roots() {
        // x^2 - 4 > 0
        let set = solve_inequality(&(Expr::pow(x(), 2) - 4), "x").unwrap();
        assert_eq!(member(&set, -3.0), Some(true));
        assert_eq!(member(&set, 0.0), Some(false));
        assert_eq!(member(&set, 2.0), Some(false));
        assert_eq!(member(&set, 2.5), Some(true));
    }

    #[test]
    fn test_pole_splits_the_line() {
        // 1/x > 0
        let set = solve_inequality(&Expr::div(1, x()), "x").unwrap();
        assert_eq!(member(&set, -1.0), Some(false));
        assert_eq!(member(&set, 0.0), Some(false));
        assert_eq!(member(&set, 0.5), Some(true));
    }

    #[test]
    fn test_no_cuts() {
        let set = solve_inequality(&(Expr::pow(x(), 2) + 1), "x").unwrap();
        assert_eq!(member(&set, -7.0), Some(true));
        assert_eq!(member(&set, 0.0), Some(true));
    }

    #[test]
    fn test_constant_statements() {
        assert_eq!(
            solve_inequality(&Expr::int(3), "x").unwrap(),
            Expr::special_set(Domain::Real)
        );
        assert_eq!(solve_inequality(&Expr::int(-3), "x").unwrap(), Expr::empty_set());
    }

    #[test]
    fn test_other_variables_stay_conditional() {
        let set = solve_inequality(&(x() - Expr::var("a")), "x").unwrap();
        assert!(matches!(
            set.as_set(),
            Some(cas_ast::SetNode::Conditional(_))
        ));
    }
}
