//! Machine-precision complex evaluation and the Newton root finder.

use cas_ast::settings::{self, NewtonSettings};
use cas_ast::{Expr, Func, Node};
use num_complex::Complex64;

/// Two roots closer than this are the same root.
const DEDUP_DISTANCE: f64 = 1e-4;

/// Evaluate `e` with `x := at` in `f64` complex arithmetic. `None` when the
/// tree holds anything other than arithmetic, functions, logarithms and the
/// named constants.
pub fn eval_at(e: &Expr, x: &Expr, at: Complex64) -> Option<Complex64> {
    if e == x {
        return Some(at);
    }
    let z = match e.node() {
        Node::Number(n) => n.to_complex64(),
        Node::Variable(_) => Complex64::new(e.as_constant()?.value_f64(), 0.0),
        Node::Sum(a, b) => eval_at(a, x, at)? + eval_at(b, x, at)?,
        Node::Minus(a, b) => eval_at(a, x, at)? - eval_at(b, x, at)?,
        Node::Mul(a, b) => eval_at(a, x, at)? * eval_at(b, x, at)?,
        Node::Div(a, b) => eval_at(a, x, at)? / eval_at(b, x, at)?,
        Node::Pow(a, b) => {
            let base = eval_at(a, x, at)?;
            let exponent = eval_at(b, x, at)?;
            match small_integer(exponent) {
                Some(n) => base.powi(n),
                None => base.powc(exponent),
            }
        }
        Node::Func(f, arg) => apply(*f, eval_at(arg, x, at)?)?,
        Node::Log(base, arg) => eval_at(arg, x, at)?.ln() / eval_at(base, x, at)?.ln(),
        Node::Provided(inner, _) => eval_at(inner, x, at)?,
        _ => return None,
    };
    Some(z)
}

fn small_integer(z: Complex64) -> Option<i32> {
    (z.im == 0.0 && z.re.fract() == 0.0 && z.re.abs() <= 64.0).then_some(z.re as i32)
}

fn apply(f: Func, z: Complex64) -> Option<Complex64> {
    let one = Complex64::new(1.0, 0.0);
    Some(match f {
        Func::Sin => z.sin(),
        Func::Cos => z.cos(),
        Func::Tan => z.tan(),
        Func::Cotan => one / z.tan(),
        Func::Sec => one / z.cos(),
        Func::Csc => one / z.sin(),
        Func::Arcsin => z.asin(),
        Func::Arccos => z.acos(),
        Func::Arctan => z.atan(),
        Func::Arccotan => (one / z).atan(),
        Func::Arcsec => (one / z).acos(),
        Func::Arccsc => (one / z).asin(),
        Func::Abs => Complex64::new(z.norm(), 0.0),
        Func::Signum if z.norm() == 0.0 => Complex64::new(0.0, 0.0),
        Func::Signum => z / z.norm(),
        Func::Factorial => return None,
    })
}

fn is_finite(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

/// Starting points spread over the configured rectangle, corners included.
fn grid(g: &NewtonSettings) -> impl Iterator<Item = Complex64> + '_ {
    let share = |i: u32, count: u32| {
        if count > 1 {
            f64::from(i) / f64::from(count - 1)
        } else {
            0.5
        }
    };
    (0..g.step_count.0).flat_map(move |i| {
        (0..g.step_count.1).map(move |j| {
            let (sr, si) = (share(i, g.step_count.0), share(j, g.step_count.1));
            Complex64::new(
                g.from.0 * sr + g.to.0 * (1.0 - sr),
                g.from.1 * si + g.to.1 * (1.0 - si),
            )
        })
    })
}

/// Roots of `expr = 0` found by Newton iteration from every grid point.
///
/// The derivative is a central difference. A point counts as a root when
/// both the residual and the last step are under `precision_error_common`.
pub fn newton_roots(expr: &Expr, x: &Expr) -> Vec<Complex64> {
    let s = settings::current();
    let eps = s.precision_error_common;
    let f = |z: Complex64| eval_at(expr, x, z).filter(|v| is_finite(*v));

    let mut roots: Vec<Complex64> = Vec::new();
    for start in grid(&s.newton) {
        let mut z = start;
        let mut last_step = f64::INFINITY;
        for _ in 0..s.newton.iterations {
            let Some(value) = f(z) else { break };
            let h = 1e-7 * z.norm().max(1.0);
            let (Some(ahead), Some(behind)) = (f(z + h), f(z - h)) else {
                break;
            };
            let slope = (ahead - behind) / (2.0 * h);
            if slope.norm() == 0.0 || !is_finite(slope) {
                break;
            }
            let step = value / slope;
            z -= step;
            last_step = step.norm();
            if last_step < eps * z.norm().max(1.0) * 1e-3 {
                break;
            }
        }
        let converged = is_finite(z)
            && last_step < eps * z.norm().max(1.0)
            && f(z).is_some_and(|v| v.norm() < eps);
        if converged && roots.iter().all(|r| (r - z).norm() > DEDUP_DISTANCE) {
            roots.push(z);
        }
    }
    roots
}
