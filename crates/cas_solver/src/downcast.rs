//! Exact recovery of numerically computed roots.

use cas_ast::{Expr, Number, Settings};
use tracing::trace;

/// Continued-fraction budget while searching for an exact root.
const DOWNCAST_ITERATIONS: u32 = 20;
/// Distance within which a numeric root is matched to a rational candidate.
const DOWNCAST_TOLERANCE: f64 = 1e-7;
/// Largest inexact residual accepted for a root that was only ever known
/// numerically.
const RESIDUAL_TOLERANCE: f64 = 1e-12;

/// Replace `root` by an exact rational (or Gaussian rational) value when that
/// value provably solves `equation = 0` in `x`.
///
/// The candidate is found by rationalizing the value of `root` under a looser
/// tolerance. It is then substituted back with rationalization switched off,
/// so an exact residual really is exact:
///
/// - a symbolic root is replaced only when the residual is exactly zero,
/// - an inexact numeric root also accepts a float residual within
///   [`RESIDUAL_TOLERANCE`].
///
/// Exact numbers and roots that do not evaluate to a number keep their
/// exact-simplified form.
pub fn try_downcast(equation: &Expr, x: &Expr, root: &Expr) -> Expr {
    match exact_candidate(equation, x, root) {
        Some(exact) => {
            trace!(%root, %exact, "root downcast");
            Expr::number(exact)
        }
        None => root.inner_simplified(),
    }
}

fn exact_candidate(equation: &Expr, x: &Expr, root: &Expr) -> Option<Number> {
    let numeric_root = match root.as_number() {
        Some(n) if n.is_exact() => return None,
        Some(_) => true,
        None => false,
    };
    let value = root.eval_number().filter(|n| !n.is_nan())?;

    let candidate = {
        let _loose = Settings::scoped(|s| {
            s.downcasting_enabled = true;
            s.float_to_rational_iterations = DOWNCAST_ITERATIONS;
            s.zero_error_tolerance = DOWNCAST_TOLERANCE;
        });
        value.downcast()
    };
    if !candidate.is_exact() {
        return None;
    }

    let _raw = Settings::scoped(|s| s.downcasting_enabled = false);
    let residual = equation.substitute(x, &Expr::number(candidate.clone())).evaled();
    let residual = residual.as_number()?;
    let accepted = if residual.is_exact() {
        residual.is_zero()
    } else {
        numeric_root && !residual.is_nan() && residual.is_zero_within(RESIDUAL_TOLERANCE)
    };
    accepted.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_near_half_becomes_exact() {
        let eq = Expr::mul(2, x()) - 1;
        let approx = Expr::number(Number::complex(
            Number::float(0.49999999),
            Number::float(1e-9),
        ));
        assert_eq!(try_downcast(&eq, &x(), &approx), Expr::rational(1, 2));
    }

    #[test]
    fn test_irrational_root_stays_symbolic() {
        let eq = x() - Expr::sqrt(2);
        let root = Expr::sqrt(2);
        assert_eq!(try_downcast(&eq, &x(), &root), root);
    }

    #[test]
    fn test_transcendental_root_is_not_snapped() {
        // ln 2 lies within 1e-7 of 1588/2291
        let eq = Expr::pow(Expr::e(), x()) - 2;
        let root = Expr::ln(2);
        let out = try_downcast(&eq, &x(), &root);
        assert_eq!(out, root.inner_simplified());
        assert!(!out.is_number(), "{}", out);
    }

    #[test]
    fn test_symbolic_rational_root_becomes_exact() {
        // (sqrt 3 + 1)(sqrt 3 - 1) = 2
        let eq = Expr::pow(x(), 2) - 4;
        let root = Expr::mul(Expr::sqrt(3) + 1, Expr::sqrt(3) - 1);
        assert_eq!(try_downcast(&eq, &x(), &root), Expr::int(2));
    }

    #[test]
    fn test_exact_root_is_untouched() {
        let eq = Expr::mul(2, x()) - 1;
        let root = Expr::rational(1, 2);
        assert_eq!(try_downcast(&eq, &x(), &root), root);
    }

    #[test]
    fn test_numeric_root_of_transcendental_equation() {
        let eq = x() - Expr::cos(x());
        let root = Expr::number(Number::float(0.7390851332151607));
        let out = try_downcast(&eq, &x(), &root);
        assert!(!out.as_number().unwrap().is_exact(), "{}", out);
    }

    #[test]
    fn test_wrong_candidate_is_rejected() {
        let eq = Expr::pow(x(), 2) - 2;
        let root = Expr::number(Number::float(1.4142135623730951));
        let out = try_downcast(&eq, &x(), &root);
        assert!(!out.as_number().unwrap().is_exact());
    }

    #[test]
    fn test_symbolic_root_is_kept() {
        let eq = x() - Expr::var("a");
        let root = Expr::var("a");
        assert_eq!(try_downcast(&eq, &x(), &root), root);
    }

    #[test]
    fn test_settings_restored() {
        let before = cas_ast::settings::current();
        let eq = x() - 3;
        let _ = try_downcast(&eq, &x(), &Expr::number(Number::float(3.0000000001)));
        assert_eq!(cas_ast::settings::current(), before);
    }
}
