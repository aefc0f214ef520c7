use super::{factors_of, product_of, Factor};
use crate::solve_core::solve_with_ctx;
use crate::strategy::{SolveCtx, SolverStrategy};
use crate::tree::{contains, simplified};
use cas_ast::{Expr, Number};
use cas_engine::nary::AddView;
use cas_engine::CasError;
use tracing::debug;

/// Multiply every term by the least common denominator of the
/// `x`-dependent denominators, then solve the cleared numerator.
pub struct CommonDenominatorStrategy;

impl SolverStrategy for CommonDenominatorStrategy {
    fn name(&self) -> &str {
        "Common Denominator"
    }

    fn apply(&self, expr: &Expr, x: &Expr, ctx: &SolveCtx) -> Option<Result<Expr, CasError>> {
        let view = AddView::from_expr(expr);
        let terms: Vec<_> = view
            .terms
            .iter()
            .map(|(term, sign)| (split_denominators(term, x), *sign))
            .collect();

        // Highest power of each distinct denominator base
        let mut lcd: Vec<(Expr, Number)> = Vec::new();
        for ((_, dens), _) in &terms {
            for den in dens {
                match lcd.iter_mut().find(|(base, _)| *base == den.base) {
                    Some((_, power)) if den.exponent.cmp_real(power).is_some_and(|o| o.is_gt()) => {
                        *power = den.exponent.clone();
                    }
                    Some(_) => {}
                    None => lcd.push((den.base.clone(), den.exponent.clone())),
                }
            }
        }
        if lcd.is_empty() {
            return None;
        }

        let cleared = AddView {
            terms: terms
                .into_iter()
                .map(|((numerator, dens), sign)| {
                    let missing = lcd.iter().map(|(base, power)| {
                        let own = dens
                            .iter()
                            .filter(|d| d.base == *base)
                            .fold(Number::zero(), |acc, d| &acc + &d.exponent);
                        Factor {
                            base: base.clone(),
                            exponent: power - &own,
                        }
                    });
                    let factors = numerator
                        .into_iter()
                        .chain(missing.filter(|f| !f.exponent.is_zero()));
                    (product_of(factors), sign)
                })
                .collect(),
        }
        .rebuild();
        let cleared = simplified(&cleared);
        if cleared == *expr {
            return None;
        }
        debug!(%expr, %cleared, "cleared denominators");
        Some(solve_with_ctx(&cleared, x, ctx))
    }
}

/// Split a term into its numerator factors and its `x`-dependent
/// denominators, the latter with positive exponents.
fn split_denominators(term: &Expr, x: &Expr) -> (Vec<Factor>, Vec<Factor>) {
    let (dens, nums): (Vec<_>, Vec<_>) = factors_of(term).into_iter().partition(|f| {
        contains(&f.base, x) && f.exponent.is_real() && f.exponent.is_negative()
    });
    let dens = dens
        .into_iter()
        .map(|f| Factor {
            base: f.base,
            exponent: -f.exponent,
        })
        .collect();
    (nums, dens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_reciprocal_plus_constant() {
        let e = Expr::div(1, x()) + 1;
        let set = CommonDenominatorStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        assert_eq!(set, Expr::finite_set([-1]));
    }

    #[test]
    fn test_two_denominators() {
        // 1/x + 1/(x-1) = 2  =>  2x^2 - 4x + 1 = 0
        let e = Expr::div(1, x()) + Expr::div(1, x() - 1) - 2;
        let set = CommonDenominatorStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .unwrap()
            .unwrap();
        let fs = set.as_finite_set().unwrap();
        assert_eq!(fs.len(), 2);
        for root in fs.iter() {
            let residual = e.substitute(&x(), root).eval_number().unwrap();
            assert!(residual.is_zero_within(1e-9), "{} at {}", residual, root);
        }
    }

    #[test]
    fn test_not_applicable_without_denominators() {
        let e = Expr::pow(x(), 2) - 4;
        assert!(CommonDenominatorStrategy
            .apply(&e, &x(), &SolveCtx::default())
            .is_none());
    }
}
