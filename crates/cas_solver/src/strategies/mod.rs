pub mod common_denominator;
pub mod decomposition;
pub mod exponential;
pub mod fractioned;
pub mod newton;
pub mod polynomial;
pub mod substitution;
pub mod trigonometric;

pub use common_denominator::CommonDenominatorStrategy;
pub use decomposition::DecompositionStrategy;
pub use exponential::ExponentialStrategy;
pub use fractioned::FractionedStrategy;
pub use newton::NewtonStrategy;
pub use polynomial::{IdentityStrategy, PolynomialStrategy};
pub use substitution::SubstitutionStrategy;
pub use trigonometric::TrigonometricStrategy;

use cas_ast::{Expr, Node, Number};

/// One factor of a product term: `base ^ exponent`.
#[derive(Debug, Clone)]
pub(crate) struct Factor {
    pub base: Expr,
    pub exponent: Number,
}

/// Flatten a product/quotient into `base ^ exponent` factors with numeric
/// exponents. Nested numeric powers multiply through.
pub(crate) fn factors_of(term: &Expr) -> Vec<Factor> {
    let mut out = Vec::new();
    collect_factors(term, Number::one(), &mut out);
    out
}

fn collect_factors(e: &Expr, exponent: Number, out: &mut Vec<Factor>) {
    match e.node() {
        Node::Mul(a, b) => {
            collect_factors(a, exponent.clone(), out);
            collect_factors(b, exponent, out);
        }
        Node::Div(a, b) => {
            collect_factors(a, exponent.clone(), out);
            collect_factors(b, -exponent, out);
        }
        Node::Pow(base, p) => match p.as_number() {
            Some(n) if n.is_real() => collect_factors(base, &exponent * n, out),
            _ => out.push(Factor {
                base: e.clone(),
                exponent,
            }),
        },
        _ => out.push(Factor {
            base: e.clone(),
            exponent,
        }),
    }
}

/// Rebuild `prod base^exponent`.
pub(crate) fn product_of(factors: impl IntoIterator<Item = Factor>) -> Expr {
    factors
        .into_iter()
        .map(|f| {
            if f.exponent.is_one() {
                f.base
            } else {
                Expr::pow(f.base, Expr::number(f.exponent))
            }
        })
        .reduce(|acc, f| Expr::mul(acc, f))
        .unwrap_or_else(|| Expr::int(1))
}
