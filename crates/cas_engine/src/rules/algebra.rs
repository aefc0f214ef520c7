use crate::helpers::{as_pow, num, numeric_coeff, with_coeff};
use crate::nary::{AddView, MulView, Sign};
use crate::rule::Rewrite;
use cas_ast::{Expr, Number, TargetKindSet};
use smallvec::SmallVec;

/// Signed coefficient of a term, with `None` standing for the constant bucket.
fn split_term(term: &Expr, sign: Sign) -> (Number, Option<Expr>) {
    let signed = |k: Number| match sign {
        Sign::Pos => k,
        Sign::Neg => -k,
    };
    if let Some(n) = num(term) {
        return (signed(n.clone()), None);
    }
    let (k, core) = numeric_coeff(term);
    (signed(k), Some(core))
}

define_rule!(
    /// `2x + y - x + 3 - 1` becomes `x + y + 2`; fires only when terms merge.
    CombineLikeTermsRule,
    "Combine Like Terms",
    Some(TargetKindSet::SUM_MINUS),
    |expr| {
        let view = AddView::from_expr(expr);
        if view.len() < 2 {
            return None;
        }

        let mut groups: SmallVec<[(Option<Expr>, Number); 8]> = SmallVec::new();
        for (term, sign) in &view.terms {
            let (k, core) = split_term(term, *sign);
            match groups.iter_mut().find(|(c, _)| *c == core) {
                Some((_, acc)) => *acc = &*acc + &k,
                None => groups.push((core, k)),
            }
        }
        if groups.len() == view.len() && groups.iter().all(|(_, k)| !k.is_zero()) {
            return None;
        }

        // Constant bucket goes last
        groups.sort_by_key(|(core, _)| core.is_none());
        let terms = groups
            .into_iter()
            .filter(|(_, k)| !k.is_zero())
            .map(|(core, k)| {
                let (k, sign) = if k.is_negative() { (-k, Sign::Neg) } else { (k, Sign::Pos) };
                let term = match core {
                    None => Expr::number(k),
                    Some(core) => with_coeff(k, core),
                };
                (term, sign)
            })
            .collect();
        Some(Rewrite::simple(
            AddView { terms }.rebuild(),
            "Combine like terms",
        ))
    }
);

define_rule!(
    /// `2 * x * x^k * 3` becomes `6 * x^(k+1)`; fires only when factors merge.
    CombineLikeFactorsRule,
    "Combine Like Factors",
    Some(TargetKindSet::MUL),
    |expr| {
        let view = MulView::from_expr(expr);
        if view.len() < 2 {
            return None;
        }

        let mut coeff = Number::one();
        let mut numeric = 0usize;
        let mut groups: SmallVec<[(Expr, Vec<Expr>); 8]> = SmallVec::new();
        for factor in &view.factors {
            if let Some(n) = num(factor) {
                coeff = &coeff * n;
                numeric += 1;
                continue;
            }
            let (base, exp) = as_pow(factor);
            match groups.iter_mut().find(|(b, _)| *b == base) {
                Some((_, exps)) => exps.push(exp),
                None => groups.push((base, vec![exp])),
            }
        }
        let lone_leading_coeff = numeric == 1
            && view.factors[0].is_number()
            && !coeff.is_one()
            && !coeff.is_zero();
        if groups.len() == view.len() - numeric && (numeric == 0 || lone_leading_coeff) {
            return None;
        }
        if coeff.is_zero() {
            return Some(Rewrite::simple(Expr::int(0), "Product with zero factor"));
        }

        let factors = groups.into_iter().map(|(base, exps)| {
            if exps.len() == 1 {
                return match exps.into_iter().next() {
                    Some(e) if !e.is_one() => Expr::pow(base, e),
                    _ => base,
                };
            }
            let mut iter = exps.into_iter();
            let first = iter.next().unwrap_or_else(|| Expr::int(1));
            Expr::pow(base, iter.fold(first, |acc, e| Expr::sum(acc, e)))
        });
        let rebuilt = MulView {
            factors: factors.collect(),
        }
        .rebuild();
        Some(Rewrite::simple(
            with_coeff(coeff, rebuilt),
            "Combine like factors",
        ))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(CombineLikeTermsRule));
    simplifier.add_rule(Box::new(CombineLikeFactorsRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn y() -> Expr {
        Expr::var("y")
    }

    #[test]
    fn test_combine_like_terms() {
        // 2x + y - x + 3 - 1
        let e = Expr::minus(
            Expr::sum(Expr::minus(Expr::sum(Expr::mul(2, x()), y()), x()), 3),
            1,
        );
        let rw = CombineLikeTermsRule.apply(&e).unwrap();
        assert_eq!(rw.new_expr, Expr::sum(Expr::sum(x(), y()), 2));
    }

    #[test]
    fn test_like_terms_cancel() {
        let e = Expr::minus(Expr::sum(x(), y()), x());
        let rw = CombineLikeTermsRule.apply(&e).unwrap();
        assert_eq!(rw.new_expr, y());
    }

    #[test]
    fn test_distinct_terms_untouched() {
        assert!(CombineLikeTermsRule.apply(&Expr::sum(x(), y())).is_none());
        assert!(CombineLikeTermsRule.apply(&Expr::minus(x(), 3)).is_none());
    }

    #[test]
    fn test_combine_like_factors() {
        let e = Expr::mul(x(), x());
        let rw = CombineLikeFactorsRule.apply(&e).unwrap();
        assert_eq!(rw.new_expr, Expr::pow(x(), Expr::sum(1, 1)));

        let e = Expr::mul(Expr::mul(2, y()), 3);
        let rw = CombineLikeFactorsRule.apply(&e).unwrap();
        assert_eq!(rw.new_expr, Expr::mul(6, y()));
    }

    #[test]
    fn test_distinct_factors_untouched() {
        assert!(CombineLikeFactorsRule.apply(&Expr::mul(2, x())).is_none());
        assert!(CombineLikeFactorsRule.apply(&Expr::mul(x(), y())).is_none());
    }
}
