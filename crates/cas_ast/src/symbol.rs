//! Fresh-variable factories.
//!
//! Temporaries are named `%1`, `%2`, ... and indexed variables `n_1`, `n_2`,
//! ...; both pick the smallest index whose name is not already used by the
//! given expressions (free, bound, or binder names).

use crate::expression::{Expr, Name};
use rustc_hash::FxHashSet;

/// Smallest `{prefix}{k}` (k ≥ 1) not in `taken`.
pub fn fresh_name(prefix: &str, taken: &FxHashSet<Name>) -> String {
    (1u64..)
        .map(|k| format!("{prefix}{k}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| format!("{prefix}0"))
}

fn names_in<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> FxHashSet<Name> {
    let mut taken = FxHashSet::default();
    for e in exprs {
        taken.extend(e.all_names());
    }
    taken
}

/// A temporary `%k` unused by any of `exprs`.
pub fn create_temp<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Expr {
    Expr::var(&fresh_name("%", &names_in(exprs)))
}

/// An indexed variable `{prefix}_k` unused in `expr`.
pub fn create_unique(expr: &Expr, prefix: &str) -> Expr {
    Expr::var(&fresh_name(&format!("{prefix}_"), &names_in([expr])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temps_skip_taken_names() {
        let e = Expr::var("%1") + Expr::var("x");
        assert_eq!(create_temp([&e]), Expr::var("%2"));
        assert_eq!(create_temp([&Expr::var("x")]), Expr::var("%1"));
    }

    #[test]
    fn unique_indexed_names() {
        let e = Expr::var("n_1") * Expr::lambda("n_2", Expr::var("n_2"));
        assert_eq!(create_unique(&e, "n"), Expr::var("n_3"));
        assert_eq!(create_unique(&Expr::var("x"), "r"), Expr::var("r_1"));
    }
}
