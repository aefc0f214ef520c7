use crate::expression::{Expr, Name};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Name the bound variable is renamed to for comparison.
const CANONICAL_VAR: &str = "%";

/// `{ var | predicate }`.
///
/// Equality and hashing compare predicates after renaming the bound variable
/// to a shared placeholder, so `{ x | x > 0 }` equals `{ y | y > 0 }`.
#[derive(Debug, Clone)]
pub struct ConditionalSet {
    var: Name,
    predicate: Expr,
    canonical: Expr,
}

impl ConditionalSet {
    pub fn new(var: Name, predicate: Expr) -> ConditionalSet {
        let canonical = if &*var == CANONICAL_VAR {
            predicate.clone()
        } else {
            predicate.substitute(&Expr::var(&var), &Expr::var(CANONICAL_VAR))
        };
        ConditionalSet {
            var,
            predicate,
            canonical,
        }
    }

    pub fn from_name(var: &str, predicate: Expr) -> ConditionalSet {
        ConditionalSet::new(Arc::from(var), predicate)
    }

    pub fn var(&self) -> &Name {
        &self.var
    }

    pub fn var_expr(&self) -> Expr {
        Expr::var(&self.var)
    }

    pub fn predicate(&self) -> &Expr {
        &self.predicate
    }

    /// The predicate with `element` in place of the bound variable.
    pub fn instantiate(&self, element: &Expr) -> Expr {
        self.predicate.substitute(&self.var_expr(), element)
    }
}

impl PartialEq for ConditionalSet {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ConditionalSet {}

impl Hash for ConditionalSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}
