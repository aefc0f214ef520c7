//! Set algebra: the answer type of the solver.
//!
//! Four concrete representations ([`FiniteSet`], [`Interval`],
//! [`ConditionalSet`], special domain sets) and three binary combinators
//! (union, intersection, difference) over arbitrary set expressions.
//!
//! Containment is three-valued: [`Expr::try_contains`] returns `None` when
//! membership cannot be decided, and [`Expr::contains`] turns that into an
//! [`AstError::Undecidable`].

mod conditional;
mod finite;
mod interval;

pub use conditional::ConditionalSet;
pub use finite::{FiniteSet, MAX_POWER_SET_SOURCE};
pub use interval::Interval;

use crate::cache;
use crate::domain::Domain;
use crate::error::AstError;
use crate::expression::{Expr, Node, SetNode};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Operands of a binary set combinator.
///
/// When both operands are finite the combined set is materialized once and
/// cached, which makes emptiness and size decidable.
#[derive(Debug, Clone)]
pub struct SetPair {
    left: Expr,
    right: Expr,
    materialized: OnceLock<Option<FiniteSet>>,
}

impl SetPair {
    pub fn new(left: Expr, right: Expr) -> SetPair {
        SetPair {
            left,
            right,
            materialized: OnceLock::new(),
        }
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }

    fn finite_with(&self, op: impl FnOnce(&FiniteSet, &FiniteSet) -> FiniteSet) -> Option<&FiniteSet> {
        self.materialized
            .get_or_init(|| {
                let a = self.left.as_set()?.as_finite()?;
                let b = self.right.as_set()?.as_finite()?;
                Some(op(a, b))
            })
            .as_ref()
    }
}

impl PartialEq for SetPair {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for SetPair {}

impl Hash for SetPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

fn or3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

fn and3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

impl SetNode {
    /// The finite set this node denotes, when it is decidable.
    pub fn as_finite(&self) -> Option<&FiniteSet> {
        match self {
            SetNode::Finite(fs) => Some(fs),
            SetNode::Union(p) => p.finite_with(FiniteSet::unite),
            SetNode::Intersection(p) => p.finite_with(FiniteSet::intersect),
            SetNode::SetMinus(p) => p.finite_with(FiniteSet::subtract),
            SetNode::Interval(_) | SetNode::Conditional(_) | SetNode::Special(_) => None,
        }
    }

    pub fn is_empty(&self) -> Option<bool> {
        if let Some(fs) = self.as_finite() {
            return Some(fs.is_empty());
        }
        match self {
            SetNode::Interval(i) => i.is_empty(),
            SetNode::Special(_) => Some(false),
            SetNode::Union(p) => {
                let a = p.left.as_set()?.is_empty();
                let b = p.right.as_set()?.is_empty();
                and3(a, b)
            }
            SetNode::Intersection(p) | SetNode::SetMinus(p) => {
                p.left.as_set()?.is_empty().filter(|&empty| empty)
            }
            SetNode::Finite(_) | SetNode::Conditional(_) => None,
        }
    }
}

// =============================================================================
// Containment
// =============================================================================

impl Expr {
    /// Three-valued membership; `None` when undecidable or when `self` is
    /// not a set.
    pub fn try_contains(&self, element: &Expr) -> Option<bool> {
        match self.as_set()? {
            SetNode::Finite(fs) => {
                if fs.contains_key(element) {
                    return Some(true);
                }
                let key = element.evaled();
                let all_numeric = key.is_number() && fs.iter().all(|e| e.evaled().is_number());
                all_numeric.then_some(false)
            }
            SetNode::Interval(i) => {
                let key = element.evaled();
                i.contains_number(key.as_number()?)
            }
            SetNode::Conditional(c) => c.instantiate(element).evaled().as_bool(),
            SetNode::Special(domain) => {
                let key = element.evaled();
                match key.node() {
                    Node::Number(n) => Some(domain.admits(n)),
                    Node::Boolean(_) => Some(domain.admits_boolean()),
                    Node::Set(_) => Some(false),
                    _ => None,
                }
            }
            SetNode::Union(p) => or3(p.left.try_contains(element), p.right.try_contains(element)),
            SetNode::Intersection(p) => {
                and3(p.left.try_contains(element), p.right.try_contains(element))
            }
            SetNode::SetMinus(p) => and3(
                p.left.try_contains(element),
                p.right.try_contains(element).map(|b| !b),
            ),
        }
    }

    /// Definite membership; fails with [`AstError::Undecidable`] when
    /// [`Expr::try_contains`] cannot decide.
    pub fn contains(&self, element: &Expr) -> Result<bool, AstError> {
        self.try_contains(element).ok_or_else(|| AstError::Undecidable {
            set: self.to_string(),
            element: element.to_string(),
        })
    }

    /// Emptiness when decidable.
    pub fn is_empty_set(&self) -> Option<bool> {
        self.as_set()?.is_empty()
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl Expr {
    pub fn finite_set<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Expr {
        Expr::from_finite(FiniteSet::new(items.into_iter().map(Into::into)))
    }

    pub fn from_finite(set: FiniteSet) -> Expr {
        Expr::new(Node::Set(SetNode::Finite(set)))
    }

    pub fn empty_set() -> Expr {
        Expr::from_finite(FiniteSet::empty())
    }

    pub fn interval(
        left: impl Into<Expr>,
        left_closed: bool,
        right: impl Into<Expr>,
        right_closed: bool,
    ) -> Expr {
        Expr::new(Node::Set(SetNode::Interval(Interval::new(
            left.into(),
            left_closed,
            right.into(),
            right_closed,
        ))))
    }

    pub fn conditional_set(var: &str, predicate: impl Into<Expr>) -> Expr {
        Expr::new(Node::Set(SetNode::Conditional(ConditionalSet::new(
            Arc::from(var),
            predicate.into(),
        ))))
    }

    /// Shared instance of the special set for `domain`.
    pub fn special_set(domain: Domain) -> Expr {
        cache::special_set(domain)
    }

    pub(crate) fn new_special_set(domain: Domain) -> Expr {
        Expr::new(Node::Set(SetNode::Special(domain)))
    }

    pub fn union(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Set(SetNode::Union(SetPair::new(a.into(), b.into()))))
    }

    pub fn intersection(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Set(SetNode::Intersection(SetPair::new(
            a.into(),
            b.into(),
        ))))
    }

    pub fn set_minus(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Set(SetNode::SetMinus(SetPair::new(a.into(), b.into()))))
    }

    /// Union that collapses finite operands and skips empty ones.
    pub fn unite_sets(a: &Expr, b: &Expr) -> Expr {
        if a.is_empty_set() == Some(true) {
            return b.clone();
        }
        if b.is_empty_set() == Some(true) {
            return a.clone();
        }
        match (a.as_finite_set(), b.as_finite_set()) {
            (Some(x), Some(y)) => Expr::from_finite(x.unite(y)),
            _ => Expr::union(a, b),
        }
    }

    /// Intersection that collapses finite operands.
    pub fn intersect_sets(a: &Expr, b: &Expr) -> Expr {
        match (a.as_finite_set(), b.as_finite_set()) {
            (Some(x), Some(y)) => Expr::from_finite(x.intersect(y)),
            _ if a == b => a.clone(),
            _ => Expr::intersection(a, b),
        }
    }

    /// Difference that collapses finite operands.
    pub fn subtract_sets(a: &Expr, b: &Expr) -> Expr {
        if b.is_empty_set() == Some(true) || a.is_empty_set() == Some(true) {
            return a.clone();
        }
        match (a.as_finite_set(), b.as_finite_set()) {
            (Some(x), Some(y)) => Expr::from_finite(x.subtract(y)),
            (Some(x), None) => {
                // drop what is provably in `b`, keep the rest symbolic
                let kept = x.filter(|e| b.try_contains(e) != Some(true));
                if kept.iter().all(|e| b.try_contains(e) == Some(false)) {
                    Expr::from_finite(kept)
                } else {
                    Expr::set_minus(Expr::from_finite(kept), b)
                }
            }
            _ => Expr::set_minus(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[i64]) -> Expr {
        Expr::finite_set(xs.iter().copied())
    }

    #[test]
    fn intersection_and_difference_of_finite_sets() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        assert_eq!(Expr::intersect_sets(&a, &b), set(&[2, 3]));
        assert_eq!(Expr::subtract_sets(&a, &b), set(&[1]));
    }

    #[test]
    fn combinator_nodes_materialize_finite_operands() {
        let u = Expr::union(set(&[1]), set(&[2]));
        assert_eq!(u.as_set().and_then(SetNode::as_finite).map(FiniteSet::len), Some(2));
        let m = Expr::set_minus(set(&[1]), set(&[1]));
        assert_eq!(m.is_empty_set(), Some(true));
    }

    #[test]
    fn interval_membership_through_expr() {
        let i = Expr::interval(1, true, 3, false);
        assert_eq!(i.try_contains(&Expr::int(2)), Some(true));
        assert_eq!(i.try_contains(&Expr::int(3)), Some(false));
        assert_eq!(i.try_contains(&Expr::var("x")), None);
    }

    #[test]
    fn symbolic_finite_membership_is_undecidable() {
        let s = Expr::finite_set([Expr::var("a")]);
        assert_eq!(s.try_contains(&Expr::int(1)), None);
        assert!(matches!(
            s.contains(&Expr::int(1)),
            Err(AstError::Undecidable { .. })
        ));
        assert_eq!(s.try_contains(&Expr::var("a")), Some(true));
    }

    #[test]
    fn special_sets_type_check_numbers() {
        let z = Expr::special_set(Domain::Integer);
        assert_eq!(z.try_contains(&Expr::int(3)), Some(true));
        assert_eq!(z.try_contains(&Expr::rational(1, 2)), Some(false));
        assert_eq!(z.try_contains(&Expr::var("n")), None);
        let r = Expr::special_set(Domain::Real);
        assert_eq!(r.try_contains(&Expr::pi()), Some(true));
    }

    #[test]
    fn conditional_membership() {
        let pos = Expr::conditional_set("x", Expr::greater(Expr::var("x"), 0));
        assert_eq!(pos.try_contains(&Expr::int(2)), Some(true));
        assert_eq!(pos.try_contains(&Expr::int(-2)), Some(false));
    }

    #[test]
    fn three_valued_combinators() {
        let known = set(&[1]);
        let unknown = Expr::finite_set([Expr::var("a")]);
        let u = Expr::union(&known, &unknown);
        assert_eq!(u.try_contains(&Expr::int(1)), Some(true));
        assert_eq!(u.try_contains(&Expr::int(2)), None);
        let i = Expr::intersection(&known, &unknown);
        assert_eq!(i.try_contains(&Expr::int(2)), Some(false));
        let m = Expr::set_minus(&known, &set(&[2]));
        assert_eq!(m.try_contains(&Expr::int(1)), Some(true));
    }
}
