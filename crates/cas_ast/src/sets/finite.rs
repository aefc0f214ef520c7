use crate::expression::Expr;
use crate::traversal::complexity;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Largest set whose power set we are willing to enumerate.
pub const MAX_POWER_SET_SOURCE: usize = 20;

/// Deduplicating collection of elements keyed by their evaluated form.
///
/// Iteration follows insertion order, but equality and hashing do not depend
/// on it. When two elements evaluate to the same key, the one with fewer
/// nodes is kept. Elements evaluating to NaN are dropped.
#[derive(Clone, Default)]
pub struct FiniteSet {
    elements: Vec<Expr>,
    keys: Vec<Expr>,
    index: FxHashMap<Expr, usize>,
    power_set: OnceLock<Vec<FiniteSet>>,
}

impl FiniteSet {
    pub fn new(items: impl IntoIterator<Item = Expr>) -> FiniteSet {
        let mut set = FiniteSet::default();
        for item in items {
            set.insert(item);
        }
        set
    }

    pub fn empty() -> FiniteSet {
        FiniteSet::default()
    }

    fn insert(&mut self, element: Expr) {
        let key = element.evaled();
        if key.as_number().is_some_and(|n| n.is_nan()) {
            return;
        }
        self.insert_keyed(element, key);
    }

    fn insert_keyed(&mut self, element: Expr, key: Expr) {
        match self.index.get(&key) {
            Some(&i) => {
                if complexity(&element) < complexity(&self.elements[i]) {
                    self.elements[i] = element;
                }
            }
            None => {
                self.index.insert(key.clone(), self.elements.len());
                self.elements.push(element);
                self.keys.push(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.elements.iter()
    }

    /// Whether an element with the same evaluated form is present.
    pub fn contains_key(&self, element: &Expr) -> bool {
        self.index.contains_key(&element.evaled())
    }

    fn pairs(&self) -> impl Iterator<Item = (&Expr, &Expr)> {
        self.elements.iter().zip(self.keys.iter())
    }

    pub fn unite(&self, other: &FiniteSet) -> FiniteSet {
        let mut out = self.without_memo();
        for (e, k) in other.pairs() {
            out.insert_keyed(e.clone(), k.clone());
        }
        out
    }

    pub fn intersect(&self, other: &FiniteSet) -> FiniteSet {
        let mut out = FiniteSet::default();
        for (e, k) in self.pairs() {
            if other.index.contains_key(k) {
                out.insert_keyed(e.clone(), k.clone());
            }
        }
        out
    }

    pub fn subtract(&self, other: &FiniteSet) -> FiniteSet {
        let mut out = FiniteSet::default();
        for (e, k) in self.pairs() {
            if !other.index.contains_key(k) {
                out.insert_keyed(e.clone(), k.clone());
            }
        }
        out
    }

    pub fn filter(&self, mut keep: impl FnMut(&Expr) -> bool) -> FiniteSet {
        let mut out = FiniteSet::default();
        for (e, k) in self.pairs() {
            if keep(e) {
                out.insert_keyed(e.clone(), k.clone());
            }
        }
        out
    }

    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> FiniteSet {
        FiniteSet::new(self.elements.iter().map(f))
    }

    /// Every subset, enumerated by inclusion bitmask and memoized.
    ///
    /// `None` for sets larger than [`MAX_POWER_SET_SOURCE`].
    pub fn power_set(&self) -> Option<&[FiniteSet]> {
        let n = self.len();
        if n > MAX_POWER_SET_SOURCE {
            return None;
        }
        let subsets = self.power_set.get_or_init(|| {
            (0u32..(1u32 << n))
                .map(|mask| {
                    let mut subset = FiniteSet::default();
                    for (bit, (e, k)) in self.pairs().enumerate() {
                        if mask & (1 << bit) != 0 {
                            subset.insert_keyed(e.clone(), k.clone());
                        }
                    }
                    subset
                })
                .collect()
        });
        Some(subsets)
    }

    /// Three-valued subset test against an arbitrary set expression.
    pub fn is_subset_of(&self, other: &Expr) -> Option<bool> {
        let mut decided = true;
        for e in &self.elements {
            match other.try_contains(e) {
                Some(false) => return Some(false),
                Some(true) => {}
                None => decided = false,
            }
        }
        decided.then_some(true)
    }

    fn without_memo(&self) -> FiniteSet {
        FiniteSet {
            elements: self.elements.clone(),
            keys: self.keys.clone(),
            index: self.index.clone(),
            power_set: OnceLock::new(),
        }
    }
}

impl PartialEq for FiniteSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.keys.iter().all(|k| other.index.contains_key(k))
    }
}

impl Eq for FiniteSet {}

impl Hash for FiniteSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .keys
            .iter()
            .fold(0u64, |acc, k| acc.wrapping_add(k.structural_hash()));
        state.write_usize(self.len());
        state.write_u64(combined);
    }
}

impl FromIterator<Expr> for FiniteSet {
    fn from_iter<T: IntoIterator<Item = Expr>>(iter: T) -> Self {
        FiniteSet::new(iter)
    }
}

impl<'a> IntoIterator for &'a FiniteSet {
    type Item = &'a Expr;
    type IntoIter = std::slice::Iter<'a, Expr>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for FiniteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(xs: &[i64]) -> FiniteSet {
        xs.iter().map(|&x| Expr::int(x)).collect()
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(ints(&[1, 1, 2]).len(), 2);
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(ints(&[1, 2, 3]), ints(&[3, 1, 2]));
        assert_ne!(ints(&[1, 2]), ints(&[1, 2, 3]));
    }

    #[test]
    fn simpler_representative_wins() {
        let s = FiniteSet::new([Expr::int(1) + 1, Expr::int(2)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.iter().next(), Some(&Expr::int(2)));
    }

    #[test]
    fn dictionary_operations() {
        let a = ints(&[1, 2, 3]);
        let b = ints(&[2, 3, 4]);
        assert_eq!(a.intersect(&b), ints(&[2, 3]));
        assert_eq!(a.subtract(&b), ints(&[1]));
        assert_eq!(a.unite(&b), ints(&[1, 2, 3, 4]));
    }

    #[test]
    fn power_set_of_two() {
        let subsets = ints(&[1, 2]).power_set().map(<[FiniteSet]>::to_vec);
        let subsets = subsets.unwrap_or_default();
        assert_eq!(subsets.len(), 4);
        assert!(subsets.contains(&FiniteSet::empty()));
        assert!(subsets.contains(&ints(&[1, 2])));
    }

    #[test]
    fn nan_elements_are_dropped() {
        let s = FiniteSet::new([Expr::int(1) / 0, Expr::int(5)]);
        assert_eq!(s, ints(&[5]));
    }
}
