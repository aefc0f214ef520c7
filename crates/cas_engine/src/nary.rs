//! # N-ary Expression Views
//!
//! Shape-independent views for additive and multiplicative chains. Rules work
//! on flat lists of terms/factors instead of pattern matching binary trees.
//!
//! - [`AddView`]: flattened `Sum`/`Minus` chains with signed terms
//! - [`MulView`]: flattened `Mul` chains
//!
//! `a+(b-c)`, `(a+b)-c` and `a-(c-b)` all produce the same signed terms.
//! Rebuilding is left-associative so the result reads `a + b - c`.

use cas_ast::{Expr, Node};
use smallvec::SmallVec;

/// Sign of a term in an additive expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Pos,
    Neg,
}

impl Sign {
    #[inline]
    pub fn to_i32(self) -> i32 {
        match self {
            Sign::Pos => 1,
            Sign::Neg => -1,
        }
    }

    #[inline]
    pub fn negate(self) -> Sign {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }
}

/// N-ary view of an additive expression.
#[derive(Debug, Clone)]
pub struct AddView {
    pub terms: SmallVec<[(Expr, Sign); 8]>,
}

/// N-ary view of a multiplicative expression. Factor order is preserved.
#[derive(Debug, Clone)]
pub struct MulView {
    pub factors: SmallVec<[Expr; 8]>,
}

// ============================================================================
// AddView
// ============================================================================

impl AddView {
    /// Always succeeds; a non-additive expression is a single positive term.
    pub fn from_expr(root: &Expr) -> Self {
        let mut terms = SmallVec::new();
        Self::collect_terms(root, Sign::Pos, &mut terms);
        AddView { terms }
    }

    /// Iterative term collector (stack-safe for deep expressions).
    fn collect_terms(root: &Expr, initial_sign: Sign, out: &mut SmallVec<[(Expr, Sign); 8]>) {
        let mut stack = vec![(root.clone(), initial_sign)];

        while let Some((e, sign)) = stack.pop() {
            match e.node() {
                Node::Sum(l, r) => {
                    stack.push((r.clone(), sign));
                    stack.push((l.clone(), sign));
                }
                Node::Minus(l, r) => {
                    stack.push((r.clone(), sign.negate()));
                    stack.push((l.clone(), sign));
                }
                _ => out.push((e, sign)),
            }
        }
    }

    /// Rebuild as a left-associative chain.
    ///
    /// - Empty → 0
    /// - A leading negative term becomes `-1 * t`
    /// - Later negative terms become `Minus`
    pub fn rebuild(self) -> Expr {
        let mut iter = self.terms.into_iter();
        let mut acc = match iter.next() {
            None => return Expr::int(0),
            Some((t, Sign::Pos)) => t,
            Some((t, Sign::Neg)) => Expr::negate(t),
        };
        for (t, sign) in iter {
            acc = match sign {
                Sign::Pos => Expr::sum(acc, t),
                Sign::Neg => Expr::minus(acc, t),
            };
        }
        acc
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

// ============================================================================
// MulView
// ============================================================================

impl MulView {
    pub fn from_expr(root: &Expr) -> Self {
        let mut factors = SmallVec::new();
        let mut stack = vec![root.clone()];
        while let Some(e) = stack.pop() {
            match e.node() {
                Node::Mul(l, r) => {
                    // Right first so left is processed first
                    stack.push(r.clone());
                    stack.push(l.clone());
                }
                _ => factors.push(e),
            }
        }
        MulView { factors }
    }

    /// Empty → 1, otherwise a left-associative product.
    pub fn rebuild(self) -> Expr {
        let mut iter = self.factors.into_iter();
        match iter.next() {
            None => Expr::int(1),
            Some(first) => iter.fold(first, |acc, f| Expr::mul(acc, f)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
