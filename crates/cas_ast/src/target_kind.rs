//! Compiler-checked rule dispatch types.
//!
//! Rules declare the node kinds they can fire on as a [`TargetKindSet`]; the
//! simplifier indexes them by [`TargetKind`] so a rewrite pass only tries the
//! rules relevant to the current node.

use crate::expression::{Expr, Node};
use std::fmt;

// =============================================================================
// TargetKind enum
// =============================================================================

/// One-to-one mapping to [`Node`] discriminants.
///
/// Adding a variant to `Node` without updating this enum and
/// [`TargetKind::from_expr`] is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TargetKind {
    Number = 0,
    Variable,
    Boolean,
    Sum,
    Minus,
    Mul,
    Div,
    Pow,
    Func,
    Log,
    Derivative,
    Integral,
    Limit,
    Not,
    Logic,
    Relation,
    In,
    Set,
    Tensor,
    Piecewise,
    Provided,
    Application,
    Lambda,
}

impl TargetKind {
    pub const COUNT: usize = 23;

    pub const ALL: [TargetKind; TargetKind::COUNT] = [
        TargetKind::Number,
        TargetKind::Variable,
        TargetKind::Boolean,
        TargetKind::Sum,
        TargetKind::Minus,
        TargetKind::Mul,
        TargetKind::Div,
        TargetKind::Pow,
        TargetKind::Func,
        TargetKind::Log,
        TargetKind::Derivative,
        TargetKind::Integral,
        TargetKind::Limit,
        TargetKind::Not,
        TargetKind::Logic,
        TargetKind::Relation,
        TargetKind::In,
        TargetKind::Set,
        TargetKind::Tensor,
        TargetKind::Piecewise,
        TargetKind::Provided,
        TargetKind::Application,
        TargetKind::Lambda,
    ];

    #[inline]
    pub fn from_expr(expr: &Expr) -> Self {
        match expr.node() {
            Node::Number(_) => Self::Number,
            Node::Variable(_) => Self::Variable,
            Node::Boolean(_) => Self::Boolean,
            Node::Sum(..) => Self::Sum,
            Node::Minus(..) => Self::Minus,
            Node::Mul(..) => Self::Mul,
            Node::Div(..) => Self::Div,
            Node::Pow(..) => Self::Pow,
            Node::Func(..) => Self::Func,
            Node::Log(..) => Self::Log,
            Node::Derivative { .. } => Self::Derivative,
            Node::Integral { .. } => Self::Integral,
            Node::Limit { .. } => Self::Limit,
            Node::Not(_) => Self::Not,
            Node::Logic(..) => Self::Logic,
            Node::Relation(..) => Self::Relation,
            Node::In(..) => Self::In,
            Node::Set(_) => Self::Set,
            Node::Tensor(_) => Self::Tensor,
            Node::Piecewise(_) => Self::Piecewise,
            Node::Provided(..) => Self::Provided,
            Node::Application(..) => Self::Application,
            Node::Lambda(..) => Self::Lambda,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// =============================================================================
// TargetKindSet: bitflag set
// =============================================================================

/// A compact set of [`TargetKind`] values stored as a `u32` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetKindSet(u32);

impl TargetKindSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn of(kind: TargetKind) -> Self {
        Self(1u32 << kind as u8)
    }

    #[inline]
    pub const fn contains(self, kind: TargetKind) -> bool {
        self.0 & (1u32 << kind as u8) != 0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the kinds in this set (declaration order).
    pub fn iter(self) -> impl Iterator<Item = TargetKind> {
        let bits = self.0;
        TargetKind::ALL
            .into_iter()
            .filter(move |k| bits & (1u32 << *k as u8) != 0)
    }
}

impl std::ops::BitOr for TargetKindSet {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for TargetKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(|k| k.to_string()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl TargetKindSet {
    pub const NUMBER: Self = Self::of(TargetKind::Number);
    pub const VARIABLE: Self = Self::of(TargetKind::Variable);
    pub const SUM: Self = Self::of(TargetKind::Sum);
    pub const MINUS: Self = Self::of(TargetKind::Minus);
    pub const MUL: Self = Self::of(TargetKind::Mul);
    pub const DIV: Self = Self::of(TargetKind::Div);
    pub const POW: Self = Self::of(TargetKind::Pow);
    pub const FUNC: Self = Self::of(TargetKind::Func);
    pub const LOG: Self = Self::of(TargetKind::Log);
    pub const NOT: Self = Self::of(TargetKind::Not);
    pub const LOGIC: Self = Self::of(TargetKind::Logic);
    pub const RELATION: Self = Self::of(TargetKind::Relation);
    pub const IN: Self = Self::of(TargetKind::In);
    pub const SET: Self = Self::of(TargetKind::Set);
    pub const PIECEWISE: Self = Self::of(TargetKind::Piecewise);
    pub const PROVIDED: Self = Self::of(TargetKind::Provided);
    pub const APPLICATION: Self = Self::of(TargetKind::Application);

    pub const SUM_MINUS: Self = Self(Self::SUM.0 | Self::MINUS.0);

    /// Every arithmetic operator node.
    pub const ARITHMETIC: Self =
        Self(Self::SUM.0 | Self::MINUS.0 | Self::MUL.0 | Self::DIV.0 | Self::POW.0);

    /// Every node kind.
    pub const ANY: Self = Self((1u32 << TargetKind::COUNT) - 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_table_matches_discriminants() {
        for (i, k) in TargetKind::ALL.iter().enumerate() {
            assert_eq!(*k as usize, i);
        }
        assert_eq!(TargetKindSet::ANY.iter().count(), TargetKind::COUNT);
    }

    #[test]
    fn set_membership() {
        let s = TargetKindSet::SUM | TargetKindSet::POW;
        assert!(s.contains(TargetKind::Sum));
        assert!(!s.contains(TargetKind::Mul));
        assert_eq!(s.to_string(), "{Sum, Pow}");
        assert_eq!(
            TargetKind::from_expr(&Expr::sin(Expr::var("x"))),
            TargetKind::Func
        );
    }
}
