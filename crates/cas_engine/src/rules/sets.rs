//! Set-operator collapsing.

use crate::rule::Rewrite;
use cas_ast::{Expr, Node, SetNode, TargetKindSet};

define_rule!(
    /// Union, intersection and difference with finite or empty operands
    /// collapse into a single set.
    CollapseSetOperationRule,
    "Collapse Set Operation",
    Some(TargetKindSet::SET),
    |expr| {
        let Node::Set(set) = expr.node() else {
            return None;
        };
        let (result, what) = match set {
            SetNode::Union(pair) => (Expr::unite_sets(pair.left(), pair.right()), "union"),
            SetNode::Intersection(pair) => {
                let (a, b) = (pair.left(), pair.right());
                let result = if a.is_empty_set() == Some(true) || b.is_empty_set() == Some(true) {
                    Expr::empty_set()
                } else {
                    Expr::intersect_sets(a, b)
                };
                (result, "intersection")
            }
            SetNode::SetMinus(pair) => {
                let (a, b) = (pair.left(), pair.right());
                let result = if a == b { Expr::empty_set() } else { Expr::subtract_sets(a, b) };
                (result, "difference")
            }
            _ => return None,
        };
        Some(Rewrite::simple(result, format!("Evaluate {}", what)))
    }
);

define_rule!(
    /// `[a, a]` is `{a}`; an interval with one open end at a repeated
    /// endpoint is empty.
    DegenerateIntervalRule,
    "Degenerate Interval",
    Some(TargetKindSet::SET),
    |expr| {
        let Node::Set(SetNode::Interval(interval)) = expr.node() else {
            return None;
        };
        let (l, r) = (interval.left_number()?, interval.right_number()?);
        if l != r {
            return None;
        }
        let result = if interval.left_closed() && interval.right_closed() {
            Expr::finite_set([interval.left().clone()])
        } else {
            Expr::empty_set()
        };
        Some(Rewrite::simple(result, "Interval with equal endpoints"))
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(CollapseSetOperationRule));
    simplifier.add_rule(Box::new(DegenerateIntervalRule));
}
