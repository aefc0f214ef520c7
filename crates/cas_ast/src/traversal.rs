//! Canonical AST traversal utilities.
//!
//! Every function here is iterative (explicit stack), so arbitrarily deep
//! trees cannot overflow the call stack.

use crate::builtin::Constant;
use crate::expression::{Expr, Name, Node, SetNode};
use rustc_hash::FxHashSet;
use std::rc::Rc;

/// Depth-first, pre-order iterator over every node of a tree.
pub struct Nodes {
    stack: Vec<Expr>,
}

impl Iterator for Nodes {
    type Item = Expr;

    fn next(&mut self) -> Option<Expr> {
        let e = self.stack.pop()?;
        let children = e.children();
        self.stack.extend(children.into_iter().rev());
        Some(e)
    }
}

/// Count all nodes in a tree.
pub fn complexity(root: &Expr) -> usize {
    root.nodes().count()
}

/// Node count and maximum depth (the root has depth 0).
pub fn count_nodes_and_max_depth(root: &Expr) -> (usize, usize) {
    let mut count = 0;
    let mut max_depth = 0;
    let mut stack = vec![(root.clone(), 0usize)];
    while let Some((e, depth)) = stack.pop() {
        count += 1;
        max_depth = max_depth.max(depth);
        for c in e.children() {
            stack.push((c, depth + 1));
        }
    }
    (count, max_depth)
}

/// Scope chain of names bound by enclosing binders.
struct Scope {
    name: Name,
    parent: Option<Rc<Scope>>,
}

fn is_bound(scope: &Option<Rc<Scope>>, name: &str) -> bool {
    let mut cur = scope.as_deref();
    while let Some(s) = cur {
        if &*s.name == name {
            return true;
        }
        cur = s.parent.as_deref();
    }
    false
}

fn bind(scope: &Option<Rc<Scope>>, name: &Name) -> Option<Rc<Scope>> {
    Some(Rc::new(Scope {
        name: name.clone(),
        parent: scope.clone(),
    }))
}

/// Push the children of `e`, tagging those under a binder with the extended
/// scope.
fn push_scoped(e: &Expr, scope: &Option<Rc<Scope>>, stack: &mut Vec<(Expr, Option<Rc<Scope>>)>) {
    match e.node() {
        Node::Derivative { expr, var, .. } | Node::Integral { expr, var, .. } => {
            stack.push((expr.clone(), bind(scope, var)));
        }
        Node::Limit {
            expr, var, dest, ..
        } => {
            stack.push((dest.clone(), scope.clone()));
            stack.push((expr.clone(), bind(scope, var)));
        }
        Node::Lambda(param, body) => stack.push((body.clone(), bind(scope, param))),
        Node::Set(SetNode::Conditional(c)) => {
            stack.push((c.predicate().clone(), bind(scope, c.var())));
        }
        _ => {
            for c in e.children().into_iter().rev() {
                stack.push((c, scope.clone()));
            }
        }
    }
}

impl Expr {
    pub fn nodes(&self) -> Nodes {
        Nodes {
            stack: vec![self.clone()],
        }
    }

    /// Whether `target` occurs anywhere in this tree (syntactically).
    pub fn contains_node(&self, target: &Expr) -> bool {
        self.nodes().any(|n| &n == target)
    }

    /// Number of non-overlapping occurrences of `target`.
    pub fn count_occurrences(&self, target: &Expr) -> usize {
        let mut count = 0;
        let mut stack = vec![self.clone()];
        while let Some(e) = stack.pop() {
            if &e == target {
                count += 1;
                continue;
            }
            stack.extend(e.children());
        }
        count
    }

    /// Free variables, excluding the named constants `pi` and `e`.
    pub fn free_vars(&self) -> FxHashSet<Name> {
        let mut out = FxHashSet::default();
        let mut stack = vec![(self.clone(), None)];
        while let Some((e, scope)) = stack.pop() {
            if let Node::Variable(name) = e.node() {
                if Constant::from_name(name).is_none() && !is_bound(&scope, name) {
                    out.insert(name.clone());
                }
                continue;
            }
            push_scoped(&e, &scope, &mut stack);
        }
        out
    }

    /// Free variables as expressions, sorted by name.
    pub fn vars(&self) -> Vec<Expr> {
        let mut names: Vec<Name> = self.free_vars().into_iter().collect();
        names.sort();
        names.iter().map(|n| Expr::var(n)).collect()
    }

    /// Whether `name` occurs free.
    pub fn has_free_var(&self, name: &str) -> bool {
        let mut stack = vec![(self.clone(), None)];
        while let Some((e, scope)) = stack.pop() {
            if let Node::Variable(v) = e.node() {
                if &**v == name && !is_bound(&scope, name) {
                    return true;
                }
                continue;
            }
            push_scoped(&e, &scope, &mut stack);
        }
        false
    }

    /// Every name used anywhere in the tree: free, bound, and binder names.
    pub fn all_names(&self) -> FxHashSet<Name> {
        let mut out = FxHashSet::default();
        for n in self.nodes() {
            match n.node() {
                Node::Variable(v) => {
                    out.insert(v.clone());
                }
                Node::Derivative { var, .. }
                | Node::Integral { var, .. }
                | Node::Limit { var, .. }
                | Node::Lambda(var, _) => {
                    out.insert(var.clone());
                }
                Node::Set(SetNode::Conditional(c)) => {
                    out.insert(c.var().clone());
                }
                _ => {}
            }
        }
        out
    }
}
