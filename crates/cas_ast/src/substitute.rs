//! Bottom-up rewriting, capture-avoiding substitution and beta reduction.

use crate::expression::{Expr, Name, Node, SetNode};
use crate::sets::ConditionalSet;
use crate::symbol::fresh_name;
use std::sync::Arc;

enum Frame {
    Enter(Expr),
    Exit(Expr, usize),
}

impl Expr {
    /// Rebuild the tree bottom-up, applying `f` to every node after its
    /// children have been transformed.
    ///
    /// Returns `self` by identity when `f` changes nothing, so callers can
    /// detect a fixed point with [`Expr::ptr_eq`].
    pub fn replace(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        let mut work = vec![Frame::Enter(self.clone())];
        let mut done: Vec<Expr> = Vec::new();
        while let Some(frame) = work.pop() {
            match frame {
                Frame::Enter(e) => {
                    let children = e.children();
                    work.push(Frame::Exit(e, children.len()));
                    work.extend(children.into_iter().rev().map(Frame::Enter));
                }
                Frame::Exit(e, n) => {
                    let start = done.len().saturating_sub(n);
                    let rebuilt = e.with_children(&done[start..]);
                    done.truncate(start);
                    done.push(f(&rebuilt));
                }
            }
        }
        done.pop().unwrap_or_else(|| self.clone())
    }

    /// Replace every occurrence of `target` by `value`.
    ///
    /// Binder nodes (derivative, integral, limit, lambda, conditional set)
    /// whose bound name is free in `target` or `value` are alpha-renamed to
    /// a fresh name first, so no free variable of `value` is captured and a
    /// bound occurrence is never mistaken for `target`.
    pub fn substitute(&self, target: &Expr, value: &Expr) -> Expr {
        if self == target {
            return value.clone();
        }
        match self.node() {
            Node::Derivative { expr, var, order } => {
                let (var, expr) = self.rebind(var, expr, target, value);
                Expr::new(Node::Derivative {
                    expr: expr.substitute(target, value),
                    var,
                    order: *order,
                })
                .with_codomain(self.codomain())
            }
            Node::Integral { expr, var, order } => {
                let (var, expr) = self.rebind(var, expr, target, value);
                Expr::new(Node::Integral {
                    expr: expr.substitute(target, value),
                    var,
                    order: *order,
                })
                .with_codomain(self.codomain())
            }
            Node::Limit {
                expr,
                var,
                dest,
                side,
            } => {
                let (var, expr) = self.rebind(var, expr, target, value);
                Expr::new(Node::Limit {
                    expr: expr.substitute(target, value),
                    var,
                    dest: dest.substitute(target, value),
                    side: *side,
                })
                .with_codomain(self.codomain())
            }
            Node::Lambda(param, body) => {
                let (param, body) = self.rebind(param, body, target, value);
                Expr::new(Node::Lambda(param, body.substitute(target, value)))
                    .with_codomain(self.codomain())
            }
            Node::Set(SetNode::Conditional(c)) => {
                let (var, predicate) = self.rebind(c.var(), c.predicate(), target, value);
                Expr::new(Node::Set(SetNode::Conditional(ConditionalSet::new(
                    var,
                    predicate.substitute(target, value),
                ))))
                .with_codomain(self.codomain())
            }
            _ => self.map_children(|c| c.substitute(target, value)),
        }
    }

    /// Alpha-rename `var` in `body` when it clashes with the free variables
    /// of `target` or `value`.
    fn rebind(&self, var: &Name, body: &Expr, target: &Expr, value: &Expr) -> (Name, Expr) {
        if !target.has_free_var(var) && !value.has_free_var(var) {
            return (var.clone(), body.clone());
        }
        let mut taken = self.all_names();
        taken.extend(target.all_names());
        taken.extend(value.all_names());
        let fresh: Name = Arc::from(fresh_name(&format!("{var}_"), &taken));
        let renamed = body.substitute(&Expr::var(var), &Expr::var(&fresh));
        (fresh, renamed)
    }

    /// Substitute several pairs in sequence.
    pub fn substitute_all<'a>(&self, pairs: impl IntoIterator<Item = (&'a Expr, &'a Expr)>) -> Expr {
        pairs
            .into_iter()
            .fold(self.clone(), |acc, (t, v)| acc.substitute(t, v))
    }

    /// Reduce every `(lambda p. body)(arg)` to `body[p := arg]`.
    pub fn beta_reduce(&self) -> Expr {
        let mut current = self.clone();
        // a reduction can expose a new redex; bounded by tree size
        for _ in 0..64 {
            let next = current.replace(|e| match e.node() {
                Node::Application(f, arg) => match f.node() {
                    Node::Lambda(param, body) => body.substitute(&Expr::var(param), arg),
                    _ => e.clone(),
                },
                _ => e.clone(),
            });
            if next.ptr_eq(&current) {
                break;
            }
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ApproachFrom;

    #[test]
    fn replace_preserves_identity_when_nothing_changes() {
        let e = Expr::sin(Expr::var("x")) + Expr::var("y") * 3;
        let same = e.replace(|n| n.clone());
        assert!(same.ptr_eq(&e));
    }

    #[test]
    fn replace_rewrites_bottom_up() {
        let e = Expr::var("x") + Expr::var("x");
        let out = e.replace(|n| match n.as_var() {
            Some("x") => Expr::int(2),
            _ => n.clone(),
        });
        assert_eq!(out, Expr::int(2) + 2);
    }

    #[test]
    fn substitute_replaces_subtrees() {
        let x = Expr::var("x");
        let s = Expr::sin(&x);
        let e = Expr::pow(&s, 2) + &s;
        let t = Expr::var("t");
        assert_eq!(e.substitute(&s, &t), Expr::pow(&t, 2) + &t);
    }

    #[test]
    fn lambda_does_not_capture() {
        // (lambda y. x + y)[x := y] must not become lambda y. y + y
        let f = Expr::lambda("y", Expr::var("x") + Expr::var("y"));
        let out = f.substitute(&Expr::var("x"), &Expr::var("y"));
        match out.node() {
            Node::Lambda(param, body) => {
                assert_ne!(&**param, "y");
                assert_eq!(body, &(Expr::var("y") + Expr::var(param)));
            }
            other => panic!("expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn bound_variable_is_not_a_substitution_target() {
        let lim = Expr::limit(Expr::var("x") * 2, "x", 0, ApproachFrom::BothSides);
        let out = lim.substitute(&Expr::var("x"), &Expr::int(5));
        assert!(!out.contains_node(&Expr::int(5)));
        assert!(!out.has_free_var("x"));
    }

    #[test]
    fn beta_reduction() {
        let f = Expr::lambda("y", Expr::var("y") * 2);
        let app = Expr::apply(f, Expr::var("z") + 1);
        assert_eq!(app.beta_reduce(), (Expr::var("z") + 1) * 2);
    }
}
