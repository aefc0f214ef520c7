//! Plain-text rendering for diagnostics and test messages.
//!
//! Children are parenthesized by [`Expr::priority`]; the output is meant to
//! be readable, not parseable.

use crate::builtin::Constant;
use crate::expression::{ApproachFrom, Expr, Node, SetNode};
use std::fmt;

/// Which side of a binary operator a child sits on.
#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

fn child(f: &mut fmt::Formatter<'_>, parent: u8, e: &Expr, side: Side, right_assoc: bool) -> fmt::Result {
    let p = e.priority();
    let tight = match (side, right_assoc) {
        (Side::Left, false) | (Side::Right, true) => p < parent,
        _ => p <= parent,
    };
    if tight {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

fn binary(f: &mut fmt::Formatter<'_>, e: &Expr, a: &Expr, op: &str, b: &Expr) -> fmt::Result {
    let p = e.priority();
    let right_assoc = matches!(e.node(), Node::Pow(..));
    child(f, p, a, Side::Left, right_assoc)?;
    write!(f, " {op} ")?;
    child(f, p, b, Side::Right, right_assoc)
}

fn list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, e) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{e}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Number(n) => write!(f, "{n}"),
            Node::Variable(name) => f.write_str(name),
            Node::Boolean(b) => write!(f, "{b}"),
            Node::Sum(a, b) => binary(f, self, a, "+", b),
            Node::Minus(a, b) => binary(f, self, a, "-", b),
            Node::Mul(a, b) => {
                if a.as_number().is_some_and(|n| n == &crate::Number::int(-1)) {
                    f.write_str("-")?;
                    return child(f, self.priority(), b, Side::Right, false);
                }
                binary(f, self, a, "*", b)
            }
            Node::Div(a, b) => binary(f, self, a, "/", b),
            Node::Pow(a, b) => binary(f, self, a, "^", b),
            Node::Func(func, arg) => write!(f, "{func}({arg})"),
            Node::Log(base, arg) => {
                if base.as_constant() == Some(Constant::E) {
                    write!(f, "ln({arg})")
                } else {
                    write!(f, "log({base}, {arg})")
                }
            }
            Node::Derivative { expr, var, order } => {
                write!(f, "derivative({expr}, {var}, {order})")
            }
            Node::Integral { expr, var, order } => write!(f, "integral({expr}, {var}, {order})"),
            Node::Limit {
                expr,
                var,
                dest,
                side,
            } => {
                let name = match side {
                    ApproachFrom::BothSides => "limit",
                    ApproachFrom::Left => "limitleft",
                    ApproachFrom::Right => "limitright",
                };
                write!(f, "{name}({expr}, {var}, {dest})")
            }
            Node::Not(a) => {
                f.write_str("not ")?;
                child(f, self.priority(), a, Side::Right, true)
            }
            Node::Logic(op, a, b) => binary(f, self, a, op.symbol(), b),
            Node::Relation(op, a, b) => binary(f, self, a, op.symbol(), b),
            Node::In(a, b) => binary(f, self, a, "in", b),
            Node::Set(s) => match s {
                SetNode::Finite(fs) => {
                    f.write_str("{")?;
                    list(f, &fs.iter().cloned().collect::<Vec<_>>())?;
                    f.write_str("}")
                }
                SetNode::Interval(i) => write!(
                    f,
                    "{}{}; {}{}",
                    if i.left_closed() { '[' } else { '(' },
                    i.left(),
                    i.right(),
                    if i.right_closed() { ']' } else { ')' }
                ),
                SetNode::Conditional(c) => write!(f, "{{ {} | {} }}", c.var(), c.predicate()),
                SetNode::Special(d) => write!(f, "{d}"),
                SetNode::Union(p) => binary(f, self, p.left(), "\\/", p.right()),
                SetNode::Intersection(p) => binary(f, self, p.left(), "/\\", p.right()),
                SetNode::SetMinus(p) => binary(f, self, p.left(), "\\", p.right()),
            },
            Node::Tensor(t) => {
                if let [_, width] = t.shape() {
                    f.write_str("[")?;
                    for (i, row) in t.data().chunks(*width).enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        f.write_str("[")?;
                        list(f, row)?;
                        f.write_str("]")?;
                    }
                    f.write_str("]")
                } else {
                    f.write_str("[")?;
                    list(f, t.data())?;
                    f.write_str("]")
                }
            }
            Node::Piecewise(cases) => {
                f.write_str("piecewise(")?;
                for (i, c) in cases.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} provided {}", c.expr, c.predicate)?;
                }
                f.write_str(")")
            }
            Node::Provided(a, b) => binary(f, self, a, "provided", b),
            Node::Application(func, arg) => {
                child(f, self.priority(), func, Side::Left, false)?;
                write!(f, "({arg})")
            }
            Node::Lambda(param, body) => write!(f, "({param} -> {body})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn arithmetic_grouping() {
        let x = Expr::var("x");
        assert_eq!((&x + 1).to_string(), "x + 1");
        assert_eq!(((&x + 1) * 2).to_string(), "(x + 1) * 2");
        assert_eq!((&x - (Expr::var("y") - 1)).to_string(), "x - (y - 1)");
        assert_eq!(Expr::pow(Expr::pow(&x, 2), 3).to_string(), "(x ^ 2) ^ 3");
        assert_eq!((-&x).to_string(), "-x");
    }

    #[test]
    fn sets_render() {
        assert_eq!(Expr::finite_set([1, 2]).to_string(), "{1, 2}");
        assert_eq!(Expr::interval(1, true, 3, false).to_string(), "[1; 3)");
        assert_eq!(Expr::special_set(Domain::Real).to_string(), "RR");
    }
}
