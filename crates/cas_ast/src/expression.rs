//! Immutable, structurally shared expression nodes.
//!
//! An [`Expr`] is a cheap handle (`Arc`) to a node plus its codomain and a
//! hash computed once at construction. Equality is structural with a pointer
//! fast path, so the fixed-point rewrite loop can detect "nothing changed" by
//! identity (see [`Expr::ptr_eq`]) and fall back to deep comparison only
//! when handles differ.

use crate::builtin::{Constant, Func};
use crate::domain::Domain;
use crate::number::Number;
use crate::sets::{ConditionalSet, FiniteSet, Interval, SetPair};
use crate::tensor::Tensor;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Variable and binder names.
pub type Name = Arc<str>;

/// Child list returned by [`Expr::children`]; most nodes have at most two.
pub type Children = SmallVec<[Expr; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
    Xor,
    Implies,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
            LogicOp::Xor => "xor",
            LogicOp::Implies => "implies",
        }
    }

    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            LogicOp::And => a && b,
            LogicOp::Or => a || b,
            LogicOp::Xor => a != b,
            LogicOp::Implies => !a || b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Equals,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl RelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Equals => "=",
            RelOp::Greater => ">",
            RelOp::GreaterOrEqual => ">=",
            RelOp::Less => "<",
            RelOp::LessOrEqual => "<=",
        }
    }

    /// The relation with its sides swapped: `a > b` ⇔ `b < a`.
    pub fn flipped(self) -> RelOp {
        match self {
            RelOp::Equals => RelOp::Equals,
            RelOp::Greater => RelOp::Less,
            RelOp::GreaterOrEqual => RelOp::LessOrEqual,
            RelOp::Less => RelOp::Greater,
            RelOp::LessOrEqual => RelOp::GreaterOrEqual,
        }
    }

    /// Logical negation of an inequality; `None` for `=`.
    pub fn negated(self) -> Option<RelOp> {
        match self {
            RelOp::Equals => None,
            RelOp::Greater => Some(RelOp::LessOrEqual),
            RelOp::GreaterOrEqual => Some(RelOp::Less),
            RelOp::Less => Some(RelOp::GreaterOrEqual),
            RelOp::LessOrEqual => Some(RelOp::Greater),
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, RelOp::Greater | RelOp::Less)
    }

    /// Whether `a <op> b` holds given `a.cmp(b)`.
    pub fn holds(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            RelOp::Equals => ord == Equal,
            RelOp::Greater => ord == Greater,
            RelOp::GreaterOrEqual => ord != Less,
            RelOp::Less => ord == Less,
            RelOp::LessOrEqual => ord != Greater,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproachFrom {
    Left,
    Right,
    BothSides,
}

/// One guarded alternative of a piecewise expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Case {
    pub expr: Expr,
    pub predicate: Expr,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Number(Number),
    Variable(Name),
    Boolean(bool),

    Sum(Expr, Expr),
    /// `left - right`
    Minus(Expr, Expr),
    Mul(Expr, Expr),
    Div(Expr, Expr),
    Pow(Expr, Expr),
    Func(Func, Expr),
    /// `log(base, argument)`
    Log(Expr, Expr),

    Derivative {
        expr: Expr,
        var: Name,
        order: u32,
    },
    Integral {
        expr: Expr,
        var: Name,
        order: u32,
    },
    Limit {
        expr: Expr,
        var: Name,
        dest: Expr,
        side: ApproachFrom,
    },

    Not(Expr),
    Logic(LogicOp, Expr, Expr),
    Relation(RelOp, Expr, Expr),
    /// `element in set`
    In(Expr, Expr),

    Set(SetNode),
    Tensor(Tensor),

    Piecewise(Vec<Case>),
    /// `expr provided predicate`
    Provided(Expr, Expr),
    /// `function(argument)`
    Application(Expr, Expr),
    Lambda(Name, Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetNode {
    Finite(FiniteSet),
    Interval(Interval),
    Conditional(ConditionalSet),
    Special(Domain),
    Union(SetPair),
    Intersection(SetPair),
    SetMinus(SetPair),
}

struct ExprInner {
    node: Node,
    codomain: Domain,
    hash: u64,
    // `Some(None)` means the node evaluates to itself; storing a handle to
    // `self` would leak through the reference cycle
    evaled: OnceLock<Option<Expr>>,
    inner_simplified: OnceLock<Option<Expr>>,
}

/// Shared handle to an immutable node.
#[derive(Clone)]
pub struct Expr(Arc<ExprInner>);

// =============================================================================
// Core handle behavior
// =============================================================================

impl Expr {
    /// Build a node with its default codomain.
    pub fn new(node: Node) -> Expr {
        let codomain = node.default_codomain();
        Expr::with_domain(node, codomain)
    }

    fn with_domain(node: Node, codomain: Domain) -> Expr {
        let mut h = FxHasher::default();
        node.hash(&mut h);
        codomain.hash(&mut h);
        Expr(Arc::new(ExprInner {
            node,
            codomain,
            hash: h.finish(),
            evaled: OnceLock::new(),
            inner_simplified: OnceLock::new(),
        }))
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.0.node
    }

    #[inline]
    pub fn codomain(&self) -> Domain {
        self.0.codomain
    }

    /// Same children, different codomain.
    pub fn with_codomain(&self, codomain: Domain) -> Expr {
        if codomain == self.codomain() {
            return self.clone();
        }
        Expr::with_domain(self.node().clone(), codomain)
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    pub(crate) fn evaled_cell(&self) -> &OnceLock<Option<Expr>> {
        &self.0.evaled
    }

    pub(crate) fn inner_simplified_cell(&self) -> &OnceLock<Option<Expr>> {
        &self.0.inner_simplified
    }

    /// Ordered direct children (empty for leaves).
    pub fn children(&self) -> Children {
        self.node().children()
    }

    /// Rebuild this node over new children, keeping the codomain.
    ///
    /// Returns `self` by identity when every child is identical.
    pub fn with_children(&self, children: &[Expr]) -> Expr {
        let old = self.children();
        if old.len() == children.len() && old.iter().zip(children).all(|(a, b)| a.ptr_eq(b)) {
            return self.clone();
        }
        Expr::with_domain(self.node().with_children(children), self.codomain())
    }

    /// Apply `f` to every direct child.
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        let old = self.children();
        if old.is_empty() {
            return self.clone();
        }
        let new: Children = old.iter().map(&mut f).collect();
        self.with_children(&new)
    }

    /// Print grouping priority; higher binds tighter.
    pub fn priority(&self) -> u8 {
        match self.node() {
            Node::Number(n) => {
                if n.is_negative() || n.is_complex() || matches!(n, Number::Rational(_)) {
                    30
                } else {
                    100
                }
            }
            Node::Variable(_) | Node::Boolean(_) => 100,
            Node::Sum(..) | Node::Minus(..) => 20,
            Node::Mul(..) | Node::Div(..) => 40,
            Node::Pow(..) => 60,
            Node::Func(..)
            | Node::Log(..)
            | Node::Derivative { .. }
            | Node::Integral { .. }
            | Node::Limit { .. } => 80,
            Node::Not(_) => 9,
            Node::Logic(op, ..) => match op {
                LogicOp::And => 7,
                LogicOp::Or | LogicOp::Xor => 6,
                LogicOp::Implies => 5,
            },
            Node::Relation(..) | Node::In(..) => 10,
            Node::Set(s) => match s {
                SetNode::Union(_) | SetNode::SetMinus(_) => 14,
                SetNode::Intersection(_) => 15,
                _ => 100,
            },
            Node::Tensor(_) | Node::Piecewise(_) => 100,
            Node::Provided(..) => 2,
            Node::Application(..) => 90,
            Node::Lambda(..) => 3,
        }
    }

    /// Short variant name, used in diagnostics and rule dispatch.
    pub fn kind_name(&self) -> &'static str {
        self.node().kind_name()
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.0.hash == other.0.hash
                && self.0.codomain == other.0.codomain
                && self.0.node == other.0.node)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

// =============================================================================
// Node structure
// =============================================================================

impl Node {
    pub fn default_codomain(&self) -> Domain {
        match self {
            Node::Number(_)
            | Node::Variable(_)
            | Node::Sum(..)
            | Node::Minus(..)
            | Node::Mul(..)
            | Node::Div(..)
            | Node::Pow(..)
            | Node::Func(..)
            | Node::Log(..)
            | Node::Derivative { .. }
            | Node::Integral { .. }
            | Node::Limit { .. } => Domain::Complex,
            Node::Boolean(_)
            | Node::Not(_)
            | Node::Logic(..)
            | Node::Relation(..)
            | Node::In(..) => Domain::Boolean,
            Node::Set(_)
            | Node::Tensor(_)
            | Node::Piecewise(_)
            | Node::Provided(..)
            | Node::Application(..)
            | Node::Lambda(..) => Domain::Any,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "Number",
            Node::Variable(_) => "Variable",
            Node::Boolean(_) => "Boolean",
            Node::Sum(..) => "Sum",
            Node::Minus(..) => "Minus",
            Node::Mul(..) => "Mul",
            Node::Div(..) => "Div",
            Node::Pow(..) => "Pow",
            Node::Func(..) => "Func",
            Node::Log(..) => "Log",
            Node::Derivative { .. } => "Derivative",
            Node::Integral { .. } => "Integral",
            Node::Limit { .. } => "Limit",
            Node::Not(_) => "Not",
            Node::Logic(..) => "Logic",
            Node::Relation(..) => "Relation",
            Node::In(..) => "In",
            Node::Set(_) => "Set",
            Node::Tensor(_) => "Tensor",
            Node::Piecewise(_) => "Piecewise",
            Node::Provided(..) => "Provided",
            Node::Application(..) => "Application",
            Node::Lambda(..) => "Lambda",
        }
    }

    pub fn children(&self) -> Children {
        let mut out = Children::new();
        match self {
            Node::Number(_) | Node::Variable(_) | Node::Boolean(_) => {}
            Node::Sum(a, b)
            | Node::Minus(a, b)
            | Node::Mul(a, b)
            | Node::Div(a, b)
            | Node::Pow(a, b)
            | Node::Log(a, b)
            | Node::Logic(_, a, b)
            | Node::Relation(_, a, b)
            | Node::In(a, b)
            | Node::Provided(a, b)
            | Node::Application(a, b) => {
                out.push(a.clone());
                out.push(b.clone());
            }
            Node::Func(_, a) | Node::Not(a) | Node::Lambda(_, a) => out.push(a.clone()),
            Node::Derivative { expr, .. } | Node::Integral { expr, .. } => out.push(expr.clone()),
            Node::Limit { expr, dest, .. } => {
                out.push(expr.clone());
                out.push(dest.clone());
            }
            Node::Set(s) => match s {
                SetNode::Finite(fs) => out.extend(fs.iter().cloned()),
                SetNode::Interval(i) => {
                    out.push(i.left().clone());
                    out.push(i.right().clone());
                }
                SetNode::Conditional(c) => out.push(c.predicate().clone()),
                SetNode::Special(_) => {}
                SetNode::Union(p) | SetNode::Intersection(p) | SetNode::SetMinus(p) => {
                    out.push(p.left().clone());
                    out.push(p.right().clone());
                }
            },
            Node::Tensor(t) => out.extend(t.data().iter().cloned()),
            Node::Piecewise(cases) => {
                for c in cases {
                    out.push(c.expr.clone());
                    out.push(c.predicate.clone());
                }
            }
        }
        out
    }

    /// Same variant over new children (as produced by [`Node::children`]).
    ///
    /// A child list of the wrong length leaves the node unchanged.
    pub fn with_children(&self, c: &[Expr]) -> Node {
        let two = |f: fn(Expr, Expr) -> Node| -> Node {
            if c.len() == 2 {
                f(c[0].clone(), c[1].clone())
            } else {
                self.clone()
            }
        };
        let one = |f: &dyn Fn(Expr) -> Node| -> Node {
            if c.len() == 1 {
                f(c[0].clone())
            } else {
                self.clone()
            }
        };
        match self {
            Node::Number(_) | Node::Variable(_) | Node::Boolean(_) => self.clone(),
            Node::Sum(..) => two(Node::Sum),
            Node::Minus(..) => two(Node::Minus),
            Node::Mul(..) => two(Node::Mul),
            Node::Div(..) => two(Node::Div),
            Node::Pow(..) => two(Node::Pow),
            Node::Log(..) => two(Node::Log),
            Node::In(..) => two(Node::In),
            Node::Provided(..) => two(Node::Provided),
            Node::Application(..) => two(Node::Application),
            Node::Logic(op, ..) => {
                let op = *op;
                one_or_two(c, self, move |a, b| Node::Logic(op, a, b))
            }
            Node::Relation(op, ..) => {
                let op = *op;
                one_or_two(c, self, move |a, b| Node::Relation(op, a, b))
            }
            Node::Func(f, _) => one(&|a| Node::Func(*f, a)),
            Node::Not(_) => one(&Node::Not),
            Node::Lambda(name, _) => one(&|a| Node::Lambda(name.clone(), a)),
            Node::Derivative { var, order, .. } => one(&|a| Node::Derivative {
                expr: a,
                var: var.clone(),
                order: *order,
            }),
            Node::Integral { var, order, .. } => one(&|a| Node::Integral {
                expr: a,
                var: var.clone(),
                order: *order,
            }),
            Node::Limit { var, side, .. } => {
                let (var, side) = (var.clone(), *side);
                one_or_two(c, self, move |expr, dest| Node::Limit {
                    expr,
                    var: var.clone(),
                    dest,
                    side,
                })
            }
            Node::Set(s) => Node::Set(match s {
                SetNode::Finite(_) => SetNode::Finite(FiniteSet::new(c.iter().cloned())),
                SetNode::Interval(i) if c.len() == 2 => SetNode::Interval(Interval::new(
                    c[0].clone(),
                    i.left_closed(),
                    c[1].clone(),
                    i.right_closed(),
                )),
                SetNode::Conditional(cs) if c.len() == 1 => {
                    SetNode::Conditional(ConditionalSet::new(cs.var().clone(), c[0].clone()))
                }
                SetNode::Union(_) if c.len() == 2 => {
                    SetNode::Union(SetPair::new(c[0].clone(), c[1].clone()))
                }
                SetNode::Intersection(_) if c.len() == 2 => {
                    SetNode::Intersection(SetPair::new(c[0].clone(), c[1].clone()))
                }
                SetNode::SetMinus(_) if c.len() == 2 => {
                    SetNode::SetMinus(SetPair::new(c[0].clone(), c[1].clone()))
                }
                other => other.clone(),
            }),
            Node::Tensor(t) => match t.with_data(c.to_vec()) {
                Ok(t) => Node::Tensor(t),
                Err(_) => self.clone(),
            },
            Node::Piecewise(cases) if c.len() == cases.len() * 2 => Node::Piecewise(
                c.chunks(2)
                    .map(|pair| Case {
                        expr: pair[0].clone(),
                        predicate: pair[1].clone(),
                    })
                    .collect(),
            ),
            Node::Piecewise(_) => self.clone(),
        }
    }
}

fn one_or_two(c: &[Expr], fallback: &Node, f: impl Fn(Expr, Expr) -> Node) -> Node {
    if c.len() == 2 {
        f(c[0].clone(), c[1].clone())
    } else {
        fallback.clone()
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl Expr {
    pub fn as_number(&self) -> Option<&Number> {
        match self.node() {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&str> {
        match self.node() {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetNode> {
        match self.node() {
            Node::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_finite_set(&self) -> Option<&FiniteSet> {
        match self.node() {
            Node::Set(SetNode::Finite(fs)) => Some(fs),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self.node(), Node::Number(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self.node(), Node::Set(_))
    }

    /// Named constant (`pi`, `e`) this variable stands for, if any.
    pub fn as_constant(&self) -> Option<Constant> {
        self.as_var().and_then(Constant::from_name)
    }

    /// Whether the node is boolean-valued (a statement).
    pub fn is_statement(&self) -> bool {
        matches!(
            self.node(),
            Node::Boolean(_) | Node::Not(_) | Node::Logic(..) | Node::Relation(..) | Node::In(..)
        )
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl Expr {
    pub fn number(n: impl Into<Number>) -> Expr {
        Expr::new(Node::Number(n.into()))
    }

    pub fn int(n: i64) -> Expr {
        Expr::number(Number::int(n))
    }

    pub fn rational(num: i64, den: i64) -> Expr {
        Expr::number(Number::rational(num, den))
    }

    pub fn real(x: f64) -> Expr {
        Expr::number(Number::real(x))
    }

    pub fn nan() -> Expr {
        Expr::number(Number::nan())
    }

    pub fn i() -> Expr {
        Expr::number(Number::i())
    }

    pub fn var(name: &str) -> Expr {
        Expr::new(Node::Variable(Arc::from(name)))
    }

    pub fn pi() -> Expr {
        Expr::var(Constant::Pi.name())
    }

    pub fn e() -> Expr {
        Expr::var(Constant::E.name())
    }

    pub fn boolean(b: bool) -> Expr {
        Expr::new(Node::Boolean(b))
    }

    pub fn sum(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Sum(a.into(), b.into()))
    }

    pub fn minus(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Minus(a.into(), b.into()))
    }

    pub fn mul(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Mul(a.into(), b.into()))
    }

    pub fn div(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Div(a.into(), b.into()))
    }

    pub fn pow(base: impl Into<Expr>, exponent: impl Into<Expr>) -> Expr {
        Expr::new(Node::Pow(base.into(), exponent.into()))
    }

    pub fn sqrt(x: impl Into<Expr>) -> Expr {
        Expr::pow(x, Expr::rational(1, 2))
    }

    /// `-x`, represented as `-1 * x`.
    pub fn negate(x: impl Into<Expr>) -> Expr {
        Expr::mul(Expr::int(-1), x)
    }

    pub fn func(f: Func, arg: impl Into<Expr>) -> Expr {
        Expr::new(Node::Func(f, arg.into()))
    }

    pub fn sin(arg: impl Into<Expr>) -> Expr {
        Expr::func(Func::Sin, arg)
    }

    pub fn cos(arg: impl Into<Expr>) -> Expr {
        Expr::func(Func::Cos, arg)
    }

    pub fn tan(arg: impl Into<Expr>) -> Expr {
        Expr::func(Func::Tan, arg)
    }

    pub fn log(base: impl Into<Expr>, arg: impl Into<Expr>) -> Expr {
        Expr::new(Node::Log(base.into(), arg.into()))
    }

    pub fn ln(arg: impl Into<Expr>) -> Expr {
        Expr::log(Expr::e(), arg)
    }

    pub fn derivative(expr: impl Into<Expr>, var: &str, order: u32) -> Expr {
        Expr::new(Node::Derivative {
            expr: expr.into(),
            var: Arc::from(var),
            order,
        })
    }

    pub fn integral(expr: impl Into<Expr>, var: &str, order: u32) -> Expr {
        Expr::new(Node::Integral {
            expr: expr.into(),
            var: Arc::from(var),
            order,
        })
    }

    pub fn limit(expr: impl Into<Expr>, var: &str, dest: impl Into<Expr>, side: ApproachFrom) -> Expr {
        Expr::new(Node::Limit {
            expr: expr.into(),
            var: Arc::from(var),
            dest: dest.into(),
            side,
        })
    }

    pub fn not(a: impl Into<Expr>) -> Expr {
        Expr::new(Node::Not(a.into()))
    }

    pub fn logic(op: LogicOp, a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Logic(op, a.into(), b.into()))
    }

    pub fn and(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::logic(LogicOp::And, a, b)
    }

    pub fn or(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::logic(LogicOp::Or, a, b)
    }

    pub fn xor(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::logic(LogicOp::Xor, a, b)
    }

    pub fn implies(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::logic(LogicOp::Implies, a, b)
    }

    pub fn relation(op: RelOp, a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::new(Node::Relation(op, a.into(), b.into()))
    }

    pub fn equals(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::relation(RelOp::Equals, a, b)
    }

    pub fn greater(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::relation(RelOp::Greater, a, b)
    }

    pub fn greater_or_equal(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::relation(RelOp::GreaterOrEqual, a, b)
    }

    pub fn less(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::relation(RelOp::Less, a, b)
    }

    pub fn less_or_equal(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
        Expr::relation(RelOp::LessOrEqual, a, b)
    }

    pub fn in_set(element: impl Into<Expr>, set: impl Into<Expr>) -> Expr {
        Expr::new(Node::In(element.into(), set.into()))
    }

    pub fn provided(expr: impl Into<Expr>, predicate: impl Into<Expr>) -> Expr {
        Expr::new(Node::Provided(expr.into(), predicate.into()))
    }

    pub fn piecewise(cases: Vec<Case>) -> Expr {
        Expr::new(Node::Piecewise(cases))
    }

    pub fn lambda(param: &str, body: impl Into<Expr>) -> Expr {
        Expr::new(Node::Lambda(Arc::from(param), body.into()))
    }

    pub fn apply(function: impl Into<Expr>, argument: impl Into<Expr>) -> Expr {
        Expr::new(Node::Application(function.into(), argument.into()))
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::int(i64::from(n))
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Expr::number(n)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::boolean(b)
    }
}

macro_rules! impl_expr_op {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl<R: Into<Expr>> std::ops::$trait<R> for Expr {
            type Output = Expr;
            fn $method(self, rhs: R) -> Expr {
                Expr::$ctor(self, rhs)
            }
        }

        impl<R: Into<Expr>> std::ops::$trait<R> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: R) -> Expr {
                Expr::$ctor(self.clone(), rhs)
            }
        }
    };
}

impl_expr_op!(Add, add, sum);
impl_expr_op!(Sub, sub, minus);
impl_expr_op!(Mul, mul, mul);
impl_expr_op!(Div, div, div);

impl std::ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self)
    }
}

impl std::ops::Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self.clone())
    }
}
