use crate::expression::Expr;
use crate::number::Number;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Interval between two arbitrary endpoints.
///
/// Endpoints stay symbolic; their numeric value (when the evaluated endpoint
/// is a real number, infinities included) is computed lazily and cached.
#[derive(Debug, Clone)]
pub struct Interval {
    left: Expr,
    left_closed: bool,
    right: Expr,
    right_closed: bool,
    left_value: OnceLock<Option<Number>>,
    right_value: OnceLock<Option<Number>>,
}

fn real_value(e: &Expr) -> Option<Number> {
    let evaled = e.evaled();
    let n = evaled.as_number()?;
    (n.is_real() && !n.is_nan()).then(|| n.clone())
}

impl Interval {
    pub fn new(left: Expr, left_closed: bool, right: Expr, right_closed: bool) -> Interval {
        Interval {
            left,
            left_closed,
            right,
            right_closed,
            left_value: OnceLock::new(),
            right_value: OnceLock::new(),
        }
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }

    pub fn left_closed(&self) -> bool {
        self.left_closed
    }

    pub fn right_closed(&self) -> bool {
        self.right_closed
    }

    pub fn left_number(&self) -> Option<&Number> {
        self.left_value.get_or_init(|| real_value(&self.left)).as_ref()
    }

    pub fn right_number(&self) -> Option<&Number> {
        self.right_value.get_or_init(|| real_value(&self.right)).as_ref()
    }

    pub fn is_numeric(&self) -> bool {
        self.left_number().is_some() && self.right_number().is_some()
    }

    /// `Some` only when both endpoints are numeric.
    pub fn is_empty(&self) -> Option<bool> {
        let ord = self.left_number()?.cmp_real(self.right_number()?)?;
        Some(match ord {
            Ordering::Greater => true,
            Ordering::Equal => !(self.left_closed && self.right_closed),
            Ordering::Less => false,
        })
    }

    /// Membership of a real number; `None` when an endpoint is symbolic.
    pub fn contains_number(&self, x: &Number) -> Option<bool> {
        if x.is_nan() || !x.is_real() {
            return Some(false);
        }
        let lo = x.cmp_real(self.left_number()?)?;
        let hi = x.cmp_real(self.right_number()?)?;
        let above = lo == Ordering::Greater || (lo == Ordering::Equal && self.left_closed);
        let below = hi == Ordering::Less || (hi == Ordering::Equal && self.right_closed);
        Some(above && below)
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.left_closed == other.left_closed
            && self.right_closed == other.right_closed
            && self.left == other.left
            && self.right == other.right
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.left_closed.hash(state);
        self.right.hash(state);
        self.right_closed.hash(state);
    }
}
