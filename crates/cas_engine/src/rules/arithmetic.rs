use crate::helpers::{num, numeric_coeff, with_coeff};
use crate::rule::Rewrite;
use cas_ast::{Expr, Node, Number, TargetKindSet};

define_rule!(
    FoldConstantsRule,
    "Fold Constants",
    Some(TargetKindSet::ARITHMETIC | TargetKindSet::FUNC | TargetKindSet::LOG),
    priority: 100,
    |expr| {
        if !expr.children().iter().all(Expr::is_number) {
            return None;
        }
        let folded = expr.inner_simplified();
        if !folded.is_number() {
            return None;
        }
        Some(Rewrite::simple(folded, "Evaluate numeric subexpression"))
    }
);

define_rule!(
    AddZeroRule,
    "Identity Property of Addition",
    Some(TargetKindSet::SUM),
    |expr| {
        let Node::Sum(lhs, rhs) = expr.node() else {
            return None;
        };
        if rhs.is_zero() {
            return Some(Rewrite::simple(lhs.clone(), "x + 0 = x"));
        }
        if lhs.is_zero() {
            return Some(Rewrite::simple(rhs.clone(), "0 + x = x"));
        }
        None
    }
);

define_rule!(
    SubZeroRule,
    "Subtract Zero",
    Some(TargetKindSet::MINUS),
    |expr| {
        let Node::Minus(lhs, rhs) = expr.node() else {
            return None;
        };
        if rhs.is_zero() {
            return Some(Rewrite::simple(lhs.clone(), "x - 0 = x"));
        }
        if lhs.is_zero() {
            return Some(Rewrite::simple(Expr::negate(rhs), "0 - x = -x"));
        }
        None
    }
);

define_rule!(
    SubSelfRule,
    "Additive Inverse",
    Some(TargetKindSet::MINUS),
    |expr| {
        match expr.node() {
            Node::Minus(lhs, rhs) if lhs == rhs => Some(Rewrite::simple(Expr::int(0), "x - x = 0")),
            _ => None,
        }
    }
);

define_rule!(
    MulOneRule,
    "Identity Property of Multiplication",
    Some(TargetKindSet::MUL),
    |expr| {
        let Node::Mul(lhs, rhs) = expr.node() else {
            return None;
        };
        if rhs.is_one() {
            return Some(Rewrite::simple(lhs.clone(), "x * 1 = x"));
        }
        if lhs.is_one() {
            return Some(Rewrite::simple(rhs.clone(), "1 * x = x"));
        }
        None
    }
);

define_rule!(
    MulZeroRule,
    "Zero Property of Multiplication",
    Some(TargetKindSet::MUL),
    |expr| {
        let Node::Mul(lhs, rhs) = expr.node() else {
            return None;
        };
        (lhs.is_zero() || rhs.is_zero()).then(|| Rewrite::simple(Expr::int(0), "x * 0 = 0"))
    }
);

define_rule!(
    DivOneRule,
    "Divide by One",
    Some(TargetKindSet::DIV),
    |expr| {
        match expr.node() {
            Node::Div(lhs, rhs) if rhs.is_one() => Some(Rewrite::simple(lhs.clone(), "x / 1 = x")),
            _ => None,
        }
    }
);

define_rule!(
    ZeroDivRule,
    "Zero Dividend",
    Some(TargetKindSet::DIV),
    |expr| {
        match expr.node() {
            Node::Div(lhs, rhs) if lhs.is_zero() && !rhs.is_number() => {
                Some(Rewrite::simple(Expr::int(0), "0 / x = 0"))
            }
            _ => None,
        }
    }
);

define_rule!(
    DivSelfRule,
    "Divide by Self",
    Some(TargetKindSet::DIV),
    |expr| {
        match expr.node() {
            Node::Div(lhs, rhs) if lhs == rhs && !rhs.is_zero() => {
                Some(Rewrite::simple(Expr::int(1), "x / x = 1"))
            }
            _ => None,
        }
    }
);

define_rule!(
    /// `x / n` becomes `(1/n) * x` so numeric coefficients live in one place.
    DivByNumberRule,
    "Divide by Number",
    Some(TargetKindSet::DIV),
    |expr| {
        let Node::Div(lhs, rhs) = expr.node() else {
            return None;
        };
        let n = num(rhs)?;
        if lhs.is_number() || !n.is_exact() || n.is_zero() {
            return None;
        }
        let (k, core) = numeric_coeff(lhs);
        Some(Rewrite::simple(
            with_coeff(&k / n, core),
            "x / n = (1/n) * x",
        ))
    }
);

define_rule!(
    NumberFirstInMulRule,
    "Coefficient First",
    Some(TargetKindSet::MUL),
    |expr| {
        match expr.node() {
            Node::Mul(lhs, rhs) if rhs.is_number() && !lhs.is_number() => Some(Rewrite::simple(
                Expr::mul(rhs, lhs),
                "x * n = n * x",
            )),
            _ => None,
        }
    }
);

define_rule!(
    MergeCoefficientsRule,
    "Merge Coefficients",
    Some(TargetKindSet::MUL),
    |expr| {
        let Node::Mul(lhs, rhs) = expr.node() else {
            return None;
        };
        // n * (m * x) = (n*m) * x
        if let (Some(n), Node::Mul(inner, x)) = (num(lhs), rhs.node()) {
            if let Some(m) = num(inner) {
                return Some(Rewrite::simple(
                    with_coeff(n * m, x.clone()),
                    "n * (m * x) = (n*m) * x",
                ));
            }
        }
        // (n * x) * y = n * (x * y)
        if let Node::Mul(inner, x) = lhs.node() {
            if inner.is_number() && !rhs.is_number() {
                return Some(Rewrite::simple(
                    Expr::mul(inner, Expr::mul(x, rhs)),
                    "(n * x) * y = n * (x * y)",
                ));
            }
        }
        None
    }
);

define_rule!(
    NumberLastInSumRule,
    "Constant Term Last",
    Some(TargetKindSet::SUM),
    |expr| {
        match expr.node() {
            Node::Sum(lhs, rhs) if lhs.is_number() && !rhs.is_number() => Some(Rewrite::simple(
                Expr::sum(rhs, lhs),
                "n + x = x + n",
            )),
            _ => None,
        }
    }
);

/// Coefficient of a term whose sign can move onto the enclosing operator.
fn negative_coeff(term: &Expr) -> Option<(Number, Expr)> {
    if let Some(n) = num(term) {
        return n.is_negative().then(|| (-n, Expr::int(1)));
    }
    let (k, core) = numeric_coeff(term);
    k.is_negative().then(|| (-k, core))
}

fn rebuild_term(k: Number, core: Expr) -> Expr {
    if core.is_one() {
        Expr::number(k)
    } else {
        with_coeff(k, core)
    }
}

define_rule!(
    NormalizeSignRule,
    "Normalize Sign",
    Some(TargetKindSet::SUM_MINUS),
    |expr| {
        match expr.node() {
            Node::Sum(lhs, rhs) => {
                if let Some((k, core)) = negative_coeff(rhs) {
                    return Some(Rewrite::simple(
                        Expr::minus(lhs, rebuild_term(k, core)),
                        "a + (-b) = a - b",
                    ));
                }
                if let Some((k, core)) = negative_coeff(lhs) {
                    return Some(Rewrite::simple(
                        Expr::minus(rhs, rebuild_term(k, core)),
                        "(-a) + b = b - a",
                    ));
                }
                None
            }
            Node::Minus(lhs, rhs) => {
                let (k, core) = negative_coeff(rhs)?;
                Some(Rewrite::simple(
                    Expr::sum(lhs, rebuild_term(k, core)),
                    "a - (-b) = a + b",
                ))
            }
            _ => None,
        }
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(FoldConstantsRule));
    simplifier.add_rule(Box::new(AddZeroRule));
    simplifier.add_rule(Box::new(SubZeroRule));
    simplifier.add_rule(Box::new(SubSelfRule));
    simplifier.add_rule(Box::new(MulOneRule));
    simplifier.add_rule(Box::new(MulZeroRule));
    simplifier.add_rule(Box::new(DivOneRule));
    simplifier.add_rule(Box::new(ZeroDivRule));
    simplifier.add_rule(Box::new(DivSelfRule));
    simplifier.add_rule(Box::new(DivByNumberRule));
    simplifier.add_rule(Box::new(NumberFirstInMulRule));
    simplifier.add_rule(Box::new(MergeCoefficientsRule));
    simplifier.add_rule(Box::new(NumberLastInSumRule));
    simplifier.add_rule(Box::new(NormalizeSignRule));
}
