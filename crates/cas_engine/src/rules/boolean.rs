use crate::rule::Rewrite;
use cas_ast::{Expr, LogicOp, Node, TargetKindSet};

define_rule!(
    /// Statements whose operands all reduce to constants evaluate to a Boolean.
    FoldStatementRule,
    "Evaluate Statement",
    Some(TargetKindSet::NOT | TargetKindSet::LOGIC | TargetKindSet::RELATION | TargetKindSet::IN),
    priority: 100,
    |expr| {
        let folded = expr.inner_simplified();
        folded
            .as_bool()
            .map(|b| Rewrite::simple(Expr::boolean(b), format!("{} evaluates to {}", expr, b)))
    }
);

define_rule!(
    LogicWithConstantRule,
    "Logic with Constant",
    Some(TargetKindSet::LOGIC),
    |expr| {
        let Node::Logic(op, lhs, rhs) = expr.node() else {
            return None;
        };
        let result = match (op, lhs.as_bool(), rhs.as_bool()) {
            (LogicOp::And, Some(true), _) => rhs.clone(),
            (LogicOp::And, _, Some(true)) => lhs.clone(),
            (LogicOp::And, Some(false), _) | (LogicOp::And, _, Some(false)) => Expr::boolean(false),
            (LogicOp::Or, Some(false), _) => rhs.clone(),
            (LogicOp::Or, _, Some(false)) => lhs.clone(),
            (LogicOp::Or, Some(true), _) | (LogicOp::Or, _, Some(true)) => Expr::boolean(true),
            (LogicOp::Xor, Some(false), _) => rhs.clone(),
            (LogicOp::Xor, _, Some(false)) => lhs.clone(),
            (LogicOp::Xor, Some(true), _) => Expr::not(rhs),
            (LogicOp::Xor, _, Some(true)) => Expr::not(lhs),
            (LogicOp::Implies, Some(true), _) => rhs.clone(),
            (LogicOp::Implies, Some(false), _) | (LogicOp::Implies, _, Some(true)) => {
                Expr::boolean(true)
            }
            (LogicOp::Implies, _, Some(false)) => Expr::not(lhs),
            _ => return None,
        };
        Some(Rewrite::simple(result, format!("{} with a constant", op.symbol())))
    }
);

define_rule!(
    IdempotentLogicRule,
    "Idempotent Logic",
    Some(TargetKindSet::LOGIC),
    |expr| {
        let Node::Logic(op, lhs, rhs) = expr.node() else {
            return None;
        };
        if lhs != rhs {
            return None;
        }
        let result = match op {
            LogicOp::And | LogicOp::Or => lhs.clone(),
            LogicOp::Xor => Expr::boolean(false),
            LogicOp::Implies => Expr::boolean(true),
        };
        Some(Rewrite::simple(result, format!("a {} a", op.symbol())))
    }
);

define_rule!(
    DoubleNegationRule,
    "Double Negation",
    Some(TargetKindSet::NOT),
    |expr| {
        let Node::Not(inner) = expr.node() else {
            return None;
        };
        match inner.node() {
            Node::Not(x) => Some(Rewrite::simple(x.clone(), "not not a = a")),
            _ => None,
        }
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(FoldStatementRule));
    simplifier.add_rule(Box::new(LogicWithConstantRule));
    simplifier.add_rule(Box::new(IdempotentLogicRule));
    simplifier.add_rule(Box::new(DoubleNegationRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn p() -> Expr {
        Expr::var("p")
    }

    #[test]
    fn test_fold_statement() {
        let e = Expr::less(1, 2);
        assert_eq!(FoldStatementRule.apply(&e).unwrap().new_expr, Expr::boolean(true));
        assert!(FoldStatementRule.apply(&Expr::less(p(), 2)).is_none());
    }

    #[test]
    fn test_logic_with_constant() {
        let e = Expr::and(p(), true);
        assert_eq!(LogicWithConstantRule.apply(&e).unwrap().new_expr, p());
        let e = Expr::or(p(), true);
        assert_eq!(LogicWithConstantRule.apply(&e).unwrap().new_expr, Expr::boolean(true));
        let e = Expr::implies(p(), false);
        assert_eq!(LogicWithConstantRule.apply(&e).unwrap().new_expr, Expr::not(p()));
        let e = Expr::xor(true, p());
        assert_eq!(LogicWithConstantRule.apply(&e).unwrap().new_expr, Expr::not(p()));
    }

    #[test]
    fn test_double_negation() {
        let e = Expr::not(Expr::not(p()));
        assert_eq!(DoubleNegationRule.apply(&e).unwrap().new_expr, p());
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(IdempotentLogicRule.apply(&Expr::or(p(), p())).unwrap().new_expr, p());
        assert_eq!(
            IdempotentLogicRule.apply(&Expr::xor(p(), p())).unwrap().new_expr,
            Expr::boolean(false)
        );
    }
}
