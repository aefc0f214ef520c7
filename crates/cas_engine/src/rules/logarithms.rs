use crate::rule::Rewrite;
use cas_ast::{Expr, Node, TargetKindSet};

define_rule!(
    LogOfBaseRule,
    "Logarithm of Base",
    Some(TargetKindSet::LOG),
    |expr| {
        match expr.node() {
            Node::Log(base, arg) if base == arg && !base.is_number() => {
                Some(Rewrite::simple(Expr::int(1), "log(b, b) = 1"))
            }
            _ => None,
        }
    }
);

define_rule!(
    LogOfOneRule,
    "Logarithm of One",
    Some(TargetKindSet::LOG),
    |expr| {
        match expr.node() {
            Node::Log(base, arg) if arg.is_one() && !base.is_number() => {
                Some(Rewrite::simple(Expr::int(0), "log(b, 1) = 0"))
            }
            _ => None,
        }
    }
);

define_rule!(
    LogOfPowerOfBaseRule,
    "Logarithm of Power of Base",
    Some(TargetKindSet::LOG),
    |expr| {
        let Node::Log(base, arg) = expr.node() else {
            return None;
        };
        match arg.node() {
            Node::Pow(b, x) if b == base => Some(Rewrite::simple(x.clone(), "log(b, b^x) = x")),
            _ => None,
        }
    }
);

define_rule!(
    PowerOfLogRule,
    "Base Raised to Logarithm",
    Some(TargetKindSet::POW),
    |expr| {
        let Node::Pow(base, exp) = expr.node() else {
            return None;
        };
        match exp.node() {
            Node::Log(b, x) if b == base => Some(Rewrite::simple(x.clone(), "b^log(b, x) = x")),
            _ => None,
        }
    }
);

pub fn register(simplifier: &mut crate::Simplifier) {
    simplifier.add_rule(Box::new(LogOfBaseRule));
    simplifier.add_rule(Box::new(LogOfOneRule));
    simplifier.add_rule(Box::new(LogOfPowerOfBaseRule));
    simplifier.add_rule(Box::new(PowerOfLogRule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    #[test]
    fn test_log_identities() {
        let x = Expr::var("x");
        let b = Expr::var("b");
        assert_eq!(LogOfBaseRule.apply(&Expr::log(&b, &b)).unwrap().new_expr, Expr::int(1));
        assert_eq!(LogOfOneRule.apply(&Expr::log(&b, 1)).unwrap().new_expr, Expr::int(0));
        let e = Expr::log(&b, Expr::pow(&b, &x));
        assert_eq!(LogOfPowerOfBaseRule.apply(&e).unwrap().new_expr, x);
        let e = Expr::pow(&b, Expr::log(&b, &x));
        assert_eq!(PowerOfLogRule.apply(&e).unwrap().new_expr, x);
    }

    #[test]
    fn test_ln_of_e() {
        let e = Expr::ln(Expr::e());
        assert_eq!(LogOfBaseRule.apply(&e).unwrap().new_expr, Expr::int(1));
    }
}
