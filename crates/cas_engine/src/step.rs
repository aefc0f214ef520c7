use cas_ast::Expr;

/// One rule application recorded by [`crate::Simplifier::simplify_with_steps`].
#[derive(Debug, Clone)]
pub struct Step {
    pub description: String,
    pub rule_name: String,
    /// The subtree the rule fired on
    pub before: Expr,
    /// Its replacement
    pub after: Expr,
}

impl Step {
    pub fn new(description: &str, rule_name: &str, before: Expr, after: Expr) -> Self {
        Self {
            description: description.to_string(),
            rule_name: rule_name.to_string(),
            before,
            after,
        }
    }
}
