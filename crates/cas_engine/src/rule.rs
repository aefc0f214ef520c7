use cas_ast::{Expr, TargetKindSet};

/// Result of a rule application containing the new expression and metadata
#[derive(Debug, Clone)]
pub struct Rewrite {
    /// The transformed expression
    pub new_expr: Expr,
    /// Human-readable description of the transformation
    pub description: String,
}

impl Rewrite {
    pub fn simple(new_expr: Expr, description: impl Into<String>) -> Self {
        Rewrite {
            new_expr,
            description: description.into(),
        }
    }
}

/// Simplified rule trait; most rules implement this through `define_rule!`.
pub trait SimpleRule {
    fn name(&self) -> &str;
    fn apply_simple(&self, expr: &Expr) -> Option<Rewrite>;
    /// Node kinds this rule can fire on; `None` means every node.
    fn target_types(&self) -> Option<TargetKindSet> {
        None
    }
    fn priority(&self) -> i32 {
        0
    }
}

/// Main rule trait consumed by the simplifier.
///
/// A rule is a pure function of the node it is given and must return `None`
/// when it does not apply. Rules with higher priority are tried first.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, expr: &Expr) -> Option<Rewrite>;

    fn target_types(&self) -> Option<TargetKindSet> {
        None
    }

    fn priority(&self) -> i32 {
        0
    }
}

impl<T: SimpleRule + Send + Sync> Rule for T {
    fn name(&self) -> &str {
        SimpleRule::name(self)
    }

    fn apply(&self, expr: &Expr) -> Option<Rewrite> {
        self.apply_simple(expr)
    }

    fn target_types(&self) -> Option<TargetKindSet> {
        SimpleRule::target_types(self)
    }

    fn priority(&self) -> i32 {
        SimpleRule::priority(self)
    }
}
