use cas_ast::AstError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CasError {
    #[error(transparent)]
    Ast(#[from] AstError),
    /// Deliberately unimplemented; `milestone` names the release meant to add it
    #[error("{feature} is not supported yet (planned for {milestone})")]
    NotSupported {
        feature: String,
        milestone: &'static str,
    },
    #[error("Solver error: {0}")]
    SolverError(String),
    #[error("Variable '{0}' not found")]
    VariableNotFound(String),
}

impl CasError {
    pub fn not_supported(feature: impl Into<String>, milestone: &'static str) -> Self {
        CasError::NotSupported {
            feature: feature.into(),
            milestone,
        }
    }

    /// Internal invariant violations must propagate; everything else may be
    /// swallowed by a caller that has a fallback.
    pub fn is_internal(&self) -> bool {
        matches!(self, CasError::Ast(e) if e.is_internal())
    }
}
