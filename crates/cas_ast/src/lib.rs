// Clippy allows for patterns that are difficult to refactor safely
#![allow(clippy::should_implement_trait)] // Expr::mul/div/... are constructors, not ops
#![allow(clippy::len_without_is_empty)]

pub mod builtin;
pub mod cache;
pub mod display;
pub mod domain;
pub mod error;
pub mod eval;
pub mod expression;
pub mod number;
pub mod sets;
pub mod settings;
pub mod substitute;
pub mod symbol;
pub mod target_kind;
pub mod tensor;
pub mod traversal;

pub use builtin::{Constant, Func};
pub use domain::Domain;
pub use error::AstError;
pub use expression::{ApproachFrom, Case, Expr, LogicOp, Name, Node, RelOp, SetNode};
pub use number::Number;
pub use sets::{ConditionalSet, FiniteSet, Interval, SetPair};
pub use settings::Settings;
pub use target_kind::{TargetKind, TargetKindSet};
pub use tensor::Tensor;
