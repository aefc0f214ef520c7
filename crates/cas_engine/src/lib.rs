// Clippy allows for patterns that are difficult to refactor safely
#![allow(clippy::match_like_matches_macro)] // Some matches are clearer expanded

#[macro_use]
pub mod macros;

pub mod engine;
pub mod error;
pub mod helpers;
pub mod nary;
pub mod rule;
pub mod rules;
pub mod step;

pub use engine::Simplifier;
pub use error::CasError;
pub use rule::{Rewrite, Rule, SimpleRule};
pub use step::Step;
