//! # cas_solver
//!
//! Equation, inequality and statement solving over `cas_ast` nodes.
//!
//! - [`invert`]: per-node-kind inversion `N(x) = V  =>  x in {...}`
//! - [`solve_equation`]: the strategy cascade for `expr = 0`
//! - [`solve`]: boolean statements lifted onto set algebra
//!
//! Every entry point returns a set expression. An empty set means no strategy
//! found a solution, not that none exists.

pub mod downcast;
pub mod inequality;
pub mod invert;
pub mod numeric;
pub mod polynomial;
pub mod solve_core;
pub mod statement;
pub mod strategies;
pub mod strategy;
pub mod tree;

pub use downcast::try_downcast;
pub use inequality::solve_inequality;
pub use invert::invert;
pub use solve_core::{solve_equation, MAX_SOLVE_DEPTH};
pub use statement::solve;
pub use strategy::{SolveCtx, SolverStrategy};
