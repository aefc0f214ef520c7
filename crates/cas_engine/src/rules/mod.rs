//! Rule groups, each exposing `register(&mut Simplifier)`.

pub mod algebra;
pub mod arithmetic;
pub mod boolean;
pub mod exponents;
pub mod fractions;
pub mod logarithms;
pub mod relations;
pub mod sets;
pub mod trigonometry;
