//! Dense N-dimensional arrays of expressions (row-major).
//!
//! Only construction and element access live here; linear algebra is out of
//! scope.

use crate::error::AstError;
use crate::expression::{Expr, Node};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<Expr>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<Expr>) -> Result<Tensor, AstError> {
        let expected: usize = shape.iter().product();
        if shape.is_empty() || expected != data.len() {
            return Err(AstError::InvalidMatrix {
                reason: format!(
                    "shape {shape:?} needs {expected} elements, got {}",
                    data.len()
                ),
            });
        }
        Ok(Tensor { shape, data })
    }

    /// Build a matrix from rows, which must all have the same width.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Tensor, AstError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(AstError::InvalidMatrix {
                reason: "matrix needs at least one non-empty row".to_string(),
            });
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AstError::InvalidMatrix {
                reason: format!("row {i} has {} elements, expected {width}", row.len()),
            });
        }
        let height = rows.len();
        let data: Vec<Expr> = rows.into_iter().flatten().collect();
        crate::ensure_ast_invariant!(
            data.len() == height * width,
            "flattened {height}x{width} matrix has {} elements",
            data.len()
        );
        Ok(Tensor {
            shape: vec![height, width],
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[Expr] {
        &self.data
    }

    /// Same shape, new elements.
    pub fn with_data(&self, data: Vec<Expr>) -> Result<Tensor, AstError> {
        Tensor::new(self.shape.clone(), data)
    }

    pub fn get(&self, index: &[usize]) -> Option<&Expr> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.data.get(flat)
    }
}

impl Expr {
    pub fn tensor(tensor: Tensor) -> Expr {
        Expr::new(Node::Tensor(tensor))
    }

    pub fn matrix(rows: Vec<Vec<Expr>>) -> Result<Expr, AstError> {
        Tensor::from_rows(rows).map(Expr::tensor)
    }
}
