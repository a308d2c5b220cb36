use crate::error::{ExprError, Result};
use std::fmt;

/// An array shape, wrapping a vector of dimension sizes.
///
/// Extents are listed from the outermost axis to the innermost. A rank-0
/// shape has no extents and exactly one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// The rank-0 shape `()`.
    pub fn scalar() -> Self {
        Shape { dims: Vec::new() }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns true for the rank-0 shape.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= ndim()`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Computes row-major contiguous strides for this shape.
    ///
    /// For a shape [d0, d1, d2], the strides are [d1*d2, d2, 1].
    pub fn strides(&self) -> Vec<usize> {
        if self.dims.is_empty() {
            return vec![];
        }
        let mut strides = vec![0usize; self.dims.len()];
        strides[self.dims.len() - 1] = 1;
        for i in (0..self.dims.len() - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Computes column-major contiguous strides for this shape.
    ///
    /// For a shape [d0, d1, d2], the strides are [1, d0, d0*d1].
    pub fn column_major_strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.dims.len());
        let mut acc = 1;
        for &d in &self.dims {
            strides.push(acc);
            acc *= d;
        }
        strides
    }

    /// Compute the broadcast shape of `a` and `b` using numpy-style broadcasting rules.
    ///
    /// Rules:
    /// 1. If the shapes have different numbers of dimensions, the shorter shape is
    ///    padded with ones on the left. A rank-0 shape therefore never
    ///    constrains the result.
    /// 2. For each dimension, sizes must either be equal, or one of them must be 1.
    ///    The output dimension is the other one.
    pub fn broadcast_shape(a: &Shape, b: &Shape) -> Result<Shape> {
        broadcast_dims(&a.dims, &b.dims).map(Shape::new)
    }

    /// Broadcasts `other` into `self` in place, so a running result shape can
    /// absorb any number of operands.
    ///
    /// On error `self` is left unchanged.
    pub fn broadcast_into(&mut self, other: &[usize]) -> Result<()> {
        self.dims = broadcast_dims(&self.dims, other)?;
        Ok(())
    }

    /// Converts a linear position in row-major order into a multi-index.
    ///
    /// Returns `None` if `pos >= numel()`.
    pub fn unravel(&self, mut pos: usize) -> Option<Vec<usize>> {
        if pos >= self.numel() {
            return None;
        }
        let mut index = vec![0; self.dims.len()];
        for (i, &d) in self.dims.iter().enumerate().rev() {
            index[i] = pos % d;
            pos /= d;
        }
        Some(index)
    }
}

fn broadcast_dims(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let max_ndim = a.len().max(b.len());
    let mut result = Vec::with_capacity(max_ndim);

    for i in 0..max_ndim {
        // Index from the right: dim at position (ndim - 1 - i) from the right
        let da = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let db = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if da == db {
            result.push(da);
        } else if da == 1 {
            result.push(db);
        } else if db == 1 {
            result.push(da);
        } else {
            tracing::debug!(?a, ?b, axis = max_ndim - 1 - i, "broadcast failed");
            return Err(ExprError::BroadcastError {
                a: a.to_vec(),
                b: b.to_vec(),
            });
        }
    }

    result.reverse();
    Ok(result)
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.dim(0), 2);
        assert_eq!(s.dim(1), 3);
        assert_eq!(s.dim(2), 4);
        assert!(!s.is_scalar());
    }

    #[test]
    fn test_strides() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.strides(), vec![12, 4, 1]);
        assert_eq!(s.column_major_strides(), vec![1, 2, 6]);
    }

    #[test]
    fn test_scalar_shape() {
        let s = Shape::scalar();
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.numel(), 1); // product of empty = 1
        assert_eq!(s.strides(), vec![]);
        assert!(s.is_scalar());
        assert_eq!(s.to_string(), "[]");
    }

    #[test]
    fn test_broadcast_same() {
        let a = Shape::new(vec![2, 3]);
        let b = Shape::new(vec![2, 3]);
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_expand() {
        let a = Shape::new(vec![2, 1]);
        let b = Shape::new(vec![1, 3]);
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_different_ndim() {
        let a = Shape::new(vec![3]);
        let b = Shape::new(vec![2, 3]);
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_scalar_never_constrains() {
        let s = Shape::scalar();
        let b = Shape::new(vec![4, 0, 2]);
        assert_eq!(Shape::broadcast_shape(&s, &b).unwrap(), b);
        assert_eq!(Shape::broadcast_shape(&b, &s).unwrap(), b);
        assert_eq!(Shape::broadcast_shape(&s, &s).unwrap(), s);
    }

    #[test]
    fn test_broadcast_error() {
        crate::test_utils::init_test_logging();
        let a = Shape::new(vec![2, 3]);
        let b = Shape::new(vec![2, 4]);
        let err = Shape::broadcast_shape(&a, &b).unwrap_err();
        assert_eq!(
            err,
            ExprError::BroadcastError {
                a: vec![2, 3],
                b: vec![2, 4],
            }
        );
    }

    #[test]
    fn test_broadcast_into_accumulates() {
        let mut acc = Shape::scalar();
        acc.broadcast_into(&[3]).unwrap();
        acc.broadcast_into(&[2, 1]).unwrap();
        acc.broadcast_into(&[]).unwrap();
        assert_eq!(acc.dims(), &[2, 3]);

        assert!(acc.broadcast_into(&[4]).is_err());
        assert_eq!(acc.dims(), &[2, 3]);
    }

    #[test]
    fn test_unravel() {
        let s = Shape::from([2, 3]);
        assert_eq!(s.unravel(0), Some(vec![0, 0]));
        assert_eq!(s.unravel(4), Some(vec![1, 1]));
        assert_eq!(s.unravel(6), None);
        assert_eq!(Shape::scalar().unravel(0), Some(vec![]));
    }
}
