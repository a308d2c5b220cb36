use thiserror::Error;

use crate::layout::Layout;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },
    #[error("layout mismatch: storage is {got}, requested {expected}")]
    LayoutMismatch { expected: Layout, got: Layout },
    #[error("layout {0} has no physical storage order")]
    UnsupportedLayout(Layout),
}

pub type Result<T> = std::result::Result<T, ExprError>;
