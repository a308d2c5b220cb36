//! `nd-expr` - Lazy element-wise expressions with scalar broadcasting.
//!
//! This crate provides:
//! - An `Expression` trait shared by arrays, scalars and expression nodes
//! - Rank-0 wrappers (`Scalar`, `ScalarRef` via `xref`, `ScalarView` via `xcref`)
//! - Direct and dummy (broadcast) cursors, and steppers that drive evaluation
//! - `Binary`/`Unary` expression nodes built by the arithmetic operators
//! - A dense `Array` that expressions are evaluated into
//! - Shape broadcasting, layout tags and an explicit numeric promotion table

pub mod array;
pub mod dtype;
pub mod error;
pub mod expr;
pub mod iter;
pub mod layout;
pub mod ops;
pub mod scalar;
pub mod shape;

// Re-export primary types at the crate root for convenience.
pub use array::Array;
pub use dtype::{DType, Element, Promote};
pub use error::{ExprError, Result};
pub use expr::{Binary, Expression, Unary};
pub use iter::{DummyIter, Iter, IterMut, Stepper};
pub use layout::Layout;
pub use scalar::{xcref, xref, Scalar, ScalarRef, ScalarView};
pub use shape::Shape;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with TRACE level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
            )
            .with_test_writer()
            .try_init();
    }
}
