use std::fmt;

use crate::dtype::{DType, Element};
use crate::error::{ExprError, Result};
use crate::expr::Expression;
use crate::iter::{self, ArrayStepper, Iter, IterMut};
use crate::layout::Layout;
use crate::shape::Shape;

/// A dense N-dimensional array.
///
/// Holds contiguous data in row-major or column-major order with an
/// associated shape. `Array` is both a leaf of expressions and the target
/// that evaluates them.
#[derive(Clone)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Shape,
    strides: Vec<usize>,
    layout: Layout,
}

impl<T> Array<T> {
    /// Create a new row-major array from data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new(data: Vec<T>, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        Self::from_parts(data, shape, Layout::RowMajor)
    }

    /// Create a row-major array, checking the data length.
    pub fn from_shape_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        Self::with_layout(data, shape, Layout::RowMajor)
    }

    /// Create an array whose `data` is stored in `layout` order.
    ///
    /// # Errors
    /// Returns an error if the length does not match the shape, or if
    /// `layout` is not a physical storage order.
    pub fn with_layout(data: Vec<T>, shape: impl Into<Shape>, layout: Layout) -> Result<Self> {
        let shape = shape.into();
        if !layout.is_physical() {
            return Err(ExprError::UnsupportedLayout(layout));
        }
        if data.len() != shape.numel() {
            return Err(ExprError::ShapeMismatch {
                expected: vec![shape.numel()],
                got: vec![data.len()],
            });
        }
        Ok(Self::from_parts(data, shape, layout))
    }

    /// Create a one-dimensional array.
    pub fn from_vec(data: Vec<T>) -> Self {
        let n = data.len();
        Self::from_parts(data, Shape::new(vec![n]), Layout::RowMajor)
    }

    fn from_parts(data: Vec<T>, shape: Shape, layout: Layout) -> Self {
        let strides = match layout {
            Layout::ColumnMajor => shape.column_major_strides(),
            _ => shape.strides(),
        };
        Array {
            data,
            shape,
            strides,
            layout,
        }
    }

    /// Create an array with every element set to `value`.
    pub fn from_elem(shape: impl Into<Shape>, value: T) -> Self
    where
        T: Clone,
    {
        let shape = shape.into();
        let data = vec![value; shape.numel()];
        Self::from_parts(data, shape, Layout::RowMajor)
    }

    /// Create an array filled with `T::default()`.
    pub fn zeros(shape: impl Into<Shape>) -> Self
    where
        T: Clone + Default,
    {
        Self::from_elem(shape, T::default())
    }

    /// Evaluate `expr` into a new array of the expression's shape.
    ///
    /// The storage order follows the expression's layout when it is a
    /// physical one, and [`Layout::DEFAULT`] otherwise.
    pub fn from_expr<E: Expression<Elem = T>>(expr: E) -> Self {
        let layout = match expr.layout() {
            l if l.is_physical() => l,
            _ => Layout::DEFAULT,
        };
        let shape = expr.shape();
        let data = evaluate(&expr, shape.dims(), layout);
        Self::from_parts(data, shape, layout)
    }

    /// Replace the contents of `self` with the evaluation of `expr`,
    /// resizing to the expression's shape. The storage order of `self` is
    /// kept.
    pub fn assign<E: Expression<Elem = T>>(&mut self, expr: E) {
        let shape = expr.shape();
        let data = evaluate(&expr, shape.dims(), self.layout);
        *self = Self::from_parts(data, shape, self.layout);
    }

    /// Overwrite every element of `self` with the evaluation of `expr`
    /// broadcast to the shape of `self`.
    ///
    /// # Errors
    /// Returns an error, without writing anything, if `expr` does not
    /// broadcast to exactly the shape of `self`.
    pub fn assign_broadcast<E: Expression<Elem = T>>(&mut self, expr: E) -> Result<()> {
        let mut target = self.shape.clone();
        target.broadcast_into(expr.dims())?;
        if target != self.shape {
            return Err(ExprError::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                got: expr.dims().to_vec(),
            });
        }

        tracing::trace!(shape = %self.shape, layout = %self.layout, "assigning expression in place");
        let mut slots = self.data.iter_mut();
        iter::walk(
            self.shape.dims(),
            self.layout,
            expr.stepper(self.shape.dims()),
            |value| {
                if let Some(slot) = slots.next() {
                    *slot = value;
                }
            },
        );
        Ok(())
    }

    /// Returns a reference to the array's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Physical storage order.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Strides of the storage, in elements.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType
    where
        T: Element,
    {
        T::DTYPE
    }

    fn offset_of(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.ndim() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &d), &s) in index.iter().zip(self.shape.dims()).zip(&self.strides) {
            if i >= d {
                return None;
            }
            offset += i * s;
        }
        Some(offset)
    }

    /// The element at a multi-index, or `None` if the index has the wrong
    /// rank or is out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset_of(index).map(|o| &self.data[o])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.offset_of(index).map(move |o| &mut self.data[o])
    }

    /// Direct cursor at the first stored element.
    pub fn begin(&self) -> Iter<'_, T> {
        Iter::new(&self.data)
    }

    /// Equal to `begin()` advanced `len()` times.
    pub fn end(&self) -> Iter<'_, T> {
        Iter::end_of(&self.data)
    }

    pub fn begin_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.data)
    }

    /// Iterates the elements in storage order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.begin()
    }

    /// The underlying storage, in the array's own layout.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The underlying storage, checked against the order the caller expects.
    ///
    /// # Errors
    /// Returns an error if `layout` is not compatible with the array's own.
    pub fn as_slice_in(&self, layout: Layout) -> Result<&[T]> {
        if !layout.is_compatible(self.layout) {
            return Err(ExprError::LayoutMismatch {
                expected: layout,
                got: self.layout,
            });
        }
        Ok(&self.data)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Reshape the array, returning a new array with the same data in the
    /// same storage order but a different shape.
    ///
    /// The total number of elements must remain the same.
    pub fn reshape(&self, new_shape: impl Into<Shape>) -> Result<Array<T>>
    where
        T: Clone,
    {
        let new_shape = new_shape.into();
        if self.shape.numel() != new_shape.numel() {
            return Err(ExprError::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                got: new_shape.dims().to_vec(),
            });
        }
        Ok(Self::from_parts(self.data.clone(), new_shape, self.layout))
    }
}

fn evaluate<E: Expression>(expr: &E, dims: &[usize], layout: Layout) -> Vec<E::Elem> {
    tracing::trace!(?dims, %layout, "evaluating expression");
    let mut data = Vec::with_capacity(dims.iter().product());
    iter::walk(dims, layout, expr.stepper(dims), |value| data.push(value));
    data
}

impl<T: Clone> Expression for Array<T> {
    type Elem = T;
    type Stepper<'a> = ArrayStepper<'a, T> where Self: 'a;

    fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn stepper(&self, target: &[usize]) -> ArrayStepper<'_, T> {
        ArrayStepper::new(&self.data, self.shape.dims(), &self.strides, target)
    }
}

/// Arrays are equal when they have the same shape and the same element at
/// every index, whatever their storage order.
impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        if self.layout == other.layout {
            return self.data == other.data;
        }
        (0..self.shape.numel()).all(|pos| {
            let index = self.shape.unravel(pos);
            match index {
                Some(index) => self.get(&index) == other.get(&index),
                None => false,
            }
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape)
            .field("layout", &self.layout)
            .field("data", &self.data)
            .finish()
    }
}
