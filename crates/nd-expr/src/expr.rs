//! Lazy element-wise expressions.
//!
//! Anything with a shape and a [`Stepper`] implements [`Expression`]: dense
//! arrays, scalar wrappers, bare numbers, and the [`Binary`] and [`Unary`]
//! nodes built by the arithmetic operators. Nodes hold their operands and the
//! broadcast shape, never results. Nothing is computed until an expression is
//! assigned into an [`Array`](crate::Array).
//!
//! ```
//! use nd_expr::{Array, Expression};
//!
//! let a = Array::from_vec(vec![1, 2, 3, 4]);
//! let b = Array::new(vec![10, 20], [2, 1]);
//! let e = (&a + 5i32) + &b;
//! assert_eq!(e.dims(), &[2, 4]);
//! let c = Array::from_expr(e);
//! assert_eq!(c.as_slice(), &[16, 17, 18, 19, 26, 27, 28, 29]);
//! ```

use std::fmt;
use std::marker::PhantomData;

use half::f16;

use crate::array::Array;
use crate::error::Result;
use crate::iter::{DummyIter, Stepper};
use crate::layout::Layout;
use crate::ops::{self, BinaryOp, UnaryOp};
use crate::scalar::{Scalar, ScalarRef, ScalarView};
use crate::shape::Shape;

/// The array-like contract: a shape, a layout, and a way to step through
/// elements broadcast to a larger shape.
pub trait Expression {
    /// The element type.
    type Elem: Clone;

    /// Cursor returned by [`Self::stepper()`].
    type Stepper<'a>: Stepper<Item = Self::Elem>
    where
        Self: 'a;

    /// Extents, outermost first. Empty for rank-0 entities.
    fn dims(&self) -> &[usize];

    fn layout(&self) -> Layout;

    /// A stepper over `target`, positioned at its first element.
    ///
    /// `target` must be a shape that `self.dims()` broadcasts to. Rank-0
    /// entities return a dummy cursor that ignores every move.
    fn stepper(&self, target: &[usize]) -> Self::Stepper<'_>;

    /// Number of axes.
    fn dimension(&self) -> usize {
        self.dims().len()
    }

    /// Number of elements.
    fn size(&self) -> usize {
        self.dims().iter().product()
    }

    fn shape(&self) -> Shape {
        Shape::from_slice(self.dims())
    }

    fn try_add<R: Expression>(self, rhs: R) -> Result<Binary<ops::Add, Self, R>>
    where
        Self: Sized,
    {
        Binary::try_new(self, rhs)
    }

    fn try_sub<R: Expression>(self, rhs: R) -> Result<Binary<ops::Sub, Self, R>>
    where
        Self: Sized,
    {
        Binary::try_new(self, rhs)
    }

    fn try_mul<R: Expression>(self, rhs: R) -> Result<Binary<ops::Mul, Self, R>>
    where
        Self: Sized,
    {
        Binary::try_new(self, rhs)
    }

    fn try_div<R: Expression>(self, rhs: R) -> Result<Binary<ops::Div, Self, R>>
    where
        Self: Sized,
    {
        Binary::try_new(self, rhs)
    }

    fn try_rem<R: Expression>(self, rhs: R) -> Result<Binary<ops::Rem, Self, R>>
    where
        Self: Sized,
    {
        Binary::try_new(self, rhs)
    }
}

impl<E: Expression + ?Sized> Expression for &E {
    type Elem = E::Elem;
    type Stepper<'a> = E::Stepper<'a> where Self: 'a;

    #[inline(always)]
    fn dims(&self) -> &[usize] {
        (**self).dims()
    }

    #[inline(always)]
    fn layout(&self) -> Layout {
        (**self).layout()
    }

    #[inline(always)]
    fn stepper(&self, target: &[usize]) -> Self::Stepper<'_> {
        (**self).stepper(target)
    }
}

macro_rules! number_expression {
    ($($t:ty),*) => {
        $(
            impl Expression for $t {
                type Elem = $t;
                type Stepper<'a> = DummyIter<'a, $t>;

                #[inline(always)]
                fn dims(&self) -> &[usize] {
                    &[]
                }

                #[inline(always)]
                fn layout(&self) -> Layout {
                    Layout::Any
                }

                #[inline(always)]
                fn stepper(&self, _target: &[usize]) -> DummyIter<'_, $t> {
                    DummyIter::new(self)
                }
            }
        )*
    };
}

number_expression!(i32, i64, f16, f32, f64);

// ----------------------------------------------------------------------------

/// Element-wise `lhs O rhs` over the broadcast of both shapes.
pub struct Binary<O, L, R> {
    lhs: L,
    rhs: R,
    shape: Shape,
    op: PhantomData<fn() -> O>,
}

impl<O, L: Expression, R: Expression> Binary<O, L, R> {
    /// Combine `lhs` and `rhs`, checking that their shapes broadcast.
    pub fn try_new(lhs: L, rhs: R) -> Result<Self> {
        let mut shape = Shape::from_slice(lhs.dims());
        shape.broadcast_into(rhs.dims())?;
        Ok(Binary {
            lhs,
            rhs,
            shape,
            op: PhantomData,
        })
    }

    /// Combine `lhs` and `rhs`.
    ///
    /// # Panics
    /// Panics if the shapes do not broadcast. See [`Self::try_new()`].
    pub fn new(lhs: L, rhs: R) -> Self {
        match Self::try_new(lhs, rhs) {
            Ok(node) => node,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn lhs(&self) -> &L {
        &self.lhs
    }

    pub fn rhs(&self) -> &R {
        &self.rhs
    }
}

impl<O, L, R> Expression for Binary<O, L, R>
where
    L: Expression,
    R: Expression,
    O: BinaryOp<L::Elem, R::Elem>,
    O::Output: Clone,
{
    type Elem = O::Output;
    type Stepper<'a> = BinaryStepper<O, L::Stepper<'a>, R::Stepper<'a>> where Self: 'a;

    fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    fn layout(&self) -> Layout {
        self.lhs.layout().combine(self.rhs.layout())
    }

    fn stepper(&self, target: &[usize]) -> Self::Stepper<'_> {
        BinaryStepper {
            lhs: self.lhs.stepper(target),
            rhs: self.rhs.stepper(target),
            op: PhantomData,
        }
    }
}

impl<O, L: Clone, R: Clone> Clone for Binary<O, L, R> {
    fn clone(&self) -> Self {
        Binary {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            shape: self.shape.clone(),
            op: PhantomData,
        }
    }
}

impl<O, L: fmt::Debug, R: fmt::Debug> fmt::Debug for Binary<O, L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binary")
            .field("op", &std::any::type_name::<O>())
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Stepper of a [`Binary`] node. Moves both operands together.
pub struct BinaryStepper<O, A, B> {
    lhs: A,
    rhs: B,
    op: PhantomData<fn() -> O>,
}

impl<O, A, B> Stepper for BinaryStepper<O, A, B>
where
    A: Stepper,
    B: Stepper,
    O: BinaryOp<A::Item, B::Item>,
{
    type Item = O::Output;

    #[inline(always)]
    fn step(&mut self, axis: usize) {
        self.lhs.step(axis);
        self.rhs.step(axis);
    }

    #[inline(always)]
    fn reset(&mut self, axis: usize) {
        self.lhs.reset(axis);
        self.rhs.reset(axis);
    }

    #[inline(always)]
    fn value(&self) -> O::Output {
        O::call(self.lhs.value(), self.rhs.value())
    }
}

// ----------------------------------------------------------------------------

/// Element-wise `O(inner)`.
pub struct Unary<O, E> {
    inner: E,
    op: PhantomData<fn() -> O>,
}

impl<O, E: Expression> Unary<O, E> {
    pub fn new(inner: E) -> Self {
        Unary {
            inner,
            op: PhantomData,
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<O, E> Expression for Unary<O, E>
where
    E: Expression,
    O: UnaryOp<E::Elem>,
    O::Output: Clone,
{
    type Elem = O::Output;
    type Stepper<'a> = UnaryStepper<O, E::Stepper<'a>> where Self: 'a;

    fn dims(&self) -> &[usize] {
        self.inner.dims()
    }

    fn layout(&self) -> Layout {
        self.inner.layout()
    }

    fn stepper(&self, target: &[usize]) -> Self::Stepper<'_> {
        UnaryStepper {
            inner: self.inner.stepper(target),
            op: PhantomData,
        }
    }
}

impl<O, E: Clone> Clone for Unary<O, E> {
    fn clone(&self) -> Self {
        Unary {
            inner: self.inner.clone(),
            op: PhantomData,
        }
    }
}

impl<O, E: fmt::Debug> fmt::Debug for Unary<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unary")
            .field("op", &std::any::type_name::<O>())
            .field("inner", &self.inner)
            .finish()
    }
}

pub struct UnaryStepper<O, A> {
    inner: A,
    op: PhantomData<fn() -> O>,
}

impl<O, A> Stepper for UnaryStepper<O, A>
where
    A: Stepper,
    O: UnaryOp<A::Item>,
{
    type Item = O::Output;

    #[inline(always)]
    fn step(&mut self, axis: usize) {
        self.inner.step(axis);
    }

    #[inline(always)]
    fn reset(&mut self, axis: usize) {
        self.inner.reset(axis);
    }

    #[inline(always)]
    fn value(&self) -> O::Output {
        O::call(self.inner.value())
    }
}

// ----------------------------------------------------------------------------

/// Implement the arithmetic operators of [`std::ops`] for an expression type,
/// with any [`Expression`] on the right, plus `number OP expression` for
/// every element type.
///
/// Generic parameters go in the leading brackets, each followed by a comma.
macro_rules! impl_expression_ops {
    (@rhs [$($gen:tt)*] $ty:ty, $tag:ident, $method:ident) => {
        impl<$($gen)* Rhs: Expression> std::ops::$tag<Rhs> for $ty
        where
            $ty: Expression,
        {
            type Output = Binary<ops::$tag, $ty, Rhs>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Binary::new(self, rhs)
            }
        }
    };
    (@neg [$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> std::ops::Neg for $ty
        where
            $ty: Expression,
        {
            type Output = Unary<ops::Neg, $ty>;

            fn neg(self) -> Self::Output {
                Unary::new(self)
            }
        }
    };
    (@lhs $gen:tt $ty:ty; $($num:ty),*) => {
        $(
            impl_expression_ops!(@num $gen $ty, $num, Add, add);
            impl_expression_ops!(@num $gen $ty, $num, Sub, sub);
            impl_expression_ops!(@num $gen $ty, $num, Mul, mul);
            impl_expression_ops!(@num $gen $ty, $num, Div, div);
            impl_expression_ops!(@num $gen $ty, $num, Rem, rem);
        )*
    };
    (@num [$($gen:tt)*] $ty:ty, $num:ty, $tag:ident, $method:ident) => {
        impl<$($gen)*> std::ops::$tag<$ty> for $num
        where
            $ty: Expression,
        {
            type Output = Binary<ops::$tag, $num, $ty>;

            fn $method(self, rhs: $ty) -> Self::Output {
                Binary::new(self, rhs)
            }
        }
    };
    ($gen:tt $ty:ty) => {
        impl_expression_ops!(@rhs $gen $ty, Add, add);
        impl_expression_ops!(@rhs $gen $ty, Sub, sub);
        impl_expression_ops!(@rhs $gen $ty, Mul, mul);
        impl_expression_ops!(@rhs $gen $ty, Div, div);
        impl_expression_ops!(@rhs $gen $ty, Rem, rem);
        impl_expression_ops!(@neg $gen $ty);
        impl_expression_ops!(@lhs $gen $ty; i32, i64, f16, f32, f64);
    };
}

impl_expression_ops!([T,] Array<T>);
impl_expression_ops!(['a, T,] &'a Array<T>);
impl_expression_ops!([T,] Scalar<T>);
impl_expression_ops!(['a, T,] &'a Scalar<T>);
impl_expression_ops!(['a, T,] ScalarRef<'a, T>);
impl_expression_ops!(['a, T,] ScalarView<'a, T>);
impl_expression_ops!([O, L, R,] Binary<O, L, R>);
impl_expression_ops!(['a, O, L, R,] &'a Binary<O, L, R>);
impl_expression_ops!([O, E,] Unary<O, E>);
impl_expression_ops!(['a, O, E,] &'a Unary<O, E>);
impl_expression_ops!(['a, 'b, T,] &'b ScalarRef<'a, T>);
impl_expression_ops!(['a, 'b, T,] &'b ScalarView<'a, T>);
