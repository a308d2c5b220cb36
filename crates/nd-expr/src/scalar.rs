//! Rank-0 wrappers.
//!
//! A scalar has shape `()`, one element, and layout [`Layout::Any`]. Its
//! sole element is addressed by the empty index tuple, so `x[()]` reads or
//! writes it. Scalars expose both iterator families: `begin()`/`end()` walk
//! the single element, `dummy_begin()`/`dummy_end()` broadcast it.
//!
//! [`Scalar`] owns its value. [`ScalarRef`] (from [`xref`]) and
//! [`ScalarView`] (from [`xcref`]) borrow a value held by the caller.

use std::ops::{Index, IndexMut};
use std::slice;

use crate::expr::Expression;
use crate::iter::{DummyIter, Iter, IterMut};
use crate::layout::Layout;
use crate::shape::Shape;

/// A single owned value behaving as a rank-0 array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Scalar<T> {
    value: T,
}

impl<T> Scalar<T> {
    pub fn new(value: T) -> Self {
        Scalar { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for Scalar<T> {
    fn from(value: T) -> Self {
        Scalar::new(value)
    }
}

/// A writable rank-0 view of a value owned by someone else.
///
/// Writes through [`Self::get_mut()`], `[()]` or [`Self::begin_mut()`] land in
/// the referenced storage. The wrapper holds nothing but the borrow: it never
/// copies the value and never extends its lifetime, and `'a` ties it to the
/// storage it points at.
#[derive(Debug)]
pub struct ScalarRef<'a, T> {
    value: &'a mut T,
}

impl<'a, T> ScalarRef<'a, T> {
    pub fn new(value: &'a mut T) -> Self {
        ScalarRef { value }
    }

    pub fn get(&self) -> &T {
        &*self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut *self.value
    }

    /// Gives the borrow back.
    pub fn into_mut(self) -> &'a mut T {
        self.value
    }
}

/// A read-only rank-0 view of a value owned by someone else.
#[derive(Debug)]
pub struct ScalarView<'a, T> {
    value: &'a T,
}

impl<'a, T> ScalarView<'a, T> {
    pub fn new(value: &'a T) -> Self {
        ScalarView { value }
    }

    pub fn get(&self) -> &'a T {
        self.value
    }
}

impl<T> Clone for ScalarView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScalarView<'_, T> {}

/// Wraps `value` in a writable scalar view.
///
/// ```
/// let mut x = 2;
/// nd_expr::xref(&mut x)[()] = 4;
/// assert_eq!(x, 4);
/// ```
pub fn xref<T>(value: &mut T) -> ScalarRef<'_, T> {
    ScalarRef::new(value)
}

/// Wraps `value` in a read-only scalar view.
pub fn xcref<T>(value: &T) -> ScalarView<'_, T> {
    ScalarView::new(value)
}

// ----------------------------------------------------------------------------

macro_rules! impl_scalar_read {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> $ty {
            /// Always 1.
            pub fn size(&self) -> usize {
                1
            }

            /// Always 0.
            pub fn dimension(&self) -> usize {
                0
            }

            /// Always [`Layout::Any`].
            pub fn layout(&self) -> Layout {
                Layout::Any
            }

            /// The empty shape `()`.
            pub fn shape(&self) -> Shape {
                Shape::scalar()
            }

            /// Direct cursor at the wrapped value.
            pub fn begin(&self) -> Iter<'_, T> {
                Iter::new(slice::from_ref(self.get()))
            }

            /// Equal to `begin()` advanced once.
            pub fn end(&self) -> Iter<'_, T> {
                Iter::end_of(slice::from_ref(self.get()))
            }

            /// Broadcast cursor. Equal to `dummy_end()` from the start.
            pub fn dummy_begin(&self) -> DummyIter<'_, T> {
                DummyIter::new(self.get())
            }

            pub fn dummy_end(&self) -> DummyIter<'_, T> {
                DummyIter::new(self.get())
            }
        }

        impl<$($gen)*> Index<()> for $ty {
            type Output = T;

            fn index(&self, _: ()) -> &T {
                self.get()
            }
        }

        impl<$($gen)* > Expression for $ty
        where
            T: Clone,
        {
            type Elem = T;
            type Stepper<'s> = DummyIter<'s, T> where Self: 's;

            fn dims(&self) -> &[usize] {
                &[]
            }

            fn layout(&self) -> Layout {
                Layout::Any
            }

            fn stepper(&self, _target: &[usize]) -> DummyIter<'_, T> {
                DummyIter::new(self.get())
            }
        }
    };
}

macro_rules! impl_scalar_write {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> $ty {
            /// Direct cursor that writes into the wrapped value.
            pub fn begin_mut(&mut self) -> IterMut<'_, T> {
                IterMut::new(slice::from_mut(self.get_mut()))
            }
        }

        impl<$($gen)*> IndexMut<()> for $ty {
            fn index_mut(&mut self, _: ()) -> &mut T {
                self.get_mut()
            }
        }
    };
}

impl_scalar_read!([T,] Scalar<T>);
impl_scalar_read!(['a, T,] ScalarRef<'a, T>);
impl_scalar_read!(['a, T,] ScalarView<'a, T>);
impl_scalar_write!([T,] Scalar<T>);
impl_scalar_write!(['a, T,] ScalarRef<'a, T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::Stepper;

    #[test]
    fn test_size_and_dimension() {
        let x = Scalar::new(1);
        assert_eq!(x.size(), 1);
        assert_eq!(x.dimension(), 0);
        assert_eq!(x.layout(), Layout::Any);
        assert!(x.shape().is_scalar());
        assert_eq!(Expression::size(&x), 1);
        assert_eq!(Expression::dims(&x), &[] as &[usize]);
    }

    #[test]
    fn test_access() {
        let mut x = Scalar::new(2);
        assert_eq!(x[()], 2);
        x[()] = 4;
        assert_eq!(*x.get(), 4);
        *x.get_mut() = 5;
        assert_eq!(x.into_inner(), 5);
    }

    #[test]
    fn test_begin_end() {
        let x = Scalar::new(2);
        let mut it = x.begin();
        assert_ne!(it, x.end());
        assert_eq!(it.get(), Some(&2));
        it.advance();
        assert_eq!(it, x.end());
    }

    #[test]
    fn test_write_through_cursor() {
        let mut x = Scalar::new(2);
        let mut it = x.begin_mut();
        it.set(4);
        it.advance();
        assert!(it.is_end());
        assert_eq!(x[()], 4);
    }

    #[test]
    fn test_dummy_cursor() {
        let x = Scalar::new(2);
        let mut it = x.dummy_begin();
        assert_eq!(it, x.dummy_end());
        it.advance();
        assert_eq!(*it.get(), 2);
        assert_eq!(it, x.dummy_end());
    }

    #[test]
    fn test_stepper_ignores_moves() {
        let x = Scalar::new(7);
        let mut s = x.stepper(&[3, 4]);
        s.step(1);
        s.step(0);
        s.reset(1);
        assert_eq!(s.value(), 7);
    }

    #[test]
    fn test_xref_writes_through() {
        let mut x = 2;
        {
            let mut s = xref(&mut x);
            assert_eq!(s.size(), 1);
            assert_eq!(s[()], 2);
            s[()] = 4;
        }
        assert_eq!(x, 4);

        let r = xref(&mut x).into_mut();
        *r += 1;
        assert_eq!(x, 5);
    }

    #[test]
    fn test_xref_cursor() {
        let mut x = 2;
        let mut s = xref(&mut x);
        s.begin_mut().set(9);
        let mut it = s.begin();
        it.advance();
        assert_eq!(it, s.end());
        assert_eq!(x, 9);
    }

    #[test]
    fn test_xcref_reads() {
        let x = 3.5f64;
        let v = xcref(&x);
        let w = v;
        assert_eq!(v[()], 3.5);
        assert_eq!(*w.dummy_begin().get(), 3.5);
        assert_eq!(v.layout(), Layout::Any);
    }
}
