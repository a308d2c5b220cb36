//! The iteration protocol shared by scalars, arrays and expression nodes.
//!
//! There are two cursor families:
//!
//! - direct cursors ([`Iter`], [`IterMut`]) walk the physical elements of an
//!   entity, one step per element. A scalar has exactly one element, so its
//!   `begin()` advanced once equals its `end()`.
//! - dummy cursors ([`DummyIter`]) have no position at all. They always
//!   dereference to the same value and always compare equal to their end, so
//!   a rank-0 operand can stand in for any number of axes it does not have.
//!
//! Evaluation of expressions is driven through [`Stepper`]s, which are
//! positioned by moves along the axes of a target shape. An [`ArrayStepper`]
//! picks the direct or the dummy behaviour per axis when it is built.

use std::fmt;
use std::mem;

use crate::layout::Layout;

/// A cursor over a broadcast target shape.
///
/// Axes are numbered in the *target* shape, outermost first. The driver calls
/// `step(axis)` to move one position along `axis` and `reset(axis)` after
/// `extent - 1` steps to return to the start of that axis.
pub trait Stepper {
    type Item;

    fn step(&mut self, axis: usize);

    fn reset(&mut self, axis: usize);

    /// The element at the current position.
    fn value(&self) -> Self::Item;
}

// ----------------------------------------------------------------------------

/// Direct cursor over a run of physical elements.
pub struct Iter<'a, T> {
    data: &'a [T],
    pos: usize,
}

impl<'a, T> Iter<'a, T> {
    /// A cursor at the first element of `data`.
    pub fn new(data: &'a [T]) -> Self {
        Iter { data, pos: 0 }
    }

    /// A cursor one past the last element of `data`.
    pub fn end_of(data: &'a [T]) -> Self {
        Iter {
            data,
            pos: data.len(),
        }
    }

    /// Moves to the next element. Advancing an exhausted cursor does nothing.
    pub fn advance(&mut self) {
        if self.pos < self.data.len() {
            self.pos += 1;
        }
    }

    /// The element under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        self.data.get(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_end(&self) -> bool {
        self.pos == self.data.len()
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            data: self.data,
            pos: self.pos,
        }
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data) && self.pos == other.pos
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("pos", &self.pos)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.get()?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.data.len() - self.pos;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// ----------------------------------------------------------------------------

/// Direct cursor that can write the elements it walks over.
pub struct IterMut<'a, T> {
    rest: &'a mut [T],
    pos: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        IterMut { rest: data, pos: 0 }
    }

    pub fn advance(&mut self) {
        let _ = self.next();
    }

    /// The element under the cursor, or `None` at the end.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.rest.first_mut()
    }

    /// Overwrites the element under the cursor.
    ///
    /// # Panics
    /// Panics if the cursor is at the end.
    pub fn set(&mut self, value: T) {
        let pos = self.pos;
        match self.get_mut() {
            Some(slot) => *slot = value,
            None => panic!("write through an exhausted cursor at position {}", pos),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_end(&self) -> bool {
        self.rest.is_empty()
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("pos", &self.pos)
            .field("remaining", &self.rest.len())
            .finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let (first, rest) = mem::take(&mut self.rest).split_first_mut()?;
        self.rest = rest;
        self.pos += 1;
        Some(first)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rest.len(), Some(self.rest.len()))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

// ----------------------------------------------------------------------------

/// Position-insensitive cursor used to broadcast a rank-0 value.
///
/// Begin and end compare equal from the start, and stay equal however often
/// the cursor is advanced. Dereferencing is always valid.
pub struct DummyIter<'a, T> {
    value: &'a T,
}

impl<'a, T> DummyIter<'a, T> {
    pub fn new(value: &'a T) -> Self {
        DummyIter { value }
    }

    /// Does nothing; kept so dummy and direct cursors drive the same way.
    pub fn advance(&mut self) {}

    pub fn get(&self) -> &'a T {
        self.value
    }
}

impl<T> Clone for DummyIter<'_, T> {
    fn clone(&self) -> Self {
        DummyIter { value: self.value }
    }
}

impl<T> Copy for DummyIter<'_, T> {}

impl<T> PartialEq for DummyIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value)
    }
}

impl<T> Eq for DummyIter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for DummyIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DummyIter").field(self.value).finish()
    }
}

impl<T: Clone> Stepper for DummyIter<'_, T> {
    type Item = T;

    #[inline(always)]
    fn step(&mut self, _axis: usize) {}

    #[inline(always)]
    fn reset(&mut self, _axis: usize) {}

    #[inline(always)]
    fn value(&self) -> T {
        self.value.clone()
    }
}

// ----------------------------------------------------------------------------

/// Stepper over dense storage broadcast to a larger target shape.
///
/// Target axes the array lacks, and axes where it has extent 1, get stride 0
/// and never move. All other axes move by the array's own stride.
#[derive(Debug, Clone)]
pub struct ArrayStepper<'a, T> {
    data: &'a [T],
    offset: usize,
    strides: Vec<usize>,
    backstrides: Vec<usize>,
}

impl<'a, T> ArrayStepper<'a, T> {
    /// `dims` and `strides` describe the storage; `target` must be a shape
    /// that `dims` broadcasts to.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[usize], target: &[usize]) -> Self {
        debug_assert_eq!(dims.len(), strides.len());
        debug_assert!(dims.len() <= target.len());
        let pad = target.len() - dims.len();

        let mut step_strides = Vec::with_capacity(target.len());
        let mut backstrides = Vec::with_capacity(target.len());
        for (axis, &extent) in target.iter().enumerate() {
            let stride = if axis < pad || dims[axis - pad] == 1 {
                0
            } else {
                debug_assert_eq!(dims[axis - pad], extent);
                strides[axis - pad]
            };
            step_strides.push(stride);
            backstrides.push(stride * extent.saturating_sub(1));
        }

        ArrayStepper {
            data,
            offset: 0,
            strides: step_strides,
            backstrides,
        }
    }
}

impl<T: Clone> Stepper for ArrayStepper<'_, T> {
    type Item = T;

    #[inline]
    fn step(&mut self, axis: usize) {
        self.offset += self.strides[axis];
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        self.offset -= self.backstrides[axis];
    }

    #[inline]
    fn value(&self) -> T {
        self.data[self.offset].clone()
    }
}

/// Walks every index of `dims` in the storage order of `order`, moving
/// `stepper` along and passing each value to `f`.
///
/// `RowMajor` moves the last axis fastest, `ColumnMajor` the first. Any other
/// layout walks in row-major order. Does nothing when `dims` holds no
/// elements; a rank-0 `dims` visits its single element once.
pub(crate) fn walk<S: Stepper>(
    dims: &[usize],
    order: Layout,
    mut stepper: S,
    mut f: impl FnMut(S::Item),
) {
    let size: usize = dims.iter().product();
    if size == 0 {
        return;
    }

    let axes: Vec<usize> = match order {
        Layout::ColumnMajor => (0..dims.len()).collect(),
        _ => (0..dims.len()).rev().collect(),
    };
    let mut index = vec![0usize; dims.len()];
    for n in 0..size {
        f(stepper.value());
        if n + 1 == size {
            break;
        }
        for &axis in &axes {
            if index[axis] + 1 < dims[axis] {
                index[axis] += 1;
                stepper.step(axis);
                break;
            }
            index[axis] = 0;
            stepper.reset(axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_single_element() {
        let value = [7];
        let mut it = Iter::new(&value);
        let end = Iter::end_of(&value);
        assert_ne!(it, end);
        assert_eq!(it.get(), Some(&7));
        it.advance();
        assert_eq!(it, end);
        assert_eq!(it.get(), None);
        it.advance();
        assert_eq!(it, end);
    }

    #[test]
    fn test_direct_is_iterator() {
        let data = [1, 2, 3];
        let it = Iter::new(&data);
        assert_eq!(it.len(), 3);
        assert_eq!(it.copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_mut_writes() {
        let mut data = [1, 2];
        let mut it = IterMut::new(&mut data);
        it.set(10);
        it.advance();
        *it.get_mut().unwrap() = 20;
        it.advance();
        assert!(it.is_end());
        assert_eq!(it.position(), 2);
        assert_eq!(data, [10, 20]);
    }

    #[test]
    #[should_panic]
    fn test_iter_mut_set_at_end_panics() {
        let mut data: [i32; 0] = [];
        IterMut::new(&mut data).set(1);
    }

    #[test]
    fn test_dummy_always_equal() {
        let v = 2;
        let mut it = DummyIter::new(&v);
        let end = DummyIter::new(&v);
        assert_eq!(it, end);
        it.advance();
        it.advance();
        assert_eq!(it, end);
        assert_eq!(*it.get(), 2);
        it.step(3);
        it.reset(0);
        assert_eq!(it.value(), 2);
    }

    #[test]
    fn test_array_stepper_broadcasts_missing_axis() {
        // [3] against target [2, 3]
        let data = [1, 2, 3];
        let stepper = ArrayStepper::new(&data, &[3], &[1], &[2, 3]);
        let mut seen = Vec::new();
        walk(&[2, 3], Layout::RowMajor, stepper, |v| seen.push(v));
        assert_eq!(seen, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_array_stepper_extent_one_axis() {
        // [2, 1] against target [2, 3]
        let data = [10, 20];
        let stepper = ArrayStepper::new(&data, &[2, 1], &[1, 1], &[2, 3]);
        let mut seen = Vec::new();
        walk(&[2, 3], Layout::RowMajor, stepper, |v| seen.push(v));
        assert_eq!(seen, vec![10, 10, 10, 20, 20, 20]);
    }

    #[test]
    fn test_walk_column_major_order() {
        // row-major [[1, 2, 3], [4, 5, 6]] read in column-major order
        let data = [1, 2, 3, 4, 5, 6];
        let stepper = ArrayStepper::new(&data, &[2, 3], &[3, 1], &[2, 3]);
        let mut seen = Vec::new();
        walk(&[2, 3], Layout::ColumnMajor, stepper, |v| seen.push(v));
        assert_eq!(seen, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_walk_rank_zero_and_empty() {
        let v = 5;
        let mut seen = Vec::new();
        walk(&[], Layout::Any, DummyIter::new(&v), |x| seen.push(x));
        assert_eq!(seen, vec![5]);

        let mut count = 0;
        walk(&[3, 0], Layout::RowMajor, DummyIter::new(&v), |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_stepper_tracks_position() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let mut s = ArrayStepper::new(&data, &[2, 3], &[3, 1], &[2, 3]);
        s.step(1);
        s.step(1);
        assert_eq!(s.value(), 2);
        s.reset(1);
        s.step(0);
        assert_eq!(s.value(), 3);
    }
}
