//! A double-ended queue whose elements never move once pushed.
//!
//! `VecDeque` keeps its elements in one ring buffer. When that buffer is full, a push allocates a
//! bigger one and moves every element over. That is fine most of the time, but it means any
//! pointer into the deque is invalidated by growth, and the push that triggers it costs time
//! proportional to the whole deque.
//!
//! [`SegDeque`] instead stores elements in fixed-size blocks of [`BLOCK_CAPACITY`] slots, and keeps
//! a separate index array with the address of every block. Position `i` in the index-array domain
//! lives in block `i / BLOCK_CAPACITY`, at offset `i % BLOCK_CAPACITY`. When either end runs out
//! of room, only the index array is rebuilt: the existing block addresses are copied into the
//! middle of a larger array, and fresh blocks (all carved from one new allocation) are placed on
//! both sides. No element is ever copied or moved by growth, so:
//!
//!  - Pushes and pops at either end are amortized `O(1)`, and growth costs `O(blocks)` rather than
//!    `O(elements)`.
//!  - Indexing is `O(1)`: one division, one load from the index array, one offset.
//!  - An element's address stays the same for as long as it is in the deque and nothing is
//!    inserted or removed in the middle.
//!  - Memory is never returned before the deque is dropped. Popping leaves the blocks in place
//!    for later pushes.
//!
//! Inserting or removing in the middle is done by swapping elements one position at a time
//! towards whichever end is closer, so it costs `O(min(index, len - index))`.
//!
//! Besides the usual iterators, the deque hands out random-access [`Cursor`]s, which can be moved
//! by any signed offset and subtracted from one another, and [`CursorMut`]s, which can also edit
//! the deque at their position.

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rustdoc)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg_attr(test, macro_use)]
extern crate alloc;

use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::repeat_with;
use core::marker::PhantomData;
use core::mem;
use core::ops::Bound::{Excluded, Included, Unbounded};
use core::ops::{Index, IndexMut, RangeBounds};
use core::ptr;

use alloc::collections::VecDeque;
use alloc::vec::Vec;

mod cursor;
mod error;
mod external_trait_impls;
mod iter;
mod raw;

pub use cursor::{Cursor, CursorMut};
pub use error::{OutOfRange, TryReserveError};

use cursor::Pos;
use raw::{Growth, RawBlocks};

/// Iterator types for [`SegDeque`].
pub mod deque {
    pub use super::iter::*;
}

/// Parallel iterator types for [`SegDeque`], built on `rayon`.
#[cfg(feature = "rayon")]
pub mod rayon {
    pub use super::external_trait_impls::rayon::*;
}

/// The number of element slots in every block.
pub const BLOCK_CAPACITY: usize = 32;

/// A double-ended queue stored in fixed-size blocks whose elements never move.
///
/// See the [crate-level documentation] for details.
///
/// [crate-level documentation]: crate
pub struct SegDeque<T> {
    raw: RawBlocks<T>,
    // Live elements occupy positions begin..end of the index-array domain. Every other slot is
    // uninitialized.
    begin: usize,
    end: usize,
    _marker: PhantomData<T>,
}

#[derive(Clone, Copy)]
enum End {
    Front,
    Back,
}

// SAFETY: a `SegDeque` owns its elements just like a `Vec` does.
unsafe impl<T: Send> Send for SegDeque<T> {}
unsafe impl<T: Sync> Sync for SegDeque<T> {}

impl<T: Clone> Clone for SegDeque<T> {
    fn clone(&self) -> SegDeque<T> {
        let mut copy = Self::with_capacity(self.len());
        for v in self {
            // if `clone` panics, dropping `copy` releases everything it allocated
            copy.push_back(v.clone());
        }
        copy
    }

    /// Replaces the contents of `self` with a clone of `source`.
    ///
    /// The clone is built on the side and swapped in only once it is complete, so if cloning an
    /// element panics, `self` is left as it was.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        mem::swap(self, &mut copy);
    }
}

impl<T> Default for SegDeque<T> {
    /// Creates an empty `SegDeque<T>`.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SegDeque<T> {
    /// Creates an empty `SegDeque`.
    ///
    /// This does not allocate. The first push allocates room on both ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let deque: SegDeque<u32> = SegDeque::new();
    /// assert_eq!(deque.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            raw: RawBlocks::new(),
            begin: 0,
            end: 0,
            _marker: PhantomData,
        }
    }

    /// Creates an empty `SegDeque` that can take at least `capacity` pushes at the back without
    /// growing.
    ///
    /// All the space sits at the back, so the first `push_front` grows the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let deque: SegDeque<u32> = SegDeque::with_capacity(10);
    /// assert!(deque.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let raw = RawBlocks::try_with_blocks(capacity / BLOCK_CAPACITY + 1)
            .unwrap_or_else(|e| e.handle());
        Self {
            raw,
            begin: 0,
            end: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a `SegDeque` holding `len` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let deque: SegDeque<String> = SegDeque::with_len(3);
    /// assert_eq!(deque, vec![String::new(), String::new(), String::new()]);
    /// ```
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut deque = Self::with_capacity(len);
        deque.resize_with(len, T::default);
        deque
    }

    /// Creates a `SegDeque` holding `len` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let deque = SegDeque::from_elem(3, "x");
    /// assert_eq!(deque, vec!["x", "x", "x"]);
    /// ```
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut deque = Self::with_capacity(len);
        deque.resize(len, value);
        deque
    }

    /// Returns the number of elements in the `SegDeque`.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut v = SegDeque::new();
    /// assert_eq!(v.len(), 0);
    /// v.push_back(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns `true` if the `SegDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut v = SegDeque::new();
    /// assert!(v.is_empty());
    /// v.push_front(1);
    /// assert!(!v.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Returns the number of slots reachable through the index array.
    ///
    /// This counts slots at both ends, so the deque may still grow before `len()` reaches it: a
    /// `push_back` grows once the back is full, no matter how much room is left at the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::{SegDeque, BLOCK_CAPACITY};
    ///
    /// let mut d = SegDeque::new();
    /// d.push_back(1);
    /// assert_eq!(d.capacity(), 2 * BLOCK_CAPACITY);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.slots()
    }

    #[inline]
    #[doc(hidden)]
    pub fn block_count(&self) -> usize {
        self.raw.block_count()
    }

    #[inline]
    #[doc(hidden)]
    pub fn slab_count(&self) -> usize {
        self.raw.slab_count()
    }

    /// # Safety
    ///
    /// `position` must be addressable, i.e. `< self.capacity()`.
    #[inline]
    unsafe fn slot(&self, position: usize) -> *mut T {
        self.raw.slot(Pos::at(position))
    }

    /// Provides a reference to the element at the given index.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// assert_eq!(buf.get(1), Some(&4));
    /// assert_eq!(buf.get(3), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            // SAFETY: in bounds, so the slot is live.
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    /// Provides a mutable reference to the element at the given index.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// if let Some(elem) = buf.get_mut(1) {
    ///     *elem = 7;
    /// }
    ///
    /// assert_eq!(buf[1], 7);
    /// ```
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            // SAFETY: in bounds, so the slot is live.
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len());
        &*self.slot(self.begin + index)
    }

    /// Returns a mutable reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len());
        &mut *self.slot(self.begin + index)
    }

    /// Provides a reference to the element at the given index, or an [`OutOfRange`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::{OutOfRange, SegDeque};
    ///
    /// let buf: SegDeque<_> = vec![1, 2].into();
    /// assert_eq!(buf.at(1), Ok(&2));
    /// assert_eq!(buf.at(2), Err(OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len();
        self.get(index).ok_or(OutOfRange { index, len })
    }

    /// Provides a mutable reference to the element at the given index, or an [`OutOfRange`]
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf: SegDeque<_> = vec![1, 2].into();
    /// *buf.at_mut(0).unwrap() = 5;
    /// assert!(buf.at_mut(7).is_err());
    /// assert_eq!(buf, vec![5, 2]);
    /// ```
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.get_mut(index).ok_or(OutOfRange { index, len })
    }

    /// Swaps elements at indices `i` and `j`.
    ///
    /// `i` and `j` may be equal.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// assert_eq!(buf, vec![3, 4, 5]);
    /// buf.swap(0, 2);
    /// assert_eq!(buf, vec![5, 4, 3]);
    /// ```
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len(), "swap index (is {}) should be < len", i);
        assert!(j < self.len(), "swap index (is {}) should be < len", j);
        self.swap_unchecked(i, j);
    }

    #[inline]
    fn swap_unchecked(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.len() && j < self.len());
        // SAFETY: both slots are live; `ptr::swap` allows them to be the same.
        unsafe { ptr::swap(self.slot(self.begin + i), self.slot(self.begin + j)) }
    }

    /// Provides a reference to the front element, or `None` if the `SegDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// assert_eq!(d.front(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.front(), Some(&1));
    /// ```
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Provides a mutable reference to the front element, or `None` if the `SegDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// assert_eq!(d.front_mut(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// match d.front_mut() {
    ///     Some(x) => *x = 9,
    ///     None => (),
    /// }
    /// assert_eq!(d.front(), Some(&9));
    /// ```
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Provides a reference to the back element, or `None` if the `SegDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// assert_eq!(d.back(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.back(), Some(&2));
    /// ```
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Provides a mutable reference to the back element, or `None` if the `SegDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    /// if let Some(x) = d.back_mut() {
    ///     *x = 9;
    /// }
    /// assert_eq!(d.back(), Some(&9));
    /// ```
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len().checked_sub(1) {
            Some(i) => self.get_mut(i),
            None => None,
        }
    }

    /// Returns `true` if the `SegDeque` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut deque: SegDeque<u32> = SegDeque::new();
    ///
    /// deque.push_back(0);
    /// deque.push_back(1);
    ///
    /// assert_eq!(deque.contains(&1), true);
    /// assert_eq!(deque.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Returns a front-to-back iterator.
    ///
    /// The iterator is double-ended, so `iter().rev()` walks the deque back to front.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(3);
    /// buf.push_front(4);
    /// let b: &[_] = &[&4, &5, &3];
    /// let c: Vec<&i32> = buf.iter().collect();
    /// assert_eq!(&c[..], b);
    /// let c: Vec<&i32> = buf.iter().rev().collect();
    /// assert_eq!(&c[..], &[&3, &5, &4]);
    /// ```
    pub fn iter(&self) -> iter::Iter<'_, T> {
        iter::Iter::new(self, 0, self.len())
    }

    /// Returns a front-to-back iterator that returns mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// for num in buf.iter_mut() {
    ///     *num = *num - 2;
    /// }
    /// let b: &[_] = &[&mut 3, &mut 1, &mut 2];
    /// assert_eq!(&buf.iter_mut().collect::<Vec<&mut i32>>()[..], b);
    /// ```
    pub fn iter_mut(&mut self) -> iter::IterMut<'_, T> {
        let len = self.len();
        iter::IterMut::new(self, 0, len)
    }

    fn range_start_end<R>(&self, range: R) -> (usize, usize)
    where
        R: RangeBounds<usize>,
    {
        let len = self.len();
        let start = match range.start_bound() {
            Included(&n) => n,
            Excluded(&n) => n + 1,
            Unbounded => 0,
        };
        let end = match range.end_bound() {
            Included(&n) => n + 1,
            Excluded(&n) => n,
            Unbounded => len,
        };
        assert!(start <= end, "lower bound was too large");
        assert!(end <= len, "upper bound was too large");
        (start, end)
    }

    /// Creates an iterator that covers the specified range in the `SegDeque`.
    ///
    /// # Panics
    ///
    /// Panics if the starting point is greater than the end point or if
    /// the end point is greater than the length of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let v: SegDeque<_> = vec![1, 2, 3].into_iter().collect();
    /// let range = v.range(2..).copied().collect::<SegDeque<_>>();
    /// assert_eq!(range, vec![3]);
    ///
    /// // A full range covers all contents
    /// let all = v.range(..);
    /// assert_eq!(all.len(), 3);
    /// ```
    #[inline]
    pub fn range<R>(&self, range: R) -> iter::Iter<'_, T>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.range_start_end(range);
        iter::Iter::new(self, start, end)
    }

    /// Creates an iterator that covers the specified mutable range in the `SegDeque`.
    ///
    /// # Panics
    ///
    /// Panics if the starting point is greater than the end point or if
    /// the end point is greater than the length of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut v: SegDeque<_> = vec![1, 2, 3].into_iter().collect();
    /// for v in v.range_mut(2..) {
    ///   *v *= 2;
    /// }
    /// assert_eq!(v, vec![1, 2, 6]);
    ///
    /// // A full range covers all contents
    /// for v in v.range_mut(..) {
    ///   *v *= 2;
    /// }
    /// assert_eq!(v, vec![2, 4, 12]);
    /// ```
    #[inline]
    pub fn range_mut<R>(&mut self, range: R) -> iter::IterMut<'_, T>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.range_start_end(range);
        iter::IterMut::new(self, start, end)
    }

    /// Returns a cursor on the front element (at the end position if the deque is empty).
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let d: SegDeque<_> = (1..=3).collect();
    /// let mut c = d.cursor_front();
    /// assert_eq!(c.get(), Some(&1));
    /// c += 2;
    /// assert_eq!(c.get(), Some(&3));
    /// ```
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.front_pos())
    }

    /// Returns a cursor on the back element.
    ///
    /// If the deque is empty, the cursor sits just before the (empty) front.
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.front_pos().add(self.len() as isize - 1))
    }

    /// Returns a cursor one past the back element.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let d: SegDeque<_> = (1..=3).collect();
    /// let end = d.cursor_end();
    /// assert_eq!(end.get(), None);
    /// assert_eq!((end - 1).get(), Some(&3));
    /// assert_eq!(end - d.cursor_front(), 3);
    /// ```
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.front_pos().add(self.len() as isize))
    }

    /// Returns a cursor at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T> {
        assert!(index <= self.len(), "cursor index out of bounds");
        Cursor::new(self, self.front_pos().add(index as isize))
    }

    /// Returns a mutable cursor on the front element (at the end position if the deque is
    /// empty).
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let pos = self.front_pos();
        CursorMut::new(self, pos)
    }

    /// Returns a mutable cursor on the back element.
    ///
    /// If the deque is empty, the cursor sits just before the (empty) front.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T> {
        let pos = self.front_pos().add(self.len() as isize - 1);
        CursorMut::new(self, pos)
    }

    /// Returns a mutable cursor one past the back element.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        let pos = self.front_pos().add(self.len() as isize);
        CursorMut::new(self, pos)
    }

    /// Returns a mutable cursor at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T> {
        assert!(index <= self.len(), "cursor index out of bounds");
        let pos = self.front_pos().add(index as isize);
        CursorMut::new(self, pos)
    }

    /// Removes the first element and returns it, or `None` if the `SegDeque` is empty.
    ///
    /// The slot it occupied stays allocated for later `push_front`s.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    ///
    /// assert_eq!(d.pop_front(), Some(1));
    /// assert_eq!(d.pop_front(), Some(2));
    /// assert_eq!(d.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let position = self.begin;
        self.begin += 1;
        // SAFETY: the slot was live, and is no longer considered so.
        Some(unsafe { self.slot(position).read() })
    }

    /// Removes the last element from the `SegDeque` and returns it, or `None` if it is empty.
    ///
    /// The slot it occupied stays allocated for later `push_back`s.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// assert_eq!(buf.pop_back(), None);
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(buf.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was live, and is no longer considered so.
        Some(unsafe { self.slot(self.end).read() })
    }

    /// Appends an element to the back of the `SegDeque`.
    ///
    /// Existing elements stay where they are, even if the deque has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(1);
    /// let first: *const i32 = &buf[0];
    /// for i in 2..1000 {
    ///     buf.push_back(i);
    /// }
    /// assert_eq!(3, buf[2]);
    /// assert!(std::ptr::eq(first, &buf[0]));
    /// ```
    pub fn push_back(&mut self, value: T) {
        self.push_with(End::Back, move || value)
    }

    /// Prepends an element to the front of the `SegDeque`.
    ///
    /// Existing elements stay where they are, even if the deque has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// d.push_front(1);
    /// d.push_front(2);
    /// assert_eq!(d.front(), Some(&2));
    /// ```
    pub fn push_front(&mut self, value: T) {
        self.push_with(End::Front, move || value)
    }

    /// Appends the element returned by `f` to the back of the `SegDeque`.
    ///
    /// If the deque needs to grow, the new storage is set up before `f` is called. Should `f`
    /// panic, that storage is released again and the deque is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// d.push_back_with(|| String::from("built in place"));
    /// assert_eq!(d[0], "built in place");
    /// ```
    pub fn push_back_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        self.push_with(End::Back, f)
    }

    /// Prepends the element returned by `f` to the front of the `SegDeque`.
    ///
    /// See [`push_back_with`](Self::push_back_with).
    pub fn push_front_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        self.push_with(End::Front, f)
    }

    /// Appends the element returned by `f` to the back of the `SegDeque`, unless `f` fails.
    ///
    /// If `f` returns an error, it is passed on and the deque is left exactly as it was. Storage
    /// set up for the element, if the deque had to grow, is released.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d: SegDeque<u8> = SegDeque::new();
    /// assert_eq!(d.try_push_back_with(|| "7".parse()), Ok(()));
    /// assert!(d.try_push_back_with(|| "seven".parse()).is_err());
    /// assert_eq!(d, vec![7]);
    /// ```
    pub fn try_push_back_with<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.try_push_with(End::Back, f)
    }

    /// Prepends the element returned by `f` to the front of the `SegDeque`, unless `f` fails.
    ///
    /// See [`try_push_back_with`](Self::try_push_back_with).
    pub fn try_push_front_with<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.try_push_with(End::Front, f)
    }

    #[inline]
    fn push_with<F>(&mut self, end: End, f: F)
    where
        F: FnOnce() -> T,
    {
        match self.try_push_with(end, move || Ok::<T, Infallible>(f())) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn has_room(&self, end: End) -> bool {
        match end {
            End::Back => self.end < self.raw.slots(),
            End::Front => self.begin > 0,
        }
    }

    fn try_push_with<E, F>(&mut self, end: End, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.has_room(end) {
            let value = f()?;
            let position = match end {
                End::Back => self.end,
                End::Front => self.begin - 1,
            };
            // SAFETY: the slot is addressable and not live.
            unsafe { self.slot(position).write(value) };
        } else {
            let growth = self.raw.try_stage_growth().unwrap_or_else(|e| e.handle());
            let position = match end {
                End::Back => self.end + growth.shift(),
                End::Front => self.begin + growth.shift() - 1,
            };
            // If `f` fails or unwinds, `growth` is dropped along with the slab and index array
            // it owns, and `self` was never touched.
            let value = f()?;
            // SAFETY: the staged array has `shift / BLOCK_CAPACITY` fresh blocks on each side of
            // the current ones, so the slot just outside the live range exists and is not live.
            unsafe { growth.slot(Pos::at(position)).write(value) };
            self.commit(growth);
        }
        match end {
            End::Back => self.end += 1,
            End::Front => self.begin -= 1,
        }
        Ok(())
    }

    fn commit(&mut self, growth: Growth<T>) {
        let shift = growth.shift();
        self.raw.commit(growth);
        self.begin += shift;
        self.end += shift;
    }

    /// Makes sure at least `additional` more elements can be pushed at the back without
    /// growing.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf: SegDeque<i32> = vec![1].into();
    /// buf.reserve_back(100);
    /// let blocks = buf.block_count();
    /// buf.extend(0..100);
    /// assert_eq!(buf.block_count(), blocks);
    /// ```
    pub fn reserve_back(&mut self, additional: usize) {
        self.try_reserve_back(additional)
            .unwrap_or_else(|e| e.handle())
    }

    /// Makes sure at least `additional` more elements can be pushed at the front without
    /// growing.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    pub fn reserve_front(&mut self, additional: usize) {
        self.try_reserve_front(additional)
            .unwrap_or_else(|e| e.handle())
    }

    /// Tries to make room for at least `additional` more elements at the back.
    ///
    /// All the room needed is set up in a single growth, so on error the deque is left exactly
    /// as it was. Requests too large to ever be addressed fail before anything is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf: SegDeque<u64> = SegDeque::new();
    /// assert!(buf.try_reserve_back(1000).is_ok());
    /// assert!(buf.try_reserve_back(usize::MAX).is_err());
    /// ```
    pub fn try_reserve_back(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let room = self.raw.slots() - self.end;
        self.try_grow_for(room, additional)
    }

    /// Tries to make room for at least `additional` more elements at the front.
    ///
    /// See [`try_reserve_back`](Self::try_reserve_back).
    pub fn try_reserve_front(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let room = self.begin;
        self.try_grow_for(room, additional)
    }

    fn try_grow_for(&mut self, room: usize, additional: usize) -> Result<(), TryReserveError> {
        if room >= additional {
            return Ok(());
        }
        let growth = self.raw.try_stage_growth_for(additional - room)?;
        self.commit(growth);
        Ok(())
    }

    /// Inserts an element at `index` within the `SegDeque`.
    ///
    /// The element is pushed onto whichever end is closer to `index`, and then swapped one
    /// position at a time until it reaches `index`. All other elements keep their relative order.
    /// `insert(len(), value)` is exactly `push_back(value)`.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the `SegDeque`'s length.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut d = SegDeque::new();
    /// d.push_back('a');
    /// d.push_back('b');
    /// d.push_back('c');
    /// assert_eq!(d, vec!['a', 'b', 'c']);
    ///
    /// d.insert(1, 'd');
    /// assert_eq!(d, vec!['a', 'd', 'b', 'c']);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        #[cold]
        #[inline(never)]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {}) should be <= len (is {})", index, len);
        }

        let len = self.len();
        if index > len {
            assert_failed(index, len);
        }

        if index < len - index {
            self.push_front(value);
            for i in 0..index {
                self.swap_unchecked(i, i + 1);
            }
        } else {
            self.push_back(value);
            for i in (index..len).rev() {
                self.swap_unchecked(i, i + 1);
            }
        }
    }

    /// Removes and returns the element at `index` from the `SegDeque`.
    ///
    /// The element is swapped one position at a time towards whichever end is closer, and then
    /// popped off that end. All other elements keep their relative order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(1);
    /// buf.push_back(2);
    /// buf.push_back(3);
    /// assert_eq!(buf, vec![1, 2, 3]);
    ///
    /// assert_eq!(buf.remove(1), 2);
    /// assert_eq!(buf, vec![1, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[inline(never)]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {}) should be < len (is {})", index, len);
        }

        let len = self.len();
        if index >= len {
            assert_failed(index, len);
        }

        let removed = if index < len - 1 - index {
            for i in (0..index).rev() {
                self.swap_unchecked(i, i + 1);
            }
            self.pop_front()
        } else {
            for i in index..len - 1 {
                self.swap_unchecked(i, i + 1);
            }
            self.pop_back()
        };
        // index < len, so the deque was not empty
        removed.unwrap_or_else(|| unreachable!())
    }

    /// Shortens the `SegDeque`, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater than the `SegDeque`'s current length, this has no effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    /// assert_eq!(buf, vec![5, 10, 15]);
    /// buf.truncate(1);
    /// assert_eq!(buf, vec![5]);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            self.end -= 1;
            // SAFETY: the slot was live, and is no longer considered so.
            unsafe { ptr::drop_in_place(self.slot(self.end)) };
        }
    }

    /// Clears the `SegDeque`, removing all values.
    ///
    /// The memory stays allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut v = SegDeque::new();
    /// v.push_back(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` such that `f(&e)` returns false.
    /// This method operates in place, visiting each element exactly once in the
    /// original order, and preserves the order of the retained elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.extend(1..5);
    /// buf.retain(|&x| x % 2 == 0);
    /// assert_eq!(buf, vec![2, 4]);
    /// ```
    ///
    /// The exact order may be useful for tracking external state, like an index.
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.extend(1..6);
    ///
    /// let keep = [false, true, true, false, true];
    /// let mut i = 0;
    /// buf.retain(|_| (keep[i], i += 1).0);
    /// assert_eq!(buf, vec![2, 3, 5]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.len();
        let mut kept = 0;
        for i in 0..len {
            // SAFETY: i < len
            if f(unsafe { self.get_unchecked(i) }) {
                if i != kept {
                    self.swap_unchecked(i, kept);
                }
                kept += 1;
            }
        }
        self.truncate(kept);
    }

    /// Modifies the `SegDeque` in-place so that `len()` is equal to `new_len`,
    /// either by removing excess elements from the back or by appending
    /// elements generated by calling `generator` to the back.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    /// assert_eq!(buf, vec![5, 10, 15]);
    ///
    /// buf.resize_with(5, Default::default);
    /// assert_eq!(buf, vec![5, 10, 15, 0, 0]);
    ///
    /// buf.resize_with(2, || unreachable!());
    /// assert_eq!(buf, vec![5, 10]);
    ///
    /// let mut state = 100;
    /// buf.resize_with(5, || { state += 1; state });
    /// assert_eq!(buf, vec![5, 10, 101, 102, 103]);
    /// ```
    pub fn resize_with(&mut self, new_len: usize, generator: impl FnMut() -> T) {
        let len = self.len();

        if new_len > len {
            self.extend(repeat_with(generator).take(new_len - len))
        } else {
            self.truncate(new_len);
        }
    }

    /// Moves all the elements of `other` into `self`, leaving `other` empty.
    ///
    /// `other` keeps its memory, ready to be refilled.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf: SegDeque<_> = vec![1, 2].into_iter().collect();
    /// let mut buf2: SegDeque<_> = vec![3, 4].into_iter().collect();
    /// buf.append(&mut buf2);
    /// assert_eq!(buf, vec![1, 2, 3, 4]);
    /// assert!(buf2.is_empty());
    /// ```
    #[inline]
    pub fn append(&mut self, other: &mut Self) {
        self.reserve_back(other.len());
        while let Some(e) = other.pop_front() {
            self.push_back(e);
        }
    }
}

impl<T: Clone> SegDeque<T> {
    /// Modifies the `SegDeque` in-place so that `len()` is equal to new_len,
    /// either by removing excess elements from the back or by appending clones of `value`
    /// to the back.
    ///
    /// # Examples
    ///
    /// ```
    /// use segdeque::SegDeque;
    ///
    /// let mut buf = SegDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    /// assert_eq!(buf, vec![5, 10, 15]);
    ///
    /// buf.resize(2, 0);
    /// assert_eq!(buf, vec![5, 10]);
    ///
    /// buf.resize(5, 20);
    /// assert_eq!(buf, vec![5, 10, 20, 20, 20]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.resize_with(new_len, || value.clone());
    }
}

impl<T> Drop for SegDeque<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            // front to back; if one of them panics, the rest are leaked rather than dropped twice
            while self.begin < self.end {
                let position = self.begin;
                self.begin += 1;
                // SAFETY: the slot was live, and is no longer considered so.
                unsafe { ptr::drop_in_place(self.slot(position)) };
            }
        }
        // the slabs free themselves
    }
}

impl<A: PartialEq> PartialEq for SegDeque<A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<A: Eq> Eq for SegDeque<A> {}

macro_rules! __impl_slice_eq1 {
    ($lhs:ty, $rhs:ty, $($constraints:tt)*) => {
        impl<A, B> PartialEq<$rhs> for $lhs
        where
            A: PartialEq<B>,
            $($constraints)*
        {
            fn eq(&self, other: &$rhs) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }
    }
}

__impl_slice_eq1! { SegDeque<A>, Vec<B>, }
__impl_slice_eq1! { SegDeque<A>, &[B], }
__impl_slice_eq1! { SegDeque<A>, &mut [B], }

// For symmetry:

macro_rules! __impl_slice_eq2 {
    ($lhs:ty, $rhs:ty, $($constraints:tt)*) => {
        impl<A, B> PartialEq<$lhs> for $rhs
        where
            A: PartialEq<B>,
            $($constraints)*
        {
            fn eq(&self, other: &$lhs) -> bool {
                self.len() == other.len() && other.iter().eq(self.iter())
            }
        }
    }
}

__impl_slice_eq2! { SegDeque<A>, Vec<B>, }
__impl_slice_eq2! { SegDeque<A>, &[B], }
__impl_slice_eq2! { SegDeque<A>, &mut [B], }

impl<A: PartialOrd> PartialOrd for SegDeque<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<A: Ord> Ord for SegDeque<A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<A: Hash> Hash for SegDeque<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for e in self {
            e.hash(state);
        }
    }
}

impl<A> Index<usize> for SegDeque<A> {
    type Output = A;

    #[inline]
    fn index(&self, index: usize) -> &A {
        self.get(index).expect("Out of bounds access")
    }
}

impl<A> IndexMut<usize> for SegDeque<A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut A {
        self.get_mut(index).expect("Out of bounds access")
    }
}

impl<A> FromIterator<A> for SegDeque<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let iterator = iter.into_iter();
        let (lower, _) = iterator.size_hint();
        let mut deq = Self::with_capacity(lower);
        deq.extend(iterator);
        deq
    }
}

impl<T> IntoIterator for SegDeque<T> {
    type Item = T;
    type IntoIter = iter::IntoIter<T>;

    fn into_iter(self) -> iter::IntoIter<T> {
        iter::IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a SegDeque<T> {
    type Item = &'a T;
    type IntoIter = iter::Iter<'a, T>;

    fn into_iter(self) -> iter::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SegDeque<T> {
    type Item = &'a mut T;
    type IntoIter = iter::IterMut<'a, T>;

    fn into_iter(self) -> iter::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<A> Extend<A> for SegDeque<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve_back(iter.size_hint().0);
        iter.for_each(move |v| self.push_back(v));
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for SegDeque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: fmt::Debug> fmt::Debug for SegDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T> From<Vec<T>> for SegDeque<T> {
    fn from(other: Vec<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<VecDeque<T>> for SegDeque<T> {
    fn from(other: VecDeque<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for SegDeque<T> {
    fn from(other: [T; N]) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<SegDeque<T>> for Vec<T> {
    fn from(other: SegDeque<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<SegDeque<T>> for VecDeque<T> {
    fn from(other: SegDeque<T>) -> Self {
        other.into_iter().collect()
    }
}
