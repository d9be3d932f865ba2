use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::cursor::Pos;
use crate::raw;
use crate::SegDeque;

macro_rules! _impl {
    (fw $($mut_:tt)?) => {
        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            if self.head == self.tail {
                return None;
            }
            // SAFETY: every position in head..tail holds a live element, and each one is handed
            // out at most once.
            let slot = unsafe { raw::slot(self.blocks, self.head) };
            self.head = self.head.add(1);
            Some(unsafe { & $($mut_)? *slot })
        }

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            let len = self.remaining();
            (len, Some(len))
        }

        fn nth(&mut self, n: usize) -> Option<Self::Item> {
            if n >= self.remaining() {
                self.head = self.tail;
                None
            } else {
                self.head = self.head.add(n as isize);
                self.next()
            }
        }

        #[inline]
        fn count(self) -> usize {
            self.remaining()
        }

        #[inline]
        fn last(mut self) -> Option<Self::Item> {
            self.next_back()
        }
    };

    (bw $($mut_:tt)?) => {
        #[inline]
        fn next_back(&mut self) -> Option<Self::Item> {
            if self.head == self.tail {
                return None;
            }
            self.tail = self.tail.add(-1);
            // SAFETY: as in `next`.
            let slot = unsafe { raw::slot(self.blocks, self.tail) };
            Some(unsafe { & $($mut_)? *slot })
        }

        fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
            if n >= self.remaining() {
                self.tail = self.head;
                None
            } else {
                self.tail = self.tail.add(-(n as isize));
                self.next_back()
            }
        }
    };
}

/// An iterator over the elements of a `SegDeque`.
///
/// This `struct` is created by the [`iter`] and [`range`] methods on [`SegDeque`]. See their
/// documentation for more.
///
/// [`iter`]: SegDeque::iter
/// [`range`]: SegDeque::range
pub struct Iter<'a, T> {
    blocks: &'a [NonNull<T>],
    head: Pos,
    tail: Pos,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(deque: &'a SegDeque<T>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= deque.len());
        Self {
            blocks: deque.raw.blocks(),
            head: Pos::at(deque.begin + start),
            tail: Pos::at(deque.begin + end),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.tail.distance(self.head) as usize
    }

    /// Splits the remaining elements into `..mid` and `mid..`.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn split_at(self, mid: usize) -> (Self, Self) {
        debug_assert!(mid <= self.remaining());
        let at = self.head.add(mid as isize);
        (
            Self { tail: at, ..self },
            Self { head: at, ..self },
        )
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Iter<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&DebugList(*self)).finish()
    }
}

/// Prints the elements an iterator has left without consuming it.
struct DebugList<'a, T>(Iter<'a, T>);

impl<'a, T: fmt::Debug> fmt::Debug for DebugList<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    _impl!(fw);
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    _impl!(bw);
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// SAFETY: an `Iter` only hands out shared references.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// A mutable iterator over the elements of a `SegDeque`.
///
/// This `struct` is created by the [`iter_mut`] and [`range_mut`] methods on [`SegDeque`]. See
/// their documentation for more.
///
/// [`iter_mut`]: SegDeque::iter_mut
/// [`range_mut`]: SegDeque::range_mut
pub struct IterMut<'a, T> {
    blocks: &'a [NonNull<T>],
    head: Pos,
    tail: Pos,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(deque: &'a mut SegDeque<T>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= deque.len());
        let head = Pos::at(deque.begin + start);
        let tail = Pos::at(deque.begin + end);
        Self {
            blocks: deque.raw.blocks(),
            head,
            tail,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.tail.distance(self.head) as usize
    }

    /// Splits the remaining elements into `..mid` and `mid..`.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn split_at(self, mid: usize) -> (Self, Self) {
        debug_assert!(mid <= self.remaining());
        let at = self.head.add(mid as isize);
        (
            Self {
                blocks: self.blocks,
                head: self.head,
                tail: at,
                _marker: PhantomData,
            },
            Self {
                blocks: self.blocks,
                head: at,
                tail: self.tail,
                _marker: PhantomData,
            },
        )
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a shared view over the same positions; nothing is handed out while it lives
        let view = Iter {
            blocks: self.blocks,
            head: self.head,
            tail: self.tail,
            _marker: PhantomData,
        };
        f.debug_tuple("IterMut").field(&DebugList(view)).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    _impl!(fw mut);
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    _impl!(bw mut);
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

// SAFETY: an `IterMut` behaves like a `&mut [T]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// An owning iterator over the elements of a `SegDeque`.
///
/// This `struct` is created by the [`into_iter`] method on [`SegDeque`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: SegDeque::into_iter
#[derive(Clone, Debug)]
pub struct IntoIter<T> {
    pub(super) inner: SegDeque<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        self.inner.len()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
