//! Random-access positions into a `SegDeque`.
//!
//! A position is a `(block, offset)` pair over the deque's index array. Every movement goes
//! through [`Pos::add`], which carries the offset across block boundaries using floor division,
//! so a step backwards from offset 0 lands on the last slot of the previous block rather than on
//! a negative offset.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

use crate::{SegDeque, BLOCK_CAPACITY};

const B: isize = BLOCK_CAPACITY as isize;

/// A position in the index-array domain.
///
/// `block` may be negative (or past the last block) for positions that only exist as the result
/// of arithmetic, such as one before the front of a deque whose front is the very first slot.
/// Such positions can be compared and moved, but never dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Pos {
    block: isize,
    offset: usize,
}

impl Pos {
    /// The position of slot `position`, counting from the first slot of the first block.
    #[inline]
    pub(crate) const fn at(position: usize) -> Self {
        Self {
            block: (position / BLOCK_CAPACITY) as isize,
            offset: position % BLOCK_CAPACITY,
        }
    }

    #[inline]
    pub(crate) fn block(self) -> isize {
        self.block
    }

    #[inline]
    pub(crate) fn offset(self) -> usize {
        self.offset
    }

    /// Moves `delta` slots forward (or backward, if negative).
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub(crate) fn add(self, delta: isize) -> Self {
        let carried = self.offset as isize + delta;
        Self {
            block: self.block + carried.div_euclid(B),
            offset: carried.rem_euclid(B) as usize,
        }
    }

    /// Number of slots from `origin` to `self`.
    #[inline]
    pub(crate) fn distance(self, origin: Self) -> isize {
        (self.block - origin.block) * B + (self.offset as isize - origin.offset as isize)
    }
}

impl<T> SegDeque<T> {
    #[inline]
    pub(crate) fn front_pos(&self) -> Pos {
        Pos::at(self.begin)
    }

    /// The index of `pos` relative to the front, if it is `0..=len`.
    #[inline]
    fn index_of(&self, pos: Pos) -> Option<usize> {
        let index = pos.distance(self.front_pos());
        if index >= 0 && index as usize <= self.len() {
            Some(index as usize)
        } else {
            None
        }
    }

    #[inline]
    fn live(&self, pos: Pos) -> bool {
        matches!(self.index_of(pos), Some(index) if index < self.len())
    }
}

/// A read-only cursor over a [`SegDeque`].
///
/// A cursor names a position rather than an element: it can sit one past the back (like the
/// `end` of a half-open range), and arithmetic may take it anywhere. Only positions that hold an
/// element yield one from [`get`](Cursor::get).
///
/// Cursors are cheap to copy and support the usual random-access arithmetic:
///
/// ```
/// use segdeque::SegDeque;
///
/// let d: SegDeque<_> = (0..100).collect();
/// let mut c = d.cursor_front();
/// c += 40;
/// assert_eq!(c.get(), Some(&40));
/// assert_eq!((c - 7).get(), Some(&33));
/// assert_eq!(d.cursor_end() - c, 60);
/// assert!(c < d.cursor_end());
/// ```
pub struct Cursor<'a, T> {
    deque: &'a SegDeque<T>,
    pos: Pos,
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub(crate) fn new(deque: &'a SegDeque<T>, pos: Pos) -> Self {
        Self { deque, pos }
    }

    /// Returns the index of the cursor relative to the front of the deque.
    ///
    /// Returns `None` if the cursor is outside of `0..=len`.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.deque.index_of(self.pos)
    }

    /// Returns the element under the cursor, or `None` if the cursor is not on an element.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        self.peek(0)
    }

    /// Returns the element `delta` positions away from the cursor, if there is one.
    pub fn peek(&self, delta: isize) -> Option<&'a T> {
        let pos = self.pos.add(delta);
        if self.deque.live(pos) {
            // SAFETY: live positions hold initialized elements, and the shared borrow of the
            // deque keeps them there for 'a.
            Some(unsafe { &*self.deque.raw.slot(pos) })
        } else {
            None
        }
    }

    /// Moves the cursor one position towards the back.
    #[inline]
    pub fn move_next(&mut self) {
        *self += 1;
    }

    /// Moves the cursor one position towards the front.
    #[inline]
    pub fn move_prev(&mut self) {
        *self -= 1;
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Self;

    #[inline]
    fn add(self, delta: isize) -> Self {
        Self {
            deque: self.deque,
            pos: self.pos.add(delta),
        }
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Self;

    #[inline]
    fn sub(self, delta: isize) -> Self {
        self + -delta
    }
}

impl<'a, T> AddAssign<isize> for Cursor<'a, T> {
    #[inline]
    fn add_assign(&mut self, delta: isize) {
        self.pos = self.pos.add(delta);
    }
}

impl<'a, T> SubAssign<isize> for Cursor<'a, T> {
    #[inline]
    fn sub_assign(&mut self, delta: isize) {
        *self += -delta;
    }
}

/// The signed distance between two cursors into the same deque.
///
/// # Panics
///
/// Panics in debug builds if the cursors belong to different deques.
impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        debug_assert!(
            ptr::eq(self.deque, other.deque),
            "distance between cursors of different deques"
        );
        self.pos.distance(other.pos)
    }
}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.deque, other.deque) && self.pos == other.pos
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

/// Cursors into different deques are unordered.
impl<'a, T> PartialOrd for Cursor<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if ptr::eq(self.deque, other.deque) {
            Some(self.pos.distance(other.pos).cmp(&0))
        } else {
            None
        }
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.index())
            .field(&self.get())
            .finish()
    }
}

/// A cursor over a [`SegDeque`] with mutable access to the elements.
///
/// Holding a `CursorMut` borrows the deque mutably, so the deque cannot grow or shrink under it
/// except through the cursor itself ([`insert`](CursorMut::insert) and
/// [`remove_current`](CursorMut::remove_current)).
///
/// A `CursorMut` can be turned into a [`Cursor`] but not the other way around.
///
/// ```
/// use segdeque::SegDeque;
///
/// let mut d: SegDeque<_> = (0..10).collect();
/// let mut c = d.cursor_at_mut(3);
/// *c.get_mut().unwrap() *= 100;
/// c.move_by(4);
/// c.insert(-1);
/// assert_eq!(c.get(), Some(&7));
/// assert_eq!(c.remove_current(), Some(7));
/// assert_eq!(d, vec![0, 1, 2, 300, 4, 5, 6, -1, 8, 9]);
/// ```
pub struct CursorMut<'a, T> {
    deque: &'a mut SegDeque<T>,
    pos: Pos,
}

impl<'a, T> CursorMut<'a, T> {
    #[inline]
    pub(crate) fn new(deque: &'a mut SegDeque<T>, pos: Pos) -> Self {
        Self { deque, pos }
    }

    /// Returns the index of the cursor relative to the front of the deque.
    ///
    /// Returns `None` if the cursor is outside of `0..=len`.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.deque.index_of(self.pos)
    }

    /// Returns the element under the cursor, or `None` if the cursor is not on an element.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.peek(0)
    }

    /// Returns the element under the cursor mutably, or `None` if the cursor is not on an
    /// element.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.peek_mut(0)
    }

    /// Returns the element `delta` positions away from the cursor, if there is one.
    #[inline]
    pub fn peek(&self, delta: isize) -> Option<&T> {
        self.as_cursor().peek(delta)
    }

    /// Returns the element `delta` positions away from the cursor mutably, if there is one.
    pub fn peek_mut(&mut self, delta: isize) -> Option<&mut T> {
        let pos = self.pos.add(delta);
        if self.deque.live(pos) {
            // SAFETY: live positions hold initialized elements, and we hold the deque mutably.
            Some(unsafe { &mut *self.deque.raw.slot(pos) })
        } else {
            None
        }
    }

    /// Moves the cursor `delta` positions (towards the back if positive).
    #[inline]
    pub fn move_by(&mut self, delta: isize) {
        self.pos = self.pos.add(delta);
    }

    /// Moves the cursor one position towards the back.
    #[inline]
    pub fn move_next(&mut self) {
        self.move_by(1);
    }

    /// Moves the cursor one position towards the front.
    #[inline]
    pub fn move_prev(&mut self) {
        self.move_by(-1);
    }

    /// Inserts `value` just before the cursor.
    ///
    /// The cursor keeps pointing at the element (or end position) it pointed at before. This is
    /// [`SegDeque::insert`] at the cursor's index, with the same cost.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is outside of `0..=len`.
    pub fn insert(&mut self, value: T) {
        let index = match self.index() {
            Some(index) => index,
            None => panic!("insert through a cursor outside of the deque"),
        };
        self.deque.insert(index, value);
        // the deque may have grown, which moves every position
        self.pos = Pos::at(self.deque.begin + index + 1);
    }

    /// Removes the element under the cursor and returns it.
    ///
    /// The cursor moves on to the element that followed the removed one (or to the end). Returns
    /// `None`, and changes nothing, if the cursor is not on an element.
    pub fn remove_current(&mut self) -> Option<T> {
        let index = self.index().filter(|&i| i < self.deque.len())?;
        let value = self.deque.remove(index);
        self.pos = Pos::at(self.deque.begin + index);
        Some(value)
    }

    /// Returns a read-only cursor at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.deque, self.pos)
    }

    /// Converts this cursor into a read-only cursor at the same position.
    #[inline]
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.deque, self.pos)
    }
}

impl<'a, T> AddAssign<isize> for CursorMut<'a, T> {
    #[inline]
    fn add_assign(&mut self, delta: isize) {
        self.move_by(delta);
    }
}

impl<'a, T> SubAssign<isize> for CursorMut<'a, T> {
    #[inline]
    fn sub_assign(&mut self, delta: isize) {
        self.move_by(-delta);
    }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        cursor.into_cursor()
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for CursorMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.index())
            .field(&self.get())
            .finish()
    }
}
