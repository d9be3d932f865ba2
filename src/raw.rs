//! Block storage for `SegDeque`.
//!
//! Elements live in fixed-size blocks of `BLOCK_CAPACITY` slots. Blocks are carved out of larger
//! slabs, and an index array of block addresses maps a position to its block. Growing only ever
//! replaces the index array and adds a slab; a block, once handed out, stays where it is until
//! the deque is dropped.
//!
//! Nothing in here knows which slots hold live elements. That is tracked by the deque.

use alloc::alloc::{alloc, dealloc, Layout};
use alloc::vec::Vec;
use core::ptr::NonNull;

use crate::cursor::Pos;
use crate::error::TryReserveError;
use crate::BLOCK_CAPACITY;

/// One raw allocation backing `blocks` consecutive blocks.
pub(crate) struct Slab<T> {
    ptr: NonNull<T>,
    blocks: usize,
}

impl<T> Slab<T> {
    fn layout(blocks: usize) -> Result<Layout, TryReserveError> {
        let slots = blocks
            .checked_mul(BLOCK_CAPACITY)
            .ok_or_else(TryReserveError::capacity_overflow)?;
        Layout::array::<T>(slots).map_err(|_| TryReserveError::capacity_overflow())
    }

    fn try_new(blocks: usize) -> Result<Self, TryReserveError> {
        Self::try_new_with(blocks, Self::layout(blocks)?)
    }

    fn try_new_with(blocks: usize, layout: Layout) -> Result<Self, TryReserveError> {
        if layout.size() == 0 {
            // zero-sized elements (or no blocks): nothing to allocate
            return Ok(Self {
                ptr: NonNull::dangling(),
                blocks,
            });
        }

        // SAFETY: the layout has non-zero size.
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self { ptr, blocks }),
            None => Err(TryReserveError::alloc_error(layout)),
        }
    }

    #[inline]
    fn block(&self, i: usize) -> NonNull<T> {
        debug_assert!(i < self.blocks);
        // SAFETY: block `i` starts inside this slab's allocation (or T is zero-sized, in which
        // case `add` does not move the pointer).
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(i * BLOCK_CAPACITY)) }
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        // Only the memory is released here. Live elements are dropped by the deque beforehand.
        if let Ok(layout) = Self::layout(self.blocks) {
            if layout.size() != 0 {
                // SAFETY: allocated in `try_new` with this exact layout.
                unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), layout) }
            }
        }
    }
}

/// The index array together with every slab its entries point into.
pub(crate) struct RawBlocks<T> {
    index: Vec<NonNull<T>>,
    slabs: Vec<Slab<T>>,
}

impl<T> RawBlocks<T> {
    pub(crate) const fn new() -> Self {
        Self {
            index: Vec::new(),
            slabs: Vec::new(),
        }
    }

    /// Block storage with `blocks` blocks, all backed by a single slab.
    pub(crate) fn try_with_blocks(blocks: usize) -> Result<Self, TryReserveError> {
        let slab = Slab::try_new(blocks)?;
        let mut index = Vec::new();
        try_reserve(&mut index, blocks)?;
        index.extend((0..blocks).map(|i| slab.block(i)));
        let mut slabs = Vec::new();
        try_reserve(&mut slabs, 1)?;
        slabs.push(slab);
        Ok(Self { index, slabs })
    }

    #[inline]
    pub(crate) fn blocks(&self) -> &[NonNull<T>] {
        &self.index
    }

    #[inline]
    pub(crate) fn block_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(crate) fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    /// Number of positions addressable through the index array.
    #[inline]
    pub(crate) fn slots(&self) -> usize {
        self.index.len() * BLOCK_CAPACITY
    }

    /// # Safety
    ///
    /// `pos` must lie within `0..self.slots()`.
    #[inline]
    pub(crate) unsafe fn slot(&self, pos: Pos) -> *mut T {
        slot(&self.index, pos)
    }

    /// Prepares a larger index array without touching the current one.
    ///
    /// With `n` blocks in use, the new array has `extra = ceil(n / 2) + 1` fresh blocks on each
    /// side of the existing `n`, all of them backed by one new slab. Existing block addresses are
    /// copied over as they are, so no element moves.
    ///
    /// The returned [`Growth`] owns the new slab and index array until it is handed to
    /// [`commit`](Self::commit). Dropping it instead releases both.
    pub(crate) fn try_stage_growth(&mut self) -> Result<Growth<T>, TryReserveError> {
        let extra = self.index.len().div_ceil(2) + 1;
        self.try_stage_growth_by(extra)
    }

    /// Prepares a single growth that adds at least `slots` slots on each side.
    ///
    /// The block count matches what repeating [`try_stage_growth`](Self::try_stage_growth) until
    /// there is enough room would give, but the fresh blocks all come from one slab and nothing
    /// is committed along the way. Sizes that overflow are rejected before anything is
    /// allocated.
    pub(crate) fn try_stage_growth_for(
        &mut self,
        slots: usize,
    ) -> Result<Growth<T>, TryReserveError> {
        let mut n = self.index.len();
        let mut extra = 0usize;
        while extra
            .checked_mul(BLOCK_CAPACITY)
            .ok_or_else(TryReserveError::capacity_overflow)?
            < slots
        {
            let step = n.div_ceil(2) + 1;
            extra = extra
                .checked_add(step)
                .ok_or_else(TryReserveError::capacity_overflow)?;
            n = step
                .checked_mul(2)
                .and_then(|fresh| n.checked_add(fresh))
                .ok_or_else(TryReserveError::capacity_overflow)?;
        }
        self.try_stage_growth_by(extra)
    }

    fn try_stage_growth_by(&mut self, extra: usize) -> Result<Growth<T>, TryReserveError> {
        let n = self.index.len();
        let fresh = extra
            .checked_mul(2)
            .ok_or_else(TryReserveError::capacity_overflow)?;
        let len = n
            .checked_add(fresh)
            .ok_or_else(TryReserveError::capacity_overflow)?;
        let shift = extra
            .checked_mul(BLOCK_CAPACITY)
            .ok_or_else(TryReserveError::capacity_overflow)?;
        // every position must stay addressable as a `usize`
        len.checked_mul(BLOCK_CAPACITY)
            .ok_or_else(TryReserveError::capacity_overflow)?;
        Layout::array::<NonNull<T>>(len).map_err(|_| TryReserveError::capacity_overflow())?;
        let slab_layout = Slab::<T>::layout(fresh)?;

        // room to record the slab on commit, so that committing never allocates
        try_reserve(&mut self.slabs, 1)?;

        let slab = Slab::try_new_with(fresh, slab_layout)?;
        let mut index = Vec::new();
        try_reserve(&mut index, len)?;
        index.extend((0..extra).map(|i| slab.block(i)));
        index.extend_from_slice(&self.index);
        index.extend((extra..fresh).map(|i| slab.block(i)));
        debug_assert_eq!(index.len(), len);

        Ok(Growth { index, slab, shift })
    }

    /// Makes a staged growth the live block layout. Cannot fail and does not allocate.
    pub(crate) fn commit(&mut self, growth: Growth<T>) {
        let Growth { index, slab, .. } = growth;
        debug_assert!(self.slabs.len() < self.slabs.capacity());
        // the old index array only borrowed its blocks; they are all still listed in `index`
        self.index = index;
        self.slabs.push(slab);
    }
}

/// A staged, not yet committed, growth of the index array.
pub(crate) struct Growth<T> {
    index: Vec<NonNull<T>>,
    slab: Slab<T>,
    shift: usize,
}

impl<T> Growth<T> {
    /// How far every existing position moves once this growth is committed.
    #[inline]
    pub(crate) fn shift(&self) -> usize {
        self.shift
    }

    /// # Safety
    ///
    /// `pos` must lie within the staged index array.
    #[inline]
    pub(crate) unsafe fn slot(&self, pos: Pos) -> *mut T {
        slot(&self.index, pos)
    }
}

/// Translates a position into the address of its slot.
///
/// # Safety
///
/// `pos.block()` must be a valid index into `index`.
#[inline]
pub(crate) unsafe fn slot<T>(index: &[NonNull<T>], pos: Pos) -> *mut T {
    debug_assert!(pos.block() >= 0 && (pos.block() as usize) < index.len());
    index
        .get_unchecked(pos.block() as usize)
        .as_ptr()
        .add(pos.offset())
}

fn try_reserve<U>(v: &mut Vec<U>, additional: usize) -> Result<(), TryReserveError> {
    v.try_reserve_exact(additional).map_err(|_| {
        v.len()
            .checked_add(additional)
            .and_then(|len| Layout::array::<U>(len).ok())
            .map_or_else(TryReserveError::capacity_overflow, TryReserveError::alloc_error)
    })
}
