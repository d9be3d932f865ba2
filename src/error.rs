use core::alloc::Layout;
use core::fmt;

/// The error returned by [`SegDeque::at`] and [`SegDeque::at_mut`] when the index does not name a
/// live element.
///
/// [`SegDeque::at`]: crate::SegDeque::at
/// [`SegDeque::at_mut`]: crate::SegDeque::at_mut
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    /// The index that was requested.
    pub index: usize,
    /// The length of the deque at the time of the request.
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} out of range for deque of length {}", self.index, self.len)
    }
}

impl core::error::Error for OutOfRange {}

/// The error type for `try_reserve_*` methods.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TryReserveError {
    kind: TryReserveErrorKind,
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum TryReserveErrorKind {
    /// The number of slots or index entries overflowed.
    CapacityOverflow,
    /// The allocator returned an error.
    AllocError { layout: Layout },
}

impl TryReserveError {
    pub(crate) fn capacity_overflow() -> Self {
        Self {
            kind: TryReserveErrorKind::CapacityOverflow,
        }
    }

    pub(crate) fn alloc_error(layout: Layout) -> Self {
        Self {
            kind: TryReserveErrorKind::AllocError { layout },
        }
    }

    /// Returns the layout of the failed allocation, if the failure came from the allocator.
    pub fn layout(&self) -> Option<Layout> {
        match self.kind {
            TryReserveErrorKind::CapacityOverflow => None,
            TryReserveErrorKind::AllocError { layout } => Some(layout),
        }
    }

    /// Turns the error into the same panic or abort that an infallible method would produce.
    #[cold]
    #[inline(never)]
    pub(crate) fn handle(self) -> ! {
        match self.kind {
            TryReserveErrorKind::CapacityOverflow => panic!("capacity overflow"),
            TryReserveErrorKind::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TryReserveErrorKind::CapacityOverflow => {
                write!(f, "memory allocation failed due to capacity overflow")
            }
            TryReserveErrorKind::AllocError { layout } => {
                write!(f, "memory allocation of {} bytes failed", layout.size())
            }
        }
    }
}

impl core::error::Error for TryReserveError {}
