//! The single backing allocation of a container.
//!
//! A [`RawBuffer`] pairs an optional base pointer with the
//! [`SegmentLayout`] it was sized for. It knows nothing about element
//! liveness: constructing and destroying values in the segments is the
//! container's job. The buffer does not own its allocator either, so it
//! must be released explicitly with [`RawBuffer::release`].

#![allow(unsafe_code)]

use std::ptr::NonNull;

use strata_core::{FieldType, SegmentLayout, SoaError};

use crate::alloc::ByteAllocator;
use crate::fields::FieldTuple;

/// One allocation partitioned into field segments.
///
/// `base` is `None` exactly when the layout needs zero bytes: capacity 0,
/// or a record whose fields are all zero-sized.
pub(crate) struct RawBuffer {
    base: Option<NonNull<u8>>,
    layout: SegmentLayout,
}

impl RawBuffer {
    /// The canonical empty buffer: capacity 0, no allocation.
    pub(crate) fn empty(types: &[FieldType]) -> Self {
        Self {
            base: None,
            layout: SegmentLayout::empty(types),
        }
    }

    /// Lay out and allocate `capacity` slots per field.
    pub(crate) fn allocate<A: ByteAllocator>(
        alloc: &A,
        types: &[FieldType],
        capacity: usize,
    ) -> Result<Self, SoaError> {
        let layout = SegmentLayout::compute(types, capacity)?;
        let base = match layout.total_bytes() {
            0 => None,
            bytes => Some(alloc.allocate(bytes)?),
        };
        Ok(Self { base, layout })
    }

    pub(crate) fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    pub(crate) fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Typed start pointer of every field segment.
    ///
    /// Without an allocation every pointer is dangling, which is valid for
    /// zero-length slices and for zero-sized fields.
    pub(crate) fn segment_ptrs<F: FieldTuple>(&self) -> F::Ptrs {
        match self.base {
            // SAFETY: the layout was computed from F::TYPES for this
            // allocation, so every offset lies within it and is aligned.
            Some(base) => unsafe { F::ptrs(base, &self.layout) },
            None => F::dangling(),
        }
    }

    /// Return the allocation to `alloc`.
    ///
    /// # Safety
    ///
    /// `alloc` must be the allocator this buffer was allocated from, and
    /// every live element in the segments must already have been dropped
    /// or moved out.
    pub(crate) unsafe fn release<A: ByteAllocator>(self, alloc: &A) {
        if let Some(base) = self.base {
            // SAFETY: `base` came from `alloc.allocate(total_bytes)`.
            unsafe { alloc.deallocate(base, self.layout.total_bytes()) };
        }
    }
}
