//! The allocation collaborator.
//!
//! Containers never request typed memory. They ask a [`ByteAllocator`]
//! for one raw byte range sized by the layout engine and carve the field
//! segments out of it themselves.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use strata_core::{AllocError, BASELINE_ALIGN};

/// Strategy object that hands out raw byte buffers.
///
/// # Safety
///
/// Implementors must guarantee that a successful `allocate(bytes)` returns
/// a pointer that is valid for reads and writes of `bytes` bytes, aligned
/// to [`BASELINE_ALIGN`], and not aliased by any other live allocation until
/// it is passed back to `deallocate` with the same byte count.
pub unsafe trait ByteAllocator {
    /// Allocate `bytes` bytes aligned to [`BASELINE_ALIGN`].
    ///
    /// Containers never call this with `bytes == 0`.
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError>;

    /// Release a buffer obtained from [`ByteAllocator::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from a call to `allocate` on this allocator with the
    /// same `bytes`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, bytes: usize);
}

/// The process-wide allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

// SAFETY: `std::alloc::alloc` returns memory valid for `layout.size()` bytes
// at `layout.align()`; the layout always uses BASELINE_ALIGN.
unsafe impl ByteAllocator for Global {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        let err = AllocError {
            bytes,
            align: BASELINE_ALIGN,
        };
        if bytes == 0 {
            return Err(err);
        }
        let layout = Layout::from_size_align(bytes, BASELINE_ALIGN).map_err(|_| err)?;
        // SAFETY: `layout` has a non-zero size (checked above).
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(err)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, bytes: usize) {
        // SAFETY: the caller passes back a pointer from `allocate` with the
        // same byte count, so this layout was valid when it was allocated.
        unsafe {
            let layout = Layout::from_size_align_unchecked(bytes, BASELINE_ALIGN);
            std::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}

// SAFETY: forwards to the referenced allocator, which upholds the contract.
unsafe impl<A: ByteAllocator + ?Sized> ByteAllocator for &A {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(bytes)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, bytes: usize) {
        // SAFETY: same contract as the referenced allocator.
        unsafe { (**self).deallocate(ptr, bytes) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_returns_baseline_aligned_memory() {
        let ptr = Global.allocate(40).unwrap();
        assert_eq!(ptr.as_ptr() as usize % BASELINE_ALIGN, 0);
        // SAFETY: the buffer is 40 bytes long and owned by this test.
        unsafe {
            ptr.as_ptr().write_bytes(0xAB, 40);
            assert_eq!(*ptr.as_ptr().add(39), 0xAB);
            Global.deallocate(ptr, 40);
        }
    }

    #[test]
    fn global_rejects_zero_bytes() {
        let err = Global.allocate(0).unwrap_err();
        assert_eq!(err.bytes, 0);
        assert_eq!(err.align, BASELINE_ALIGN);
    }

    #[test]
    fn global_reports_impossible_sizes() {
        let err = Global.allocate(usize::MAX).unwrap_err();
        assert_eq!(err.bytes, usize::MAX);
    }

    #[test]
    fn references_forward_to_the_allocator() {
        let global = Global;
        let by_ref = &global;
        let ptr = by_ref.allocate(8).unwrap();
        // SAFETY: allocated above with the same size.
        unsafe { by_ref.deallocate(ptr, 8) };
    }
}
