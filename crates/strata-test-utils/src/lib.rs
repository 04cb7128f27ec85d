//! Test utilities and instrumented allocators for Strata development.
//!
//! Provides allocation strategies that record what the containers ask
//! for ([`CountingAllocator`]) or refuse on demand ([`FailingAllocator`]),
//! plus the fixture records in [`fixtures`].
//!
//! Both allocators are meant to be borrowed: build a container with
//! `SoaVec::new_in(&alloc)` and inspect the counters afterwards.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use strata_arena::{ByteAllocator, Global};
use strata_core::AllocError;

/// Forwards to [`Global`] and counts every request.
///
/// Uses atomics so containers built on it stay `Send + Sync`.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    live_bytes: AtomicUsize,
    last_request: AtomicUsize,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Number of `deallocate` calls.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::Relaxed)
    }

    /// Bytes handed out and not yet returned.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Byte count of the most recent `allocate` call.
    pub fn last_request(&self) -> usize {
        self.last_request.load(Ordering::Relaxed)
    }

    /// Allocations not yet returned.
    pub fn outstanding(&self) -> usize {
        self.allocations() - self.deallocations()
    }
}

#[allow(unsafe_code)]
// SAFETY: every buffer comes from `Global` and is returned to it unchanged.
unsafe impl ByteAllocator for CountingAllocator {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        self.last_request.store(bytes, Ordering::Relaxed);
        let ptr = Global.allocate(bytes)?;
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(bytes, Ordering::Relaxed);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, bytes: usize) {
        self.deallocations.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(bytes, Ordering::Relaxed);
        // SAFETY: `ptr` came from `Global.allocate(bytes)` above.
        unsafe { Global.deallocate(ptr, bytes) }
    }
}

/// Succeeds a configurable number of times, then fails every request.
///
/// Useful for checking that allocation failure reaches the caller
/// verbatim and leaves the container untouched.
#[derive(Debug)]
pub struct FailingAllocator {
    pub succeed_count: usize,
    inner: CountingAllocator,
    call_count: AtomicUsize,
}

impl FailingAllocator {
    /// Create an allocator that succeeds `succeed_count` times then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            inner: CountingAllocator::new(),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `allocate()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Allocations not yet returned.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding()
    }

    /// Reset the call counter, granting `succeed_count` more allocations.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::Relaxed);
    }
}

#[allow(unsafe_code)]
// SAFETY: successful requests are served by `CountingAllocator`.
unsafe impl ByteAllocator for FailingAllocator {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(AllocError {
                bytes,
                align: strata_core::BASELINE_ALIGN,
            });
        }
        self.inner.allocate(bytes)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, bytes: usize) {
        // SAFETY: only pointers from `inner` are ever handed out.
        unsafe { self.inner.deallocate(ptr, bytes) }
    }
}
