//! Proxy iterators.
//!
//! [`Iter`] and [`IterMut`] walk a range of slot positions and build a
//! fresh proxy for each position they yield; nothing is cached between
//! steps. Both are double-ended and exact-size, and `nth`/`nth_back` jump
//! in O(1). [`IntoIter`] owns the backing buffer and moves whole records
//! out of it.

#![allow(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;

use crate::alloc::ByteAllocator;
use crate::fields::FieldTuple;
use crate::raw::RawBuffer;
use crate::record::{FieldsOf, PtrsOf, Record};

/// Iterator over shared proxies, created by `SoaVec::iter`.
///
/// Iterators compare and order by their front position. Comparing
/// iterators over different containers is meaningless.
pub struct Iter<'a, R: Record> {
    ptrs: PtrsOf<R>,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a R>,
}

impl<'a, R: Record> Iter<'a, R> {
    /// # Safety
    ///
    /// Slots `0..len` must be live and not mutably borrowed for `'a`.
    pub(crate) unsafe fn new(ptrs: PtrsOf<R>, len: usize) -> Self {
        Self {
            ptrs,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }

    /// Slot position of the next element from the front.
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a, R: Record> Iterator for Iter<'a, R> {
    type Item = R::Ref<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: index < back <= len, live for 'a.
        Some(unsafe { R::proxy(self.ptrs, index) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn count(self) -> usize {
        self.len()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<R: Record> DoubleEndedIterator for Iter<'_, R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: front <= back < len, live for 'a.
        Some(unsafe { R::proxy(self.ptrs, self.back) })
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<R: Record> ExactSizeIterator for Iter<'_, R> {}

impl<R: Record> FusedIterator for Iter<'_, R> {}

impl<R: Record> Clone for Iter<'_, R> {
    fn clone(&self) -> Self {
        Self {
            ptrs: self.ptrs,
            front: self.front,
            back: self.back,
            _marker: PhantomData,
        }
    }
}

impl<R: Record> PartialEq for Iter<'_, R> {
    fn eq(&self, other: &Self) -> bool {
        self.front == other.front
    }
}

impl<R: Record> Eq for Iter<'_, R> {}

impl<R: Record> PartialOrd for Iter<'_, R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Record> Ord for Iter<'_, R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.front.cmp(&other.front)
    }
}

impl<R: Record> fmt::Debug for Iter<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("record", &R::NAME)
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

// SAFETY: the iterator only hands out shared access to the fields.
unsafe impl<R: Record + Sync> Send for Iter<'_, R> {}
// SAFETY: as above.
unsafe impl<R: Record + Sync> Sync for Iter<'_, R> {}

/// Iterator over mutable proxies, created by `SoaVec::iter_mut`.
///
/// Every position is yielded at most once, so the proxies never alias.
pub struct IterMut<'a, R: Record> {
    ptrs: PtrsOf<R>,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut R>,
}

impl<'a, R: Record> IterMut<'a, R> {
    /// # Safety
    ///
    /// Slots `0..len` must be live and not otherwise borrowed for `'a`.
    pub(crate) unsafe fn new(ptrs: PtrsOf<R>, len: usize) -> Self {
        Self {
            ptrs,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }

    /// Slot position of the next element from the front.
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a, R: Record> Iterator for IterMut<'a, R> {
    type Item = R::Mut<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: index is in bounds and never yielded again.
        Some(unsafe { R::proxy_mut(self.ptrs, index) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<R: Record> DoubleEndedIterator for IterMut<'_, R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: back is in bounds and never yielded again.
        Some(unsafe { R::proxy_mut(self.ptrs, self.back) })
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<R: Record> ExactSizeIterator for IterMut<'_, R> {}

impl<R: Record> FusedIterator for IterMut<'_, R> {}

impl<R: Record> fmt::Debug for IterMut<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("record", &R::NAME)
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

// SAFETY: the iterator hands out exclusive access to distinct elements.
unsafe impl<R: Record + Send> Send for IterMut<'_, R> {}
// SAFETY: `&IterMut` gives no access to the elements.
unsafe impl<R: Record + Sync> Sync for IterMut<'_, R> {}

/// Owning iterator that moves records out of a container.
///
/// Records not consumed are dropped with the iterator, which then returns
/// the buffer to the allocator.
pub struct IntoIter<R: Record, A: ByteAllocator> {
    buf: RawBuffer,
    ptrs: PtrsOf<R>,
    front: usize,
    back: usize,
    alloc: A,
    _marker: PhantomData<R>,
}

impl<R: Record, A: ByteAllocator> IntoIter<R, A> {
    /// # Safety
    ///
    /// `buf` must come from `alloc`, `ptrs` must be its segment pointers,
    /// and exactly slots `0..len` must be live.
    pub(crate) unsafe fn new(buf: RawBuffer, ptrs: PtrsOf<R>, len: usize, alloc: A) -> Self {
        Self {
            buf,
            ptrs,
            front: 0,
            back: len,
            alloc,
            _marker: PhantomData,
        }
    }
}

impl<R: Record, A: ByteAllocator> Iterator for IntoIter<R, A> {
    type Item = R;

    #[inline]
    fn next(&mut self) -> Option<R> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: slot `index` is live and leaves the live range.
        Some(R::from_fields(unsafe {
            <FieldsOf<R> as FieldTuple>::read(self.ptrs, index)
        }))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<R: Record, A: ByteAllocator> DoubleEndedIterator for IntoIter<R, A> {
    #[inline]
    fn next_back(&mut self) -> Option<R> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: slot `back` is live and leaves the live range.
        Some(R::from_fields(unsafe {
            <FieldsOf<R> as FieldTuple>::read(self.ptrs, self.back)
        }))
    }
}

impl<R: Record, A: ByteAllocator> ExactSizeIterator for IntoIter<R, A> {}

impl<R: Record, A: ByteAllocator> FusedIterator for IntoIter<R, A> {}

impl<R: Record, A: ByteAllocator> Drop for IntoIter<R, A> {
    fn drop(&mut self) {
        let remaining = self.front..self.back;
        self.front = self.back;
        let buf = mem::replace(
            &mut self.buf,
            RawBuffer::empty(<FieldsOf<R> as FieldTuple>::TYPES),
        );
        // SAFETY: the remaining slots are live; afterwards nothing is, and
        // the buffer came from `self.alloc`.
        unsafe {
            <FieldsOf<R> as FieldTuple>::drop_range(self.ptrs, remaining);
            buf.release(&self.alloc);
        }
    }
}

impl<R: Record, A: ByteAllocator> fmt::Debug for IntoIter<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("record", &R::NAME)
            .field("remaining", &(self.back - self.front))
            .finish()
    }
}

// SAFETY: the iterator owns its records and its allocator.
unsafe impl<R: Record + Send, A: ByteAllocator + Send> Send for IntoIter<R, A> {}
// SAFETY: `&IntoIter` gives no access to the records.
unsafe impl<R: Record + Sync, A: ByteAllocator + Sync> Sync for IntoIter<R, A> {}
