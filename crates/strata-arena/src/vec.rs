//! The struct-of-arrays container.
//!
//! [`SoaVec<R>`] stores every field of `R` in its own contiguous segment,
//! with all segments carved out of one allocation. Element operations are
//! applied field by field, in declaration order, as one logical unit:
//! slots `0..len` of every segment are live and slots `len..capacity` are
//! uninitialized, with no partially constructed records in between.
//!
//! # Failure behaviour
//!
//! Growth moves elements bitwise and cannot fail part-way. An element is
//! fully built (every field) before any of it is written to the segments,
//! and bulk construction publishes `len` one element at a time, so a panic
//! in `Clone` or `Default` leaves exactly the elements finished so far.

#![allow(unsafe_code)]

use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::iter;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr;

use strata_core::{grown_capacity, FieldType, Schema, SegmentLayout, SoaError};

use crate::alloc::{ByteAllocator, Global};
use crate::fields::{CloneFields, FieldAt, FieldTuple};
use crate::iter::{IntoIter, Iter, IterMut};
use crate::raw::RawBuffer;
use crate::record::{FieldTypeAt, FieldsOf, PtrsOf, Record, RecordRef};
use crate::view::{FieldView, FieldViewMut};

/// A growable struct-of-arrays vector of `R`, backed by one allocation
/// from `A`.
///
/// Elements are never materialized in place; access goes through proxies
/// (`R::Ref`, `R::Mut`) and per-field views. Moving a `SoaVec` is O(1);
/// use [`std::mem::take`] to move out and leave an empty container behind.
pub struct SoaVec<R: Record, A: ByteAllocator = Global> {
    buf: RawBuffer,
    ptrs: PtrsOf<R>,
    len: usize,
    alloc: A,
    _marker: PhantomData<R>,
}

impl<R: Record> SoaVec<R, Global> {
    /// An empty container. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// An empty container with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the layout overflows; aborts via
    /// [`handle_alloc_error`] if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<R: Record, A: ByteAllocator> SoaVec<R, A> {
    fn types() -> &'static [FieldType] {
        <FieldsOf<R> as FieldTuple>::TYPES
    }

    /// An empty container drawing memory from `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::empty(Self::types()),
            ptrs: <FieldsOf<R> as FieldTuple>::dangling(),
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// An empty container with room for `capacity` elements from `alloc`.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        infallible(Self::try_with_capacity_in(capacity, alloc))
    }

    /// Fallible [`SoaVec::with_capacity_in`].
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, SoaError> {
        let mut vec = Self::new_in(alloc);
        vec.try_reserve(capacity)?;
        Ok(vec)
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of element slots in the current allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the container holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte length of the current allocation.
    pub fn allocated_bytes(&self) -> usize {
        self.buf.layout().total_bytes()
    }

    /// Segment layout of the current allocation.
    pub fn layout(&self) -> &SegmentLayout {
        self.buf.layout()
    }

    /// The allocator backing this container.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Field names and types of `R`.
    pub fn schema(&self) -> Schema {
        R::schema()
    }

    // ── Capacity ────────────────────────────────────────────────

    /// Ensure room for at least `capacity` elements in total.
    ///
    /// No-op when `capacity <= self.capacity()`. Otherwise reallocates to
    /// exactly `capacity` slots and moves every element across, keeping
    /// order.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn reserve(&mut self, capacity: usize) {
        infallible(self.try_reserve(capacity));
    }

    /// Fallible [`SoaVec::reserve`]. On error the container is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), SoaError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.reallocate(capacity)
    }

    /// Reallocate down to exactly `len` slots.
    ///
    /// An empty container releases its allocation.
    pub fn shrink_to_fit(&mut self) {
        infallible(self.try_shrink_to_fit());
    }

    /// Fallible [`SoaVec::shrink_to_fit`]. On error the container is
    /// unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), SoaError> {
        if self.len == self.capacity() {
            return Ok(());
        }
        self.reallocate(self.len)
    }

    fn reallocate(&mut self, capacity: usize) -> Result<(), SoaError> {
        debug_assert!(capacity >= self.len);
        let buf = RawBuffer::allocate(&self.alloc, Self::types(), capacity)?;
        let ptrs = buf.segment_ptrs::<FieldsOf<R>>();
        // SAFETY: `len` live slots move into a fresh allocation of at least
        // `len` slots; afterwards the old slots are dead.
        unsafe { <FieldsOf<R> as FieldTuple>::migrate(self.ptrs, ptrs, self.len) };
        let old = mem::replace(&mut self.buf, buf);
        self.ptrs = ptrs;
        // SAFETY: `old` came from `self.alloc` and holds no live values.
        unsafe { old.release(&self.alloc) };
        Ok(())
    }

    // ── Insertion and removal ───────────────────────────────────

    /// Append `value`, growing to `max(1, 2 * capacity)` when full.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn push(&mut self, value: R) {
        infallible(self.try_push(value));
    }

    /// Fallible [`SoaVec::push`]. On error `value` is dropped and the
    /// container is unchanged.
    pub fn try_push(&mut self, value: R) -> Result<(), SoaError> {
        self.try_emplace(value.into_fields())
    }

    /// Append an element built from per-field values, in declaration order.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn emplace(&mut self, fields: R::Fields) {
        infallible(self.try_emplace(fields));
    }

    /// Fallible [`SoaVec::emplace`].
    pub fn try_emplace(&mut self, fields: R::Fields) -> Result<(), SoaError> {
        if self.len == self.capacity() {
            self.reallocate(grown_capacity(self.capacity())?)?;
        }
        // SAFETY: len < capacity and slot `len` is dead.
        unsafe { fields.write(self.ptrs, self.len) };
        self.len += 1;
        Ok(())
    }

    /// Append a clone of `value`.
    pub fn push_cloned(&mut self, value: &R)
    where
        FieldsOf<R>: CloneFields,
    {
        self.emplace(<FieldsOf<R> as CloneFields>::clone_refs(value.field_refs()));
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<R> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range.
        let fields = unsafe { <FieldsOf<R> as FieldTuple>::read(self.ptrs, self.len) };
        Some(R::from_fields(fields))
    }

    /// Drop every element at or past `len`. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = mem::replace(&mut self.len, len);
        // SAFETY: slots len..old_len were live and are now outside the live
        // range; `len` is published first so a panicking drop cannot cause
        // a double drop.
        unsafe { <FieldsOf<R> as FieldTuple>::drop_range(self.ptrs, len..old_len) };
    }

    /// Drop every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resize to `len`, filling new slots with clones of `value`.
    ///
    /// Shrinking drops the tail; growing first reserves `len` slots.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn resize(&mut self, len: usize, value: R)
    where
        FieldsOf<R>: CloneFields,
    {
        infallible(self.try_resize(len, value));
    }

    /// Fallible [`SoaVec::resize`].
    pub fn try_resize(&mut self, len: usize, value: R) -> Result<(), SoaError>
    where
        FieldsOf<R>: CloneFields,
    {
        self.resize_from(
            len,
            iter::repeat_with(|| <FieldsOf<R> as CloneFields>::clone_refs(value.field_refs())),
        )
    }

    /// Resize to `len`, filling new slots with default field values.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn resize_default(&mut self, len: usize)
    where
        FieldsOf<R>: Default,
    {
        infallible(self.try_resize_default(len));
    }

    /// Fallible [`SoaVec::resize_default`].
    pub fn try_resize_default(&mut self, len: usize) -> Result<(), SoaError>
    where
        FieldsOf<R>: Default,
    {
        self.resize_from(len, iter::repeat_with(Default::default))
    }

    /// Resize to `len`, filling new slots with records returned by `make`.
    ///
    /// # Panics
    ///
    /// As [`SoaVec::with_capacity`].
    pub fn resize_with<F>(&mut self, len: usize, make: F)
    where
        F: FnMut() -> R,
    {
        infallible(self.try_resize_with(len, make));
    }

    /// Fallible [`SoaVec::resize_with`].
    pub fn try_resize_with<F>(&mut self, len: usize, mut make: F) -> Result<(), SoaError>
    where
        F: FnMut() -> R,
    {
        self.resize_from(len, iter::repeat_with(|| make().into_fields()))
    }

    fn resize_from<I>(&mut self, len: usize, items: I) -> Result<(), SoaError>
    where
        I: Iterator<Item = FieldsOf<R>>,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.try_reserve(len)?;
        self.append_exact(len - self.len, items);
        Ok(())
    }

    /// Write up to `count` elements from `items` after the live range.
    ///
    /// Capacity for `len + count` must already be reserved.
    fn append_exact<I>(&mut self, count: usize, items: I)
    where
        I: Iterator<Item = FieldsOf<R>>,
    {
        debug_assert!(self.len + count <= self.capacity());
        let ptrs = self.ptrs;
        let mut guard = SetLenOnDrop::new(&mut self.len, R::NAME);
        for fields in items.take(count) {
            // SAFETY: local_len < capacity and the slot is dead.
            unsafe { fields.write(ptrs, guard.local_len) };
            guard.local_len += 1;
        }
    }

    // ── Access ──────────────────────────────────────────────────

    /// Shared proxy at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<R::Ref<'_>> {
        if index < self.len {
            // SAFETY: index is live; `&self` keeps it unaliased by writers.
            Some(unsafe { R::proxy(self.ptrs, index) })
        } else {
            None
        }
    }

    /// Mutable proxy at `index`, or `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<R::Mut<'_>> {
        if index < self.len {
            // SAFETY: index is live; `&mut self` makes the proxy exclusive.
            Some(unsafe { R::proxy_mut(self.ptrs, index) })
        } else {
            None
        }
    }

    /// Checked access.
    ///
    /// Fails with [`SoaError::OutOfRange`] when `index >= len`.
    pub fn at(&self, index: usize) -> Result<R::Ref<'_>, SoaError> {
        let len = self.len;
        self.get(index).ok_or_else(|| out_of_range::<Self>(index, len))
    }

    /// Checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<R::Mut<'_>, SoaError> {
        let len = self.len;
        self.get_mut(index)
            .ok_or_else(|| out_of_range::<Self>(index, len))
    }

    /// Shared proxy at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be below `len`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> R::Ref<'_> {
        debug_assert!(index < self.len);
        // SAFETY: caller contract.
        unsafe { R::proxy(self.ptrs, index) }
    }

    /// Mutable proxy at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be below `len`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> R::Mut<'_> {
        debug_assert!(index < self.len);
        // SAFETY: caller contract.
        unsafe { R::proxy_mut(self.ptrs, index) }
    }

    /// Proxy for the first element.
    pub fn first(&self) -> Option<R::Ref<'_>> {
        self.get(0)
    }

    /// Mutable proxy for the first element.
    pub fn first_mut(&mut self) -> Option<R::Mut<'_>> {
        self.get_mut(0)
    }

    /// Proxy for the last element.
    pub fn last(&self) -> Option<R::Ref<'_>> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Mutable proxy for the last element.
    pub fn last_mut(&mut self) -> Option<R::Mut<'_>> {
        self.len.checked_sub(1).and_then(|i| self.get_mut(i))
    }

    /// View of field `I` (declaration position) across every element.
    pub fn field<const I: usize>(&self) -> FieldView<'_, FieldTypeAt<R, I>>
    where
        FieldsOf<R>: FieldAt<I>,
    {
        let ptr = <FieldsOf<R> as FieldAt<I>>::segment(self.ptrs);
        // SAFETY: slots 0..len of field I are live; `&self` blocks writers.
        unsafe { FieldView::from_raw_parts(R::LABELS[I], ptr.as_ptr(), self.len) }
    }

    /// Mutable view of field `I` across every element.
    pub fn field_mut<const I: usize>(&mut self) -> FieldViewMut<'_, FieldTypeAt<R, I>>
    where
        FieldsOf<R>: FieldAt<I>,
    {
        let ptr = <FieldsOf<R> as FieldAt<I>>::segment(self.ptrs);
        // SAFETY: slots 0..len of field I are live; `&mut self` makes the
        // view exclusive.
        unsafe { FieldViewMut::from_raw_parts(R::LABELS[I], ptr.as_ptr(), self.len) }
    }

    /// Views of every field at once.
    pub fn columns(&self) -> R::Columns<'_> {
        // SAFETY: slots 0..len are live; `&self` blocks writers.
        unsafe { R::columns(self.ptrs, self.len) }
    }

    /// Mutable views of every field at once. The views are disjoint.
    pub fn columns_mut(&mut self) -> R::ColumnsMut<'_> {
        // SAFETY: slots 0..len are live; `&mut self` makes the views
        // exclusive and segments never overlap.
        unsafe { R::columns_mut(self.ptrs, self.len) }
    }

    /// Iterate over shared proxies.
    pub fn iter(&self) -> Iter<'_, R> {
        // SAFETY: slots 0..len are live for the borrow of `self`.
        unsafe { Iter::new(self.ptrs, self.len) }
    }

    /// Iterate over mutable proxies.
    pub fn iter_mut(&mut self) -> IterMut<'_, R> {
        // SAFETY: slots 0..len are live and exclusively borrowed.
        unsafe { IterMut::new(self.ptrs, self.len) }
    }

    /// Fallible [`Clone::clone`].
    pub fn try_clone(&self) -> Result<Self, SoaError>
    where
        A: Clone,
        FieldsOf<R>: CloneFields,
    {
        let mut out = Self::try_with_capacity_in(self.len, self.alloc.clone())?;
        out.append_exact(self.len, self.cloned_fields());
        Ok(out)
    }

    fn cloned_fields(&self) -> impl Iterator<Item = FieldsOf<R>> + '_
    where
        FieldsOf<R>: CloneFields,
    {
        self.iter()
            .map(|r| <FieldsOf<R> as CloneFields>::clone_refs(r.field_refs()))
    }
}

fn out_of_range<T: ?Sized>(index: usize, len: usize) -> SoaError {
    SoaError::OutOfRange {
        type_name: std::any::type_name::<T>(),
        index,
        len,
    }
}

/// Unwrap the result of a fallible operation for its infallible twin.
fn infallible<T>(result: Result<T, SoaError>) -> T {
    match result {
        Ok(value) => value,
        Err(SoaError::Alloc(err)) => handle_alloc_error(
            Layout::from_size_align(err.bytes, err.align).unwrap_or_else(|_| Layout::new::<u8>()),
        ),
        Err(err) => panic!("strata: {err}"),
    }
}

/// Publishes the length written so far when bulk construction stops,
/// including by panic.
struct SetLenOnDrop<'a> {
    len: &'a mut usize,
    local_len: usize,
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    record: &'static str,
}

impl<'a> SetLenOnDrop<'a> {
    fn new(len: &'a mut usize, record: &'static str) -> Self {
        let local_len = *len;
        Self {
            len,
            local_len,
            record,
        }
    }
}

impl Drop for SetLenOnDrop<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        if std::thread::panicking() {
            eprintln!(
                "strata: construction of {} interrupted; {} elements kept",
                self.record, self.local_len,
            );
        }
        *self.len = self.local_len;
    }
}

impl<R: Record, A: ByteAllocator> Drop for SoaVec<R, A> {
    fn drop(&mut self) {
        self.clear();
        let buf = mem::replace(&mut self.buf, RawBuffer::empty(Self::types()));
        // SAFETY: every element was dropped and the buffer came from
        // `self.alloc`.
        unsafe { buf.release(&self.alloc) };
    }
}

impl<R, A> Clone for SoaVec<R, A>
where
    R: Record,
    A: ByteAllocator + Clone,
    FieldsOf<R>: CloneFields,
{
    /// Deep copy with capacity equal to the source's length.
    fn clone(&self) -> Self {
        infallible(self.try_clone())
    }

    /// Deep copy into `self`, reusing its allocation when large enough.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        infallible(self.try_reserve(source.len));
        self.append_exact(source.len, source.cloned_fields());
    }
}

impl<R: Record, A: ByteAllocator + Default> Default for SoaVec<R, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<R: Record, A: ByteAllocator> fmt::Debug for SoaVec<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoaVec")
            .field("record", &R::NAME)
            .field("fields", &R::NAMES)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<R: Record, A: ByteAllocator> Extend<R> for SoaVec<R, A> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.capacity() - self.len {
            let needed = self.len.saturating_add(lower);
            let grown = grown_capacity(self.capacity()).map_or(needed, |g| g.max(needed));
            self.reserve(grown);
        }
        for value in iter {
            self.push(value);
        }
    }
}

impl<R: Record, A: ByteAllocator + Default> FromIterator<R> for SoaVec<R, A> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut vec = Self::default();
        vec.extend(iter);
        vec
    }
}

impl<'a, R: Record, A: ByteAllocator> IntoIterator for &'a SoaVec<R, A> {
    type Item = R::Ref<'a>;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Iter<'a, R> {
        self.iter()
    }
}

impl<'a, R: Record, A: ByteAllocator> IntoIterator for &'a mut SoaVec<R, A> {
    type Item = R::Mut<'a>;
    type IntoIter = IterMut<'a, R>;

    fn into_iter(self) -> IterMut<'a, R> {
        self.iter_mut()
    }
}

impl<R: Record, A: ByteAllocator> IntoIterator for SoaVec<R, A> {
    type Item = R;
    type IntoIter = IntoIter<R, A>;

    fn into_iter(self) -> IntoIter<R, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the buffer and allocator are
        // moved out exactly once and ownership passes to the iterator.
        unsafe {
            let buf = ptr::read(&this.buf);
            let alloc = ptr::read(&this.alloc);
            IntoIter::new(buf, this.ptrs, this.len, alloc)
        }
    }
}

// SAFETY: the container owns its records and its allocator.
unsafe impl<R: Record + Send, A: ByteAllocator + Send> Send for SoaVec<R, A> {}
// SAFETY: shared access only hands out shared references to fields.
unsafe impl<R: Record + Sync, A: ByteAllocator + Sync> Sync for SoaVec<R, A> {}
