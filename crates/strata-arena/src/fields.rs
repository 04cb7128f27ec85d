//! Field tuples: the per-field generic machinery behind every record.
//!
//! A registered record decomposes into a tuple of its field values, in
//! declaration order. [`FieldTuple`] is implemented for tuples of 1 to
//! [`MAX_FIELDS`](strata_core::MAX_FIELDS) elements and supplies every
//! field-wise loop the container needs: layout metadata, typed segment
//! pointers, in-place construction, move-out, range destruction, and
//! migration to a new allocation.
//!
//! All operations work on a `Ptrs` tuple holding one typed segment start
//! pointer per field. Liveness is the caller's concern: these functions
//! construct, read, and drop exactly what they are told to.

#![allow(unsafe_code)]

use std::ops::Range;
use std::ptr::{self, NonNull};

use strata_core::{FieldType, SegmentLayout};

/// A tuple of field values that can be spread across field segments.
///
/// # Safety
///
/// `TYPES` must list the tuple's element types in order, and every method
/// must touch only slot `index` (or the given range) of the segment
/// belonging to each element.
pub unsafe trait FieldTuple: Sized {
    /// Element type metadata in declaration order.
    const TYPES: &'static [FieldType];

    /// One typed segment start pointer per field.
    type Ptrs: Copy;

    /// One shared reference per field.
    type Refs<'a>
    where
        Self: 'a;

    /// Dangling pointers, valid for empty segments and zero-sized fields.
    fn dangling() -> Self::Ptrs;

    /// Typed segment pointers for an allocation starting at `base`.
    ///
    /// # Safety
    ///
    /// `layout` must have been computed from [`FieldTuple::TYPES`] and `base`
    /// must point to an allocation of at least `layout.total_bytes()` bytes
    /// aligned to [`BASELINE_ALIGN`](strata_core::BASELINE_ALIGN).
    unsafe fn ptrs(base: NonNull<u8>, layout: &SegmentLayout) -> Self::Ptrs;

    /// Move each field into slot `index` of its segment.
    ///
    /// # Safety
    ///
    /// `index` must be below the segments' capacity and the slot must not
    /// hold a live value (it would be overwritten without being dropped).
    unsafe fn write(self, ptrs: Self::Ptrs, index: usize);

    /// Move each field out of slot `index`, leaving the slot dead.
    ///
    /// # Safety
    ///
    /// Slot `index` must hold live values, and must be treated as dead
    /// afterwards.
    unsafe fn read(ptrs: Self::Ptrs, index: usize) -> Self;

    /// Borrow each field at slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must hold live values that stay live and unaliased by
    /// mutable borrows for `'a`.
    unsafe fn refs<'a>(ptrs: Self::Ptrs, index: usize) -> Self::Refs<'a>
    where
        Self: 'a;

    /// Drop every field in slots `range`.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must hold live values, and must be treated as
    /// dead afterwards.
    unsafe fn drop_range(ptrs: Self::Ptrs, range: Range<usize>);

    /// Bitwise-move slots `0..count` of every field from `src` to `dst`.
    ///
    /// # Safety
    ///
    /// Both pointer sets must have at least `count` slots, the source slots
    /// must be live, the destination slots dead, and the two allocations
    /// must not overlap. Afterwards the source slots are dead.
    unsafe fn migrate(src: Self::Ptrs, dst: Self::Ptrs, count: usize);
}

/// Field tuples whose every element is `Clone`.
///
/// Implemented automatically; using a copying operation on a record with
/// a non-`Clone` field is a compile error.
pub trait CloneFields: FieldTuple {
    /// Clone every field behind `refs` into a fresh tuple.
    fn clone_refs<'a>(refs: Self::Refs<'a>) -> Self
    where
        Self: 'a;
}

/// Positional access to field `I` of a tuple.
pub trait FieldAt<const I: usize>: FieldTuple {
    /// Element type of field `I`.
    type Type;

    /// Segment start pointer of field `I`.
    fn segment(ptrs: Self::Ptrs) -> NonNull<Self::Type>;
}

macro_rules! field_at_impls {
    ([$($All:ident),+]; ) => {};
    ([$($All:ident),+]; $T:ident $idx:tt $(, $Rest:ident $ridx:tt)*) => {
        impl<$($All),+> FieldAt<$idx> for ($($All,)+) {
            type Type = $T;

            #[inline]
            fn segment(ptrs: Self::Ptrs) -> NonNull<$T> {
                ptrs.$idx
            }
        }

        field_at_impls!([$($All),+]; $($Rest $ridx),*);
    };
}

macro_rules! tuple_impls {
    ($( ($($T:ident $idx:tt),+) )+) => {
        $(
            // SAFETY: every method indexes element `$idx` of `ptrs` with the
            // segment of the matching tuple element, and TYPES lists those
            // elements in order.
            unsafe impl<$($T),+> FieldTuple for ($($T,)+) {
                const TYPES: &'static [FieldType] = &[$(FieldType::of::<$T>()),+];

                type Ptrs = ($(NonNull<$T>,)+);

                type Refs<'a> = ($(&'a $T,)+)
                where
                    Self: 'a;

                #[inline]
                fn dangling() -> Self::Ptrs {
                    ($(NonNull::<$T>::dangling(),)+)
                }

                #[inline]
                unsafe fn ptrs(base: NonNull<u8>, layout: &SegmentLayout) -> Self::Ptrs {
                    // SAFETY: each offset lies within the allocation and is
                    // aligned for its field (caller contract).
                    unsafe { ($(base.add(layout.offset($idx)).cast::<$T>(),)+) }
                }

                #[inline]
                unsafe fn write(self, ptrs: Self::Ptrs, index: usize) {
                    // SAFETY: slot `index` is in bounds and dead.
                    unsafe {
                        $(ptrs.$idx.as_ptr().add(index).write(self.$idx);)+
                    }
                }

                #[inline]
                unsafe fn read(ptrs: Self::Ptrs, index: usize) -> Self {
                    // SAFETY: slot `index` is live and becomes dead.
                    unsafe { ($(ptrs.$idx.as_ptr().add(index).read(),)+) }
                }

                #[inline]
                unsafe fn refs<'a>(ptrs: Self::Ptrs, index: usize) -> Self::Refs<'a>
                where
                    Self: 'a,
                {
                    // SAFETY: slot `index` is live for 'a.
                    unsafe { ($(&*ptrs.$idx.as_ptr().add(index),)+) }
                }

                unsafe fn drop_range(ptrs: Self::Ptrs, range: Range<usize>) {
                    let len = range.len();
                    // SAFETY: every slot in `range` is live and becomes dead.
                    unsafe {
                        $(ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                            ptrs.$idx.as_ptr().add(range.start),
                            len,
                        ));)+
                    }
                }

                unsafe fn migrate(src: Self::Ptrs, dst: Self::Ptrs, count: usize) {
                    // SAFETY: both sides have `count` slots and do not overlap.
                    unsafe {
                        $(ptr::copy_nonoverlapping(src.$idx.as_ptr(), dst.$idx.as_ptr(), count);)+
                    }
                }
            }

            impl<$($T: Clone),+> CloneFields for ($($T,)+) {
                #[inline]
                fn clone_refs<'a>(refs: Self::Refs<'a>) -> Self
                where
                    Self: 'a,
                {
                    ($(<$T as Clone>::clone(refs.$idx),)+)
                }
            }

            field_at_impls!([$($T),+]; $($T $idx),+);
        )+
    };
}

tuple_impls! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9)
}
