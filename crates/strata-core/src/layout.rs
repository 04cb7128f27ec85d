//! The layout engine: partitions one allocation into per-field segments.
//!
//! Given a capacity `N` and the ordered field types, field 0 starts at
//! offset 0 and field `i` starts at the end of field `i - 1`'s segment
//! (`offset[i-1] + N * size[i-1]`) rounded up to `align[i]`. The total
//! length is the end of the last segment.
//!
//! ```text
//! capacity = 3, fields = (u8, u32, u16)
//!
//! 0        3   4              16      22
//! | u8 × 3 |pad| u32 × 3       | u16×3 |
//! ```
//!
//! Offsets are relative to a base aligned to
//! [`BASELINE_ALIGN`](crate::config::BASELINE_ALIGN); field registration
//! guarantees no field needs more.

use std::ops::Range;

use smallvec::SmallVec;

use crate::config::MAX_FIELDS;
use crate::error::SoaError;
use crate::field::FieldType;

/// Byte offsets of every field segment for one capacity.
///
/// Recomputed on every (re)allocation. A layout with `total_bytes() == 0`
/// needs no allocation at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentLayout {
    capacity: usize,
    segments: SmallVec<[Range<usize>; MAX_FIELDS]>,
    total_bytes: usize,
}

impl SegmentLayout {
    /// Lay out `capacity` slots for each of `types`, in declaration order.
    ///
    /// Returns [`SoaError::CapacityOverflow`] if any offset or the total
    /// exceeds `isize::MAX` bytes.
    pub fn compute(types: &[FieldType], capacity: usize) -> Result<Self, SoaError> {
        let overflow = SoaError::CapacityOverflow { capacity };
        let mut segments = SmallVec::with_capacity(types.len());
        let mut cursor = 0usize;
        for ty in types {
            let start = align_up(cursor, ty.align()).ok_or_else(|| overflow.clone())?;
            let len = ty
                .size()
                .checked_mul(capacity)
                .ok_or_else(|| overflow.clone())?;
            let end = start.checked_add(len).ok_or_else(|| overflow.clone())?;
            segments.push(start..end);
            cursor = end;
        }
        if cursor > isize::MAX as usize {
            return Err(overflow);
        }
        Ok(Self {
            capacity,
            segments,
            total_bytes: cursor,
        })
    }

    /// The zero-capacity layout for `types`: every offset is 0.
    pub fn empty(types: &[FieldType]) -> Self {
        Self {
            capacity: 0,
            segments: types.iter().map(|_| 0..0).collect(),
            total_bytes: 0,
        }
    }

    /// Number of slots per field.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte offset of field `index`'s segment.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a field position.
    pub fn offset(&self, index: usize) -> usize {
        self.segments[index].start
    }

    /// Byte range occupied by field `index`'s segment.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a field position.
    pub fn segment(&self, index: usize) -> Range<usize> {
        self.segments[index].clone()
    }

    /// All segment byte ranges, in field order.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        self.segments.iter().cloned()
    }

    /// Total byte length of the allocation (end of the last segment).
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Number of fields laid out.
    pub fn field_count(&self) -> usize {
        self.segments.len()
    }
}

fn align_up(offset: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    offset.checked_add(mask).map(|v| v & !mask)
}
