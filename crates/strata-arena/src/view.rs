//! Field views: typed, bounds-aware access to one field segment.
//!
//! A view covers exactly the live slots `0..len` of its segment. It borrows
//! the container, so the element count it reports cannot change while the
//! view exists.

#![allow(unsafe_code)]

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::slice;

use strata_core::SoaError;

/// Shared view over one field of every element.
pub struct FieldView<'a, T> {
    label: &'static str,
    items: &'a [T],
}

impl<'a, T> FieldView<'a, T> {
    /// Build a view over `len` live values starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and valid for reads of `len`
    /// initialized values that are not mutated for `'a`.
    pub unsafe fn from_raw_parts(label: &'static str, ptr: *const T, len: usize) -> Self {
        Self {
            label,
            // SAFETY: caller contract.
            items: unsafe { slice::from_raw_parts(ptr, len) },
        }
    }

    /// `Record.field` label of the viewed field.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checked access.
    ///
    /// Fails with [`SoaError::OutOfRange`] naming the field when `index` is
    /// not below [`len`](Self::len).
    pub fn at(&self, index: usize) -> Result<&'a T, SoaError> {
        self.items.get(index).ok_or(SoaError::OutOfRange {
            type_name: self.label,
            index,
            len: self.items.len(),
        })
    }

    /// Value at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.items.get(index)
    }

    /// Iterate over the live values in index order.
    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.items.iter()
    }

    /// The live values as a slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<T> Clone for FieldView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldView<'_, T> {}

impl<T> Deref for FieldView<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

impl<'a, T> IntoIterator for FieldView<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &FieldView<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for FieldView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldView")
            .field("label", &self.label)
            .field("items", &self.items)
            .finish()
    }
}

/// Mutable view over one field of every element.
///
/// Several `FieldViewMut`s over different fields of one container can be
/// held at once through `columns_mut`; the segments never overlap.
pub struct FieldViewMut<'a, T> {
    label: &'static str,
    items: &'a mut [T],
}

impl<'a, T> FieldViewMut<'a, T> {
    /// Build a mutable view over `len` live values starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and valid for reads and writes of
    /// `len` initialized values that nothing else accesses for `'a`.
    pub unsafe fn from_raw_parts(label: &'static str, ptr: *mut T, len: usize) -> Self {
        Self {
            label,
            // SAFETY: caller contract.
            items: unsafe { slice::from_raw_parts_mut(ptr, len) },
        }
    }

    /// `Record.field` label of the viewed field.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checked shared access; see [`FieldView::at`].
    pub fn at(&self, index: usize) -> Result<&T, SoaError> {
        let len = self.items.len();
        self.items.get(index).ok_or(SoaError::OutOfRange {
            type_name: self.label,
            index,
            len,
        })
    }

    /// Checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, SoaError> {
        let len = self.items.len();
        let label = self.label;
        self.items.get_mut(index).ok_or(SoaError::OutOfRange {
            type_name: label,
            index,
            len,
        })
    }

    /// Iterate mutably over the live values in index order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Give up the view and keep the underlying slice for `'a`.
    pub fn into_slice(self) -> &'a mut [T] {
        self.items
    }
}

impl<T> Deref for FieldViewMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

impl<T> DerefMut for FieldViewMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.items
    }
}

impl<'a, T> IntoIterator for FieldViewMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for FieldViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldViewMut")
            .field("label", &self.label)
            .field("items", &self.items)
            .finish()
    }
}
