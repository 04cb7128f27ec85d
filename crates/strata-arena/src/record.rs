//! Record types and their proxies.
//!
//! A [`Record`] is a plain struct registered with [`soa_record!`]. The
//! registration records the struct's field names and its field tuple, and
//! generates three companion types:
//!
//! - `<Name>Ref<'a>`: a shared proxy, one `&'a T` per field
//! - `<Name>Mut<'a>`: a mutable proxy, one `&'a mut T` per field
//! - `<Name>Columns<'a>` / `<Name>ColumnsMut<'a>`: one field view per field
//!
//! # Proxy validity
//!
//! A proxy borrows the container it came from. It is built fresh on every
//! access, owns nothing, and cannot outlive the borrow that produced it:
//! any operation that could reallocate or change the element count needs
//! `&mut` access to the container, which the borrow checker refuses while
//! a proxy is alive.
//!
//! [`soa_record!`]: crate::soa_record

#![allow(unsafe_code)]

use strata_core::Schema;

use crate::fields::{CloneFields, FieldAt, FieldTuple};

/// Field tuple of record `R`.
pub type FieldsOf<R> = <R as Record>::Fields;

/// Segment pointer tuple of record `R`.
pub type PtrsOf<R> = <FieldsOf<R> as FieldTuple>::Ptrs;

/// Shared field reference tuple of record `R`.
pub type RefsOf<'a, R> = <FieldsOf<R> as FieldTuple>::Refs<'a>;

/// Element type of field `I` of record `R`.
pub type FieldTypeAt<R, const I: usize> = <FieldsOf<R> as FieldAt<I>>::Type;

/// A struct whose fields can be stored column-wise.
///
/// Implemented by [`soa_record!`](crate::soa_record); implementing it by
/// hand is possible but rarely useful.
///
/// # Safety
///
/// `Fields` must be the struct's field types in declaration order, `NAMES`
/// and `LABELS` must have one entry per field, and every `unsafe fn` must
/// build its result from slot `index` (or slots `0..len`) of the matching
/// segments only.
pub unsafe trait Record: Sized + 'static {
    /// The field types, in declaration order, as a tuple.
    type Fields: FieldTuple + 'static;

    /// Shared proxy for one element.
    type Ref<'a>: RecordRef<'a, Record = Self>;

    /// Mutable proxy for one element.
    type Mut<'a>: RecordMut<'a, Record = Self>;

    /// Every field view of a container, shared.
    type Columns<'a>;

    /// Every field view of a container, mutable and disjoint.
    type ColumnsMut<'a>;

    /// Name of the record type as written at registration.
    const NAME: &'static str;

    /// Field names in declaration order.
    const NAMES: &'static [&'static str];

    /// `Record.field` labels in declaration order, used in error messages.
    const LABELS: &'static [&'static str];

    /// Decompose into the field tuple.
    fn into_fields(self) -> Self::Fields;

    /// Reassemble from the field tuple.
    fn from_fields(fields: Self::Fields) -> Self;

    /// Borrow every field.
    fn field_refs(&self) -> RefsOf<'_, Self>;

    /// Shared proxy at slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must be live and not mutably borrowed for `'a`.
    unsafe fn proxy<'a>(ptrs: PtrsOf<Self>, index: usize) -> Self::Ref<'a>;

    /// Mutable proxy at slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must be live and not otherwise borrowed for `'a`.
    unsafe fn proxy_mut<'a>(ptrs: PtrsOf<Self>, index: usize) -> Self::Mut<'a>;

    /// Shared views over slots `0..len` of every field.
    ///
    /// # Safety
    ///
    /// Slots `0..len` must be live and not mutably borrowed for `'a`.
    unsafe fn columns<'a>(ptrs: PtrsOf<Self>, len: usize) -> Self::Columns<'a>;

    /// Mutable views over slots `0..len` of every field.
    ///
    /// # Safety
    ///
    /// Slots `0..len` must be live and not otherwise borrowed for `'a`.
    unsafe fn columns_mut<'a>(ptrs: PtrsOf<Self>, len: usize) -> Self::ColumnsMut<'a>;

    /// Ordered field names and types of this record.
    fn schema() -> Schema {
        Schema::new(Self::NAME, Self::NAMES, <Self::Fields as FieldTuple>::TYPES)
    }
}

/// A shared proxy: one `&T` per field of one element.
pub trait RecordRef<'a>: Copy {
    /// The record this proxy stands in for.
    type Record: Record;

    /// The referenced fields as a tuple.
    fn field_refs(self) -> RefsOf<'a, Self::Record>;

    /// Materialize an owned record by cloning every field.
    fn to_record(self) -> Self::Record
    where
        FieldsOf<Self::Record>: CloneFields,
    {
        Self::Record::from_fields(<FieldsOf<Self::Record> as CloneFields>::clone_refs(
            self.field_refs(),
        ))
    }
}

/// A mutable proxy: one `&mut T` per field of one element.
pub trait RecordMut<'a> {
    /// The record this proxy stands in for.
    type Record: Record;

    /// Overwrite every field with the fields of `value`, dropping the old
    /// values.
    fn assign(&mut self, value: Self::Record);

    /// Overwrite every field with the fields of `value` and return the old
    /// values as a record.
    fn replace(&mut self, value: Self::Record) -> Self::Record;

    /// Reborrow every field as a shared reference.
    fn field_refs(&self) -> RefsOf<'_, Self::Record>;

    /// Materialize an owned record by cloning every field.
    fn to_record(&self) -> Self::Record
    where
        FieldsOf<Self::Record>: CloneFields,
    {
        Self::Record::from_fields(<FieldsOf<Self::Record> as CloneFields>::clone_refs(
            self.field_refs(),
        ))
    }

    /// Overwrite every field with a clone of the matching field of `value`.
    fn assign_cloned(&mut self, value: &Self::Record)
    where
        FieldsOf<Self::Record>: CloneFields,
    {
        self.assign(Self::Record::from_fields(
            <FieldsOf<Self::Record> as CloneFields>::clone_refs(value.field_refs()),
        ));
    }
}
