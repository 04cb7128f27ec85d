//! Single-allocation struct-of-arrays containers.
//!
//! A record registered with [`soa_record!`] is stored field by field: each
//! field lives in its own contiguous segment, and every segment is carved
//! out of one allocation sized by the layout engine in `strata-core`.
//! Callers read and write "virtual records" through proxies and per-field
//! views without ever materializing them.
//!
//! # Architecture
//!
//! ```text
//! SoaVec<R, A> (owner)
//! ├── RawBuffer (one allocation from A + its SegmentLayout)
//! ├── R::Fields (tuple of field types; field-wise write/read/drop/migrate)
//! ├── R::Ref / R::Mut (proxies, rebuilt on every access)
//! ├── FieldView / FieldViewMut (one segment, bounds-checked)
//! └── Iter / IterMut / IntoIter (positional proxy iterators)
//! ```
//!
//! # Safety
//!
//! This is the only crate in the workspace that contains `unsafe` code.
//! It is confined to the modules that touch raw memory (`alloc`, `raw`,
//! `fields`, `record`, `view`, `iter`, `vec`) and to the expansion of
//! [`soa_record!`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod fields;
pub mod iter;
mod macros;
mod raw;
pub mod record;
pub mod vec;
pub mod view;

// Public re-exports for the primary API surface.
pub use alloc::{ByteAllocator, Global};
pub use fields::{CloneFields, FieldAt, FieldTuple};
pub use iter::{IntoIter, Iter, IterMut};
pub use record::{FieldTypeAt, FieldsOf, PtrsOf, Record, RecordMut, RecordRef, RefsOf};
pub use vec::SoaVec;
pub use view::{FieldView, FieldViewMut};

#[doc(hidden)]
pub mod __private {
    pub use paste;
    pub use strata_core::FieldType;
}
