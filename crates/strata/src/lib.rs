//! Strata: struct-of-arrays vectors backed by a single allocation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! strata::soa_record! {
//!     #[derive(Clone, Debug, PartialEq)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! let mut people = SoaVec::<Person>::new();
//! people.emplace(("Bob".to_string(), 12));
//! people.push(Person { name: "Alice".into(), age: 13 });
//!
//! // One field across every element, as a slice.
//! assert_eq!(people.field::<1>().as_slice(), &[12, 13]);
//!
//! // A proxy per element; nothing is materialized until asked.
//! let bob = people.at(0)?;
//! assert_eq!(bob.name, "Bob");
//! assert_eq!(bob.to_record(), Person { name: "Bob".into(), age: 12 });
//!
//! // Checked access fails with a descriptive error.
//! assert!(matches!(people.at(2), Err(SoaError::OutOfRange { index: 2, len: 2, .. })));
//! # Ok::<(), SoaError>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Errors, limits, field metadata, layout engine, schema |
//! | [`arena`] | `strata-arena` | Allocators, records and proxies, views, iterators, `SoaVec` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Containers, proxies, and allocation (`strata-arena`).
///
/// [`arena::SoaVec`] is the container; [`arena::ByteAllocator`] is the
/// extension point for custom allocation strategies.
pub use strata_arena as arena;

/// Errors, limits, field metadata, and the layout engine (`strata-core`).
///
/// [`types::SegmentLayout::compute`] is the layout engine every
/// reallocation runs; [`types::Schema`] lists a record's fields by name.
pub use strata_core as types;

pub use strata_arena::soa_record;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
///
/// This imports the container, the record and proxy traits (needed for
/// `to_record`, `assign`, and friends), field views, and the error type.
pub mod prelude {
    // Container and iterators
    pub use strata_arena::{IntoIter, Iter, IterMut, SoaVec};

    // Records and proxies
    pub use strata_arena::{Record, RecordMut, RecordRef};

    // Field views
    pub use strata_arena::{FieldView, FieldViewMut};

    // Allocation
    pub use strata_arena::{ByteAllocator, Global};

    // Errors and metadata
    pub use strata_core::{AllocError, Schema, SoaError};
}
