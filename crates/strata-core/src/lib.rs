//! Core types for the Strata struct-of-arrays containers.
//!
//! This is the leaf crate with zero internal dependencies. It holds the
//! parts of the system that need no raw memory access: the error
//! taxonomy, compile-time limits, per-field type metadata, the layout
//! engine that partitions one allocation into field segments, and the
//! ordered field [`Schema`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod field;
pub mod layout;
pub mod schema;

pub use config::{grown_capacity, BASELINE_ALIGN, MAX_FIELDS};
pub use error::{AllocError, SoaError};
pub use field::FieldType;
pub use layout::SegmentLayout;
pub use schema::Schema;
