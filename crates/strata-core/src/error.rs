//! Error types for Strata containers.
//!
//! Only two kinds of runtime failure exist: a checked access outside the
//! live range, and a failure to obtain backing memory (either because the
//! requested layout cannot be expressed in `usize` bytes or because the
//! allocator refused it). Integration-time violations (too many fields,
//! over-aligned fields, missing `Clone`/`Default`) are compile errors and
//! have no variant here.

use std::error::Error;
use std::fmt;

/// Errors reported by container operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SoaError {
    /// A checked access used an index outside `[0, len)`.
    OutOfRange {
        /// Type that performed the access (a container or a field view).
        type_name: &'static str,
        /// The requested index.
        index: usize,
        /// Number of live elements at the time of the access.
        len: usize,
    },
    /// The requested capacity cannot be laid out within `usize` bytes.
    CapacityOverflow {
        /// The capacity that could not be represented.
        capacity: usize,
    },
    /// The allocation collaborator failed to provide memory.
    Alloc(AllocError),
}

impl fmt::Display for SoaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                type_name,
                index,
                len,
            } => {
                write!(
                    f,
                    "out of bounds access when calling {type_name}::at({index}) while len = {len}"
                )
            }
            Self::CapacityOverflow { capacity } => {
                write!(f, "capacity overflow: {capacity} records cannot be laid out")
            }
            Self::Alloc(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SoaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for SoaError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

/// The allocation collaborator could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    /// Number of bytes requested.
    pub bytes: usize,
    /// Alignment requested.
    pub align: usize,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocation of {} bytes (align {}) failed",
            self.bytes, self.align
        )
    }
}

impl Error for AllocError {}
