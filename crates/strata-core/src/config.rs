//! Compile-time limits and the growth rule.
//!
//! Strata has no runtime configuration. Every knob is a constant checked
//! when a record type is registered, so a violation is a compile error
//! rather than a runtime failure.

use crate::error::SoaError;

/// Maximum number of fields a registered record may declare.
///
/// Field tuples are implemented for arities `1..=MAX_FIELDS`; a record
/// with more fields has no `Fields` tuple and fails to compile.
pub const MAX_FIELDS: usize = 10;

/// Alignment guaranteed for the start of every backing allocation.
///
/// Segment offsets are rounded relative to this base, so a field type
/// whose alignment exceeds it cannot be placed correctly and is rejected
/// at registration.
pub const BASELINE_ALIGN: usize = 16;

/// Capacity to grow to when a push finds the container full.
///
/// Doubles the current capacity, starting from 1. Returns
/// [`SoaError::CapacityOverflow`] if doubling overflows `usize`.
pub fn grown_capacity(current: usize) -> Result<usize, SoaError> {
    if current == 0 {
        return Ok(1);
    }
    current
        .checked_mul(2)
        .ok_or(SoaError::CapacityOverflow { capacity: current })
}
