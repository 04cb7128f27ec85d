//! Per-field type metadata consumed by the layout engine.

use std::fmt;

use crate::config::BASELINE_ALIGN;

/// Size, alignment, and name of one field's element type.
///
/// Built in const context by [`FieldType::of`], which is where the
/// over-alignment check fires: a registered record whose field needs
/// more than [`BASELINE_ALIGN`] fails to compile.
#[derive(Clone, Copy)]
pub struct FieldType {
    size: usize,
    align: usize,
    type_name: fn() -> &'static str,
}

impl FieldType {
    /// Metadata for `T`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a constant) if `T` is aligned
    /// more strictly than [`BASELINE_ALIGN`].
    pub const fn of<T>() -> Self {
        assert!(
            std::mem::align_of::<T>() <= BASELINE_ALIGN,
            "strata: field type is over-aligned; alignments above BASELINE_ALIGN are not supported"
        );
        Self {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            type_name: std::any::type_name::<T>,
        }
    }

    /// Size of one element in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Required alignment of one element in bytes.
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Fully qualified Rust type name of the element.
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Whether the element type occupies no storage.
    pub const fn is_zero_sized(&self) -> bool {
        self.size == 0
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldType")
            .field("name", &self.type_name())
            .field("size", &self.size)
            .field("align", &self.align)
            .finish()
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.align == other.align
            && self.type_name() == other.type_name()
    }
}

impl Eq for FieldType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_matches_std() {
        let ty = FieldType::of::<u64>();
        assert_eq!(ty.size(), 8);
        assert_eq!(ty.align(), std::mem::align_of::<u64>());
        assert_eq!(ty.type_name(), "u64");
        assert!(!ty.is_zero_sized());
    }

    #[test]
    fn zero_sized_types_are_flagged() {
        assert!(FieldType::of::<()>().is_zero_sized());
    }

    #[test]
    fn equality_is_by_shape_and_name() {
        assert_eq!(FieldType::of::<String>(), FieldType::of::<String>());
        assert_ne!(FieldType::of::<u32>(), FieldType::of::<i32>());
    }

    #[test]
    fn usable_in_const_context() {
        const TYPES: &[FieldType] = &[FieldType::of::<u8>(), FieldType::of::<f64>()];
        assert_eq!(TYPES[1].size(), 8);
    }
}
