//! Ordered name → field registry for one record type.
//!
//! The [`Schema`] is diagnostic metadata: containers never consult names
//! at runtime, but callers can use it to resolve a field position from a
//! name, print a layout, or check what a record registered.

use std::fmt;

use indexmap::IndexMap;

use crate::error::SoaError;
use crate::field::FieldType;
use crate::layout::SegmentLayout;

/// Field names and types of a record, in declaration order.
///
/// Backed by an `IndexMap` so position lookups by name are O(1) and
/// iteration order is the declaration order the layout engine uses.
#[derive(Clone, PartialEq, Eq)]
pub struct Schema {
    record: &'static str,
    fields: IndexMap<&'static str, FieldType>,
}

impl Schema {
    /// Build a schema from parallel name and type lists.
    ///
    /// # Panics
    ///
    /// Panics if the lists differ in length or a name repeats.
    pub fn new(record: &'static str, names: &[&'static str], types: &[FieldType]) -> Self {
        assert_eq!(
            names.len(),
            types.len(),
            "strata: record {record} registers {} names for {} field types",
            names.len(),
            types.len(),
        );
        let mut fields = IndexMap::with_capacity(names.len());
        for (name, ty) in names.iter().zip(types) {
            let previous = fields.insert(*name, *ty);
            assert!(
                previous.is_none(),
                "strata: record {record} registers field '{name}' twice"
            );
        }
        Self { record, fields }
    }

    /// Type name of the record.
    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declaration position of the field called `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Name and type of the field at `position`.
    pub fn field(&self, position: usize) -> Option<(&'static str, FieldType)> {
        self.fields.get_index(position).map(|(name, ty)| (*name, *ty))
    }

    /// Type of the field called `name`.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Iterate over `(name, type)` pairs in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, FieldType)> + '_ {
        self.fields.iter().map(|(name, ty)| (*name, *ty))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Compute the segment layout for `capacity` records.
    pub fn layout(&self, capacity: usize) -> Result<SegmentLayout, SoaError> {
        let types: Vec<FieldType> = self.fields.values().copied().collect();
        SegmentLayout::compute(&types, capacity)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("record", &self.record)
            .field("fields", &self.fields)
            .finish()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.record)?;
        for (i, (name, ty)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {}", ty.type_name())?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Schema {
        Schema::new(
            "Person",
            &["name", "age"],
            &[FieldType::of::<String>(), FieldType::of::<u32>()],
        )
    }

    #[test]
    fn positions_follow_declaration_order() {
        let schema = person();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.position_of("name"), Some(0));
        assert_eq!(schema.position_of("age"), Some(1));
        assert_eq!(schema.position_of("height"), None);
    }

    #[test]
    fn field_lookup_by_position_and_name() {
        let schema = person();
        let (name, ty) = schema.field(1).unwrap();
        assert_eq!(name, "age");
        assert_eq!(ty, FieldType::of::<u32>());
        assert_eq!(schema.field_type("name"), Some(FieldType::of::<String>()));
        assert!(schema.field(2).is_none());
    }

    #[test]
    fn display_lists_fields() {
        let rendered = person().to_string();
        assert!(rendered.starts_with("Person { name: "));
        assert!(rendered.ends_with("age: u32 }"));
    }

    #[test]
    fn layout_matches_engine() {
        let schema = person();
        let direct = SegmentLayout::compute(
            &[FieldType::of::<String>(), FieldType::of::<u32>()],
            5,
        )
        .unwrap();
        assert_eq!(schema.layout(5).unwrap(), direct);
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn duplicate_names_are_rejected() {
        Schema::new(
            "Bad",
            &["x", "x"],
            &[FieldType::of::<u8>(), FieldType::of::<u8>()],
        );
    }

    #[test]
    #[should_panic(expected = "registers 1 names for 2 field types")]
    fn mismatched_lists_are_rejected() {
        Schema::new("Bad", &["x"], &[FieldType::of::<u8>(), FieldType::of::<u8>()]);
    }
}
