use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use itertools::Itertools;
use trellis_error::trellis_panic;

use crate::{Field, FieldName, FieldNames};

/// The default identifier of structures created without an explicit one.
pub const DEFAULT_STRUCT_ID: &str = "structure";

/// An ordered, named sequence of child [`Field`]s.
///
/// Names are unique within a level and order is significant and
/// reproducible. A `StructType` is immutable after creation; the field
/// offset numbering of an enclosing top-level structure (see
/// [`crate::OffsetTable`]) therefore never invalidates.
///
/// Equality and hashing are structural: the identifier is metadata (it
/// names the schema for humans and the wire) and does not participate.
#[derive(Debug, Clone)]
pub struct StructType {
    id: Arc<str>,
    names: FieldNames,
    fields: Arc<[Field]>,
    number_fields: usize,
}

impl StructType {
    /// Create a new `StructType` with the default identifier.
    ///
    /// Panics if `names` and `fields` differ in length or a name repeats.
    pub fn new(names: FieldNames, fields: Vec<Field>) -> Self {
        Self::with_id(DEFAULT_STRUCT_ID, names, fields)
    }

    /// Create a new `StructType` with an explicit identifier.
    ///
    /// Panics if `names` and `fields` differ in length or a name repeats.
    pub fn with_id(id: impl Into<Arc<str>>, names: FieldNames, fields: Vec<Field>) -> Self {
        if names.len() != fields.len() {
            trellis_panic!(
                "length mismatch between names ({}) and fields ({})",
                names.len(),
                fields.len()
            );
        }
        if let Some(dup) = names.iter().duplicates().next() {
            trellis_panic!("duplicate field name '{}'", dup);
        }

        let number_fields = 1 + fields.iter().map(Field::number_fields).sum::<usize>();

        Self {
            id: id.into(),
            names,
            fields: fields.into(),
            number_fields,
        }
    }

    /// The identifier of this structure type.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The names of the direct child fields, in declaration order.
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// The direct child fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The number of direct child fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` iff this structure has no child fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The total offset span: 1 for the structure itself plus the spans
    /// of every descendant.
    pub fn number_fields(&self) -> usize {
        self.number_fields
    }

    /// Find the index of a direct child by name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_ref() == name)
    }

    /// The direct child field at `index`, if in bounds.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// The direct child field named `name`, if present.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.find(name).and_then(|i| self.field(i))
    }

    /// Iterate `(name, field)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Field)> {
        self.names.iter().zip(self.fields.iter())
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.fields == other.fields
    }
}

impl Eq for StructType {}

impl Hash for StructType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.names.hash(state);
        self.fields.hash(state);
    }
}

impl Display for StructType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{{{}}}",
            self.id,
            self.iter().map(|(n, fld)| format!("{n}={fld}")).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScalarType;

    fn point() -> StructType {
        StructType::new(
            vec!["x".into(), "y".into()].into(),
            vec![
                Field::Scalar(ScalarType::Float64),
                Field::Scalar(ScalarType::Float64),
            ],
        )
    }

    #[test]
    fn accessors() {
        let st = point();
        assert_eq!(st.id(), DEFAULT_STRUCT_ID);
        assert_eq!(st.len(), 2);
        assert_eq!(st.number_fields(), 3);
        assert_eq!(st.find("y"), Some(1));
        assert_eq!(st.find("z"), None);
        assert_eq!(
            st.field_by_name("x"),
            Some(&Field::Scalar(ScalarType::Float64))
        );
        assert!(st.field(2).is_none());
    }

    #[test]
    fn id_is_metadata() {
        let a = point();
        let b = StructType::with_id(
            "point_t",
            vec!["x".into(), "y".into()].into(),
            vec![
                Field::Scalar(ScalarType::Float64),
                Field::Scalar(ScalarType::Float64),
            ],
        );
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn nested_span() {
        let outer = StructType::new(
            vec!["value".into(), "point".into()].into(),
            vec![
                Field::Scalar(ScalarType::Float64),
                Field::Structure(point()),
            ],
        );
        // 1 (outer) + 1 (value) + 3 (point and its two leaves)
        assert_eq!(outer.number_fields(), 5);
    }

    #[test]
    #[should_panic(expected = "duplicate field name 'x'")]
    fn duplicate_names_rejected() {
        StructType::new(
            vec!["x".into(), "x".into()].into(),
            vec![
                Field::Scalar(ScalarType::Float64),
                Field::Scalar(ScalarType::Float64),
            ],
        );
    }

    #[test]
    fn display() {
        assert_eq!(point().to_string(), "structure{x=double, y=double}");
    }
}
