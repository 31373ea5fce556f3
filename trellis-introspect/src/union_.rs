use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use itertools::Itertools;
use trellis_error::trellis_panic;

use crate::{Field, FieldName, FieldNames};

/// The default identifier of regular unions created without an explicit one.
pub const DEFAULT_UNION_ID: &str = "union";
/// The identifier of the variant union, which admits any type.
pub const VARIANT_UNION_ID: &str = "any";

/// A union type: one selected variant out of an ordered, named set.
///
/// The *variant* union has no declared members and admits a value of any
/// type. Regardless of member count, a union occupies a single field
/// offset; its interior is opaque to the change-tracking engine.
///
/// As with [`crate::StructType`], equality and hashing are structural and
/// the identifier is metadata.
#[derive(Debug, Clone)]
pub struct UnionType {
    id: Arc<str>,
    names: FieldNames,
    fields: Arc<[Field]>,
}

impl UnionType {
    /// Create a regular union with the default identifier.
    ///
    /// Panics if `names` and `fields` differ in length or a name repeats.
    pub fn new(names: FieldNames, fields: Vec<Field>) -> Self {
        Self::with_id(DEFAULT_UNION_ID, names, fields)
    }

    /// Create a regular union with an explicit identifier.
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
            trellis_panic!("duplicate union member name '{}'", dup);
        }
        Self {
            id: id.into(),
            names,
            fields: fields.into(),
        }
    }

    /// The variant union: no declared members, any type admitted.
    pub fn variant() -> Self {
        Self {
            id: VARIANT_UNION_ID.into(),
            names: Vec::new().into(),
            fields: Vec::new().into(),
        }
    }

    /// The identifier of this union type.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The names of the declared members (empty for the variant union).
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// The declared member types (empty for the variant union).
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// `true` iff this is the variant union.
    pub fn is_variant(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find the index of a member by name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_ref() == name)
    }

    /// The member type at `index`, if in bounds.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Iterate `(name, field)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Field)> {
        self.names.iter().zip(self.fields.iter())
    }
}

impl PartialEq for UnionType {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.fields == other.fields
    }
}

impl Eq for UnionType {}

impl Hash for UnionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.names.hash(state);
        self.fields.hash(state);
    }
}

impl Display for UnionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_variant() {
            f.write_str(VARIANT_UNION_ID)
        } else {
            write!(
                f,
                "{}{{{}}}",
                self.id,
                self.iter().map(|(n, fld)| format!("{n}={fld}")).join(", ")
            )
        }
    }
}
