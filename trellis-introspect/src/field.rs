use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::{ScalarType, StructType, UnionType};

/// A name for a field in a structure or union.
pub type FieldName = Arc<str>;
/// An ordered list of field names.
pub type FieldNames = Arc<[FieldName]>;

/// An immutable type descriptor for one node of a value tree.
///
/// Descriptors are cheap to clone (`Arc`-backed) and structurally
/// comparable. Every kind except `Structure` spans a single field offset;
/// a `Structure` spans one offset for itself plus the spans of its
/// children (see [`crate::OffsetTable`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// A single scalar value
    Scalar(ScalarType),
    /// A variable-length array of scalar values
    ScalarArray(ScalarType),
    /// An ordered, named sequence of sub-fields
    Structure(StructType),
    /// A variable-length array of structures, addressed as one field
    StructureArray(StructType),
    /// One selected variant out of a named set (or any type at all, for
    /// the variant union)
    Union(UnionType),
    /// A variable-length array of unions, addressed as one field
    UnionArray(UnionType),
}

impl Field {
    /// The number of field offsets this node spans: 1 for every leaf
    /// kind, `1 + Σ children` for a structure.
    pub fn number_fields(&self) -> usize {
        match self {
            Field::Structure(st) => st.number_fields(),
            _ => 1,
        }
    }

    /// `true` iff this is a `Structure` (the only kind that spans more
    /// than one offset).
    pub fn is_structure(&self) -> bool {
        matches!(self, Field::Structure(_))
    }

    /// The `StructType` if this is a `Structure`, otherwise `None`.
    pub fn as_structure(&self) -> Option<&StructType> {
        match self {
            Field::Structure(st) => Some(st),
            _ => None,
        }
    }
}

impl From<ScalarType> for Field {
    fn from(value: ScalarType) -> Self {
        Field::Scalar(value)
    }
}

impl From<StructType> for Field {
    fn from(value: StructType) -> Self {
        Field::Structure(value)
    }
}

impl From<UnionType> for Field {
    fn from(value: UnionType) -> Self {
        Field::Union(value)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Scalar(s) => write!(f, "{s}"),
            Field::ScalarArray(s) => write!(f, "{s}[]"),
            Field::Structure(st) => write!(f, "{st}"),
            Field::StructureArray(st) => write!(f, "{st}[]"),
            Field::Union(u) => write!(f, "{u}"),
            Field::UnionArray(u) => write!(f, "{u}[]"),
        }
    }
}
