use trellis_error::{TrellisResult, trellis_bail};
use trellis_introspect::Field;

use crate::{
    ScalarArrayValue, ScalarValue, StructArrayValue, StructValue, UnionArrayValue, UnionValue,
};

/// One node of a value tree, mirroring the [`Field`] kind it instantiates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar leaf
    Scalar(ScalarValue),
    /// A scalar-array leaf
    ScalarArray(ScalarArrayValue),
    /// A structure with child values
    Structure(StructValue),
    /// A structure-array leaf
    StructureArray(StructArrayValue),
    /// A union leaf
    Union(UnionValue),
    /// A union-array leaf
    UnionArray(UnionArrayValue),
}

impl Value {
    /// The default instance of `field`: zeroed leaves, empty arrays,
    /// unselected unions.
    pub fn new(field: &Field) -> Self {
        match field {
            Field::Scalar(t) => Value::Scalar(ScalarValue::default_for(*t)),
            Field::ScalarArray(t) => Value::ScalarArray(ScalarArrayValue::default_for(*t)),
            Field::Structure(st) => Value::Structure(StructValue::new(st.clone())),
            Field::StructureArray(st) => Value::StructureArray(StructArrayValue::new(st.clone())),
            Field::Union(u) => Value::Union(UnionValue::new(u.clone())),
            Field::UnionArray(u) => Value::UnionArray(UnionArrayValue::new(u.clone())),
        }
    }

    /// The type descriptor this value instantiates.
    pub fn field(&self) -> Field {
        match self {
            Value::Scalar(v) => Field::Scalar(v.scalar_type()),
            Value::ScalarArray(v) => Field::ScalarArray(v.element_type()),
            Value::Structure(v) => Field::Structure(v.struct_type().clone()),
            Value::StructureArray(v) => Field::StructureArray(v.struct_type().clone()),
            Value::Union(v) => Field::Union(v.union_type().clone()),
            Value::UnionArray(v) => Field::UnionArray(v.union_type().clone()),
        }
    }

    /// `true` for every kind that spans a single field offset.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::Structure(_))
    }

    /// The scalar value, if this is a scalar leaf.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable access to the scalar value, if this is a scalar leaf.
    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarValue> {
        match self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// The structure, if this is a structure node.
    pub fn as_structure(&self) -> Option<&StructValue> {
        match self {
            Value::Structure(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable access to the structure, if this is a structure node.
    pub fn as_structure_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Structure(v) => Some(v),
            _ => None,
        }
    }

    /// The scalar array, if this is a scalar-array leaf.
    pub fn as_scalar_array(&self) -> Option<&ScalarArrayValue> {
        match self {
            Value::ScalarArray(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable access to the scalar array, if this is a scalar-array leaf.
    pub fn as_scalar_array_mut(&mut self) -> Option<&mut ScalarArrayValue> {
        match self {
            Value::ScalarArray(v) => Some(v),
            _ => None,
        }
    }

    /// The union, if this is a union leaf.
    pub fn as_union(&self) -> Option<&UnionValue> {
        match self {
            Value::Union(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable access to the union, if this is a union leaf.
    pub fn as_union_mut(&mut self) -> Option<&mut UnionValue> {
        match self {
            Value::Union(v) => Some(v),
            _ => None,
        }
    }

    /// Replace this value with `other`'s content; both must instantiate
    /// the same type.
    pub fn copy_from(&mut self, other: &Value) -> TrellisResult<()> {
        if self.field() != other.field() {
            trellis_bail!(MismatchedTypes: self.field(), other.field());
        }
        *self = other.clone();
        Ok(())
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Scalar(value)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Value::Structure(value)
    }
}
