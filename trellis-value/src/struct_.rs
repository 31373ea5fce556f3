use trellis_error::{TrellisResult, trellis_bail};
use trellis_introspect::{OffsetTable, StructType};

use crate::Value;

/// An instance of a [`StructType`]: one child value per child field, in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    ty: StructType,
    children: Vec<Value>,
}

impl StructValue {
    /// The default instance of `ty`: every leaf at its default value.
    pub fn new(ty: StructType) -> Self {
        let children = ty.fields().iter().map(Value::new).collect();
        Self { ty, children }
    }

    /// The type this value instantiates.
    pub fn struct_type(&self) -> &StructType {
        &self.ty
    }

    /// The child values, in declaration order.
    pub fn children(&self) -> &[Value] {
        &self.children
    }

    /// The child value at `index`, if in bounds.
    pub fn child(&self, index: usize) -> Option<&Value> {
        self.children.get(index)
    }

    /// Mutable access to the child value at `index`, if in bounds.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.children.get_mut(index)
    }

    /// Resolve a dotted field name to the value node it names.
    pub fn sub_field(&self, name: &str) -> Option<&Value> {
        let mut segments = name.split('.');
        let first = segments.next()?;
        let mut cur = self.child(self.ty.find(first)?)?;
        for seg in segments {
            let st = cur.as_structure()?;
            cur = st.child(st.struct_type().find(seg)?)?;
        }
        Some(cur)
    }

    /// Resolve a dotted field name to a mutable value node.
    pub fn sub_field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let mut segments = name.split('.');
        let first = segments.next()?;
        let idx = self.ty.find(first)?;
        let mut cur = self.children.get_mut(idx)?;
        for seg in segments {
            let st = cur.as_structure_mut()?;
            let idx = st.struct_type().find(seg)?;
            cur = st.children.get_mut(idx)?;
        }
        Some(cur)
    }

    /// The value node at field offset `offset` of `table`, which must
    /// have been computed for this value's type. Offset 0 names this
    /// top-level structure itself and resolves to `None`.
    pub fn value_at(&self, table: &OffsetTable, offset: usize) -> Option<&Value> {
        if offset == 0 || offset >= table.len() {
            return None;
        }
        let path = table.path(offset);
        let mut cur = self.child(path[0])?;
        for &idx in &path[1..] {
            cur = cur.as_structure()?.child(idx)?;
        }
        Some(cur)
    }

    /// Mutable variant of [`Self::value_at`].
    pub fn value_at_mut(&mut self, table: &OffsetTable, offset: usize) -> Option<&mut Value> {
        if offset == 0 || offset >= table.len() {
            return None;
        }
        let path = table.path(offset).to_vec();
        let mut cur = self.children.get_mut(path[0])?;
        for &idx in &path[1..] {
            cur = cur.as_structure_mut()?.children.get_mut(idx)?;
        }
        Some(cur)
    }

    /// Replace this instance's values with `other`'s; both must
    /// instantiate the same type.
    pub fn copy_from(&mut self, other: &StructValue) -> TrellisResult<()> {
        if self.ty != other.ty {
            trellis_bail!(MismatchedTypes: self.ty, other.ty);
        }
        self.children.clone_from(&other.children);
        Ok(())
    }
}

/// A variable-length array of structures, homogeneous in type, addressed
/// as a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct StructArrayValue {
    ty: StructType,
    elements: Vec<StructValue>,
}

impl StructArrayValue {
    /// The empty array of element type `ty`.
    pub fn new(ty: StructType) -> Self {
        Self {
            ty,
            elements: Vec::new(),
        }
    }

    /// The element type.
    pub fn struct_type(&self) -> &StructType {
        &self.ty
    }

    /// The elements, in order.
    pub fn elements(&self) -> &[StructValue] {
        &self.elements
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` iff the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append an element; it must instantiate the array's element type.
    pub fn push(&mut self, element: StructValue) -> TrellisResult<()> {
        if element.struct_type() != &self.ty {
            trellis_bail!(MismatchedTypes: self.ty, element.struct_type());
        }
        self.elements.push(element);
        Ok(())
    }

    /// Replace the whole array; element types must agree.
    pub fn put(&mut self, other: &StructArrayValue) -> TrellisResult<()> {
        if other.ty != self.ty {
            trellis_bail!(MismatchedTypes: self.ty, other.ty);
        }
        self.elements.clone_from(&other.elements);
        Ok(())
    }
}
