use trellis_error::{TrellisResult, trellis_bail, trellis_err};
use trellis_introspect::UnionType;

use crate::Value;

/// An instance of a [`UnionType`]: at most one selected variant.
///
/// A freshly created union has nothing selected. For a regular union the
/// selection is one of the declared members; for the variant union it is
/// a value of any type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    ty: UnionType,
    stored: Option<Stored>,
}

#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Member { index: usize, value: Box<Value> },
    Variant(Box<Value>),
}

impl UnionValue {
    /// The instance of `ty` with nothing selected.
    pub fn new(ty: UnionType) -> Self {
        Self { ty, stored: None }
    }

    /// The type this value instantiates.
    pub fn union_type(&self) -> &UnionType {
        &self.ty
    }

    /// Select member `index`, installing its default value, and return
    /// the stored value for mutation. Fails on the variant union and on
    /// an out-of-range index.
    pub fn select(&mut self, index: usize) -> TrellisResult<&mut Value> {
        if self.ty.is_variant() {
            trellis_bail!("cannot select a member of the variant union");
        }
        let field = self
            .ty
            .field(index)
            .ok_or_else(|| trellis_err!(OutOfBounds: index, 0, self.ty.fields().len()))?;
        self.stored = Some(Stored::Member {
            index,
            value: Box::new(Value::new(field)),
        });
        match self.stored.as_mut() {
            Some(Stored::Member { value, .. }) => Ok(value),
            _ => unreachable!(),
        }
    }

    /// Select member `index` and store `value`, which must instantiate
    /// the member's type.
    pub fn set(&mut self, index: usize, value: Value) -> TrellisResult<()> {
        if self.ty.is_variant() {
            trellis_bail!("cannot select a member of the variant union");
        }
        let field = self
            .ty
            .field(index)
            .ok_or_else(|| trellis_err!(OutOfBounds: index, 0, self.ty.fields().len()))?;
        if &value.field() != field {
            trellis_bail!(MismatchedTypes: field, value.field());
        }
        self.stored = Some(Stored::Member {
            index,
            value: Box::new(value),
        });
        Ok(())
    }

    /// Store a value of any type; only the variant union admits this.
    pub fn set_variant(&mut self, value: Value) -> TrellisResult<()> {
        if !self.ty.is_variant() {
            trellis_bail!("only the variant union admits arbitrary types");
        }
        self.stored = Some(Stored::Variant(Box::new(value)));
        Ok(())
    }

    /// The index of the selected member, if a regular member is selected.
    pub fn selected_index(&self) -> Option<usize> {
        match &self.stored {
            Some(Stored::Member { index, .. }) => Some(*index),
            _ => None,
        }
    }

    /// The stored value, if anything is selected.
    pub fn value(&self) -> Option<&Value> {
        match &self.stored {
            Some(Stored::Member { value, .. }) | Some(Stored::Variant(value)) => Some(value),
            None => None,
        }
    }

    /// Deselect, returning to the nothing-selected state.
    pub fn clear(&mut self) {
        self.stored = None;
    }
}

/// A variable-length array of unions, homogeneous in type, addressed as a
/// single field.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionArrayValue {
    ty: UnionType,
    elements: Vec<UnionValue>,
}

impl UnionArrayValue {
    /// The empty array of element type `ty`.
    pub fn new(ty: UnionType) -> Self {
        Self {
            ty,
            elements: Vec::new(),
        }
    }

    /// The element type.
    pub fn union_type(&self) -> &UnionType {
        &self.ty
    }

    /// The elements, in order.
    pub fn elements(&self) -> &[UnionValue] {
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
    pub fn push(&mut self, element: UnionValue) -> TrellisResult<()> {
        if element.union_type() != &self.ty {
            trellis_bail!(MismatchedTypes: self.ty, element.union_type());
        }
        self.elements.push(element);
        Ok(())
    }
}
