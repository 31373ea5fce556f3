use std::sync::Arc;

use trellis_error::trellis_panic;

use crate::{DEFAULT_STRUCT_ID, Field, FieldName, StructType};

/// Incremental construction of [`StructType`]s, with nested sub-structure
/// scopes.
///
/// ```
/// use trellis_introspect::{Field, ScalarType, TypeBuilder};
///
/// let mut b = TypeBuilder::new();
/// b.add("value", Field::Scalar(ScalarType::Float64));
/// b.nested("alarm");
/// b.add("severity", Field::Scalar(ScalarType::Int32));
/// b.add("message", Field::Scalar(ScalarType::String));
/// b.end_nested();
/// let ty = b.build();
/// assert_eq!(ty.number_fields(), 5);
/// ```
#[derive(Debug, Default)]
pub struct TypeBuilder {
    frames: Vec<Frame>,
}

#[derive(Debug, Default)]
struct Frame {
    name: Option<FieldName>,
    id: Option<Arc<str>>,
    names: Vec<FieldName>,
    fields: Vec<Field>,
}

impl TypeBuilder {
    /// Start building a top-level structure.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Set the identifier of the structure currently being built (the
    /// innermost open scope).
    pub fn set_id(&mut self, id: impl Into<Arc<str>>) -> &mut Self {
        self.top().id = Some(id.into());
        self
    }

    /// Append a field to the structure currently being built.
    pub fn add(&mut self, name: impl Into<FieldName>, field: Field) -> &mut Self {
        let top = self.top();
        top.names.push(name.into());
        top.fields.push(field);
        self
    }

    /// Open a nested sub-structure scope named `name`.
    pub fn nested(&mut self, name: impl Into<FieldName>) -> &mut Self {
        self.frames.push(Frame {
            name: Some(name.into()),
            ..Frame::default()
        });
        self
    }

    /// Close the innermost nested scope, appending it to its parent.
    ///
    /// Panics if no nested scope is open.
    pub fn end_nested(&mut self) -> &mut Self {
        if self.frames.len() < 2 {
            trellis_panic!("end_nested with no open nested scope");
        }
        let frame = self.frames.pop().unwrap_or_default();
        let name = frame
            .name
            .clone()
            .unwrap_or_else(|| trellis_panic!("nested scope has no name"));
        let st = frame.finish();
        self.add(name, Field::Structure(st))
    }

    /// `true` iff nothing has been added to the top-level scope yet.
    pub fn is_empty(&self) -> bool {
        self.frames.len() == 1 && self.frames[0].fields.is_empty()
    }

    /// Finish, producing the top-level [`StructType`].
    ///
    /// Panics if a nested scope is still open.
    pub fn build(mut self) -> StructType {
        if self.frames.len() != 1 {
            trellis_panic!("build with {} nested scope(s) still open", self.frames.len() - 1);
        }
        self.frames.pop().unwrap_or_default().finish()
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Frame {
    fn finish(self) -> StructType {
        let id = self.id.unwrap_or_else(|| DEFAULT_STRUCT_ID.into());
        StructType::with_id(id, self.names.into(), self.fields)
    }
}
