use trellis_error::{TrellisResult, trellis_bail};
use trellis_introspect::ScalarType;

use crate::ScalarValue;

/// A variable-length array of scalar values, homogeneous in element type.
///
/// The whole array occupies a single field offset, so the change-tracking
/// engine treats it as one unit; element-granular updates are the business
/// of the (out-of-scope) array plugins.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArrayValue {
    /// `boolean[]`
    Bool(Vec<bool>),
    /// `byte[]`
    Int8(Vec<i8>),
    /// `short[]`
    Int16(Vec<i16>),
    /// `int[]`
    Int32(Vec<i32>),
    /// `long[]`
    Int64(Vec<i64>),
    /// `ubyte[]`
    UInt8(Vec<u8>),
    /// `ushort[]`
    UInt16(Vec<u16>),
    /// `uint[]`
    UInt32(Vec<u32>),
    /// `ulong[]`
    UInt64(Vec<u64>),
    /// `float[]`
    Float32(Vec<f32>),
    /// `double[]`
    Float64(Vec<f64>),
    /// `string[]`
    String(Vec<String>),
}

impl ScalarArrayValue {
    /// The empty array of element type `t`.
    pub fn default_for(t: ScalarType) -> Self {
        match t {
            ScalarType::Bool => Self::Bool(Vec::new()),
            ScalarType::Int8 => Self::Int8(Vec::new()),
            ScalarType::Int16 => Self::Int16(Vec::new()),
            ScalarType::Int32 => Self::Int32(Vec::new()),
            ScalarType::Int64 => Self::Int64(Vec::new()),
            ScalarType::UInt8 => Self::UInt8(Vec::new()),
            ScalarType::UInt16 => Self::UInt16(Vec::new()),
            ScalarType::UInt32 => Self::UInt32(Vec::new()),
            ScalarType::UInt64 => Self::UInt64(Vec::new()),
            ScalarType::Float32 => Self::Float32(Vec::new()),
            ScalarType::Float64 => Self::Float64(Vec::new()),
            ScalarType::String => Self::String(Vec::new()),
        }
    }

    /// The element type of this array.
    pub fn element_type(&self) -> ScalarType {
        match self {
            Self::Bool(_) => ScalarType::Bool,
            Self::Int8(_) => ScalarType::Int8,
            Self::Int16(_) => ScalarType::Int16,
            Self::Int32(_) => ScalarType::Int32,
            Self::Int64(_) => ScalarType::Int64,
            Self::UInt8(_) => ScalarType::UInt8,
            Self::UInt16(_) => ScalarType::UInt16,
            Self::UInt32(_) => ScalarType::UInt32,
            Self::UInt64(_) => ScalarType::UInt64,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::String(_) => ScalarType::String,
        }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// `true` iff the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index` boxed into a [`ScalarValue`], if in bounds.
    pub fn element(&self, index: usize) -> Option<ScalarValue> {
        match self {
            Self::Bool(v) => v.get(index).map(|e| ScalarValue::Bool(*e)),
            Self::Int8(v) => v.get(index).map(|e| ScalarValue::Int8(*e)),
            Self::Int16(v) => v.get(index).map(|e| ScalarValue::Int16(*e)),
            Self::Int32(v) => v.get(index).map(|e| ScalarValue::Int32(*e)),
            Self::Int64(v) => v.get(index).map(|e| ScalarValue::Int64(*e)),
            Self::UInt8(v) => v.get(index).map(|e| ScalarValue::UInt8(*e)),
            Self::UInt16(v) => v.get(index).map(|e| ScalarValue::UInt16(*e)),
            Self::UInt32(v) => v.get(index).map(|e| ScalarValue::UInt32(*e)),
            Self::UInt64(v) => v.get(index).map(|e| ScalarValue::UInt64(*e)),
            Self::Float32(v) => v.get(index).map(|e| ScalarValue::Float32(*e)),
            Self::Float64(v) => v.get(index).map(|e| ScalarValue::Float64(*e)),
            Self::String(v) => v.get(index).map(|e| ScalarValue::String(e.clone())),
        }
    }

    /// Replace the whole array; the replacement must have the same
    /// element type.
    pub fn put(&mut self, value: ScalarArrayValue) -> TrellisResult<()> {
        if self.element_type() != value.element_type() {
            trellis_bail!(
                MismatchedTypes: self.element_type(), value.element_type()
            );
        }
        *self = value;
        Ok(())
    }
}

impl From<Vec<f64>> for ScalarArrayValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Float64(value)
    }
}

impl From<Vec<i32>> for ScalarArrayValue {
    fn from(value: Vec<i32>) -> Self {
        Self::Int32(value)
    }
}

impl From<Vec<String>> for ScalarArrayValue {
    fn from(value: Vec<String>) -> Self {
        Self::String(value)
    }
}
