use num_traits::NumCast;
use trellis_error::{TrellisResult, trellis_bail};
use trellis_introspect::ScalarType;

/// A single typed primitive value.
///
/// The carried type is fixed for the lifetime of the enclosing value tree;
/// [`ScalarValue::put`] replaces the value but rejects a kind change.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// `boolean`
    Bool(bool),
    /// `byte`
    Int8(i8),
    /// `short`
    Int16(i16),
    /// `int`
    Int32(i32),
    /// `long`
    Int64(i64),
    /// `ubyte`
    UInt8(u8),
    /// `ushort`
    UInt16(u16),
    /// `uint`
    UInt32(u32),
    /// `ulong`
    UInt64(u64),
    /// `float`
    Float32(f32),
    /// `double`
    Float64(f64),
    /// `string`
    String(String),
}

macro_rules! as_primitive {
    ($name:ident, $T:ty) => {
        /// Read the value as this primitive type, converting numerics;
        /// `None` if the value is non-numeric or does not fit.
        pub fn $name(&self) -> Option<$T> {
            match self {
                Self::Bool(_) | Self::String(_) => None,
                Self::Int8(v) => <$T as NumCast>::from(*v),
                Self::Int16(v) => <$T as NumCast>::from(*v),
                Self::Int32(v) => <$T as NumCast>::from(*v),
                Self::Int64(v) => <$T as NumCast>::from(*v),
                Self::UInt8(v) => <$T as NumCast>::from(*v),
                Self::UInt16(v) => <$T as NumCast>::from(*v),
                Self::UInt32(v) => <$T as NumCast>::from(*v),
                Self::UInt64(v) => <$T as NumCast>::from(*v),
                Self::Float32(v) => <$T as NumCast>::from(*v),
                Self::Float64(v) => <$T as NumCast>::from(*v),
            }
        }
    };
}

impl ScalarValue {
    /// The default value for a scalar of type `t` (zero, `false`, `""`).
    pub fn default_for(t: ScalarType) -> Self {
        match t {
            ScalarType::Bool => Self::Bool(false),
            ScalarType::Int8 => Self::Int8(0),
            ScalarType::Int16 => Self::Int16(0),
            ScalarType::Int32 => Self::Int32(0),
            ScalarType::Int64 => Self::Int64(0),
            ScalarType::UInt8 => Self::UInt8(0),
            ScalarType::UInt16 => Self::UInt16(0),
            ScalarType::UInt32 => Self::UInt32(0),
            ScalarType::UInt64 => Self::UInt64(0),
            ScalarType::Float32 => Self::Float32(0.0),
            ScalarType::Float64 => Self::Float64(0.0),
            ScalarType::String => Self::String(String::new()),
        }
    }

    /// The type this value carries.
    pub fn scalar_type(&self) -> ScalarType {
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

    /// Replace the value; the new value must carry the same type.
    pub fn put(&mut self, value: ScalarValue) -> TrellisResult<()> {
        if self.scalar_type() != value.scalar_type() {
            trellis_bail!(
                MismatchedTypes: self.scalar_type(), value.scalar_type()
            );
        }
        *self = value;
        Ok(())
    }

    as_primitive!(as_i64, i64);
    as_primitive!(as_u64, u64);
    as_primitive!(as_f64, f64);

    /// The boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string value, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
