use std::fmt::{Display, Formatter};

/// The primitive types a scalar leaf (or scalar-array element) can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarType {
    /// `true` or `false`
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 8-bit integer
    UInt8,
    /// Unsigned 16-bit integer
    UInt16,
    /// Unsigned 32-bit integer
    UInt32,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
    /// UTF-8 string
    String,
}

impl ScalarType {
    /// `true` for the integer types, signed or unsigned.
    pub fn is_int(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// `true` for the floating point types.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// `true` if the type carries a numeric value.
    pub fn is_numeric(self) -> bool {
        self.is_int() || self.is_float()
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // the wire-level names used across the control system
        let name = match self {
            Self::Bool => "boolean",
            Self::Int8 => "byte",
            Self::Int16 => "short",
            Self::Int32 => "int",
            Self::Int64 => "long",
            Self::UInt8 => "ubyte",
            Self::UInt16 => "ushort",
            Self::UInt32 => "uint",
            Self::UInt64 => "ulong",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::String => "string",
        };
        f.write_str(name)
    }
}
