//! Human-readable rendering of value trees, for diagnostics and tests.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{
    ScalarArrayValue, ScalarValue, StructArrayValue, StructValue, UnionArrayValue, UnionValue,
    Value,
};

impl Display for ScalarValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "\"{v}\""),
        }
    }
}

impl Display for ScalarArrayValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            (0..self.len())
                .filter_map(|i| self.element(i))
                .format_with(", ", |e, g| g(&e))
        )
    }
}

impl Display for StructValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.struct_type()
                .names()
                .iter()
                .zip(self.children())
                .format_with(", ", |(n, v), g| g(&format_args!("{n}={v}")))
        )
    }
}

impl Display for StructArrayValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.elements().iter().format(", "))
    }
}

impl Display for UnionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.selected_index(), self.value()) {
            (None, None) => f.write_str("(none)"),
            (None, Some(v)) => write!(f, "{v}"),
            (Some(idx), Some(v)) => {
                let name = &self.union_type().names()[idx];
                write!(f, "{name}={v}")
            }
            (Some(_), None) => unreachable!(),
        }
    }
}

impl Display for UnionArrayValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.elements().iter().format(", "))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{v}"),
            Value::ScalarArray(v) => write!(f, "{v}"),
            Value::Structure(v) => write!(f, "{v}"),
            Value::StructureArray(v) => write!(f, "{v}"),
            Value::Union(v) => write!(f, "{v}"),
            Value::UnionArray(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_introspect::{ScalarType, standard};

    use super::*;

    #[test]
    fn rendering() {
        let ty = standard::scalar(ScalarType::Float64, "alarm");
        let mut v = StructValue::new(ty);
        v.sub_field_mut("value")
            .and_then(Value::as_scalar_mut)
            .unwrap()
            .put(1.5.into())
            .unwrap();
        v.sub_field_mut("alarm.message")
            .and_then(Value::as_scalar_mut)
            .unwrap()
            .put("ok".into())
            .unwrap();
        assert_eq!(
            v.to_string(),
            "{value=1.5, alarm={severity=0, status=0, message=\"ok\"}}"
        );
    }

    #[test]
    fn array_rendering() {
        let mut arr = ScalarArrayValue::default_for(ScalarType::Int32);
        arr.put(vec![1, 2, 3].into()).unwrap();
        assert_eq!(arr.to_string(), "[1, 2, 3]");
    }
}
