//! Canonical control-system sub-structures.
//!
//! Provider-side structures across the control system agree on a small
//! vocabulary of property sub-structures (alarm, time stamp, display,
//! control) attached next to a `value` field. This module builds those
//! types so every layer spells them identically.

use crate::{Field, ScalarType, StructType};

/// `alarm_t`: severity, status, message.
pub fn alarm() -> StructType {
    StructType::with_id(
        "alarm_t",
        vec!["severity".into(), "status".into(), "message".into()].into(),
        vec![
            Field::Scalar(ScalarType::Int32),
            Field::Scalar(ScalarType::Int32),
            Field::Scalar(ScalarType::String),
        ],
    )
}

/// `time_t`: secondsPastEpoch, nanoseconds, userTag.
pub fn time_stamp() -> StructType {
    StructType::with_id(
        "time_t",
        vec![
            "secondsPastEpoch".into(),
            "nanoseconds".into(),
            "userTag".into(),
        ].into(),
        vec![
            Field::Scalar(ScalarType::Int64),
            Field::Scalar(ScalarType::Int32),
            Field::Scalar(ScalarType::Int32),
        ],
    )
}

/// `display_t`: limitLow, limitHigh, description, format, units.
pub fn display() -> StructType {
    StructType::with_id(
        "display_t",
        vec![
            "limitLow".into(),
            "limitHigh".into(),
            "description".into(),
            "format".into(),
            "units".into(),
        ].into(),
        vec![
            Field::Scalar(ScalarType::Float64),
            Field::Scalar(ScalarType::Float64),
            Field::Scalar(ScalarType::String),
            Field::Scalar(ScalarType::String),
            Field::Scalar(ScalarType::String),
        ],
    )
}

/// `control_t`: limitLow, limitHigh, minStep.
pub fn control() -> StructType {
    StructType::with_id(
        "control_t",
        vec!["limitLow".into(), "limitHigh".into(), "minStep".into()].into(),
        vec![
            Field::Scalar(ScalarType::Float64),
            Field::Scalar(ScalarType::Float64),
            Field::Scalar(ScalarType::Float64),
        ],
    )
}

/// `enum_t`: index plus the list of choices.
pub fn enumerated() -> StructType {
    StructType::with_id(
        "enum_t",
        vec!["index".into(), "choices".into()].into(),
        vec![
            Field::Scalar(ScalarType::Int32),
            Field::ScalarArray(ScalarType::String),
        ],
    )
}

/// A `value` field of type `t` plus the property sub-structures named in
/// the comma-separated `properties` list (`alarm`, `timeStamp`,
/// `display`, `control`; anything else is ignored).
pub fn scalar(t: ScalarType, properties: &str) -> StructType {
    with_properties(Field::Scalar(t), properties)
}

/// Like [`scalar`], with a scalar-array `value` field.
pub fn scalar_array(t: ScalarType, properties: &str) -> StructType {
    with_properties(Field::ScalarArray(t), properties)
}

fn with_properties(value: Field, properties: &str) -> StructType {
    let mut names = vec!["value".into()];
    let mut fields = vec![value];
    // property order is fixed regardless of the order in the request
    for (name, build) in [
        ("alarm", alarm as fn() -> StructType),
        ("timeStamp", time_stamp),
        ("display", display),
        ("control", control),
    ] {
        if properties.split(',').any(|p| p.trim() == name) {
            names.push(name.into());
            fields.push(Field::Structure(build()));
        }
    }
    StructType::new(names.into(), fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_assembly() {
        let ty = scalar(ScalarType::Float64, "alarm,timeStamp,display");
        assert_eq!(
            ty.names().iter().map(|n| n.as_ref()).collect::<Vec<_>>(),
            vec!["value", "alarm", "timeStamp", "display"]
        );
        assert_eq!(ty.field_by_name("alarm"), Some(&Field::Structure(alarm())));

        // 1 + value + (1+3) alarm + (1+3) timeStamp + (1+5) display
        assert_eq!(ty.number_fields(), 16);
    }

    #[test]
    fn unknown_properties_ignored() {
        let ty = scalar(ScalarType::Int32, "alarm, nonsense");
        assert_eq!(ty.len(), 2);

        let bare = scalar(ScalarType::Int32, "");
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn array_value() {
        let ty = scalar_array(ScalarType::Float64, "timeStamp");
        assert_eq!(
            ty.field_by_name("value"),
            Some(&Field::ScalarArray(ScalarType::Float64))
        );
        // the array value is a single field
        assert_eq!(ty.number_fields(), 1 + 1 + 4);
    }

    #[test]
    fn enumerated_shape() {
        let ty = enumerated();
        assert_eq!(ty.id(), "enum_t");
        assert_eq!(ty.number_fields(), 3);
    }
}
