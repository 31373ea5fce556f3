//! Serde support for the container types.
//!
//! `StructType` and `UnionType` validate their shape at construction
//! (matching name/field counts, unique names) and `StructType` caches its
//! offset span, so deserialization goes through the checked constructors
//! rather than a field-for-field derive.

// `::serde` throughout: plain `serde` paths inside this module would be
// ambiguous between the crate and this module's own name
use ::serde::de::Error;
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Field, FieldName, StructType, UnionType};

#[derive(Serialize, Deserialize)]
struct RawContainer {
    id: String,
    names: Vec<String>,
    fields: Vec<Field>,
}

impl RawContainer {
    fn validate<E: Error>(&self) -> Result<(), E> {
        if self.names.len() != self.fields.len() {
            return Err(E::custom(format!(
                "length mismatch between names ({}) and fields ({})",
                self.names.len(),
                self.fields.len()
            )));
        }
        for (i, name) in self.names.iter().enumerate() {
            if self.names[..i].contains(name) {
                return Err(E::custom(format!("duplicate field name '{name}'")));
            }
        }
        Ok(())
    }

    fn names(&self) -> Vec<FieldName> {
        self.names.iter().map(|n| n.as_str().into()).collect()
    }
}

impl Serialize for StructType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawContainer {
            id: self.id().to_string(),
            names: self.names().iter().map(|n| n.to_string()).collect(),
            fields: self.fields().to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StructType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawContainer::deserialize(deserializer)?;
        raw.validate()?;
        let names = raw.names();
        Ok(StructType::with_id(raw.id, names.into(), raw.fields))
    }
}

impl Serialize for UnionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawContainer {
            id: self.id().to_string(),
            names: self.names().iter().map(|n| n.to_string()).collect(),
            fields: self.fields().to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawContainer::deserialize(deserializer)?;
        raw.validate()?;
        let names = raw.names();
        Ok(UnionType::with_id(raw.id, names.into(), raw.fields))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Field, ScalarType, StructType, standard};

    #[test]
    fn struct_round_trip() {
        let ty = standard::scalar(ScalarType::Float64, "alarm,timeStamp");
        let json = serde_json::to_string(&ty).unwrap();
        let back: StructType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
        assert_eq!(ty.number_fields(), back.number_fields());
        assert_eq!(back.field_by_name("alarm"), Some(&Field::Structure(standard::alarm())));
    }

    #[test]
    fn duplicate_names_rejected() {
        let json = r#"{"id":"structure","names":["x","x"],"fields":[{"Scalar":"Int32"},{"Scalar":"Int32"}]}"#;
        assert!(serde_json::from_str::<StructType>(json).is_err());
    }

    #[test]
    fn length_mismatch_rejected() {
        let json = r#"{"id":"structure","names":["x"],"fields":[]}"#;
        assert!(serde_json::from_str::<StructType>(json).is_err());
    }
}
