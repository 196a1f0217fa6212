use serde::{
    ser::{Serialize, SerializeMap, SerializeSeq},
    Serializer,
};

use crate::value::Value;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Undefined => serializer.serialize_unit(),
            Self::UInt(num) => serializer.serialize_u64(*num),
            Self::Int(num) => serializer.serialize_i64(*num),
            Self::Float(num) => serializer.serialize_f64(*num),
            Self::Bool(bool) => serializer.serialize_bool(*bool),
            Self::String(str) => serializer.serialize_str(str),
            Self::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;

                for v in array {
                    seq.serialize_element(v)?;
                }

                seq.end()
            }
            Self::Object(obj) => {
                // Sorted so that the same tree always serializes the same way
                let mut entries: Vec<_> = obj.iter().collect();
                entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

                let mut map = serializer.serialize_map(Some(entries.len()))?;

                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }

                map.end()
            }
        }
    }
}
