use crate::smartthings::domain::PropertyValue;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
        Ok(from_json(value))
    }
}

fn from_json(value: serde_json::Value) -> PropertyValue {
    match value {
        serde_json::Value::Null => PropertyValue::Absent,
        serde_json::Value::Number(number) => number.as_f64().map_or(PropertyValue::Absent, PropertyValue::Number),
        serde_json::Value::String(text) => PropertyValue::Text(text),
        serde_json::Value::Object(map) => PropertyValue::Mapping(map.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
        other @ (serde_json::Value::Bool(_) | serde_json::Value::Array(_)) => PropertyValue::Text(other.to_string()),
    }
}
