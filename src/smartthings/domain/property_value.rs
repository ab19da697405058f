use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A property value as reported in a component status document.
///
/// SmartThings reports the same property name as a number, a string or a nested object depending on the
/// capability. Booleans and arrays are kept as [`PropertyValue::Text`] holding their JSON rendering, `null`
/// becomes [`PropertyValue::Absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    Mapping(BTreeMap<String, PropertyValue>),
    Absent,
}

impl From<&PropertyValue> for serde_json::Value {
    fn from(value: &PropertyValue) -> Self {
        match value {
            // Whole numbers render without a fraction, like a top-level number does.
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => serde_json::Value::from(*n as i64),
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number),
            PropertyValue::Text(text) => serde_json::Value::String(text.clone()),
            PropertyValue::Mapping(map) => serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), v.into())).collect()),
            PropertyValue::Absent => serde_json::Value::Null,
        }
    }
}

/// Renders the value the way it ends up in a label.
impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Mapping(_) => write!(f, "{}", serde_json::Value::from(self)),
            PropertyValue::Absent => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PropertyValue::Number(42.0), "42")]
    #[case(PropertyValue::Number(68.4), "68.4")]
    #[case(PropertyValue::Number(-3.5), "-3.5")]
    #[case(PropertyValue::Text("locked".to_string()), "locked")]
    #[case(PropertyValue::Absent, "")]
    fn display_scalar(#[case] value: PropertyValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn display_mapping_as_compact_json() {
        let value = PropertyValue::Mapping(BTreeMap::from([
            ("b".to_string(), PropertyValue::Number(1.0)),
            ("a".to_string(), PropertyValue::Text("x".to_string())),
            ("c".to_string(), PropertyValue::Absent),
        ]));

        assert_eq!(value.to_string(), r#"{"a":"x","b":1,"c":null}"#);
    }

    #[test]
    fn display_nested_numbers_like_top_level_numbers() {
        let value = PropertyValue::Mapping(BTreeMap::from([
            ("level".to_string(), PropertyValue::Number(3.0)),
            ("ratio".to_string(), PropertyValue::Number(0.5)),
            (
                "nested".to_string(),
                PropertyValue::Mapping(BTreeMap::from([("n".to_string(), PropertyValue::Number(-3.0))])),
            ),
        ]));

        assert_eq!(value.to_string(), r#"{"level":3,"nested":{"n":-3},"ratio":0.5}"#);
        assert_eq!(PropertyValue::Number(3.0).to_string(), "3");
    }
}
