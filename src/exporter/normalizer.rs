use crate::smartthings::domain::PropertyValue;
use std::collections::BTreeMap;

/// Numeric reading of an attribute's `value` property plus the labels describing it.
#[derive(Debug, Default, PartialEq)]
pub struct Normalized {
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

type Decoder = fn(&PropertyValue) -> Normalized;

/// Attributes whose textual states carry an on/off meaning. Everything else is decoded numerically.
const DECODERS: &[(&str, Decoder)] = &[
    ("switch", decode_switch),
    ("lock", decode_lock),
    ("motion", decode_motion),
    ("indicatorStatus", decode_indicator_status),
    ("contact", decode_contact),
    ("contactSensor", decode_contact),
];

/// Decodes the `value` property of the given attribute. Never fails: unrecognized shapes read as `0.0`.
pub fn normalize(attribute_id: &str, value: &PropertyValue) -> Normalized {
    DECODERS
        .iter()
        .find(|(id, _)| *id == attribute_id)
        .map_or_else(|| numeric(value), |(_, decode)| decode(value))
}

fn decode_switch(value: &PropertyValue) -> Normalized {
    binary_state(value, "on", None)
}

fn decode_lock(value: &PropertyValue) -> Normalized {
    binary_state(value, "locked", Some("state"))
}

fn decode_motion(value: &PropertyValue) -> Normalized {
    binary_state(value, "active", Some("state"))
}

fn decode_indicator_status(value: &PropertyValue) -> Normalized {
    binary_state(value, "active", Some("status"))
}

// A closed contact reads as 1, like a locked lock.
fn decode_contact(value: &PropertyValue) -> Normalized {
    binary_state(value, "closed", Some("state"))
}

fn binary_state(value: &PropertyValue, active: &str, label: Option<&str>) -> Normalized {
    match value {
        PropertyValue::Text(text) => Normalized {
            labels: label.map(|name| (name.to_string(), text.clone())).into_iter().collect(),
            value: if text == active { 1.0 } else { 0.0 },
        },
        PropertyValue::Number(_) | PropertyValue::Mapping(_) | PropertyValue::Absent => Normalized::default(),
    }
}

fn numeric(value: &PropertyValue) -> Normalized {
    match value {
        PropertyValue::Number(n) if n.is_finite() => Normalized {
            labels: BTreeMap::new(),
            value: *n,
        },
        PropertyValue::Text(text) => match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Normalized {
                labels: BTreeMap::new(),
                value: n,
            },
            _ => Normalized {
                labels: BTreeMap::from([("value".to_string(), text.clone())]),
                value: 0.0,
            },
        },
        PropertyValue::Number(_) | PropertyValue::Mapping(_) | PropertyValue::Absent => Normalized::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(value: &str) -> PropertyValue {
        PropertyValue::Text(value.to_string())
    }

    fn labels(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[rstest]
    #[case("switch", "on", 1.0, &[])]
    #[case("switch", "off", 0.0, &[])]
    #[case("lock", "locked", 1.0, &[("state", "locked")])]
    #[case("lock", "unlocked", 0.0, &[("state", "unlocked")])]
    #[case("lock", "unknown", 0.0, &[("state", "unknown")])]
    #[case("motion", "active", 1.0, &[("state", "active")])]
    #[case("motion", "inactive", 0.0, &[("state", "inactive")])]
    #[case("indicatorStatus", "active", 1.0, &[("status", "active")])]
    #[case("indicatorStatus", "never", 0.0, &[("status", "never")])]
    #[case("contact", "closed", 1.0, &[("state", "closed")])]
    #[case("contact", "open", 0.0, &[("state", "open")])]
    #[case("contactSensor", "closed", 1.0, &[("state", "closed")])]
    #[case("contactSensor", "open", 0.0, &[("state", "open")])]
    fn normalize_binary_state(#[case] attribute_id: &str, #[case] value: &str, #[case] expected: f64, #[case] expected_labels: &[(&str, &str)]) {
        let normalized = normalize(attribute_id, &text(value));

        assert_eq!(
            normalized,
            Normalized {
                labels: labels(expected_labels),
                value: expected,
            }
        );
    }

    #[rstest]
    #[case::number("switch", PropertyValue::Number(1.0))]
    #[case::mapping("lock", PropertyValue::Mapping(BTreeMap::new()))]
    #[case::absent("motion", PropertyValue::Absent)]
    fn normalize_binary_state_ignores_non_text_values(#[case] attribute_id: &str, #[case] value: PropertyValue) {
        assert_eq!(normalize(attribute_id, &value), Normalized::default());
    }

    #[rstest]
    #[case("temperature")]
    #[case("battery")]
    #[case("humidity")]
    fn normalize_passes_numbers_through(#[case] attribute_id: &str) {
        let normalized = normalize(attribute_id, &PropertyValue::Number(42.5));

        assert_eq!(normalized, Normalized { labels: BTreeMap::new(), value: 42.5 });
    }

    #[rstest]
    #[case("2.75", 2.75)]
    #[case("-2", -2.0)]
    #[case("1e3", 1000.0)]
    fn normalize_parses_numeric_text(#[case] value: &str, #[case] expected: f64) {
        let normalized = normalize("illuminance", &text(value));

        assert_eq!(normalized, Normalized { labels: BTreeMap::new(), value: expected });
    }

    #[rstest]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    #[case(" 2.75")]
    #[case("")]
    fn normalize_keeps_non_numeric_text_as_label(#[case] value: &str) {
        let normalized = normalize("thermostatMode", &text(value));

        assert_eq!(
            normalized,
            Normalized {
                labels: labels(&[("value", value)]),
                value: 0.0,
            }
        );
    }

    #[rstest]
    #[case::mapping(PropertyValue::Mapping(BTreeMap::from([("x".to_string(), PropertyValue::Number(1.0))])))]
    #[case::absent(PropertyValue::Absent)]
    #[case::non_finite(PropertyValue::Number(f64::INFINITY))]
    fn normalize_defaults_other_shapes_to_zero(#[case] value: PropertyValue) {
        assert_eq!(normalize("temperature", &value), Normalized::default());
    }
}
