use crate::app_config::TimestampMode;
use crate::exporter::CollectorOptions;
use crate::exporter::metric::{Labels, Metric};
use crate::exporter::normalizer::normalize;
use crate::extensions::ToEpochMillis;
use crate::smartthings::domain::{ComponentProperties, ComponentStatus, Device, PropertyValue};

const VALUE: &str = "value";
const DATA: &str = "data";
const TIMESTAMP: &str = "timestamp";

/// The existence marker and the info metric of a device.
pub fn device_metrics(prefix: &str, device: &Device) -> [Metric; 2] {
    [
        Metric::new(
            &format!("{}device", prefix),
            "a registered device",
            Labels::new()
                .with("deviceId", &device.device_id)
                .with("deviceLabel", &device.label)
                .with("name", &device.name),
            1.0,
        ),
        Metric::new(
            &format!("{}device_info", prefix),
            "information about the device",
            Labels::new()
                .with("deviceId", &device.device_id)
                .with("manufacturerName", &device.manufacturer_name)
                .with("deviceManufacturerCode", &device.device_manufacturer_code)
                .with("deviceTypeId", &device.device_type_id)
                .with("deviceNetworkType", &device.device_network_type),
            1.0,
        ),
    ]
}

/// One `attribute_<attributeId>` metric per attribute in the status document.
pub fn component_metrics(device_id: &str, status: &ComponentStatus, options: &CollectorOptions) -> Vec<Metric> {
    status
        .iter()
        .flat_map(|(component_id, attributes)| {
            attributes
                .iter()
                .map(move |(attribute_id, properties)| attribute_metric(device_id, component_id, attribute_id, properties, options))
        })
        .collect()
}

fn attribute_metric(device_id: &str, component_id: &str, attribute_id: &str, properties: &ComponentProperties, options: &CollectorOptions) -> Metric {
    let mut labels = Labels::new().with("deviceId", device_id).with("componentId", component_id);
    let mut value = 0.0;

    if let Some(raw) = properties.get(VALUE) {
        let normalized = normalize(attribute_id, raw);
        for (name, label) in normalized.labels {
            labels.insert(&name, label);
        }
        value = normalized.value;
    }

    match properties.get(DATA) {
        Some(PropertyValue::Mapping(data)) => {
            for (key, entry) in data {
                labels.insert(&format!("{}{}", options.data_label_prefix, key), entry.to_string());
            }
        }
        Some(PropertyValue::Absent) | None => {}
        Some(other) => labels.insert(DATA, other.to_string()),
    }

    if let (TimestampMode::EpochMillis, Some(timestamp)) = (options.timestamp, properties.get(TIMESTAMP)) {
        labels.insert(TIMESTAMP, timestamp_label(timestamp));
    }

    for (name, property) in properties.iter().filter(|(name, _)| ![VALUE, DATA, TIMESTAMP].contains(&name.as_str())) {
        labels.insert(name, property.to_string());
    }

    // Base labels always win over colliding property names.
    labels.insert("deviceId", device_id);
    labels.insert("componentId", component_id);

    Metric::new(
        &format!("{}attribute_{}", options.metric_prefix, attribute_id),
        format!("SmartThings attribute {}", attribute_id),
        labels,
        value,
    )
}

fn timestamp_label(timestamp: &PropertyValue) -> String {
    match timestamp {
        PropertyValue::Text(text) => text.to_epoch_millis().map_or_else(|| text.clone(), |millis| millis.to_string()),
        other => other.to_string(),
    }
}
