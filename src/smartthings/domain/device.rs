use serde::Deserialize;

// API: https://developer.smartthings.com/docs/api/public#operation/getDevices
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer_name: String,
    #[serde(default)]
    pub device_manufacturer_code: String,
    #[serde(default)]
    pub device_type_id: String,
    #[serde(default)]
    pub device_network_type: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub label: String,
}
