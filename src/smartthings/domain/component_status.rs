use crate::smartthings::domain::PropertyValue;
use std::collections::BTreeMap;

/// Status document keyed by component id, then attribute id, then property name.
pub type ComponentStatus = BTreeMap<String, ComponentAttributes>;

pub type ComponentAttributes = BTreeMap<String, ComponentProperties>;

pub type ComponentProperties = BTreeMap<String, PropertyValue>;
