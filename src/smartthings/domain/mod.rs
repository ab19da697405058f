mod component_status;
mod device;
mod error_response;
mod list_response;
mod property_value;
mod property_value_deserializer;

pub use component_status::{ComponentProperties, ComponentStatus};
#[cfg(test)]
pub use device::Component;
pub use device::Device;
pub use error_response::ErrorResponse;
pub use list_response::ListResponse;
pub use property_value::PropertyValue;
