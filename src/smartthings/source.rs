use crate::smartthings::ApiError;
use crate::smartthings::domain::{ComponentStatus, Device};
use async_trait::async_trait;

/// Where a collection pass gets its devices and their component status from.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError>;

    /// A component without active attributes yields an empty status rather than an error.
    async fn component_status(&self, device_id: &str, component_id: &str) -> Result<ComponentStatus, ApiError>;
}
