mod client;
pub mod domain;
mod error;
mod source;

pub use client::{SmartThingsClient, new_client};
pub use error::ApiError;
pub use source::DeviceSource;
