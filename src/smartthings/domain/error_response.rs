use serde::Deserialize;
use std::fmt::{Display, Formatter};

// API: https://developer.smartthings.com/docs/api/public#section/Errors
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    #[allow(dead_code)]
    pub request_id: String,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub details: Vec<ApiErrorBody>,
}

impl Display for ApiErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(target) = &self.target {
            write!(f, " (target '{}')", target)?;
        }
        for detail in &self.details {
            write!(f, "; {}", detail)?;
        }
        Ok(())
    }
}
