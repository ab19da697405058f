use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    server: Server,
    smartthings: SmartThings,
    exporter: Exporter,
    log: Log,
}

impl AppConfig {
    /// Layers the defaults, the config file(s), `STE_` prefixed environment variables and the legacy
    /// `STE_PORT`/`STE_API_TOKEN` variables, in that order.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 9119)?
            .set_default("smartthings.url", "https://api.smartthings.com/v1")?
            .set_default("smartthings.api_token", "")?
            .set_default("smartthings.retry_ms", 500)?
            .set_default("smartthings.startup_attempts", 3)?
            .set_default("exporter.metric_prefix", "smartthings_")?
            .set_default("exporter.timestamp", "drop")?
            .set_default("exporter.data_label_prefix", "data_")?
            .set_default("exporter.component_concurrency", 1)?
            .set_default("exporter.buffer_size", 64)?
            .set_default("exporter.scrape_timeout", "10s")?
            .set_default("log.level", "info")?
            .add_source(config::File::with_name(path.unwrap_or("config")).required(path.is_some()))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(
                config::Environment::with_prefix("STE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env::var("STE_PORT").ok())?
            .set_override_option("smartthings.api_token", env::var("STE_API_TOKEN").ok())?
            .build()?
            .try_deserialize()
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn smartthings(&self) -> &SmartThings {
        &self.smartthings
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn log(&self) -> &Log {
        &self.log
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    address: String,
    port: u16,
}

impl Server {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize)]
pub struct SmartThings {
    url: String,
    api_token: String,
    retry_ms: u64,
    startup_attempts: usize,
}

impl SmartThings {
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn api_token(&self) -> &str {
        self.api_token.trim()
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn startup_attempts(&self) -> usize {
        self.startup_attempts
    }
}

/// How the `timestamp` property of an attribute ends up in the exported labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimestampMode {
    Drop,
    EpochMillis,
}

#[derive(Debug, Deserialize)]
pub struct Exporter {
    metric_prefix: String,
    timestamp: TimestampMode,
    data_label_prefix: String,
    component_concurrency: usize,
    buffer_size: usize,
    #[serde(with = "humantime_serde")]
    scrape_timeout: Duration,
}

impl Exporter {
    pub fn metric_prefix(&self) -> &str {
        &self.metric_prefix
    }

    pub fn timestamp(&self) -> TimestampMode {
        self.timestamp
    }

    pub fn data_label_prefix(&self) -> &str {
        &self.data_label_prefix
    }

    pub fn component_concurrency(&self) -> usize {
        self.component_concurrency.max(1)
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }

    pub fn scrape_timeout(&self) -> Duration {
        self.scrape_timeout
    }
}

#[derive(Debug, Deserialize)]
pub struct Log {
    level: String,
}

impl Log {
    pub fn level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                server: Server {
                    address: "127.0.0.1".to_string(),
                    port: 9119,
                },
                smartthings: SmartThings {
                    url: "https://api.smartthings.com/v1".to_string(),
                    api_token: "token".to_string(),
                    retry_ms: 10,
                    startup_attempts: 1,
                },
                exporter: Exporter {
                    metric_prefix: "smartthings_".to_string(),
                    timestamp: TimestampMode::Drop,
                    data_label_prefix: "data_".to_string(),
                    component_concurrency: 1,
                    buffer_size: 16,
                    scrape_timeout: Duration::from_secs(10),
                },
                log: Log { level: "info".to_string() },
            },
        }
    }

    pub fn smartthings_url(mut self, url: String) -> Self {
        self.config.smartthings.url = url;
        self
    }

    pub fn api_token(mut self, api_token: &str) -> Self {
        self.config.smartthings.api_token = api_token.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
