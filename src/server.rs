use crate::exporter::{CONTENT_TYPE, Collector, encode};
use crate::smartthings::DeviceSource;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, instrument, warn};

const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

struct ExporterState<S> {
    collector: Collector<S>,
    scrape_timeout: Duration,
}

pub fn router<S: DeviceSource + 'static>(collector: Collector<S>, scrape_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics::<S>))
        .with_state(Arc::new(ExporterState { collector, scrape_timeout }))
}

async fn root() -> &'static str {
    "OK"
}

#[instrument(skip_all)]
async fn metrics<S: DeviceSource + 'static>(State(state): State<Arc<ExporterState<S>>>, headers: HeaderMap) -> Response {
    let deadline = requested_timeout(&headers).unwrap_or(state.scrape_timeout);

    // Cancels the pass when the scrape is dropped before it completes.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let collected = timeout(deadline, state.collector.collect(cancel.clone()).collect::<Vec<_>>()).await;
    let Ok(metrics) = collected else {
        cancel.cancel();
        warn!("⚠️ Collection did not finish within {:?}, aborted", deadline);
        return (StatusCode::SERVICE_UNAVAILABLE, "collection timed out").into_response();
    };

    match encode(metrics) {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("❌ {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn requested_timeout(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(SCRAPE_TIMEOUT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .map(Duration::from_secs_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::CollectorOptions;
    use crate::smartthings::ApiError;
    use crate::smartthings::domain::{Component, ComponentStatus, Device, PropertyValue};
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use axum_test::TestServer;
    use rstest::rstest;
    use std::collections::BTreeMap;

    struct DoorSource {
        delay: Duration,
    }

    #[async_trait]
    impl DeviceSource for DoorSource {
        async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
            Ok(vec![Device {
                device_id: "d1".to_string(),
                label: "Front door".to_string(),
                name: "front-door".to_string(),
                manufacturer_name: "Yale".to_string(),
                device_manufacturer_code: "".to_string(),
                device_type_id: "".to_string(),
                device_network_type: "ZWAVE".to_string(),
                components: vec![Component {
                    id: "main".to_string(),
                    label: "main".to_string(),
                }],
            }])
        }

        async fn component_status(&self, _device_id: &str, component_id: &str) -> Result<ComponentStatus, ApiError> {
            tokio::time::sleep(self.delay).await;
            let properties = BTreeMap::from([("value".to_string(), PropertyValue::Text("locked".to_string()))]);
            Ok(BTreeMap::from([(component_id.to_string(), BTreeMap::from([("lock".to_string(), properties)]))]))
        }
    }

    fn server(delay: Duration, scrape_timeout: Duration) -> TestServer {
        let collector = Collector::new(DoorSource { delay }, CollectorOptions::default());
        TestServer::new(router(collector, scrape_timeout)).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn root_answers_ok() {
        let response = server(Duration::ZERO, Duration::from_secs(5)).get("/").await;

        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn metrics_serves_the_text_exposition() {
        let response = server(Duration::ZERO, Duration::from_secs(5)).get("/metrics").await;

        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), HeaderValue::from_static(CONTENT_TYPE));

        let body = response.text();
        assert!(body.contains("# TYPE smartthings_device gauge"), "unexpected body: {}", body);
        assert!(body.contains(r#"smartthings_device{deviceId="d1",deviceLabel="Front door",name="front-door"}"#), "unexpected body: {}", body);
        assert!(body.contains(r#"smartthings_attribute_lock{deviceId="d1",componentId="main",state="locked"}"#), "unexpected body: {}", body);
    }

    #[test_log::test(tokio::test)]
    async fn metrics_gives_up_after_the_scrape_timeout() {
        let response = server(Duration::from_secs(30), Duration::from_millis(50)).get("/metrics").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test_log::test(tokio::test)]
    async fn metrics_honours_the_prometheus_scrape_timeout() {
        let response = server(Duration::from_secs(30), Duration::from_secs(60))
            .get("/metrics")
            .add_header(SCRAPE_TIMEOUT_HEADER, "0.05")
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[case("10", Some(Duration::from_secs(10)))]
    #[case(" 2.5 ", Some(Duration::from_millis(2500)))]
    #[case("0", None)]
    #[case("-1", None)]
    #[case("soon", None)]
    fn requested_timeout_parses_the_header(#[case] value: &str, #[case] expected: Option<Duration>) {
        let mut headers = HeaderMap::new();
        headers.insert(SCRAPE_TIMEOUT_HEADER, HeaderValue::from_str(value).unwrap());

        assert_eq!(requested_timeout(&headers), expected);
    }
}
