use crate::app_config::{Exporter, TimestampMode};
use crate::exporter::Metric;
use crate::exporter::assembler::{component_metrics, device_metrics};
use crate::smartthings::DeviceSource;
use futures::{StreamExt, stream};
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, Sender};
use tokio::task;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub metric_prefix: String,
    pub timestamp: TimestampMode,
    pub data_label_prefix: String,
    pub component_concurrency: usize,
    pub buffer_size: usize,
}

impl CollectorOptions {
    pub fn from_config(config: &Exporter) -> Self {
        CollectorOptions {
            metric_prefix: config.metric_prefix().to_string(),
            timestamp: config.timestamp(),
            data_label_prefix: config.data_label_prefix().to_string(),
            component_concurrency: config.component_concurrency(),
            buffer_size: config.buffer_size(),
        }
    }
}

impl Default for CollectorOptions {
    fn default() -> Self {
        CollectorOptions {
            metric_prefix: "smartthings_".to_string(),
            timestamp: TimestampMode::Drop,
            data_label_prefix: "data_".to_string(),
            component_concurrency: 1,
            buffer_size: 64,
        }
    }
}

/// Turns the devices of a [`DeviceSource`] into metrics, one independent pass per scrape.
#[derive(Debug)]
pub struct Collector<S> {
    source: Arc<S>,
    options: Arc<CollectorOptions>,
}

impl<S: DeviceSource + 'static> Collector<S> {
    pub fn new(source: S, options: CollectorOptions) -> Self {
        Collector {
            source: Arc::new(source),
            options: Arc::new(options),
        }
    }

    /// Starts a collection pass and returns the metrics as they are produced.
    ///
    /// The stream ends when the pass is complete. Cancelling `cancel` or dropping the stream aborts the pass,
    /// including any outstanding request.
    pub fn collect(&self, cancel: CancellationToken) -> ReceiverStream<Metric> {
        let (tx, rx) = mpsc::channel(self.options.buffer_size.max(1));
        let source = self.source.clone();
        let options = self.options.clone();

        task::spawn(async move {
            run_pass(source.as_ref(), &options, &tx, &cancel).await;
        });

        ReceiverStream::new(rx)
    }
}

#[instrument(skip_all)]
async fn run_pass<S: DeviceSource>(source: &S, options: &CollectorOptions, tx: &Sender<Metric>, cancel: &CancellationToken) {
    let started = Instant::now();

    let devices = match until_abandoned(tx, cancel, source.list_devices()).await {
        Some(Ok(devices)) => devices,
        Some(Err(e)) => {
            error!("❌ Listing devices failed, no metrics collected: {}", e);
            return;
        }
        None => {
            debug!("Collection abandoned while listing devices");
            return;
        }
    };

    let mut emitted = 0;
    for device in &devices {
        for metric in device_metrics(&options.metric_prefix, device) {
            if !emit(tx, cancel, metric).await {
                debug!(device_id = %device.device_id, "Collection abandoned");
                return;
            }
            emitted += 1;
        }

        let fetches = device
            .components
            .iter()
            .map(|component| async move { (component, source.component_status(&device.device_id, &component.id).await) })
            .collect::<Vec<_>>();
        let statuses = stream::iter(fetches).buffered(options.component_concurrency.max(1));
        let mut statuses = pin!(statuses);

        loop {
            let Some(next) = until_abandoned(tx, cancel, statuses.next()).await else {
                debug!(device_id = %device.device_id, "Collection abandoned while fetching component status");
                return;
            };
            let Some((component, result)) = next else {
                break;
            };

            match result {
                Ok(status) => {
                    for metric in component_metrics(&device.device_id, &status, options) {
                        if !emit(tx, cancel, metric).await {
                            debug!(device_id = %device.device_id, "Collection abandoned");
                            return;
                        }
                        emitted += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        device_id = %device.device_id,
                        component_id = %component.id,
                        "⚠️ Skipping component '{}' of device '{}': {}",
                        component.id,
                        device.label,
                        e
                    );
                }
            }
        }
    }

    info!("Collected {} metric(s) for {} device(s) in {:?}", emitted, devices.len(), started.elapsed());
}

/// Runs `future` unless the pass gets cancelled or its consumer goes away first.
async fn until_abandoned<F: Future>(tx: &Sender<Metric>, cancel: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        _ = tx.closed() => None,
        output = future => Some(output),
    }
}

async fn emit(tx: &Sender<Metric>, cancel: &CancellationToken, metric: Metric) -> bool {
    matches!(until_abandoned(tx, cancel, tx.send(metric)).await, Some(Ok(())))
}
