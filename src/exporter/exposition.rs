use crate::exporter::Metric;
use prometheus::proto::{Gauge, LabelPair, Metric as ProtoMetric, MetricFamily, MetricType};
use prometheus::{Encoder, TextEncoder};
use std::collections::HashMap;
use thiserror::Error;

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Renders the metrics of one pass in the Prometheus text format, one gauge family per metric name.
pub fn encode(metrics: Vec<Metric>) -> Result<String, ExpositionError> {
    let families = to_families(metrics);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn to_families(metrics: Vec<Metric>) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for metric in metrics {
        let position = *index.entry(metric.name.clone()).or_insert_with(|| {
            let mut family = MetricFamily::default();
            family.set_name(metric.name.clone());
            family.set_help(metric.help.to_string());
            family.set_field_type(MetricType::GAUGE);
            families.push(family);
            families.len() - 1
        });

        families[position].mut_metric().push(to_proto(&metric));
    }

    families
}

fn to_proto(metric: &Metric) -> ProtoMetric {
    let labels = metric
        .labels
        .iter()
        .map(|(name, value)| {
            let mut pair = LabelPair::default();
            pair.set_name(name.to_string());
            pair.set_value(value.to_string());
            pair
        })
        .collect::<Vec<_>>();

    let mut gauge = Gauge::default();
    gauge.set_value(metric.value);

    let mut proto = ProtoMetric::default();
    proto.set_label(labels.into());
    proto.set_gauge(gauge);
    proto
}

#[derive(Error, Debug)]
pub enum ExpositionError {
    #[error("unable to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
