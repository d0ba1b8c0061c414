// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Publishing of metric observations, grouped by namespace.
//!
//! ```text
//!   observations ──> group by namespace ──> chunks of 20 ──> MetricPublisher
//! ```
//!
//! Each chunk is published independently: a failure is logged together with
//! the datums that were dropped and the remaining chunks still go out.

use async_trait::async_trait;
use lambda_logs::MetricObservation;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::ShipperError;

/// Maximum number of datums sent in one publish request.
pub const MAX_DATUMS_PER_REQUEST: usize = 20;

/// Publishes one namespace worth of observations.
#[async_trait]
pub trait MetricPublisher: Send + Sync {
    async fn publish(
        &self,
        namespace: &str,
        datums: &[MetricObservation],
    ) -> Result<(), ShipperError>;
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    #[serde(rename = "Namespace")]
    namespace: &'a str,
    #[serde(rename = "MetricData")]
    metric_data: &'a [MetricObservation],
}

/// Publishes observations as JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMetricPublisher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetricPublisher {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ShipperError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl MetricPublisher for HttpMetricPublisher {
    async fn publish(
        &self,
        namespace: &str,
        datums: &[MetricObservation],
    ) -> Result<(), ShipperError> {
        let body = PublishRequest {
            namespace,
            metric_data: datums,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(ShipperError::Publish {
            namespace: namespace.to_string(),
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}

/// Outcome of publishing a batch of observations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: usize,
    pub failed: usize,
}

impl PublishSummary {
    fn merge(&mut self, other: PublishSummary) {
        self.published += other.published;
        self.failed += other.failed;
    }
}

/// Groups observations by namespace and hands each group to a publisher.
#[derive(Debug, Clone)]
pub struct MetricSink<P> {
    publisher: P,
}

impl<P: MetricPublisher> MetricSink<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    pub async fn publish(&self, metrics: &[MetricObservation]) -> PublishSummary {
        let mut summary = PublishSummary::default();
        for (namespace, datums) in group_by_namespace(metrics) {
            summary.merge(self.publish_namespace(namespace, &datums).await);
        }
        summary
    }

    async fn publish_namespace(
        &self,
        namespace: &str,
        datums: &[MetricObservation],
    ) -> PublishSummary {
        let mut summary = PublishSummary::default();
        for chunk in datums.chunks(MAX_DATUMS_PER_REQUEST) {
            match self.publisher.publish(namespace, chunk).await {
                Ok(()) => {
                    debug!("Published {} metrics to {}", chunk.len(), namespace);
                    summary.published += chunk.len();
                }
                Err(e) => {
                    error!("Failed to publish metrics: {}", e);
                    match serde_json::to_string(chunk) {
                        Ok(dropped) => error!("Dropped metrics: {}", dropped),
                        Err(e) => error!("Failed to serialize dropped metrics: {}", e),
                    }
                    summary.failed += chunk.len();
                }
            }
        }
        summary
    }
}

/// Groups observations by namespace, keeping the namespaces in first-seen
/// order and the observations in input order.
#[must_use]
pub fn group_by_namespace(metrics: &[MetricObservation]) -> Vec<(&str, Vec<MetricObservation>)> {
    let mut groups: Vec<(&str, Vec<MetricObservation>)> = Vec::new();
    for metric in metrics {
        match groups
            .iter_mut()
            .find(|(namespace, _)| *namespace == metric.namespace)
        {
            Some((_, datums)) => datums.push(metric.clone()),
            None => groups.push((metric.namespace.as_str(), vec![metric.clone()])),
        }
    }
    groups
}
