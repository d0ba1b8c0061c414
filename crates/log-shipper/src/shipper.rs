// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ships one subscription event: parse, then hand each output to its sink.
//!
//! ```text
//!   LogsEvent ──> lambda_logs::process ──┬──> logs ────────────> LogSink
//!                                        ├──> custom metrics ──> MetricSink
//!                                        ├──> usage metrics ───> MetricSink (optional)
//!                                        └──> rejected ────────> warn! and drop
//! ```
//!
//! Sink failures are logged and counted in the [`ShipReport`]; they never
//! stop the other outputs from being shipped.

use lambda_logs::process;
use tracing::{debug, error, warn};

use crate::event::LogsEvent;
use crate::logs_sink::LogSink;
use crate::metrics_sink::{MetricPublisher, MetricSink, PublishSummary};

/// What happened to one event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShipReport {
    pub logs_sent: usize,
    pub logs_failed: usize,
    pub custom_metrics: PublishSummary,
    pub usage_metrics: PublishSummary,
    pub rejected_lines: usize,
}

pub struct Shipper<L, P> {
    log_sink: L,
    metric_sink: Option<MetricSink<P>>,
    publish_usage_metrics: bool,
}

impl<L: LogSink, P: MetricPublisher> Shipper<L, P> {
    /// Metrics are dropped when `metric_sink` is `None`.
    pub fn new(
        log_sink: L,
        metric_sink: Option<MetricSink<P>>,
        publish_usage_metrics: bool,
    ) -> Self {
        Self {
            log_sink,
            metric_sink,
            publish_usage_metrics,
        }
    }

    pub async fn ship(&self, event: &LogsEvent) -> ShipReport {
        let result = process(&event.context(), &event.lines());
        let mut report = ShipReport {
            rejected_lines: result.rejected.len(),
            ..Default::default()
        };

        for rejected in &result.rejected {
            warn!("{}", rejected);
        }

        if !result.logs.is_empty() {
            match self.log_sink.send(&result.logs).await {
                Ok(sent) => report.logs_sent = sent,
                Err(e) => {
                    error!("Failed to send {} logs: {}", result.logs.len(), e);
                    report.logs_failed = result.logs.len();
                }
            }
        }

        let Some(metric_sink) = &self.metric_sink else {
            debug!(
                "No metrics endpoint configured, dropping {} custom and {} usage metrics",
                result.custom_metrics.len(),
                result.usage_metrics.len()
            );
            return report;
        };

        if !result.custom_metrics.is_empty() {
            report.custom_metrics = metric_sink.publish(&result.custom_metrics).await;
        }
        if self.publish_usage_metrics && !result.usage_metrics.is_empty() {
            report.usage_metrics = metric_sink.publish(&result.usage_metrics).await;
        }

        report
    }
}
