// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process::ExitCode;

use tokio::io::AsyncReadExt;
use tracing::{error, info};

use log_shipper::{
    logger,
    logs_sink::TcpLogSink,
    metrics_sink::{HttpMetricPublisher, MetricSink},
    LogsEvent, ShipperConfig, Shipper,
};

#[tokio::main]
pub async fn main() -> ExitCode {
    let config = match ShipperConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init("info");
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logger::init(&config.log_level);

    let mut payload = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut payload).await {
        error!("Failed to read event from stdin: {}", e);
        return ExitCode::FAILURE;
    }

    let event = match LogsEvent::from_json(&payload) {
        Ok(event) => event,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let metric_sink = match &config.metrics_endpoint {
        Some(endpoint) => match HttpMetricPublisher::new(endpoint.clone(), config.timeout) {
            Ok(publisher) => Some(MetricSink::new(publisher)),
            Err(e) => {
                error!("Failed to create metrics publisher: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let shipper = Shipper::new(
        TcpLogSink::from_config(&config),
        metric_sink,
        config.publish_usage_metrics,
    );

    let report = shipper.ship(&event).await;
    info!(
        "Shipped {} logs ({} failed), {} custom and {} usage metrics ({} failed), rejected {} lines",
        report.logs_sent,
        report.logs_failed,
        report.custom_metrics.published,
        report.usage_metrics.published,
        report.custom_metrics.failed + report.usage_metrics.failed,
        report.rejected_lines
    );

    ExitCode::SUCCESS
}
