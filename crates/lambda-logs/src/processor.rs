// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batch processing of one log group/stream worth of lines.
//!
//! # Architecture
//!
//! ```text
//!            RawLine batch
//!                 │
//!      ┌──────────┼──────────────┐
//!      v          v              v
//!  ┌────────┐ ┌─────────────┐ ┌─────────────┐
//!  │  logs  │ │custom metric│ │usage metric │   (three independent passes)
//!  └───┬────┘ └──────┬──────┘ └──────┬──────┘
//!      │             │               │
//!      v             v               v
//!   logs      custom_metrics    usage_metrics     + rejected lines
//! ```
//!
//! The log and custom metric passes are mutually exclusive per line. A
//! `REPORT` line is skipped by both and only feeds the usage pass.
//!
//! # Failure isolation
//!
//! A line that fails in one pass is recorded in [`BatchResult::rejected`] and
//! the batch carries on. Within each output, order follows input order.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{LineError, ParseError, Pass};
use crate::identity::Identity;
use crate::log_record::{self, LogRecord};
use crate::metric::MetricObservation;
use crate::{custom_metric, usage_metric};

/// Log group and log stream a batch was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub group_id: String,
    pub stream_id: String,
}

impl Context {
    pub fn new(group_id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            stream_id: stream_id.into(),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from_context(&self.group_id, &self.stream_id)
    }
}

/// One line of function output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLine {
    pub timestamp: String,
    pub text: String,
}

impl RawLine {
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }
}

/// Everything extracted from one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub logs: Vec<LogRecord>,
    pub custom_metrics: Vec<MetricObservation>,
    pub usage_metrics: Vec<MetricObservation>,
    /// Lines a pass could not parse, in input order per pass.
    pub rejected: Vec<LineError>,
}

impl BatchResult {
    /// Custom metrics followed by usage metrics.
    pub fn metrics(&self) -> impl Iterator<Item = &MetricObservation> {
        self.custom_metrics.iter().chain(self.usage_metrics.iter())
    }
}

/// Runs the three extraction passes over a batch.
///
/// `observed_at` stamps every metric observation, since metric lines carry no
/// observation time of their own.
#[must_use]
pub fn process_at(
    context: &Context,
    lines: &[RawLine],
    observed_at: DateTime<Utc>,
) -> BatchResult {
    let identity = context.identity();
    let mut result = BatchResult::default();

    for line in lines {
        match log_record::build(context, &identity, &line.text) {
            Ok(Some(record)) => result.logs.push(record),
            Ok(None) => {}
            Err(e) => result.rejected.push(rejection(context, Pass::Logs, line, e)),
        }
    }

    for line in lines {
        match custom_metric::build(&identity, &line.text, observed_at) {
            Ok(Some(metric)) => result.custom_metrics.push(metric),
            Ok(None) => {}
            Err(e) => result
                .rejected
                .push(rejection(context, Pass::CustomMetrics, line, e)),
        }
    }

    for line in lines {
        match usage_metric::build(&identity, &line.text, observed_at) {
            Ok(metrics) => result.usage_metrics.extend(metrics),
            Err(e) => result
                .rejected
                .push(rejection(context, Pass::UsageMetrics, line, e)),
        }
    }

    result
}

/// Runs [`process_at`] with the current time as the observation time.
#[must_use]
pub fn process(context: &Context, lines: &[RawLine]) -> BatchResult {
    process_at(context, lines, Utc::now())
}

fn rejection(context: &Context, pass: Pass, line: &RawLine, source: ParseError) -> LineError {
    debug!(
        "Skipping line from {} in {} pass: {}",
        context.stream_id, pass, source
    );
    LineError {
        group: context.group_id.clone(),
        stream: context.stream_id.clone(),
        pass,
        line: line.text.clone(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tracing_test::traced_test;

    const GROUP: &str = "/aws/lambda/service-env-funcName";
    const STREAM: &str = "2016/08/17/[76]afe5c000d5344c33b5d88be7a4c55816";

    fn lines(texts: &[&str]) -> Vec<RawLine> {
        texts
            .iter()
            .map(|text| RawLine::new("1483228800000", *text))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_process_invocation() {
        let batch = lines(&[
            "START RequestId: req-1 Version: 76\n",
            "2020-01-01T00:00:00.000Z\treq-1\t{\"level\":\"info\",\"message\":\"hi\",\"x\":1}",
            "2020-01-01T00:00:01.000Z\treq-1\tMONITORING|42|milliseconds|MyMetric|MyApp|Env=prod",
            "2020-01-01T00:00:02.000Z\treq-1\tplain text",
            "END RequestId: req-1\n",
            "REPORT RequestId: req-1\tDuration: 2.89 ms\tBilled Duration: 100 ms \tMemory Size: 1024 MB\tMax Memory Used: 20 MB\t\n",
        ]);
        let result = process_at(&Context::new(GROUP, STREAM), &batch, now());

        assert_eq!(result.logs.len(), 2);
        assert_eq!(result.logs[0].message, serde_json::json!("hi"));
        assert_eq!(result.logs[1].message, serde_json::json!("plain text"));
        assert_eq!(result.custom_metrics.len(), 1);
        assert_eq!(result.custom_metrics[0].name, "MyMetric");
        assert_eq!(result.usage_metrics.len(), 4);
        assert!(result.rejected.is_empty());
        assert_eq!(result.metrics().count(), 5);
    }

    #[test]
    #[traced_test]
    fn test_process_isolates_bad_lines() {
        let batch = lines(&[
            "2020-01-01T00:00:00.000Z\treq-1\tMONITORING|oops|count|Hits|MyApp",
            "2020-01-01T00:00:00.000Z\treq-1\tfirst",
            "REPORT RequestId: req-1\tDuration: 2.89 ms",
            "2020-01-01T00:00:00.000Z\treq-1\tMONITORING|2|count|Hits|MyApp",
            "2020-01-01T00:00:00.000Z\treq-1\tsecond",
        ]);
        let result = process_at(&Context::new(GROUP, STREAM), &batch, now());

        assert_eq!(result.logs.len(), 2);
        assert_eq!(result.custom_metrics.len(), 1);
        assert_eq!(result.custom_metrics[0].value, 2.0);
        assert!(result.usage_metrics.is_empty());

        let rejected: Vec<(Pass, &str)> = result
            .rejected
            .iter()
            .map(|e| (e.pass, e.line.as_str()))
            .collect();
        assert_eq!(
            rejected,
            vec![
                (Pass::CustomMetrics, batch[0].text.as_str()),
                (Pass::UsageMetrics, batch[2].text.as_str()),
            ]
        );
        assert_eq!(result.rejected[0].group, GROUP);
        assert_eq!(result.rejected[0].stream, STREAM);
        assert!(logs_contain("Skipping line"));
    }

    #[test]
    fn test_process_empty_batch() {
        let result = process(&Context::new(GROUP, STREAM), &[]);
        assert_eq!(result, BatchResult::default());
    }

    #[test]
    fn test_process_is_repeatable() {
        let batch = lines(&[
            "2020-01-01T00:00:00.000Z\treq-1\t{\"level\":\"info\",\"message\":\"hi\"}",
            "2020-01-01T00:00:01.000Z\treq-1\tMONITORING|1|count|Hits|MyApp",
            "2020-01-01T00:00:01.000Z\treq-1\tMONITORING|NaN|count|Hits|MyApp",
            "REPORT RequestId: req-1\tDuration: 2.89 ms\tBilled Duration: 100 ms \tMemory Size: 1024 MB\tMax Memory Used: 20 MB\t\n",
            "garbage",
        ]);
        let context = Context::new(GROUP, STREAM);
        let result = process_at(&context, &batch, now());
        assert_eq!(result.custom_metrics.len(), 1);
        assert!(result
            .rejected
            .iter()
            .any(|e| e.pass == Pass::CustomMetrics && e.line.contains("NaN")));
        assert_eq!(result, process_at(&context, &batch, now()));
    }
}
