// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Line classification.
//!
//! A Lambda log line looks like this:
//!
//! ```text
//! 2017-04-26T10:41:09.023Z\tdb95c6da-2a6c-11e7-9550-c91b65931beb\tloading index.html...\n
//! ```
//!
//! The platform also writes `START`, `END` and `REPORT` lines around every
//! invocation:
//!
//! ```text
//! START RequestId: 67c005bb-641f-11e6-b35d-6b6c651a2f01 Version: 31
//! END RequestId: 5e665f81-641f-11e6-ab0f-b1affae60d28
//! REPORT RequestId: 5e665f81-...\tDuration: 1095.52 ms\tBilled Duration: 1100 ms \tMemory Size: 128 MB\tMax Memory Used: 32 MB\t
//! ```
//!
//! Classification is an ordered list of prefix checks; the first match wins.
//! Usage reports are detected by a separate predicate because a `REPORT`
//! line is both a lifecycle marker and a usage report.

/// Prefixes of the lines the platform writes around every invocation.
pub const LIFECYCLE_PREFIXES: [&str; 3] = ["START RequestId", "END RequestId", "REPORT RequestId"];

/// Prefix of a usage report line.
pub const USAGE_REPORT_PREFIX: &str = "REPORT RequestId:";

/// Prefix of the event part of a custom metric line.
pub const CUSTOM_METRIC_PREFIX: &str = "MONITORING|";

/// Category of a line for the log and custom metric passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Invocation start/end/report marker.
    Lifecycle,
    /// `MONITORING|...` metric emitted by the application.
    CustomMetric,
    /// Anything else.
    Application,
}

/// The `[timestamp, request_id, event]` parts of an application line.
///
/// Any tabs after the second one stay inside `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParts<'a> {
    pub timestamp: &'a str,
    pub request_id: Option<&'a str>,
    pub event: Option<&'a str>,
}

impl<'a> LineParts<'a> {
    #[must_use]
    pub fn split(text: &'a str) -> Self {
        let mut parts = text.splitn(3, '\t');
        Self {
            timestamp: parts.next().unwrap_or_default(),
            request_id: parts.next(),
            event: parts.next(),
        }
    }

    /// Number of parts present, between 1 and 3.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + usize::from(self.request_id.is_some()) + usize::from(self.event.is_some())
    }
}

#[must_use]
pub fn is_lifecycle(text: &str) -> bool {
    LIFECYCLE_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

#[must_use]
pub fn is_usage_report(text: &str) -> bool {
    text.starts_with(USAGE_REPORT_PREFIX)
}

/// Classifies a line for the log and custom metric passes.
#[must_use]
pub fn classify(text: &str) -> LineKind {
    if is_lifecycle(text) {
        return LineKind::Lifecycle;
    }

    match LineParts::split(text).event {
        Some(event) if event.starts_with(CUSTOM_METRIC_PREFIX) => LineKind::CustomMetric,
        _ => LineKind::Application,
    }
}
