// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types for per-line parsing failures.

use std::fmt;

/// Reasons a single log line could not be turned into its typed output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected at least {expected} tab-separated parts, found {found}")]
    MissingParts { expected: usize, found: usize },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("custom metric is missing the {0} field")]
    MissingMetricField(&'static str),

    #[error("invalid metric value '{0}'")]
    InvalidMetricValue(String),

    #[error("no '{label}' value found in '{input}'")]
    MissingUsageValue { label: &'static str, input: String },
}

/// The extraction pass a line was rejected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Logs,
    CustomMetrics,
    UsageMetrics,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logs => write!(f, "logs"),
            Self::CustomMetrics => write!(f, "custom_metrics"),
            Self::UsageMetrics => write!(f, "usage_metrics"),
        }
    }
}

/// A rejected line along with enough context for the caller to log and drop it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{pass} pass rejected line from {group}/{stream}: {source} (line: {line:?})")]
pub struct LineError {
    pub group: String,
    pub stream: String,
    pub pass: Pass,
    pub line: String,
    #[source]
    pub source: ParseError,
}
