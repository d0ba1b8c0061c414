// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Metric observation type shared by custom and usage metrics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::Identity;

/// Reserved dimension carrying the function name.
pub const FUNCTION_DIMENSION: &str = "Function";
/// Reserved dimension carrying the function version.
pub const VERSION_DIMENSION: &str = "Version";

/// A named tag attached to a metric observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this dimension uses one of the names reserved for the function identity.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.name == FUNCTION_DIMENSION || self.name == VERSION_DIMENSION
    }
}

/// The `[Function, Version]` dimensions every observation starts with.
#[must_use]
pub fn identity_dimensions(identity: &Identity) -> Vec<Dimension> {
    vec![
        Dimension::new(FUNCTION_DIMENSION, identity.function_name.as_str()),
        Dimension::new(VERSION_DIMENSION, identity.version.as_str()),
    ]
}

/// One metric data point, serialized with the field names metric APIs expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricObservation {
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "MetricName")]
    pub name: String,
    #[serde(rename = "Dimensions")]
    pub dimensions: Vec<Dimension>,
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl MetricObservation {
    /// Builds an observation, normalizing `unit` with [`capitalize_unit`].
    #[must_use]
    pub fn new(
        value: f64,
        unit: &str,
        name: impl Into<String>,
        dimensions: Vec<Dimension>,
        namespace: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            unit: capitalize_unit(unit),
            name: name.into(),
            dimensions,
            namespace: namespace.into(),
            timestamp,
        }
    }
}

/// Uppercases the first character of a unit: `milliseconds` -> `Milliseconds`.
///
/// Compound units such as `bits/second` are not fixed up (`Bits/second`).
#[must_use]
pub fn capitalize_unit(unit: &str) -> String {
    let mut chars = unit.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
