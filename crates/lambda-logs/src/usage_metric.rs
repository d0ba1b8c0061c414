// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Usage metrics derived from the platform `REPORT` line.
//!
//! ```text
//! REPORT RequestId: 3897a7c2-8ac6-11e7-8e57-bb793172ae75\tDuration: 2.89 ms\tBilled Duration: 100 ms \tMemory Size: 1024 MB\tMax Memory Used: 20 MB\t\n
//! ```
//!
//! Every report yields `BilledDuration`, `MemorySize`, `MemoryUsed` and
//! `CostInDollars` under the `AWS/Lambda` namespace.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::classify::is_usage_report;
use crate::errors::ParseError;
use crate::identity::Identity;
use crate::metric::{identity_dimensions, MetricObservation};

/// Price of one GB-second of execution, in dollars.
pub const PRICE_PER_GB_SECOND: f64 = 0.000_016_67;

/// Namespace of every usage observation.
pub const USAGE_NAMESPACE: &str = "AWS/Lambda";

const REPORT_PARTS: usize = 5;
const COST_DECIMALS: i32 = 9;

const BILLED_DURATION_LABEL: &str = "Billed Duration";
const MEMORY_SIZE_LABEL: &str = "Memory Size";
const MAX_MEMORY_USED_LABEL: &str = "Max Memory Used";

struct UsagePatterns {
    billed_duration: Regex,
    memory_size: Regex,
    max_memory_used: Regex,
}

#[allow(clippy::expect_used)]
fn patterns() -> &'static UsagePatterns {
    static PATTERNS: OnceLock<UsagePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| UsagePatterns {
        billed_duration: Regex::new(r"(?i)Billed Duration:\s*([0-9]+(?:\.[0-9]+)?)\s*ms")
            .expect("valid billed duration pattern"),
        memory_size: Regex::new(r"(?i)Memory Size:\s*([0-9]+(?:\.[0-9]+)?)\s*MB")
            .expect("valid memory size pattern"),
        max_memory_used: Regex::new(r"(?i)Max Memory Used:\s*([0-9]+(?:\.[0-9]+)?)\s*MB")
            .expect("valid max memory used pattern"),
    })
}

/// Dollar cost of one invocation, rounded to 9 decimal places.
#[must_use]
pub fn invocation_cost(memory_size_mb: f64, billed_duration_ms: f64) -> f64 {
    let raw = PRICE_PER_GB_SECOND * (memory_size_mb / 1024.0) * (billed_duration_ms / 1000.0);
    round_to(raw, COST_DECIMALS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn extract(pattern: &Regex, label: &'static str, input: &str) -> Result<f64, ParseError> {
    pattern
        .captures(input)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse::<f64>().ok())
        .ok_or_else(|| ParseError::MissingUsageValue {
            label,
            input: input.to_string(),
        })
}

/// Builds the four usage observations of a report line.
///
/// Any other line yields an empty list.
pub fn build(
    identity: &Identity,
    text: &str,
    observed_at: DateTime<Utc>,
) -> Result<Vec<MetricObservation>, ParseError> {
    if !is_usage_report(text) {
        return Ok(Vec::new());
    }

    let parts: Vec<&str> = text.splitn(REPORT_PARTS, '\t').collect();
    if parts.len() < REPORT_PARTS {
        return Err(ParseError::MissingParts {
            expected: REPORT_PARTS,
            found: parts.len(),
        });
    }

    let patterns = patterns();
    let billed_duration = extract(&patterns.billed_duration, BILLED_DURATION_LABEL, parts[2])?;
    let memory_size = extract(&patterns.memory_size, MEMORY_SIZE_LABEL, parts[3])?;
    let memory_used = extract(&patterns.max_memory_used, MAX_MEMORY_USED_LABEL, parts[4])?;
    let cost = invocation_cost(memory_size, billed_duration);

    let dimensions = identity_dimensions(identity);
    let observation = |value: f64, unit: &str, name: &str| {
        MetricObservation::new(
            value,
            unit,
            name,
            dimensions.clone(),
            USAGE_NAMESPACE,
            observed_at,
        )
    };

    Ok(vec![
        observation(billed_duration, "milliseconds", "BilledDuration"),
        observation(memory_size, "megabytes", "MemorySize"),
        observation(memory_used, "megabytes", "MemoryUsed"),
        // Existing series use the megabytes unit
        observation(cost, "megabytes", "CostInDollars"),
    ])
}
