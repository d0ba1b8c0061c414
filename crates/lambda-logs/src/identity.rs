// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Function identity derived from the log group and log stream names.
//!
//! ```text
//! log group:  /aws/lambda/service-env-funcName        -> "service-env-funcName"
//! log stream: 2016/08/17/[76]afe5c000d5344c33b5d88be7 -> "76"
//! ```
//!
//! Both lookups are best effort: malformed names degrade to a substring and
//! are never reported as errors.

/// Returns the last `/`-separated segment of the log group, or the whole
/// string when it contains no `/`.
#[must_use]
pub fn function_name(group_id: &str) -> &str {
    group_id.rsplit('/').next().unwrap_or(group_id)
}

/// Returns the text between the first `[` and the first `]` of the log stream.
///
/// Empty when either bracket is missing or the closing bracket comes first.
#[must_use]
pub fn version(stream_id: &str) -> &str {
    match (stream_id.find('['), stream_id.find(']')) {
        (Some(start), Some(end)) if start < end => &stream_id[start + 1..end],
        _ => "",
    }
}

/// Function name and version shared by every output of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub function_name: String,
    pub version: String,
}

impl Identity {
    #[must_use]
    pub fn from_context(group_id: &str, stream_id: &str) -> Self {
        Self {
            function_name: function_name(group_id).to_string(),
            version: version(stream_id).to_string(),
        }
    }
}
