// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Decoded log subscription event.
//!
//! ```json
//! {
//!   "logGroup": "/aws/lambda/service-env-funcName",
//!   "logStream": "2016/08/17/[76]afe5c000d5344c33b5d88be7a4c55816",
//!   "logEvents": [
//!     {"id": "3319...", "timestamp": 1471442123000, "message": "START RequestId: ..."}
//!   ]
//! }
//! ```

use lambda_logs::{Context, RawLine};
use serde::Deserialize;

use crate::error::ShipperError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsEvent {
    pub log_group: String,
    pub log_stream: String,
    #[serde(default)]
    pub log_events: Vec<LogEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEvent {
    #[serde(default)]
    pub id: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub message: String,
}

impl LogsEvent {
    pub fn from_json(payload: &str) -> Result<Self, ShipperError> {
        serde_json::from_str(payload).map_err(|e| ShipperError::InvalidEvent(e.to_string()))
    }

    #[must_use]
    pub fn context(&self) -> Context {
        Context::new(self.log_group.as_str(), self.log_stream.as_str())
    }

    #[must_use]
    pub fn lines(&self) -> Vec<RawLine> {
        self.log_events
            .iter()
            .map(|event| RawLine::new(event.timestamp.to_string(), event.message.as_str()))
            .collect()
    }
}
