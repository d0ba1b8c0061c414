// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structured log records built from application log lines.
//!
//! The event part of a line is either free text or a JSON object. For JSON
//! objects, `level` and `message` are lifted to the top of the record and the
//! rest of the object (plus the request id) becomes `fields`:
//!
//! ```text
//! 2020-01-01T00:00:00.000Z\treq-1\t{"level":"INFO","message":"hi","x":1}
//!   -> level: "info", message: "hi", fields: {"x": 1, "requestId": "req-1"}
//!
//! 2020-01-01T00:00:00.000Z\treq-1\tplain text
//!   -> level: "debug", message: "plain text", fields: {}
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::classify::{classify, LineKind, LineParts};
use crate::errors::ParseError;
use crate::identity::Identity;
use crate::Context;

/// Value of the `type` field of every record.
pub const RECORD_TYPE: &str = "cloudwatch";

/// Level used when the line does not carry one.
pub const DEFAULT_LEVEL: &str = "debug";

const LEVEL_KEY: &str = "level";
const MESSAGE_KEY: &str = "message";
const REQUEST_ID_KEY: &str = "requestId";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    #[serde(rename = "logGroup")]
    pub group: String,
    #[serde(rename = "logStream")]
    pub stream: String,
    #[serde(rename = "functionName")]
    pub function_name: String,
    #[serde(rename = "lambdaVersion")]
    pub version: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub level: String,
    /// Free text, or whatever the JSON payload carried under `message`
    /// (omitted when it had none).
    #[serde(skip_serializing_if = "Value::is_null")]
    pub message: Value,
    pub fields: Map<String, Value>,
}

/// Builds a record from one line.
///
/// Returns `Ok(None)` for lifecycle and custom metric lines.
pub fn build(
    context: &Context,
    identity: &Identity,
    text: &str,
) -> Result<Option<LogRecord>, ParseError> {
    if classify(text) != LineKind::Application {
        return Ok(None);
    }

    let parts = LineParts::split(text);
    let (Some(request_id), Some(event)) = (parts.request_id, parts.event) else {
        return Err(ParseError::MissingParts {
            expected: 3,
            found: parts.count(),
        });
    };
    let timestamp = parse_timestamp(parts.timestamp)?;

    let (level, message, fields) = match serde_json::from_str::<Value>(event) {
        Ok(Value::Object(payload)) => {
            let mut fields = Map::new();
            let mut level = None;
            let mut message = Value::Null;
            for (key, value) in payload {
                match key.as_str() {
                    LEVEL_KEY => level = Some(value),
                    MESSAGE_KEY => message = value,
                    _ => {
                        fields.insert(key, value);
                    }
                }
            }
            fields.insert(
                REQUEST_ID_KEY.to_string(),
                Value::String(request_id.to_string()),
            );
            (normalize_level(level), message, fields)
        }
        // Scalars and arrays are treated like free text
        _ => (
            DEFAULT_LEVEL.to_string(),
            Value::String(event.to_string()),
            Map::new(),
        ),
    };

    Ok(Some(LogRecord {
        group: context.group_id.clone(),
        stream: context.stream_id.clone(),
        function_name: identity.function_name.clone(),
        version: identity.version.clone(),
        timestamp,
        record_type: RECORD_TYPE,
        level,
        message,
        fields,
    }))
}

/// Lowercases a payload level, falling back to [`DEFAULT_LEVEL`] when it is
/// missing, null, empty, zero or `false`.
fn normalize_level(level: Option<Value>) -> String {
    match level {
        Some(Value::String(level)) if !level.is_empty() => level.to_lowercase(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => DEFAULT_LEVEL.to_string(),
        Some(Value::String(_) | Value::Null | Value::Bool(false)) | None => {
            DEFAULT_LEVEL.to_string()
        }
        Some(other) => other.to_string().to_lowercase(),
    }
}

/// Parses the leading timestamp of a line (RFC 3339, e.g. `2017-04-26T10:41:09.023Z`).
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ParseError::InvalidTimestamp(timestamp.to_string()))
}
