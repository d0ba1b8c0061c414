// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery of structured log records to a log collector.
//!
//! Records are written as newline-delimited JSON over a TCP connection opened
//! for each batch:
//!
//! ```text
//! {"logGroup":"/aws/lambda/fn","logStream":"...","functionName":"fn",...,"token":"..."}\n
//! {"logGroup":"/aws/lambda/fn","logStream":"...","functionName":"fn",...,"token":"..."}\n
//! ```

use async_trait::async_trait;
use lambda_logs::LogRecord;
use serde::Serialize;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, error};

use crate::config::ShipperConfig;
use crate::error::ShipperError;

/// Destination for structured log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Sends a batch, returning how many records were written.
    async fn send(&self, logs: &[LogRecord]) -> Result<usize, ShipperError>;
}

/// A record as written on the wire, with the collector token attached.
#[derive(Serialize)]
struct ShippedRecord<'a> {
    #[serde(flatten)]
    record: &'a LogRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

/// Writes newline-delimited JSON records to a TCP log collector.
#[derive(Debug, Clone)]
pub struct TcpLogSink {
    address: String,
    token: Option<String>,
    timeout: Duration,
}

impl TcpLogSink {
    #[must_use]
    pub fn new(address: String, token: Option<String>, timeout: Duration) -> Self {
        Self {
            address,
            token,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &ShipperConfig) -> Self {
        Self::new(
            config.logstash_address(),
            config.token.clone(),
            config.timeout,
        )
    }

    /// Serializes a batch into the payload written to the socket.
    ///
    /// Records that fail to serialize are logged and left out.
    fn encode(&self, logs: &[LogRecord]) -> (Vec<u8>, usize) {
        let mut payload = Vec::new();
        let mut written = 0;
        for record in logs {
            let shipped = ShippedRecord {
                record,
                token: self.token.as_deref(),
            };
            match serde_json::to_writer(&mut payload, &shipped) {
                Ok(()) => {
                    payload.push(b'\n');
                    written += 1;
                }
                Err(e) => error!("Failed to serialize log record: {}", e),
            }
        }
        (payload, written)
    }
}

#[async_trait]
impl LogSink for TcpLogSink {
    async fn send(&self, logs: &[LogRecord]) -> Result<usize, ShipperError> {
        if logs.is_empty() {
            return Ok(0);
        }

        let (payload, written) = self.encode(logs);

        let connect = tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await;
        let mut stream = match connect {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ShipperError::Connect {
                    address: self.address.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(ShipperError::Connect {
                    address: self.address.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "connection timed out",
                    ),
                })
            }
        };

        let write = async {
            stream.write_all(&payload).await?;
            stream.shutdown().await
        };
        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::TimedOut, "write timed out")
            })??;

        debug!("Sent {} log records to {}", written, self.address);
        Ok(written)
    }
}
