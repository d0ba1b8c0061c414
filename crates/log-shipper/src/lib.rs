// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shipping of parsed Lambda log batches.
//!
//! [`lambda_logs`] turns a subscription event into logs, custom metrics and
//! usage metrics. This crate delivers them:
//!
//! - **[`logs_sink`]**: newline-delimited JSON over TCP to a log collector
//! - **[`metrics_sink`]**: namespace-grouped metric publishing over HTTP
//! - **[`shipper`]**: routes one event's outputs to the sinks
//! - **[`config`]**: sink configuration read once from the environment
//! - **[`event`]**: the decoded subscription event
//! - **[`logger`]**: the shipper's own log format

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod error;
pub mod event;
pub mod logger;
pub mod logs_sink;
pub mod metrics_sink;
pub mod shipper;

pub use config::ShipperConfig;
pub use error::ShipperError;
pub use event::LogsEvent;
pub use shipper::{ShipReport, Shipper};
