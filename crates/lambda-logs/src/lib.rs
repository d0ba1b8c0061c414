// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Parsing and classification of Lambda function log output.
//!
//! A batch of lines read from one log group/stream is turned into three
//! independent outputs:
//!
//! - **logs**: structured [`LogRecord`]s for application log lines
//! - **custom metrics**: [`MetricObservation`]s from `MONITORING|` lines
//! - **usage metrics**: duration, memory and cost observations from `REPORT` lines
//!
//! Everything here is synchronous and free of I/O. Shipping the outputs is
//! left to the caller.
//!
//! ```
//! use lambda_logs::{process, Context, RawLine};
//!
//! let context = Context::new("/aws/lambda/my-fn", "2020/01/01/[3]abcdef");
//! let lines = vec![RawLine::new(
//!     "1577836800000",
//!     "2020-01-01T00:00:00.000Z\treq-1\thello",
//! )];
//!
//! let result = process(&context, &lines);
//! assert_eq!(result.logs.len(), 1);
//! assert_eq!(result.logs[0].function_name, "my-fn");
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod classify;
pub mod custom_metric;
pub mod errors;
pub mod identity;
pub mod log_record;
pub mod metric;
pub mod processor;
pub mod usage_metric;

pub use errors::{LineError, ParseError, Pass};
pub use identity::Identity;
pub use log_record::LogRecord;
pub use metric::{Dimension, MetricObservation};
pub use processor::{process, process_at, BatchResult, Context, RawLine};
