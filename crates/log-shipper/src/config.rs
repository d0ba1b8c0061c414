// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ShipperError;
use std::env;
use std::time::Duration;

const DEFAULT_LOGSTASH_PORT: u16 = 5050;
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the log and metric sinks
#[derive(Debug, Clone)]
pub struct ShipperConfig {
    /// Host of the log collector accepting newline-delimited JSON over TCP
    pub logstash_host: String,
    /// Port of the log collector
    pub logstash_port: u16,
    /// Token added to every shipped log record
    pub token: Option<String>,
    /// Endpoint metric batches are POSTed to. Metrics are dropped when unset.
    pub metrics_endpoint: Option<String>,
    /// Whether usage metrics from REPORT lines are published alongside custom metrics
    pub publish_usage_metrics: bool,
    /// Timeout for connecting and sending to either sink
    pub timeout: Duration,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            logstash_host: "localhost".to_string(),
            logstash_port: DEFAULT_LOGSTASH_PORT,
            token: None,
            metrics_endpoint: None,
            publish_usage_metrics: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: "info".to_string(),
        }
    }
}

impl ShipperConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ShipperError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShipperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let logstash_host = lookup("logstash_host").unwrap_or(defaults.logstash_host);
        let logstash_port = match lookup("logstash_port") {
            Some(port) => port.trim().parse::<u16>().map_err(|_| {
                ShipperError::InvalidConfig(format!("Invalid logstash_port '{port}'"))
            })?,
            None => defaults.logstash_port,
        };
        let token = lookup("token").filter(|token| !token.is_empty());
        let metrics_endpoint =
            lookup("SHIPPER_METRICS_ENDPOINT").filter(|endpoint| !endpoint.trim().is_empty());
        let publish_usage_metrics = lookup("SHIPPER_PUBLISH_USAGE_METRICS")
            .map(|val| val.to_lowercase() != "false")
            .unwrap_or(defaults.publish_usage_metrics);
        let timeout = lookup("SHIPPER_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let log_level = lookup("SHIPPER_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level);

        let config = Self {
            logstash_host,
            logstash_port,
            token,
            metrics_endpoint,
            publish_usage_metrics,
            timeout,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ShipperError> {
        if self.logstash_host.trim().is_empty() {
            return Err(ShipperError::InvalidConfig(
                "logstash_host cannot be empty".to_string(),
            ));
        }

        if self.logstash_port == 0 {
            return Err(ShipperError::InvalidConfig(
                "logstash_port must be greater than 0".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ShipperError::InvalidConfig(
                "SHIPPER_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ShipperError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Address of the log collector, as `host:port`
    #[must_use]
    pub fn logstash_address(&self) -> String {
        format!("{}:{}", self.logstash_host, self.logstash_port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ShipperConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ShipperConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.logstash_address(), "localhost:5050");
        assert_eq!(config.token, None);
        assert_eq!(config.metrics_endpoint, None);
        assert!(config.publish_usage_metrics);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ShipperConfig::from_lookup(lookup_from(&[
            ("logstash_host", "listener.logz.io"),
            ("logstash_port", "5050"),
            ("token", "secret"),
            ("SHIPPER_METRICS_ENDPOINT", "http://127.0.0.1:9000/metrics"),
            ("SHIPPER_PUBLISH_USAGE_METRICS", "FALSE"),
            ("SHIPPER_TIMEOUT_SECS", "2"),
            ("SHIPPER_LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();

        assert_eq!(config.logstash_address(), "listener.logz.io:5050");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(
            config.metrics_endpoint.as_deref(),
            Some("http://127.0.0.1:9000/metrics")
        );
        assert!(!config.publish_usage_metrics);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let result = ShipperConfig::from_lookup(lookup_from(&[("logstash_port", "not-a-port")]));
        assert!(matches!(result, Err(ShipperError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ShipperConfig {
            logstash_port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_host() {
        let config = ShipperConfig {
            logstash_host: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = ShipperConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ShipperConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
