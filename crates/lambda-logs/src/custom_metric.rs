// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Custom metrics emitted by the function code.
//!
//! The event part of the line carries the metric:
//!
//! ```text
//! MONITORING|metric_value|metric_unit|metric_name|namespace|dimension1=value1, dimension2=value2, ...
//! ```
//!
//! The dimension list is optional. `Function` and `Version` are always the
//! first two dimensions and cannot be overridden from the line.

use chrono::{DateTime, Utc};

use crate::classify::{classify, LineKind, LineParts};
use crate::errors::ParseError;
use crate::identity::Identity;
use crate::metric::{identity_dimensions, Dimension, MetricObservation};

/// Builds an observation from one line, stamped with `observed_at`.
///
/// Returns `Ok(None)` for lines that are not custom metric lines.
pub fn build(
    identity: &Identity,
    text: &str,
    observed_at: DateTime<Utc>,
) -> Result<Option<MetricObservation>, ParseError> {
    if classify(text) != LineKind::CustomMetric {
        return Ok(None);
    }
    let Some(event) = LineParts::split(text).event else {
        return Ok(None);
    };

    let mut fields = event.split('|').skip(1);
    let raw_value = fields
        .next()
        .ok_or(ParseError::MissingMetricField("value"))?;
    let unit = fields
        .next()
        .ok_or(ParseError::MissingMetricField("unit"))?
        .trim();
    let name = fields
        .next()
        .ok_or(ParseError::MissingMetricField("name"))?
        .trim();
    let namespace = fields
        .next()
        .ok_or(ParseError::MissingMetricField("namespace"))?
        .trim();

    let value = raw_value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidMetricValue(raw_value.to_string()))?;

    let mut dimensions = identity_dimensions(identity);
    if let Some(list) = fields.next() {
        dimensions.extend(parse_dimensions(list));
    }

    Ok(Some(MetricObservation::new(
        value,
        unit,
        name,
        dimensions,
        namespace,
        observed_at,
    )))
}

/// Parses a `key=value, key=value` list.
///
/// Pairs without exactly one `=` and pairs using a reserved name are dropped.
/// A repeated name keeps its first value. The rest keep their input order.
#[must_use]
pub fn parse_dimensions(list: &str) -> Vec<Dimension> {
    let mut dimensions: Vec<Dimension> = Vec::new();
    for pair in list.trim().split(',') {
        let mut kv = pair.trim().split('=');
        let (Some(name), Some(value), None) = (kv.next(), kv.next(), kv.next()) else {
            continue;
        };
        let dimension = Dimension::new(name, value);
        if dimension.is_reserved() || dimensions.iter().any(|d| d.name == dimension.name) {
            continue;
        }
        dimensions.push(dimension);
    }
    dimensions
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn identity() -> Identity {
        Identity {
            function_name: "my-fn".to_string(),
            version: "7".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_with_dimensions() {
        let metric = build(
            &identity(),
            "2020-01-01T00:00:00.000Z\treq-1\tMONITORING|42|milliseconds|MyMetric|MyApp|Env=prod",
            now(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(metric.value, 42.0);
        assert_eq!(metric.unit, "Milliseconds");
        assert_eq!(metric.name, "MyMetric");
        assert_eq!(metric.namespace, "MyApp");
        assert_eq!(metric.timestamp, now());
        assert_eq!(
            metric.dimensions,
            vec![
                Dimension::new("Function", "my-fn"),
                Dimension::new("Version", "7"),
                Dimension::new("Env", "prod"),
            ]
        );
    }

    #[test]
    fn test_build_without_dimensions() {
        let metric = build(
            &identity(),
            "2020-01-01T00:00:00.000Z\treq-1\tMONITORING| 1.5 | count | Hits | MyApp ",
            now(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(metric.value, 1.5);
        assert_eq!(metric.unit, "Count");
        assert_eq!(metric.name, "Hits");
        assert_eq!(metric.namespace, "MyApp");
        assert_eq!(metric.dimensions.len(), 2);
    }

    #[test]
    fn test_build_ignores_other_lines() {
        for line in [
            "2020-01-01T00:00:00.000Z\treq-1\tplain text",
            "START RequestId: 67c005bb Version: 31",
            "REPORT RequestId: x\tDuration: 2.89 ms\tBilled Duration: 100 ms \tMemory Size: 1024 MB\tMax Memory Used: 20 MB\t\n",
        ] {
            assert_eq!(build(&identity(), line, now()).unwrap(), None, "{line}");
        }
    }

    #[test]
    fn test_build_missing_fields() {
        assert_eq!(
            build(&identity(), "ts\treq\tMONITORING|42|count|Hits", now()),
            Err(ParseError::MissingMetricField("namespace"))
        );
        assert_eq!(
            build(&identity(), "ts\treq\tMONITORING|", now()),
            Err(ParseError::MissingMetricField("unit"))
        );
    }

    #[test]
    fn test_build_invalid_value() {
        assert_eq!(
            build(&identity(), "ts\treq\tMONITORING|lots|count|Hits|MyApp", now()),
            Err(ParseError::InvalidMetricValue("lots".to_string()))
        );
    }

    #[test]
    fn test_build_rejects_non_finite_values() {
        for value in ["NaN", "inf", "-infinity", " Infinity "] {
            let line = format!("ts\treq\tMONITORING|{value}|count|Hits|MyApp");
            assert_eq!(
                build(&identity(), &line, now()),
                Err(ParseError::InvalidMetricValue(value.to_string())),
                "{value}"
            );
        }
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(
            parse_dimensions(" Env=prod, Region=us-west-2 ,bad, a=b=c, =empty-name"),
            vec![
                Dimension::new("Env", "prod"),
                Dimension::new("Region", "us-west-2"),
                Dimension::new("", "empty-name"),
            ]
        );
        assert!(parse_dimensions("").is_empty());
    }

    #[test]
    fn test_parse_dimensions_keeps_first_of_repeated_names() {
        assert_eq!(
            parse_dimensions("Env=a,Region=eu,Env=b"),
            vec![Dimension::new("Env", "a"), Dimension::new("Region", "eu")]
        );
    }

    #[test]
    fn test_parse_dimensions_drops_reserved_names() {
        assert_eq!(
            parse_dimensions("Function=evil,Env=prod,Version=99"),
            vec![Dimension::new("Env", "prod")]
        );
    }

    proptest! {
        #[test]
        fn prop_reserved_dimensions_never_overridden(
            pairs in proptest::collection::vec(
                (prop_oneof![Just("Function".to_string()), Just("Version".to_string()), "[A-Za-z]{1,8}"], "[a-z0-9]{0,8}"),
                0..8,
            )
        ) {
            let list = pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            let line = format!("ts\treq\tMONITORING|1|count|Hits|MyApp|{list}");
            let metric = build(&identity(), &line, now()).unwrap().unwrap();

            prop_assert_eq!(&metric.dimensions[0], &Dimension::new("Function", "my-fn"));
            prop_assert_eq!(&metric.dimensions[1], &Dimension::new("Version", "7"));
            prop_assert!(metric.dimensions[2..].iter().all(|d| !d.is_reserved()));
            let mut names: Vec<&str> = metric.dimensions.iter().map(|d| d.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(names.len(), metric.dimensions.len());
        }
    }
}
