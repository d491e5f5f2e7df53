//! Unit conversions and per-column presentation rules.
//!
//! A [`ColumnPolicy`] decides, for a column name, which [`UnitConversion`] is
//! applied to the resampled means and which y-axis label is used. The default
//! policy knows one column: `forwarding_latencies`, logged as Go
//! `time.Duration` nanoseconds and plotted in milliseconds.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::render::RenderOptions;

/// Column logged by the replica monitor as mean forwarding latency in nanoseconds.
pub const FORWARDING_LATENCIES: &str = "forwarding_latencies";

/// Y-axis label used for [`FORWARDING_LATENCIES`].
pub const FORWARD_LATENCY_LABEL: &str = "Forward Latency (ms)";

/// A linear rescaling of plotted values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum UnitConversion {
    /// Values are plotted as logged
    #[default]
    Identity,
    /// Nanoseconds to milliseconds (÷ 1e6)
    NanosToMillis,
    /// Nanoseconds to microseconds (÷ 1e3)
    NanosToMicros,
    /// Microseconds to milliseconds (÷ 1e3)
    MicrosToMillis,
    /// Seconds to milliseconds (× 1e3)
    SecondsToMillis,
    /// Arbitrary multiplier
    Scale(f64),
}

impl UnitConversion {
    /// Exact scale as `(multiplier, divisor)`
    pub fn ratio(&self) -> (f64, f64) {
        match self {
            UnitConversion::Identity => (1.0, 1.0),
            UnitConversion::NanosToMillis => (1.0, 1e6),
            UnitConversion::NanosToMicros => (1.0, 1e3),
            UnitConversion::MicrosToMillis => (1.0, 1e3),
            UnitConversion::SecondsToMillis => (1e3, 1.0),
            UnitConversion::Scale(factor) => (*factor, 1.0),
        }
    }

    /// Scale as a single multiplier.
    ///
    /// Rounded for the divisor forms; [`apply`](Self::apply) uses the exact
    /// [`ratio`](Self::ratio).
    pub fn factor(&self) -> f64 {
        let (multiplier, divisor) = self.ratio();
        multiplier / divisor
    }

    /// Convert one value: `value * multiplier / divisor`
    pub fn apply(&self, value: f64) -> f64 {
        let (multiplier, divisor) = self.ratio();
        value * multiplier / divisor
    }

    /// Returns all named conversions.
    pub fn variants() -> &'static [&'static str] {
        &["none", "ns-to-ms", "ns-to-us", "us-to-ms", "s-to-ms"]
    }
}

impl fmt::Display for UnitConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitConversion::Identity => write!(f, "none"),
            UnitConversion::NanosToMillis => write!(f, "ns-to-ms"),
            UnitConversion::NanosToMicros => write!(f, "ns-to-us"),
            UnitConversion::MicrosToMillis => write!(f, "us-to-ms"),
            UnitConversion::SecondsToMillis => write!(f, "s-to-ms"),
            UnitConversion::Scale(factor) => write!(f, "x{}", factor),
        }
    }
}

impl FromStr for UnitConversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "identity" => Ok(UnitConversion::Identity),
            "ns-to-ms" => Ok(UnitConversion::NanosToMillis),
            "ns-to-us" => Ok(UnitConversion::NanosToMicros),
            "us-to-ms" => Ok(UnitConversion::MicrosToMillis),
            "s-to-ms" => Ok(UnitConversion::SecondsToMillis),
            other => match other.strip_prefix('x').map(str::parse::<f64>) {
                Some(Ok(factor)) if factor.is_finite() => Ok(UnitConversion::Scale(factor)),
                _ => Err(format!(
                    "unknown unit conversion '{}' (expected one of: {}, or x<factor>)",
                    s,
                    Self::variants().join(", ")
                )),
            },
        }
    }
}

/// How one column is presented.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnRule {
    pub unit: UnitConversion,
    /// Replaces the column name on the y axis
    pub y_label: Option<String>,
}

/// Maps column names to presentation rules.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPolicy {
    rules: HashMap<String, ColumnRule>,
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        let mut policy = Self::empty();
        policy.insert(
            FORWARDING_LATENCIES,
            ColumnRule {
                unit: UnitConversion::NanosToMillis,
                y_label: Some(FORWARD_LATENCY_LABEL.to_string()),
            },
        );
        policy
    }
}

impl ColumnPolicy {
    /// Policy without any rules: every column is plotted as logged
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for `column`
    pub fn insert(&mut self, column: &str, rule: ColumnRule) {
        self.rules.insert(column.trim().to_string(), rule);
    }

    /// Rule for `column`, if any
    pub fn rule(&self, column: &str) -> Option<&ColumnRule> {
        self.rules.get(column.trim())
    }

    /// Conversion applied to `column`
    pub fn unit_for(&self, column: &str) -> UnitConversion {
        self.rule(column).map(|r| r.unit).unwrap_or_default()
    }

    /// Y-axis label for `column`
    pub fn y_label_for(&self, column: &str) -> String {
        self.rule(column)
            .and_then(|r| r.y_label.clone())
            .unwrap_or_else(|| column.trim().to_string())
    }

    /// Render options for plotting `column` into `output`
    pub fn render_options(&self, column: &str, output: impl Into<PathBuf>) -> RenderOptions {
        RenderOptions::new(output)
            .unit(self.unit_for(column))
            .y_label(self.y_label_for(column))
            .title(default_title(column))
    }
}

/// Chart title for `column`
pub fn default_title(column: &str) -> String {
    format!("Average {} over time", column.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanos_to_millis() {
        let unit = UnitConversion::NanosToMillis;
        assert_eq!(unit.apply(6_000_000.0), 6.0);
        assert_eq!(unit.apply(3_000_000.0), 3.0);
        assert_eq!(unit.ratio(), (1.0, 1e6));
    }

    #[test]
    fn test_apply_follows_ratio_exactly() {
        let units = [
            UnitConversion::Identity,
            UnitConversion::NanosToMillis,
            UnitConversion::NanosToMicros,
            UnitConversion::MicrosToMillis,
            UnitConversion::SecondsToMillis,
            UnitConversion::Scale(0.37),
        ];
        for unit in units {
            let (multiplier, divisor) = unit.ratio();
            for i in 0..10_000u32 {
                let value = f64::from(i) * 1234.567 + 0.001;
                assert_eq!(unit.apply(value), value * multiplier / divisor);
            }
        }
        assert_eq!(UnitConversion::SecondsToMillis.factor(), 1e3);
    }

    #[test]
    fn test_identity() {
        assert_eq!(UnitConversion::Identity.apply(42.5), 42.5);
        assert_eq!(UnitConversion::default(), UnitConversion::Identity);
    }

    #[test]
    fn test_parse_units() {
        for name in UnitConversion::variants() {
            let unit: UnitConversion = name.parse().unwrap();
            assert_eq!(unit.to_string(), *name);
        }
        assert_eq!(
            "x0.5".parse::<UnitConversion>().unwrap(),
            UnitConversion::Scale(0.5)
        );
        assert!("furlongs".parse::<UnitConversion>().is_err());
        assert!("xabc".parse::<UnitConversion>().is_err());
    }

    #[test]
    fn test_default_policy_latency_column() {
        let policy = ColumnPolicy::default();
        assert_eq!(
            policy.unit_for("forwarding_latencies"),
            UnitConversion::NanosToMillis
        );
        assert_eq!(policy.y_label_for("forwarding_latencies"), "Forward Latency (ms)");
    }

    #[test]
    fn test_default_policy_other_columns() {
        let policy = ColumnPolicy::default();
        assert_eq!(policy.unit_for("channel_size"), UnitConversion::Identity);
        assert_eq!(policy.y_label_for("channel_size"), "channel_size");
    }

    #[test]
    fn test_render_options_from_policy() {
        let options = ColumnPolicy::default().render_options("forwarding_latencies", "out.svg");
        assert_eq!(options.unit, UnitConversion::NanosToMillis);
        assert_eq!(options.y_label, "Forward Latency (ms)");
        assert_eq!(options.title, "Average forwarding_latencies over time");
        assert_eq!(options.output, PathBuf::from("out.svg"));
    }

    #[test]
    fn test_custom_rule() {
        let mut policy = ColumnPolicy::empty();
        policy.insert(
            "rtt",
            ColumnRule {
                unit: UnitConversion::MicrosToMillis,
                y_label: None,
            },
        );
        assert_eq!(policy.unit_for("rtt"), UnitConversion::MicrosToMillis);
        assert_eq!(policy.y_label_for("rtt"), "rtt");
        assert_eq!(policy.unit_for("forwarding_latencies"), UnitConversion::Identity);
    }
}
