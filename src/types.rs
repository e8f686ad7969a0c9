use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque symbol key identifying a feed, e.g. `UMICH/SOC1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of market data a record represents in the host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketDataType {
    /// Generic timestamped value
    Base,
    TradeBar,
    QuoteBar,
    Tick,
    Auxiliary,
}

/// Bar period of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Daily,
    Hourly,
    Minute,
}

impl Resolution {
    /// Length of one period
    pub fn period(&self) -> chrono::Duration {
        match self {
            Self::Daily => chrono::Duration::days(1),
            Self::Hourly => chrono::Duration::hours(1),
            Self::Minute => chrono::Duration::minutes(1),
        }
    }
}

/// Subscription handed to the parser by the host.
///
/// Only `symbol` is read while parsing; everything else passes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    pub symbol: Symbol,
    #[serde(default)]
    pub resolution: Resolution,
}

impl SubscriptionConfig {
    /// Create a daily subscription for a symbol
    pub fn daily<S: Into<Symbol>>(symbol: S) -> Self {
        Self {
            symbol: symbol.into(),
            resolution: Resolution::Daily,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

/// A dated value taken from one feed row.
///
/// Fields are private so a record cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    symbol: Symbol,
    time: NaiveDate,
    value: Decimal,
    data_type: MarketDataType,
}

impl Record {
    /// Create a base record
    pub fn new<S: Into<Symbol>>(symbol: S, time: NaiveDate, value: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            time,
            value,
            data_type: MarketDataType::Base,
        }
    }

    pub(crate) fn from_parts(
        symbol: Symbol,
        time: NaiveDate,
        value: Decimal,
        data_type: MarketDataType,
    ) -> Self {
        Self {
            symbol,
            time,
            value,
            data_type,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn time(&self) -> NaiveDate {
        self.time
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Same as `value`; the host exposes both names
    pub fn price(&self) -> Decimal {
        self.value
    }

    pub fn data_type(&self) -> MarketDataType {
        self.data_type
    }

    /// End of the daily bar this record covers
    pub fn end_time(&self) -> NaiveDate {
        crate::time::next_day(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_creation() {
        let record = Record::new("UMICH/SOC1", date(2021, 9, 30), dec!(72.8));
        assert_eq!(record.symbol().as_str(), "UMICH/SOC1");
        assert_eq!(record.time(), date(2021, 9, 30));
        assert_eq!(record.value(), dec!(72.8));
        assert_eq!(record.price(), record.value());
        assert_eq!(record.data_type(), MarketDataType::Base);
        assert_eq!(record.end_time(), date(2021, 10, 1));
    }

    #[test]
    fn test_record_equality_is_field_wise() {
        let a = Record::new("IBM", date(2021, 12, 2), dec!(999));
        let b = Record::new("IBM", date(2021, 12, 2), dec!(999));
        assert_eq!(a, b);

        let other_symbol = Record::new("SPY", date(2021, 12, 2), dec!(999));
        assert_ne!(a, other_symbol);

        let other_value = Record::new("IBM", date(2021, 12, 2), dec!(111));
        assert_ne!(a, other_value);
    }

    #[test]
    fn test_symbol_display_and_conversions() {
        let symbol: Symbol = "SPY".into();
        assert_eq!(symbol.to_string(), "SPY");
        assert_eq!(Symbol::from(String::from("SPY")), symbol);
    }

    #[test]
    fn test_subscription_defaults_to_daily() {
        let config = SubscriptionConfig::daily("IBM");
        assert_eq!(config.resolution, Resolution::Daily);
        assert_eq!(config.resolution.period(), chrono::Duration::days(1));

        let hourly = config.with_resolution(Resolution::Hourly);
        assert_eq!(hourly.resolution.period(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_subscription_serialization() {
        let config = SubscriptionConfig::daily("UMICH/SOC1");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"symbol":"UMICH/SOC1","resolution":"daily"}"#);
        let deserialized: SubscriptionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
