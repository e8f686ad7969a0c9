use crate::error::{FeedError, FeedResult};
use crate::time;
use crate::types::{Record, SubscriptionConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, trace_span, warn};

/// Header column that holds the value when no other column is configured
pub const DEFAULT_VALUE_COLUMN: &str = "close";

/// Position of the close column in the vendor's standard layout
/// (`date,open,high,low,close,...`)
pub const DEFAULT_VALUE_INDEX: usize = 4;

/// Vendor publishing the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Nasdaq Data Link
    #[default]
    NasdaqDataLink,
    /// Quandl, the former name of Nasdaq Data Link. Same file layout.
    Quandl,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NasdaqDataLink => "nasdaq-data-link",
            Self::Quandl => "quandl",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nasdaq-data-link" | "nasdaqdatalink" | "nasdaq_data_link" => Ok(Self::NasdaqDataLink),
            "quandl" => Ok(Self::Quandl),
            other => Err(FeedError::configuration(
                "provider",
                format!("unknown provider '{}'", other),
            )),
        }
    }
}

/// Which header column supplies a record's value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnMapping {
    /// The `close` column
    #[default]
    Default,
    /// An explicitly named column, e.g. `adj. close`
    Named(String),
}

impl ColumnMapping {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::Named(name.into())
    }

    /// Column name as configured
    pub fn column_name(&self) -> &str {
        match self {
            Self::Default => DEFAULT_VALUE_COLUMN,
            Self::Named(name) => name,
        }
    }
}

/// What to do when a named value column is missing from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingColumnPolicy {
    /// Reject the feed with a configuration error
    #[default]
    Fail,
    /// Read the value from `DEFAULT_VALUE_INDEX`, as legacy feeds did
    FallbackToDefault,
}

/// Outcome of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// The line was a header; no record produced
    Header,
    Data(Record),
}

impl ParsedLine {
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header)
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Header => None,
            Self::Data(record) => Some(record),
        }
    }
}

/// Turns feed lines into records for a single symbol.
///
/// The first line seen is taken as the header and fixes the value column
/// for the lifetime of the parser. Use one parser per symbol.
#[derive(Debug, Clone, Default)]
pub struct RowParser {
    provider: Provider,
    mapping: ColumnMapping,
    missing_column: MissingColumnPolicy,
    header: Option<Vec<String>>,
    value_index: Option<usize>,
}

impl RowParser {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            ..Self::default()
        }
    }

    /// Parser reading its value from the named column
    pub fn with_column<S: Into<String>>(column: S) -> Self {
        Self::new(ColumnMapping::named(column))
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_missing_column_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_column = policy;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Normalized header columns, once a header has been read
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Resolved position of the value column
    pub fn value_index(&self) -> Option<usize> {
        self.value_index
    }

    /// Parse one feed line.
    ///
    /// `current_date` and `is_live` describe the host's clock and mode; they
    /// are recorded for tracing and do not influence the result.
    pub fn parse(
        &mut self,
        config: &SubscriptionConfig,
        line: &str,
        current_date: NaiveDate,
        is_live: bool,
    ) -> FeedResult<ParsedLine> {
        let span = trace_span!(
            "parse_line",
            symbol = %config.symbol,
            provider = self.provider.name(),
            %current_date,
            is_live
        );
        let _enter = span.enter();

        if line.trim().is_empty() {
            return Err(FeedError::parse("line", line, "empty line"));
        }

        let fields = split_fields(line)?;

        if self.header.is_none() {
            self.read_header(&fields)?;
            return Ok(ParsedLine::Header);
        }

        let raw_date = fields.get(0).unwrap_or_default();
        let time = match time::parse_date(raw_date) {
            Some(time) => time,
            None if self.is_repeated_header(raw_date) => {
                debug!(symbol = %config.symbol, "Skipping repeated header line");
                return Ok(ParsedLine::Header);
            }
            None => {
                return Err(FeedError::parse(
                    "date",
                    raw_date,
                    "expected a YYYY-MM-DD date",
                ))
            }
        };

        let column = self.mapping.column_name();
        let index = self
            .value_index
            .ok_or_else(|| FeedError::configuration(column, "column not found in header"))?;

        let raw_value = fields.get(index).ok_or_else(|| {
            FeedError::parse(
                column,
                line.trim(),
                format!(
                    "row has {} fields, value column is at index {}",
                    fields.len(),
                    index
                ),
            )
        })?;
        let value = parse_decimal(raw_value)
            .ok_or_else(|| FeedError::parse(column, raw_value, "not a decimal number"))?;

        trace!(%time, %value, "Parsed row");
        Ok(ParsedLine::Data(Record::new(config.symbol.clone(), time, value)))
    }

    fn read_header(&mut self, fields: &csv::StringRecord) -> FeedResult<()> {
        let columns: Vec<String> = fields.iter().map(normalize).collect();
        let wanted = normalize(self.mapping.column_name());
        let found = columns.iter().position(|c| *c == wanted);

        self.value_index = match (found, &self.mapping, self.missing_column) {
            (Some(index), _, _) => Some(index),
            (None, ColumnMapping::Default, _) => {
                debug!(
                    index = DEFAULT_VALUE_INDEX,
                    "No close column in header, using conventional position"
                );
                Some(DEFAULT_VALUE_INDEX)
            }
            (None, ColumnMapping::Named(name), MissingColumnPolicy::FallbackToDefault) => {
                warn!(
                    column = name.as_str(),
                    index = DEFAULT_VALUE_INDEX,
                    "Configured column not in header, falling back to close position"
                );
                Some(DEFAULT_VALUE_INDEX)
            }
            (None, ColumnMapping::Named(_), MissingColumnPolicy::Fail) => None,
        };
        self.header = Some(columns);

        match self.value_index {
            Some(index) => {
                debug!(
                    column = self.mapping.column_name(),
                    index,
                    "Resolved value column"
                );
                Ok(())
            }
            None => Err(FeedError::configuration(
                self.mapping.column_name(),
                "column not found in header",
            )),
        }
    }

    fn is_repeated_header(&self, first_field: &str) -> bool {
        self.header
            .as_ref()
            .and_then(|columns| columns.first())
            .map_or(false, |first| *first == normalize(first_field))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn split_fields(line: &str) -> FeedResult<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut fields = csv::StringRecord::new();
    match reader.read_record(&mut fields) {
        Ok(true) => Ok(fields),
        Ok(false) => Err(FeedError::parse("line", line, "empty line")),
        Err(e) => Err(FeedError::parse("line", line, e.to_string())),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
