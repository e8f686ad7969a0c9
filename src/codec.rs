use crate::error::{FeedError, FeedResult};
use crate::types::{MarketDataType, Record, Symbol};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct JsonBody {
    time: NaiveDate,
    value: Decimal,
    data_type: MarketDataType,
}

/// Tagged union written by the binary codec
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Payload {
    Base(Record),
}

// Borrowing twin of `Payload`; bincode writes both identically
#[derive(Serialize)]
enum PayloadRef<'a> {
    Base(&'a Record),
}

/// Serialize a record to JSON.
///
/// The body carries time, value and data type. The symbol travels
/// out-of-band; `from_json` takes it back from the caller.
pub fn to_json(record: &Record) -> FeedResult<String> {
    let body = JsonBody {
        time: record.time(),
        value: record.value(),
        data_type: record.data_type(),
    };
    Ok(serde_json::to_string(&body)?)
}

/// Deserialize a record from JSON, attaching the out-of-band symbol
pub fn from_json<S: Into<Symbol>>(json: &str, symbol: S) -> FeedResult<Record> {
    let body: JsonBody = serde_json::from_str(json)?;
    Ok(Record::from_parts(
        symbol.into(),
        body.time,
        body.value,
        body.data_type,
    ))
}

/// Serialize a record to the compact binary format.
///
/// bincode of the `Payload` tagged union, one variant per record kind. Every
/// field round-trips, symbol included.
pub fn to_binary(record: &Record) -> FeedResult<Vec<u8>> {
    Ok(bincode::serialize(&PayloadRef::Base(record))?)
}

/// Deserialize a record from the compact binary format
pub fn from_binary(bytes: &[u8]) -> FeedResult<Record> {
    match bincode::deserialize::<Payload>(bytes)? {
        Payload::Base(record) if record.data_type() == MarketDataType::Base => Ok(record),
        Payload::Base(record) => Err(FeedError::serialization(format!(
            "base payload carries {:?} record",
            record.data_type()
        ))),
    }
}

/// Independent copy of a record, sharing nothing with the source
pub fn deep_copy(record: &Record) -> Record {
    record.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Record {
        Record::new(
            "UMICH/SOC1",
            NaiveDate::from_ymd_opt(2021, 9, 30).unwrap(),
            dec!(72.8),
        )
    }

    #[test]
    fn test_json_round_trip() {
        let record = sample();
        let json = to_json(&record).unwrap();
        assert!(!json.contains("UMICH/SOC1"));

        let decoded = from_json(&json, record.symbol().clone()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_json_layout() {
        let json = to_json(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"time":"2021-09-30","value":"72.8","data_type":"Base"}"#
        );
    }

    #[test]
    fn test_json_symbol_is_taken_from_caller() {
        let json = to_json(&sample()).unwrap();
        let decoded = from_json(&json, "OTHER").unwrap();

        assert_eq!(decoded.symbol().as_str(), "OTHER");
        assert_eq!(decoded.time(), sample().time());
        assert_eq!(decoded.value(), sample().value());
        assert_eq!(decoded.data_type(), sample().data_type());
    }

    #[test]
    fn test_json_rejects_bad_input() {
        let err = from_json(r#"{"time":"yesterday","value":"1","data_type":"Base"}"#, "X")
            .unwrap_err();
        assert!(matches!(err, FeedError::SerializationError { .. }));
    }

    #[test]
    fn test_binary_round_trip() {
        let record = sample();
        let bytes = to_binary(&record).unwrap();
        let decoded = from_binary(&bytes).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.symbol(), record.symbol());
    }

    #[test]
    fn test_binary_matches_owned_payload() {
        let record = sample();
        let owned = bincode::deserialize::<Payload>(&to_binary(&record).unwrap()).unwrap();
        assert_eq!(owned, Payload::Base(record));
    }

    #[test]
    fn test_binary_rejects_truncated_input() {
        let bytes = to_binary(&sample()).unwrap();
        let err = from_binary(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, FeedError::SerializationError { .. }));
    }

    #[test]
    fn test_deep_copy() {
        let record = sample();
        let copy = deep_copy(&record);

        assert_eq!(copy, record);
        assert!(!std::ptr::eq(&copy, &record));
        assert!(!std::ptr::eq(copy.symbol().as_str(), record.symbol().as_str()));
    }
}
