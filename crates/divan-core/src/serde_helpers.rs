//! Lenient field decoders for records written by hand or by older clients.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ids::RecordId;

/// Reads a number, a numeric string, or `null`/garbage as `0.0`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Reads a string field that older records sometimes leave `null` or write
/// as a number. `null` and non-scalars read as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Reads a stock count written as an integer, a float, or a numeric string.
///
/// `null` means the record carries no stock figure. Negative or unreadable
/// values count as zero, i.e. out of stock.
pub(crate) fn lenient_stock<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(stock_from_value))
}

fn stock_from_value(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Some(raw.filter(|f| f.is_finite() && *f > 0.0).map_or(0, |f| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = f.min(f64::from(u32::MAX)).floor() as u32;
        count
    }))
}

/// Decodes `T` when the value has the right shape and yields `None`
/// otherwise, so one malformed field leaves the rest of the record intact.
pub(crate) fn lenient_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient_optional`] for fields with a natural default.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_optional(deserializer)?.unwrap_or_default())
}

/// Reads a record id written as a string or an integer. Anything else is the
/// blank id, which never matches another record.
pub(crate) fn lenient_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => RecordId::from(s),
        Value::Number(n) => RecordId::from(n.to_string()),
        _ => RecordId::default(),
    })
}

/// Reads a money amount written as a number or a numeric string. Anything
/// unreadable is zero.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value).unwrap_or(Decimal::ZERO))
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse()
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an RFC 3339 string or a unix timestamp (seconds, or milliseconds
/// when the value is too large to be seconds). Anything else is `None`.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    const MILLIS_THRESHOLD: i64 = 100_000_000_000;

    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            if raw.abs() >= MILLIS_THRESHOLD {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn timestamp_accepts_rfc3339_seconds_and_millis() {
        let iso = timestamp_from_value(&json!("2025-01-15T10:00:00Z")).unwrap();
        let secs = timestamp_from_value(&json!(1_736_935_200)).unwrap();
        let millis = timestamp_from_value(&json!(1_736_935_200_000_i64)).unwrap();
        assert_eq!(iso, secs);
        assert_eq!(secs, millis);
    }

    #[test]
    fn decimal_reads_numbers_and_strings_exactly() {
        assert_eq!(decimal_from_value(&json!(799.9)), Some(Decimal::new(7999, 1)));
        assert_eq!(decimal_from_value(&json!("19.99")), Some(Decimal::new(1999, 2)));
        assert_eq!(decimal_from_value(&json!(450)), Some(Decimal::from(450)));
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!("cheap")), None);
    }

    #[test]
    fn stock_reads_integers_floats_and_strings() {
        assert_eq!(stock_from_value(&json!(5)), Some(5));
        assert_eq!(stock_from_value(&json!(5.0)), Some(5));
        assert_eq!(stock_from_value(&json!("5")), Some(5));
        assert_eq!(stock_from_value(&json!(-2)), Some(0));
        assert_eq!(stock_from_value(&json!("N/A")), Some(0));
        assert_eq!(stock_from_value(&json!(null)), None);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "lenient_string")]
        name: String,
        #[serde(default, deserialize_with = "lenient_optional")]
        count: Option<u8>,
        #[serde(default, deserialize_with = "lenient_record_id")]
        owner: RecordId,
    }

    #[test]
    fn loose_fields_never_fail_the_record() {
        let loose: Loose =
            serde_json::from_value(json!({ "name": null, "count": "many", "owner": 7 })).unwrap();
        assert_eq!(loose.name, "");
        assert_eq!(loose.count, None);
        assert_eq!(loose.owner, RecordId::from("7"));

        let loose: Loose =
            serde_json::from_value(json!({ "name": 12, "count": 3, "owner": [] })).unwrap();
        assert_eq!(loose.name, "12");
        assert_eq!(loose.count, Some(3));
        assert!(loose.owner.is_blank());
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(timestamp_from_value(&json!("yesterday")).is_none());
        assert!(timestamp_from_value(&json!(true)).is_none());
    }
}
