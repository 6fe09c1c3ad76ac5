//! Record identifiers as issued by the mock backend.
//!
//! The backend hands out ids as JSON strings (`"12"`) but older records and
//! hand-written fixtures carry bare numbers (`12`). Both deserialize into the
//! same [`RecordId`], and every comparison happens on the string form.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a remote record.
/// The default value is the blank id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

/// Identifier of a [`crate::Product`].
pub type ProductId = RecordId;

/// Identifier of a [`crate::User`].
pub type UserId = RecordId;

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for ids that are empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct RecordIdVisitor;

impl Visitor<'_> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer record id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(RecordId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// Keys a product id may be stored under, in order of preference.
pub const PRODUCT_ID_KEYS: [&str; 4] = ["id", "productId", "productID", "_id"];

/// Extracts a product id from a loosely shaped JSON value.
///
/// Accepts bare strings and numbers, or objects carrying one of
/// [`PRODUCT_ID_KEYS`]. The first non-null key wins even when its value is
/// unusable. Returns `None` for anything else, including blank strings.
#[must_use]
pub fn product_id_from_value(value: &serde_json::Value) -> Option<ProductId> {
    use serde_json::Value;

    match value {
        Value::Object(map) => product_id_from_fields(map),
        other => scalar_id(other),
    }
}

/// Like [`product_id_from_value`] for a record's field map.
#[must_use]
pub fn product_id_from_fields(
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Option<ProductId> {
    PRODUCT_ID_KEYS
        .iter()
        .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
        .and_then(scalar_id)
}

fn scalar_id(value: &serde_json::Value) -> Option<RecordId> {
    use serde_json::Value;

    let id = match value {
        Value::String(s) => RecordId(s.clone()),
        Value::Number(n) => RecordId(n.to_string()),
        _ => return None,
    };
    Some(id).filter(|id| !id.is_blank())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_from_string_and_number() {
        let a: RecordId = serde_json::from_value(json!("12")).unwrap();
        let b: RecordId = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "12");
    }

    #[test]
    fn serializes_as_string() {
        let id = RecordId::from(7_u64);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("7"));
    }

    #[test]
    fn product_id_from_value_prefers_id_over_aliases() {
        let value = json!({ "id": "1", "productId": "2", "_id": "3" });
        assert_eq!(product_id_from_value(&value), Some(RecordId::from("1")));
    }

    #[test]
    fn product_id_from_value_falls_back_through_aliases() {
        assert_eq!(
            product_id_from_value(&json!({ "productID": 9 })),
            Some(RecordId::from("9"))
        );
        assert_eq!(
            product_id_from_value(&json!({ "_id": "abc" })),
            Some(RecordId::from("abc"))
        );
    }

    #[test]
    fn null_id_falls_through_but_blank_id_does_not() {
        assert_eq!(
            product_id_from_value(&json!({ "id": null, "productId": "4" })),
            Some(RecordId::from("4"))
        );
        assert_eq!(
            product_id_from_value(&json!({ "id": "", "productId": "4" })),
            None
        );
    }

    #[test]
    fn product_id_from_value_rejects_blank_and_null() {
        assert_eq!(product_id_from_value(&json!("  ")), None);
        assert_eq!(product_id_from_value(&json!(null)), None);
        assert_eq!(product_id_from_value(&json!({ "name": "x" })), None);
    }
}
