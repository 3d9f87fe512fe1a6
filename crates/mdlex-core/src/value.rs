//! Typed front matter values.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Front matter of a single document, keyed by field name.
pub type Metadata = BTreeMap<String, MetaValue>;

/// Runtime type of a metadata value.
///
/// Variants are declared in alphabetical order of their display names so that
/// the derived `Ord` sorts tags the same way they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Boolean,
    Date,
    Float,
    Integer,
    List,
    Mapping,
    String,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::Float => "float",
            TypeTag::Integer => "integer",
            TypeTag::List => "list",
            TypeTag::Mapping => "mapping",
            TypeTag::String => "string",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calendar date or timestamp found in front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl DateValue {
    const NAIVE_FORMATS: [&'static str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    const OFFSET_FORMATS: [&'static str; 2] =
        ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %:z"];

    /// Recognize a scalar written in YAML timestamp form.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(DateValue::Date(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(DateValue::Offset(dt));
        }
        for fmt in Self::OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(DateValue::Offset(dt));
            }
        }
        for fmt in Self::NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(DateValue::DateTime(dt));
            }
        }
        None
    }

    /// Canonical ISO-8601 rendering used for storage.
    pub fn to_iso8601(&self) -> String {
        match self {
            DateValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            DateValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            DateValue::Offset(dt) => dt.to_rfc3339(),
        }
    }
}

/// A single front matter value, typed as the metadata language produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(DateValue),
    List(Vec<MetaValue>),
    Mapping(Metadata),
}

impl MetaValue {
    /// Type tag of this value. `Null` has none: an explicit null counts the
    /// same as an absent key.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            MetaValue::Null => None,
            MetaValue::Boolean(_) => Some(TypeTag::Boolean),
            MetaValue::Integer(_) => Some(TypeTag::Integer),
            MetaValue::Float(_) => Some(TypeTag::Float),
            MetaValue::String(_) => Some(TypeTag::String),
            MetaValue::Date(_) => Some(TypeTag::Date),
            MetaValue::List(_) => Some(TypeTag::List),
            MetaValue::Mapping(_) => Some(TypeTag::Mapping),
        }
    }

    fn to_json_at(&self, key: &str) -> Result<serde_json::Value> {
        use serde_json::Value;

        let value = match self {
            MetaValue::Null => Value::Null,
            MetaValue::Boolean(b) => Value::Bool(*b),
            MetaValue::Integer(i) => Value::from(*i),
            MetaValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| Error::UnsupportedValue {
                    key: key.to_string(),
                    reason: format!("non-finite float {}", f),
                })?,
            MetaValue::String(s) => Value::String(s.clone()),
            MetaValue::Date(d) => Value::String(d.to_iso8601()),
            MetaValue::List(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| item.to_json_at(&format!("{}[{}]", key, i)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            MetaValue::Mapping(map) => Value::Object(mapping_to_json(map, Some(key))?),
        };
        Ok(value)
    }
}

fn mapping_to_json(
    map: &Metadata,
    prefix: Option<&str>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let mut object = serde_json::Map::new();
    for (k, v) in map {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, k),
            None => k.clone(),
        };
        object.insert(k.clone(), v.to_json_at(&path)?);
    }
    Ok(object)
}

/// Serialize front matter into the JSON object stored alongside a document.
///
/// Dates become ISO-8601 strings. Values JSON cannot represent (NaN and
/// infinities) are rejected with the offending key path.
pub fn metadata_to_json(metadata: &Metadata) -> Result<serde_json::Value> {
    Ok(serde_json::Value::Object(mapping_to_json(metadata, None)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_order_is_alphabetical() {
        let mut tags = vec![
            TypeTag::String,
            TypeTag::List,
            TypeTag::Integer,
            TypeTag::Boolean,
            TypeTag::Mapping,
            TypeTag::Date,
            TypeTag::Float,
        ];
        tags.sort();
        let names: Vec<_> = tags.iter().map(|t| t.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(
            DateValue::parse("2023-01-01").map(|d| d.to_iso8601()),
            Some("2023-01-01".to_string())
        );
        assert_eq!(
            DateValue::parse("2023-01-01 12:00:00").map(|d| d.to_iso8601()),
            Some("2023-01-01T12:00:00".to_string())
        );
        assert_eq!(
            DateValue::parse("2023-01-01T12:00:00+02:00").map(|d| d.to_iso8601()),
            Some("2023-01-01T12:00:00+02:00".to_string())
        );
        assert_eq!(DateValue::parse("Test Document"), None);
        assert_eq!(DateValue::parse("2023-13-01"), None);
        assert_eq!(DateValue::parse("20230101"), None);
    }

    #[test]
    fn test_null_has_no_tag() {
        assert_eq!(MetaValue::Null.type_tag(), None);
        assert_eq!(MetaValue::Integer(1).type_tag(), Some(TypeTag::Integer));
    }

    #[test]
    fn test_metadata_to_json() {
        let mut meta = Metadata::new();
        meta.insert("count".into(), MetaValue::Integer(42));
        meta.insert(
            "date".into(),
            MetaValue::Date(DateValue::parse("2023-01-02").unwrap()),
        );
        meta.insert(
            "tags".into(),
            MetaValue::List(vec![MetaValue::String("a".into()), MetaValue::Null]),
        );

        let json = metadata_to_json(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"count": 42, "date": "2023-01-02", "tags": ["a", null]})
        );
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let mut nested = Metadata::new();
        nested.insert("ratio".into(), MetaValue::Float(f64::NAN));
        let mut meta = Metadata::new();
        meta.insert("stats".into(), MetaValue::Mapping(nested));

        match metadata_to_json(&meta) {
            Err(Error::UnsupportedValue { key, .. }) => assert_eq!(key, "stats.ratio"),
            other => panic!("expected unsupported value, got {:?}", other),
        }
    }
}
