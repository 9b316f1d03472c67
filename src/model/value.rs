use crate::model::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::str::FromStr;

/// Cell contents that a CSV reader in the data-frame tradition reads as missing.
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Formats tried, in order, when parsing the disclosure date column. RFC 3339 is tried first.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// The kind of data held by a column, decided once when the file is loaded.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
}

serde_plain::derive_display_from_serialize!(ColumnKind);

/// A single cell of the dataset.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Number(Decimal),
    Text(String),
    Date(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The cell as a grouping label. Missing cells have no label and are left out of groupings.
    pub fn label(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(Cow::Owned(n.normalize().to_string())),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Date(d) => Some(Cow::Owned(iso(d))),
        }
    }

    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            Value::Number(n) => Some(Amount::new(*n)),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_year(&self) -> Option<i32> {
        match self {
            Value::Number(n) => n.to_i32(),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Number(n) if n.fract().is_zero() => match n.to_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(n.to_f64().unwrap_or_default()),
            },
            Value::Number(n) => serializer.serialize_f64(n.to_f64().unwrap_or_default()),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&iso(d)),
        }
    }
}

fn iso(d: &NaiveDateTime) -> String {
    d.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Returns true when the raw cell should be read as missing.
pub(crate) fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw.trim())
}

/// Parses a raw numeric cell, allowing a dollar sign and thousands separators.
pub(crate) fn parse_number(raw: &str) -> Option<Decimal> {
    Amount::from_str(raw).ok().map(|a| a.value())
}

/// Parses a raw date cell. Returns `None` when no known format matches.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date_formats() {
        for raw in [
            "2019-05-01",
            "2019/05/01",
            "05/01/2019",
            "2019-05-01 13:45:00",
            "2019-05-01T13:45:00",
            "2019-05-01T13:45:00.250",
            "2019-05-01T13:45:00+02:00",
        ] {
            let parsed = parse_date(raw).unwrap_or_else(|| panic!("unable to parse {raw}"));
            assert_eq!(parsed.year(), 2019, "{raw}");
            assert_eq!(parsed.month(), 5, "{raw}");
            assert_eq!(parsed.day(), 1, "{raw}");
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2019-13-45").is_none());
    }

    #[test]
    fn test_null_markers() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("  "));
        assert!(is_null_marker("NaN"));
        assert!(!is_null_marker("0"));
    }

    #[test]
    fn test_serialize() {
        let values = vec![
            Value::Null,
            Value::Number(Decimal::from(2019)),
            Value::Number(Decimal::from_str("12.5").unwrap()),
            Value::Text("Kenya".into()),
            Value::Date(parse_date("2019-05-01").unwrap()),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,2019,12.5,"Kenya","2019-05-01T00:00:00"]"#
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(Value::Null.label(), None);
        assert_eq!(Value::Text("Peru".into()).label().unwrap(), "Peru");
        let n = Value::Number(Decimal::from_str("3.50").unwrap());
        assert_eq!(n.label().unwrap(), "3.5");
    }
}
