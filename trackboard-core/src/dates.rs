//! Wire date handling.
//!
//! The server emits naive ISO timestamps (`2025-01-31T00:00:00`), sometimes
//! with fractional seconds. Offsets and bare dates are accepted too so a
//! differently configured server does not break rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Timestamp type used for every record date. Naive, as sent by the server.
pub type Timestamp = NaiveDateTime;

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used when rendering dates to the user.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Format expected from date-only form fields.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse any timestamp shape the server is known to produce.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Render a timestamp in the wire format the server's `fromisoformat` accepts.
pub fn to_wire(ts: &Timestamp) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Append the fixed midnight suffix to a date-only form value.
pub fn date_field_to_wire(date: NaiveDate) -> String {
    format!("{}T00:00:00", date.format(FORM_DATE_FORMAT))
}

pub fn display_date(ts: &Timestamp) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Date part of a timestamp, formatted for a form field.
pub fn form_date(ts: &Timestamp) -> String {
    ts.date().format(FORM_DATE_FORMAT).to_string()
}

pub(crate) fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_wire(ts))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub(crate) mod option {
    use super::{parse_timestamp, to_wire, Timestamp};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&to_wire(ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Empty strings and unparseable values read as absent.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_server_shapes() {
        let midnight = ymd(2025, 3, 14).and_time(NaiveTime::MIN);
        assert_eq!(parse_timestamp("2025-03-14T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-03-14"), Some(midnight));
        assert_eq!(parse_timestamp("2025-03-14T00:00:00.000000"), Some(midnight));
        assert_eq!(parse_timestamp("2025-03-14T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-03-14T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn date_fields_get_midnight_suffix() {
        assert_eq!(date_field_to_wire(ymd(2025, 1, 2)), "2025-01-02T00:00:00");
    }

    #[test]
    fn form_date_drops_time() {
        let ts = ymd(2024, 12, 31).and_hms_opt(17, 30, 0).unwrap();
        assert_eq!(form_date(&ts), "2024-12-31");
        assert_eq!(display_date(&ts), "2024-12-31");
    }
}
