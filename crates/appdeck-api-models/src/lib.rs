#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    dead_code,
    unused,
    unused_imports,
    unreachable_pub,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
//! Shared HTTP DTOs for the application-management API.
//!
//! Response shapes decode leniently: unknown fields are ignored, missing fields
//! fall back to their zero value, and both `snake_case` and capitalised keys
//! are accepted because the server has emitted both over time. A body with the
//! wrong overall shape (an object where a list is expected) still fails.
//! Explicit `null` values decode the same way as a missing field.
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Key carrying the git remote in the create-app response.
pub const REPOSITORY_URL_KEY: &str = "repository_url";

/// Application summary returned by `GET /apps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Application {
    /// Unique application name.
    #[serde(alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    /// Lifecycle state reported by the platform (e.g. `created`, `started`).
    #[serde(alias = "State", deserialize_with = "null_as_default")]
    pub state: String,
    /// Running units, in server order.
    #[serde(alias = "Units", deserialize_with = "null_as_default")]
    pub units: Vec<Unit>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Application {
    /// Address of the first unit, or an empty string when none are running.
    #[must_use]
    pub fn primary_ip(&self) -> &str {
        self.units.first().map_or("", |unit| unit.ip.as_str())
    }
}

/// Running instance of an [`Application`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Unit {
    /// Network address of the unit.
    #[serde(alias = "Ip", alias = "IP", deserialize_with = "null_as_default")]
    pub ip: String,
}

/// Single log line returned by `GET /apps/{app}/log`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogEntry {
    /// Instant the line was recorded.
    #[serde(alias = "Date", deserialize_with = "null_as_default")]
    pub date: Timestamp,
    /// Log message body.
    #[serde(alias = "Message", deserialize_with = "null_as_default")]
    pub message: String,
}

impl Display for LogEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} - {}", self.date, self.message)
    }
}

/// Payload for `POST /apps`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateAppRequest {
    /// Name of the application to create.
    pub name: String,
    /// Framework (platform) the application is built on.
    pub framework: String,
}

/// Response body for `POST /apps`: a flat string map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CreateAppResponse(pub BTreeMap<String, String>);

impl CreateAppResponse {
    /// Git remote assigned to the new application, empty when absent.
    #[must_use]
    pub fn repository_url(&self) -> &str {
        self.0.get(REPOSITORY_URL_KEY).map_or("", String::as_str)
    }
}

/// RFC 3339 instant that keeps the offset it was received with.
///
/// Renders as `2014-01-01 00:00:00 +0000 UTC`: fractional seconds appear only
/// when non-zero (trailing zeros trimmed) and the zone name is `UTC` for a zero
/// offset, otherwise the numeric offset is repeated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    /// Zero instant used when the server omits a date: `0001-01-01T00:00:00Z`.
    #[must_use]
    pub fn zero() -> Self {
        let naive = NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self(naive.and_utc().fixed_offset())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let instant = self.0;
        write!(formatter, "{}", instant.format("%Y-%m-%d %H:%M:%S"))?;

        // leap seconds are reported as nanos >= 1e9
        let nanos = instant.nanosecond() % 1_000_000_000;
        if nanos != 0 {
            let digits = format!("{nanos:09}");
            write!(formatter, ".{}", digits.trim_end_matches('0'))?;
        }

        let offset = instant.format("%z");
        if instant.offset().local_minus_utc() == 0 {
            write!(formatter, " {offset} UTC")
        } else {
            write!(formatter, " {offset} {offset}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn application_decodes_lowercase_and_capitalised_keys() {
        let lower: Application = serde_json::from_value(json!({
            "name": "blog",
            "state": "started",
            "units": [{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]
        }))
        .expect("lowercase payload");
        let upper: Application = serde_json::from_value(json!({
            "Name": "blog",
            "State": "started",
            "Units": [{"Ip": "10.0.0.1"}, {"Ip": "10.0.0.2"}]
        }))
        .expect("capitalised payload");

        assert_eq!(lower, upper);
        assert_eq!(lower.primary_ip(), "10.0.0.1");
    }

    #[test]
    fn application_defaults_missing_fields_and_ignores_extras() {
        let app: Application =
            serde_json::from_value(json!({"name": "api", "framework": "go"})).expect("decode");
        assert_eq!(app.state, "");
        assert!(app.units.is_empty());
        assert_eq!(app.primary_ip(), "");
    }

    #[test]
    fn application_treats_null_fields_as_empty() {
        let apps: Vec<Application> = serde_json::from_value(json!([
            {"Name": "blog", "State": "created", "Units": null},
            {"Name": null, "State": "started", "Units": [{"Ip": null}]}
        ]))
        .expect("null fields decode");
        assert_eq!(apps[0].name, "blog");
        assert!(apps[0].units.is_empty());
        assert_eq!(apps[0].primary_ip(), "");
        assert_eq!(apps[1].name, "");
        assert_eq!(apps[1].primary_ip(), "");
    }

    #[test]
    fn log_entry_treats_null_fields_as_zero() {
        let entry: LogEntry = serde_json::from_value(json!({"Date": null, "Message": null}))
            .expect("null fields decode");
        assert_eq!(entry, LogEntry::default());
        assert_eq!(entry.date, Timestamp::zero());
    }

    #[test]
    fn application_list_rejects_object_body() {
        let result = serde_json::from_value::<Vec<Application>>(json!({"name": "blog"}));
        assert!(result.is_err());
    }

    #[test]
    fn create_response_reads_repository_url() {
        let response: CreateAppResponse = serde_json::from_value(json!({
            "repository_url": "git@x:blog.git",
            "ignored": "value"
        }))
        .expect("decode");
        assert_eq!(response.repository_url(), "git@x:blog.git");
        assert_eq!(CreateAppResponse::default().repository_url(), "");
    }

    #[test]
    fn create_request_escapes_quotes() {
        let request = CreateAppRequest {
            name: "my \"app\"".to_string(),
            framework: "python".to_string(),
        };
        let encoded = serde_json::to_string(&request).expect("encode");
        assert_eq!(encoded, r#"{"name":"my \"app\"","framework":"python"}"#);
    }

    #[test]
    fn timestamp_renders_utc_instant() {
        let entry: LogEntry = serde_json::from_value(json!({
            "date": "2014-01-01T00:00:00Z",
            "message": "started"
        }))
        .expect("decode");
        assert_eq!(entry.date.to_string(), "2014-01-01 00:00:00 +0000 UTC");
        assert_eq!(entry.to_string(), "2014-01-01 00:00:00 +0000 UTC - started");
    }

    #[test]
    fn timestamp_renders_fraction_and_offset() {
        let stamp: Timestamp =
            serde_json::from_value(json!("2014-03-05T10:20:30.250+02:00")).expect("decode");
        assert_eq!(stamp.to_string(), "2014-03-05 10:20:30.25 +0200 +0200");
    }

    #[test]
    fn missing_date_renders_zero_instant() {
        let entry: LogEntry =
            serde_json::from_value(json!({"Message": "booting"})).expect("decode");
        assert_eq!(entry.date, Timestamp::zero());
        assert_eq!(entry.to_string(), "0001-01-01 00:00:00 +0000 UTC - booting");
    }

    #[test]
    fn timestamp_rejects_non_rfc3339_text() {
        assert!(serde_json::from_value::<Timestamp>(json!("yesterday")).is_err());
    }
}
