use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use tzwindow_core::models::WindowDefinition;
use tzwindow_core::tz::{format_rfc3339, format_rfc3339_utc};
use tzwindow_core::weekday_from_iso;

use crate::error::{CliError, CliResult};

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    tzwindow_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

pub fn parse_weekday(field: &str, value: u8) -> CliResult<Weekday> {
    weekday_from_iso(value).ok_or_else(|| {
        CliError::input(format!(
            "Invalid {} '{}'. Expected 1 (Monday) through 7 (Sunday)",
            field, value
        ))
    })
}

pub fn parse_hour(field: &str, value: u32) -> CliResult<u32> {
    if value < 24 {
        Ok(value)
    } else {
        Err(CliError::input(format!(
            "Invalid {} '{}'. Expected 0 through 23",
            field, value
        )))
    }
}

pub fn parse_rfc3339_to_utc(s: &str) -> CliResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::input(format!("Invalid RFC3339 timestamp '{}': {}", s.trim(), e)))
}

/// One window in CLI output, with boundaries in both local and UTC frames.
#[derive(Debug, Serialize)]
pub struct WindowOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub label: String,
    pub start_local: String,
    pub start_utc: String,
    pub end_local: String,
    pub end_utc: String,
}

impl WindowOutput {
    pub fn from_definition(def: &WindowDefinition, tz: Tz) -> Self {
        Self {
            kind: def.kind.map(|k| k.to_string()),
            label: def.label.clone(),
            start_local: format_rfc3339(&def.start_at.with_timezone(&tz)),
            start_utc: format_rfc3339_utc(&def.start_at),
            end_local: format_rfc3339(&def.end_at.with_timezone(&tz)),
            end_utc: format_rfc3339_utc(&def.end_at),
        }
    }
}
