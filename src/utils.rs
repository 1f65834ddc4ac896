use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Serializer;
use serde_json::Value;

use crate::types::{Validate, ValidationError};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = Utc
        .from_utc_datetime(date)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

/// Path ids are taken as raw segments so a bad one is a 400, not a routing miss.
pub fn parse_id(key: &str, raw: &str) -> Result<i32, ValidationError> {
    raw.parse::<i32>()
        .map_err(|_| ValidationError::from(key, format!("not an integer: {}", raw)))
}

pub fn require_text(errors: &mut ValidationError, key: &str, value: Option<String>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(ref v) if !v.is_empty() => v.clone(),
        Some(_) => {
            errors.add_error(key, "must not be empty");
            String::new()
        }
        None => {
            errors.add_error(key, "is required");
            String::new()
        }
    }
}

/// `{ "inc_votes": n }` where n is a JSON integer that fits in an i32.
pub fn parse_inc_votes(value: Option<&Value>) -> Result<i32, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::from("inc_votes", "is required"))?;
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ValidationError::from("inc_votes", format!("not an integer: {}", value)))
}

/// Body of the vote PATCH endpoints.
#[derive(Debug, Deserialize)]
pub struct VoteUpdate {
    inc_votes: Option<Value>,
}

impl Validate for VoteUpdate {
    type Valid = i32;

    fn validate(self) -> Result<i32, ValidationError> {
        parse_inc_votes(self.inc_votes.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub limit: i64,
    pub page: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

impl Page {
    pub fn from_query(limit: Option<&str>, p: Option<&str>) -> Result<Page, ValidationError> {
        let mut errors = ValidationError::default();
        let mut page = Page::default();

        if let Some(raw) = limit {
            match positive(raw) {
                Some(limit) if limit <= MAX_LIMIT => page.limit = limit,
                _ => errors.add_error("limit", format!("expected 1..={}, got {}", MAX_LIMIT, raw)),
            }
        }
        if let Some(raw) = p {
            match positive(raw) {
                Some(p) => page.page = p,
                None => errors.add_error("p", format!("expected a positive integer, got {}", raw)),
            }
        }
        errors.or_ok(page)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn positive(raw: &str) -> Option<i64> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .map(i64::from)
}
