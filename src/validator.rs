// src/validator.rs - Centralized request field validation
//
// Request bodies come from HTML forms, so numbers may arrive as JSON numbers
// or as numeric strings, and dates as `YYYY-MM-DD` or full RFC 3339 stamps.
use std::collections::BTreeMap;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crate::error::ApiError;

// ==================== FLEXIBLE NUMBER ====================

/// 2^53 - 1. Past this, neighbouring integers collapse onto one f64.
pub const MAX_EXACT_INTEGER: i64 = 9_007_199_254_740_991;

/// A numeric form field: either a JSON number or a string holding one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FlexibleNumber {
    Number(f64),
    Text(String),
}

impl FlexibleNumber {
    /// `Ok(None)` for a blank string, which counts as a missing field.
    pub fn to_f64(&self) -> Result<Option<f64>, String> {
        match self {
            FlexibleNumber::Number(n) => Ok(Some(*n)),
            FlexibleNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Some)
                    .ok_or_else(|| format!("'{}' is not a number", trimmed))
            }
        }
    }

    /// Whole numbers only, limited to the range an f64 holds exactly.
    pub fn to_i64(&self) -> Result<Option<i64>, String> {
        match self {
            FlexibleNumber::Number(n) if !n.is_finite() || n.fract() != 0.0 => {
                Err(format!("'{}' is not a whole number", n))
            }
            FlexibleNumber::Number(n) if n.abs() > MAX_EXACT_INTEGER as f64 => {
                Err(format!("'{}' is out of range", n))
            }
            FlexibleNumber::Number(n) => Ok(Some(*n as i64)),
            FlexibleNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                let value = trimmed
                    .parse::<i64>()
                    .map_err(|_| format!("'{}' is not a whole number", trimmed))?;
                if value.unsigned_abs() > MAX_EXACT_INTEGER as u64 {
                    return Err(format!("'{}' is out of range", trimmed));
                }
                Ok(Some(value))
            }
        }
    }
}

// ==================== DATE PARSING ====================

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(format!("'{}' is not a valid date", value))
}

// ==================== VALIDATION RESULT ====================

#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn to_api_error(&self) -> ApiError {
        let message = self.errors
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, errors.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::ValidationError(message)
    }
}

// ==================== FIELD READER ====================

/// Pulls required and optional fields out of a raw payload.
///
/// Every accessor returns a placeholder when the field is missing or invalid;
/// callers must check [`FieldReader::finish`] before using the values.
#[derive(Debug, Default)]
pub struct FieldReader {
    missing: Vec<&'static str>,
    result: ValidationResult,
}

impl FieldReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text, trimmed. Blank counts as missing.
    pub fn text(&mut self, field: &'static str, value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Optional text, trimmed; blank becomes the empty string.
    pub fn optional_text(&self, value: Option<&str>) -> String {
        value.map(str::trim).unwrap_or_default().to_string()
    }

    pub fn number(&mut self, field: &'static str, value: Option<&FlexibleNumber>) -> f64 {
        match value.map(FlexibleNumber::to_f64) {
            Some(Ok(Some(n))) => n,
            Some(Err(e)) => {
                self.result.add_error(field, e);
                0.0
            }
            _ => {
                self.missing.push(field);
                0.0
            }
        }
    }

    pub fn integer(&mut self, field: &'static str, value: Option<&FlexibleNumber>) -> i64 {
        match value.map(FlexibleNumber::to_i64) {
            Some(Ok(Some(n))) => n,
            Some(Err(e)) => {
                self.result.add_error(field, e);
                0
            }
            _ => {
                self.missing.push(field);
                0
            }
        }
    }

    pub fn date(&mut self, field: &'static str, value: Option<&str>) -> DateTime<Utc> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.parse_date_field(field, v),
            None => {
                self.missing.push(field);
                Utc::now()
            }
        }
    }

    /// Optional date falling back to `default` when absent.
    pub fn date_or(&mut self, field: &'static str, value: Option<&str>, default: DateTime<Utc>) -> DateTime<Utc> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.parse_date_field(field, v),
            None => default,
        }
    }

    /// Required status; matched case-insensitively against the enum.
    pub fn status<S>(&mut self, field: &'static str, value: Option<&str>) -> Option<S>
    where
        S: FromStr<Err = String>,
    {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.parse_status(field, v),
            None => {
                self.missing.push(field);
                None
            }
        }
    }

    /// Optional status falling back to `default` when absent.
    pub fn status_or<S>(&mut self, field: &'static str, value: Option<&str>, default: S) -> S
    where
        S: FromStr<Err = String> + Copy,
    {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.parse_status(field, v).unwrap_or(default),
            None => default,
        }
    }

    /// Missing fields win over malformed ones so the client learns about both in turn.
    pub fn finish(self) -> Result<(), ApiError> {
        if !self.missing.is_empty() {
            return Err(ApiError::missing_fields(&self.missing));
        }
        if !self.result.is_valid() {
            return Err(self.result.to_api_error());
        }
        Ok(())
    }

    fn parse_date_field(&mut self, field: &'static str, value: &str) -> DateTime<Utc> {
        match parse_date(value) {
            Ok(dt) => dt,
            Err(e) => {
                self.result.add_error(field, e);
                Utc::now()
            }
        }
    }

    fn parse_status<S>(&mut self, field: &'static str, value: &str) -> Option<S>
    where
        S: FromStr<Err = String>,
    {
        match value.parse::<S>() {
            Ok(status) => Some(status),
            Err(e) => {
                self.result.add_error(field, e);
                None
            }
        }
    }
}
