use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::models::{MatchStatus, TransactionType};

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid date for {0}: {1}")]
    InvalidDate(String, String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Trims the value and rejects it when nothing is left.
pub fn require_non_empty(name: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingParameter(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Group ids are embedded in `_`-delimited aggregate ids, so they may not
/// contain `_` themselves.
pub fn validate_group_id(id: &str) -> Result<(), ValidationError> {
    if id.contains('_') {
        return Err(ValidationError::InvalidParameter(format!(
            "group id '{}' must not contain '_'",
            id
        )));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp and returns the calendar date.
pub fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc().date())
        .map_err(|_| ValidationError::InvalidDate(name.to_string(), value.to_string()))
}

/// Parses an optional date field, falling back to `today` when absent or blank.
pub fn date_or_today(
    name: &str,
    value: Option<&str>,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date(name, value),
        None => Ok(today),
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn validate_transaction_type(value: &str) -> Result<TransactionType, ValidationError> {
    value.parse().map_err(ValidationError::InvalidParameter)
}

pub fn validate_match_status(value: Option<&str>) -> Result<MatchStatus, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.parse().map_err(ValidationError::InvalidParameter),
        None => Ok(MatchStatus::default()),
    }
}

pub fn validate_non_negative(name: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ValidationError::InvalidParameter(format!(
            "{} must be a non-negative number",
            name
        ))),
        _ => Ok(()),
    }
}

/// Coerces any JSON value to a number; numeric strings parse, everything else is 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Coerces strings and numbers to an identifier string; anything else is empty.
pub fn coerce_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// serde hook for lenient amount fields.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// serde hook for lenient identifier fields.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_coerce_leniently() {
        assert_eq!(coerce_amount(&json!(42.5)), 42.5);
        assert_eq!(coerce_amount(&json!("30")), 30.0);
        assert_eq!(coerce_amount(&json!("abc")), 0.0);
        assert_eq!(coerce_amount(&json!(null)), 0.0);
        assert_eq!(coerce_amount(&json!({"nested": 1})), 0.0);
    }

    #[test]
    fn ids_coerce_from_numbers_and_strings() {
        assert_eq!(coerce_id(&json!(" g1 ")), "g1");
        assert_eq!(coerce_id(&json!(17)), "17");
        assert_eq!(coerce_id(&json!(null)), "");
        assert_eq!(coerce_id(&json!(true)), "");
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("date", "2024-03-15").unwrap(), expected);
        assert_eq!(parse_date("date", "2024-03-15T18:30:00Z").unwrap(), expected);
        assert_eq!(
            parse_date("date", "15/03/2024"),
            Err(ValidationError::InvalidDate("date".into(), "15/03/2024".into()))
        );
    }

    #[test]
    fn missing_date_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(date_or_today("date", None, today).unwrap(), today);
        assert_eq!(date_or_today("date", Some("  "), today).unwrap(), today);
    }

    #[test]
    fn month_start_is_day_one() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(first_of_month(date), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn required_values_must_not_be_blank() {
        assert_eq!(require_non_empty("groupId", " g1 ").unwrap(), "g1");
        assert_eq!(
            require_non_empty("groupId", "   "),
            Err(ValidationError::MissingParameter("groupId".into()))
        );
    }

    #[test]
    fn group_ids_reject_underscores() {
        assert!(validate_group_id("g1").is_ok());
        assert!(validate_group_id("0b6c-41aa").is_ok());
        assert!(validate_group_id("a_b").is_err());
    }

    #[test]
    fn enums_validate() {
        assert_eq!(validate_transaction_type("income").unwrap(), TransactionType::Income);
        assert!(validate_transaction_type("refund").is_err());
        assert_eq!(validate_match_status(None).unwrap(), MatchStatus::Scheduled);
        assert_eq!(validate_match_status(Some("played")).unwrap(), MatchStatus::Played);
        assert!(validate_match_status(Some("abandoned")).is_err());
        assert!(validate_non_negative("amount", Some(-1.0)).is_err());
        assert!(validate_non_negative("amount", None).is_ok());
    }
}
