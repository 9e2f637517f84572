use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn require_min_len(value: &str, min: usize, message: &str) -> Result<(), String> {
    if value.trim().chars().count() < min {
        return Err(message.to_string());
    }
    Ok(())
}

pub fn require_non_empty(value: &str, field: &str) -> Result<(), String> {
    require_min_len(value, 1, &format!("{} is required", field))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Parses an `HH:MM` wall-clock time and returns it normalized.
pub fn normalize_time(value: &str) -> Result<String, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("ana@x.com"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana x@x.com"));
    }

    #[test]
    fn test_min_len_counts_characters() {
        assert!(require_min_len("Mã", 2, "too short").is_ok());
        assert_eq!(require_min_len(" a ", 2, "too short").unwrap_err(), "too short");
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(parse_date("2025-12-05").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 5).unwrap());
        assert!(parse_date("05/12/2025").is_err());
        assert_eq!(normalize_time("09:30").unwrap(), "09:30");
        assert!(normalize_time("25:00").is_err());
    }
}
