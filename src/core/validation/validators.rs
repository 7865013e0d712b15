//! Reusable field validators
//!
//! A validator inspects a field value (after filters ran) and returns the
//! message to show when the value is rejected.

use serde_json::Value;

/// Validator: field must have been submitted (not null)
pub fn required(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        if value.is_null() {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: number must be strictly greater than zero
pub fn positive(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_f64() {
        Some(num) if num <= 0.0 => Err(message.to_string()),
        _ => Ok(()),
    }
}

/// Validator: number converted to cents (rounded) must fit an `i64`
pub fn fits_in_cents(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    // i64::MAX rounds up to 2^63 as f64, so anything reaching it overflows
    move |_: &str, value: &Value| match value.as_f64() {
        Some(num) if (num * 100.0).round() >= i64::MAX as f64 => Err(message.to_string()),
        _ => Ok(()),
    }
}

/// Validator: value must be one of the allowed literals.
///
/// Null and non-string values are rejected too: the field is an enumeration.
pub fn one_of(
    allowed: &'static [&'static str],
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_str() {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Validator: value must be a string when present
pub fn string(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        if value.is_null() || value.is_string() {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }
}
