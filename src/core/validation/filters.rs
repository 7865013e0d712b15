//! Reusable field filters
//!
//! Filters transform a raw field value before validation. Coercions live
//! here: a filter that cannot convert its input fails, and the failure
//! message becomes the field's error.

use anyhow::{Result, bail};
use serde_json::{Value, json};

/// Message used when text cannot be read as a number
pub const NOT_A_NUMBER: &str = "Expected number, received nan";

/// Filter: coerce text to a finite number.
///
/// A missing or blank value coerces to `0`, so it is reported by the range
/// check rather than as unreadable. Anything else must parse as a finite
/// decimal.
pub fn coerce_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value {
        Value::Null => Ok(json!(0.0)),
        Value::Number(_) => Ok(value),
        Value::Bool(b) => Ok(json!(if b { 1.0 } else { 0.0 })),
        Value::String(s) => {
            let text = s.trim();
            if text.is_empty() {
                return Ok(json!(0.0));
            }
            match text.parse::<f64>() {
                Ok(num) if num.is_finite() => Ok(json!(num)),
                _ => bail!(NOT_A_NUMBER),
            }
        }
        Value::Array(_) | Value::Object(_) => bail!(NOT_A_NUMBER),
    }
}
