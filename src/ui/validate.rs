//! Field-level validators. Each takes raw widget text and returns either
//! the cleaned value or a message ready to show next to the field.

use crate::models::round2;

/// Rejects empty or whitespace-only input.
pub fn require(label: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Accepts empty input as `None`; otherwise the address must contain `@`
/// and a `.`. Deliberately loose, the UNIQUE constraint does the real work.
pub fn email_format(value: &str) -> Result<Option<String>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.contains('@') && trimmed.contains('.') {
        Ok(Some(trimmed.to_string()))
    } else {
        Err("Email must look like name@domain.tld".to_string())
    }
}

/// Accepts empty input as `None`; otherwise 8 to 15 digits, ignoring
/// spaces, dashes, dots, and parentheses.
pub fn phone_format(value: &str) -> Result<Option<String>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let separators_only = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '+'));
    if separators_only && (8..=15).contains(&digits.len()) {
        Ok(Some(digits))
    } else {
        Err("Phone must contain 8 to 15 digits".to_string())
    }
}

/// A strictly positive integer, for quantities.
pub fn positive_int(label: &str, value: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{label} must be a positive whole number")),
    }
}

/// A non-negative price, accepting a comma as the decimal separator and
/// rounding to two decimals.
pub fn positive_price(label: &str, value: &str) -> Result<f64, String> {
    let normalized = value.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.is_finite() => Ok(round2(v)),
        _ => Err(format!("{label} must be a price like 9.99")),
    }
}
