//! Integer and phone-number normalization.

use crate::error::TransformError;

/// Parses an integer, accepting a float spelling with no fractional part
/// (`"30.0"`), as spreadsheet exports often produce.
pub fn parse_integer(value: &str) -> Result<i64, TransformError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransformError::numeric("empty value"));
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Ok(_) => Err(TransformError::numeric("value is not a whole number")),
        Err(_) => Err(TransformError::numeric("value is not an integer")),
    }
}

/// Keeps the digits of a phone number and drops one leading trunk `0`.
///
/// `"07700 900123"` becomes `"7700900123"`; the dial code is stamped
/// separately from the source identity.
pub fn normalize_phone(value: &str) -> Result<String, TransformError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.strip_prefix('0').unwrap_or(&digits);
    if digits.is_empty() {
        return Err(TransformError::numeric("phone number has no digits"));
    }
    Ok(digits.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_integer(" 42 "), Ok(42));
        assert_eq!(parse_integer("-7"), Ok(-7));
        assert_eq!(parse_integer("12.0"), Ok(12));
        assert!(parse_integer("12.5").is_err());
        assert!(parse_integer("twelve").is_err());
        assert!(parse_integer("").is_err());
        assert!(parse_integer("NaN").is_err());
    }

    #[test]
    fn phone_numbers() {
        assert_eq!(normalize_phone("07700 900123").as_deref(), Ok("7700900123"));
        assert_eq!(normalize_phone("(555) 010-2030").as_deref(), Ok("5550102030"));
        assert_eq!(normalize_phone("06.12.34.56.78").as_deref(), Ok("612345678"));
        assert!(normalize_phone("n/a").is_err());
    }
}
