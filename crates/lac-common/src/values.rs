//! Cell value conversions over polars `AnyValue`.
//!
//! Submissions arrive loosely typed: the same column can hold integers in one
//! upload and text in the next. Rules compare cells by their string form, so
//! everything funnels through [`any_to_string`].

use polars::prelude::AnyValue;

/// Converts a Polars `AnyValue` to its string form.
///
/// Returns an empty string for `Null`. Integer-valued floats lose their
/// trailing `.0` so that a `SEX` column read as `f64` still compares as `"1"`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use lac_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(2)), "2");
/// assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
/// assert_eq!(any_to_string(AnyValue::String("E11")), "E11");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "1" } else { "0" }.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Formats a float without a trailing fractional zero.
fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_numbers() {
        assert_eq!(any_to_string(AnyValue::Int64(9)), "9");
        assert_eq!(any_to_string(AnyValue::Float64(2.0)), "2");
        assert_eq!(any_to_string(AnyValue::Float64(1.25)), "1.25");
    }

    #[test]
    fn test_format_numeric_drops_trailing_zero() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(2.5), "2.5");
        assert_eq!(format_numeric(40.0), "40");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64("  3.5 "), Some(3.5));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64(""), None);
    }
}
