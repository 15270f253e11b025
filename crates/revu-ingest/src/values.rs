//! Polars `AnyValue` conversion helpers.

use polars::prelude::AnyValue;

/// Render an `AnyValue` as a plain string; nulls become the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        other => other.to_string(),
    }
}

/// Coerce an `AnyValue` to i64 when it holds an integral value.
///
/// Numeric strings and whole floats coerce; fractional floats, nulls, and
/// everything else return `None`.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => whole_float(f64::from(v)),
        AnyValue::Float64(v) => whole_float(v),
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn whole_float(v: f64) -> Option<i64> {
    if v.fract() == 0.0 && v.is_finite() {
        Some(v as i64)
    } else {
        None
    }
}

/// Format a float without trailing fractional zeros.
fn format_float(v: f64) -> String {
    let rendered = format!("{v}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}
