//! Conversion of preprocessed strings into typed [`Value`]s.

use std::num::{IntErrorKind, ParseIntError};

use crate::types::{DataType, Value};

/// Coerce a preprocessed string to `data_type`.
///
/// An empty string becomes the type's zero value. Values are not trimmed. `Err` carries the
/// `type_conversion` message.
pub fn coerce(value: &str, data_type: &DataType) -> Result<Value, String> {
    if let DataType::Unsupported(desc) = data_type {
        return Err(format!("unsupported field type '{desc}'"));
    }
    if value.is_empty() {
        return Ok(data_type.zero());
    }

    let int_err = |e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            format!("value '{value}' overflows {data_type}")
        }
        _ => format!("cannot convert '{value}' to {data_type}"),
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(value.to_string())),
        DataType::Int8 => value.parse::<i8>().map(|v| Value::Int64(v.into())).map_err(int_err),
        DataType::Int16 => value.parse::<i16>().map(|v| Value::Int64(v.into())).map_err(int_err),
        DataType::Int32 => value.parse::<i32>().map(|v| Value::Int64(v.into())).map_err(int_err),
        DataType::Int64 => value.parse::<i64>().map(Value::Int64).map_err(int_err),
        DataType::UInt8 => value.parse::<u8>().map(|v| Value::UInt64(v.into())).map_err(int_err),
        DataType::UInt16 => value.parse::<u16>().map(|v| Value::UInt64(v.into())).map_err(int_err),
        DataType::UInt32 => value.parse::<u32>().map(|v| Value::UInt64(v.into())).map_err(int_err),
        DataType::UInt64 => value.parse::<u64>().map(Value::UInt64).map_err(int_err),
        DataType::Float32 => {
            let v = value
                .parse::<f32>()
                .map_err(|_| format!("cannot convert '{value}' to {data_type}"))?;
            if v.is_infinite() && !is_infinity_literal(value) {
                return Err(format!("value '{value}' overflows {data_type}"));
            }
            Ok(Value::Float32(v))
        }
        DataType::Float64 => {
            let v = value
                .parse::<f64>()
                .map_err(|_| format!("cannot convert '{value}' to {data_type}"))?;
            if v.is_infinite() && !is_infinity_literal(value) {
                return Err(format!("value '{value}' overflows {data_type}"));
            }
            Ok(Value::Float64(v))
        }
        DataType::Bool => parse_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| format!("cannot convert '{value}' to {data_type}")),
        DataType::Unsupported(_) => Ok(Value::Null),
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Text that validators see for a successfully coerced value.
///
/// A value coerced from `""` stays `""`.
pub fn restringify(preprocessed: &str, value: &Value) -> String {
    if preprocessed.is_empty() {
        return String::new();
    }
    match value {
        Value::Utf8(s) => s.clone(),
        other => other.to_string(),
    }
}
