use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde_json::Value;

use crate::coerce::{parse_bigint, parse_date};
use crate::error::ShapeError;
use crate::ir::Kind;
use crate::value::FormValue;

/// Turn a declared default literal into the value the coercer hands out.
/// Dates given as text or epoch milliseconds become date values here, once.
pub fn materialize(
    field: &str,
    kind: Kind,
    member_kind: Option<Kind>,
    raw: &Value,
) -> Result<FormValue, ShapeError> {
    let mismatch = |reason: String| ShapeError::DefaultMismatch {
        field: field.to_owned(),
        kind,
        reason,
    };

    match (kind, raw) {
        (Kind::String, Value::String(s)) => Ok(FormValue::String(s.clone())),
        (Kind::Integer, Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64))
            .map(FormValue::Integer)
            .ok_or_else(|| mismatch(format!("{n} is not an integer"))),
        (Kind::Number, Value::Number(n)) => n
            .as_f64()
            .map(FormValue::number)
            .ok_or_else(|| mismatch(format!("{n} is not representable"))),
        (Kind::Boolean, Value::Bool(b)) => Ok(FormValue::Boolean(*b)),
        (Kind::Date, Value::String(s)) => parse_date(s)
            .map(FormValue::Date)
            .ok_or_else(|| mismatch(format!("'{s}' is not a date"))),
        (Kind::Date, Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(FormValue::Date)
            .ok_or_else(|| mismatch(format!("{n} is not a millisecond timestamp"))),
        (Kind::BigInt, Value::String(s)) => parse_bigint(s)
            .map(FormValue::BigInt)
            .ok_or_else(|| mismatch(format!("'{s}' is not an integer"))),
        (Kind::BigInt, Value::Number(n)) => n
            .as_i64()
            .map(BigInt::from)
            .or_else(|| n.as_u64().map(BigInt::from))
            .map(FormValue::BigInt)
            .ok_or_else(|| mismatch(format!("{n} is not an integer"))),
        (Kind::Array, Value::Array(xs)) => {
            let member_kind = member_kind.ok_or_else(|| mismatch("array has no element kind".into()))?;
            xs.iter()
                .map(|x| materialize(field, member_kind, None, x))
                .collect::<Result<Vec<_>, _>>()
                .map(FormValue::Array)
        }
        (_, other) => Err(mismatch(format!("got {}", json_type(other)))),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
