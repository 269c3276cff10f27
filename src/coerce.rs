//! Submission → typed object.
//!
//! Per field, in declaration order:
//! - arrays take every text entry and coerce each with the element kind;
//! - scalars take the first entry and ignore the rest;
//! - nothing usable (no entry, an empty scalar, binary payloads) falls back
//!   to the field's precomputed absent value, and fields with none are left
//!   out of the output.
//!
//! Bad numeric or date text never fails: it becomes a sentinel value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_bigint::BigInt;

use crate::config::{CoerceOptions, UncheckedBoolean};
use crate::error::CoerceError;
use crate::ir::{FieldInfo, Kind, SchemaInfo};
use crate::source::{Entry, FieldSource};
use crate::value::{FormObject, FormValue};

pub fn coerce<S: FieldSource + ?Sized>(source: &S, info: &SchemaInfo) -> Result<FormObject, CoerceError> {
    coerce_with(source, info, &CoerceOptions::default())
}

pub fn coerce_with<S: FieldSource + ?Sized>(
    source: &S,
    info: &SchemaInfo,
    options: &CoerceOptions,
) -> Result<FormObject, CoerceError> {
    let mut output = FormObject::with_capacity(info.field_names.len());

    for name in &info.field_names {
        let Some(field) = info.field(name) else { continue };
        let entries = source.get_all(name);

        let parsed = match field.kind {
            Kind::Array => coerce_array(field, &entries)?,
            _ => coerce_scalar(field, &entries)?,
        };
        let value = match parsed {
            Some(value) => Some(value),
            None => {
                let fallback = absent_value(info, name, field, options);
                tracing::trace!(field = %name, has_value = fallback.is_some(), "no usable entry");
                fallback
            }
        };

        if let Some(value) = value {
            output.insert(name.clone(), value);
        }
    }

    Ok(output)
}

fn absent_value(info: &SchemaInfo, name: &str, field: &FieldInfo, options: &CoerceOptions) -> Option<FormValue> {
    if let Some(value) = info.default_object.get(name) {
        return Some(value.clone());
    }
    let unchecked = field.kind == Kind::Boolean
        && !field.is_optional
        && !field.is_nullable
        && !field.has_default();
    match options.unchecked_boolean {
        UncheckedBoolean::False if unchecked => Some(FormValue::Boolean(false)),
        _ => None,
    }
}

fn coerce_array(field: &FieldInfo, entries: &[Entry<'_>]) -> Result<Option<FormValue>, CoerceError> {
    let texts: Vec<&str> = entries.iter().filter_map(Entry::as_text).collect();
    if texts.len() < entries.len() {
        tracing::debug!(
            field = field.display_name(),
            skipped = entries.len() - texts.len(),
            "skipping binary entries"
        );
    }
    if texts.is_empty() {
        return Ok(None);
    }

    let member_kind = match field.member_kind {
        Some(kind) if kind != Kind::Array => kind,
        _ => {
            return Err(CoerceError::UnsupportedKind {
                field: field.display_name().to_owned(),
                kind: Kind::Array,
            });
        }
    };

    texts
        .into_iter()
        .map(|raw| coerce_str(raw, member_kind, field))
        .collect::<Result<Vec<_>, _>>()
        .map(|members| Some(FormValue::Array(members)))
}

fn coerce_scalar(field: &FieldInfo, entries: &[Entry<'_>]) -> Result<Option<FormValue>, CoerceError> {
    match entries.first() {
        Some(Entry::Text(raw)) if !raw.is_empty() => coerce_str(raw, field.kind, field).map(Some),
        Some(Entry::Binary(_)) => {
            tracing::debug!(field = field.display_name(), "skipping binary entry");
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Coerce one string to `kind`.
pub fn coerce_str(raw: &str, kind: Kind, field: &FieldInfo) -> Result<FormValue, CoerceError> {
    let value = match kind {
        Kind::String => FormValue::String(raw.to_owned()),
        Kind::Integer => parse_integer(raw).map_or(FormValue::NotANumber, FormValue::Integer),
        Kind::Number => parse_number(raw).map_or(FormValue::NotANumber, FormValue::number),
        Kind::Boolean => FormValue::Boolean(parse_boolean(raw)),
        Kind::Date => parse_date(raw).map_or(FormValue::InvalidDate, FormValue::Date),
        Kind::BigInt => parse_bigint(raw).map_or(FormValue::NotANumber, FormValue::BigInt),
        Kind::Null => FormValue::Null,
        Kind::Array | Kind::Object | Kind::Symbol | Kind::Undefined => {
            return Err(CoerceError::UnsupportedKind {
                field: field.display_name().to_owned(),
                kind,
            });
        }
    };
    Ok(value)
}

// ————————————————————————————————————————————————————————————————————————————
// PARSERS
// ————————————————————————————————————————————————————————————————————————————

/// Leading integer: optional whitespace and sign, then decimal digits.
/// Anything after the digits is ignored.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign = sign_len(s);
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// Longest leading decimal float literal, or `Infinity`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let sign = sign_len(s);
    let body = &s[sign..];

    if body.starts_with("Infinity") {
        let inf = if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some(inf);
    }

    let bytes = body.as_bytes();
    let int_digits = count_digits(bytes);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp = &body[end + 1..];
        let exp_sign = sign_len(exp);
        let exp_digits = count_digits(&exp.as_bytes()[exp_sign..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    s[..sign + end].parse().ok()
}

/// Checkbox semantics: present means checked unless it says otherwise.
pub fn parse_boolean(raw: &str) -> bool {
    raw != "false" && raw != "off"
}

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Calendar date/time. Text without an offset is read as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Whole-string signed decimal integer of any size.
pub fn parse_bigint(raw: &str) -> Option<BigInt> {
    raw.trim().parse().ok()
}

fn sign_len(s: &str) -> usize {
    usize::from(matches!(s.as_bytes().first(), Some(b'+' | b'-')))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
