use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use ordered_float::OrderedFloat;

/// Coerced output, field name → value, in schema declaration order.
/// A field with nothing to report has no entry.
pub type FormObject = IndexMap<String, FormValue>;

/// A typed field value.
///
/// Unparseable numeric and date input is not an error: it comes back as
/// [`FormValue::NotANumber`] or [`FormValue::InvalidDate`] for a downstream
/// validator to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormValue {
    Null,
    String(String),
    Integer(i64),
    Number(OrderedFloat<f64>),
    Boolean(bool),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Array(Vec<FormValue>),
    /// Integer, number or bigint input that didn't parse.
    NotANumber,
    /// Date input that didn't parse.
    InvalidDate,
}

impl FormValue {
    pub fn number(n: f64) -> Self {
        FormValue::Number(OrderedFloat(n))
    }

    /// True for either parse-failure sentinel, including inside arrays.
    pub fn has_sentinel(&self) -> bool {
        match self {
            FormValue::NotANumber | FormValue::InvalidDate => true,
            FormValue::Array(xs) => xs.iter().any(FormValue::has_sentinel),
            _ => false,
        }
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Integer(n)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::number(n)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FormValue {
    fn from(d: DateTime<Utc>) -> Self {
        FormValue::Date(d)
    }
}

impl From<BigInt> for FormValue {
    fn from(n: BigInt) -> Self {
        FormValue::BigInt(n)
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(xs: Vec<T>) -> Self {
        FormValue::Array(xs.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_compare_equal_to_themselves() {
        assert_eq!(FormValue::NotANumber, FormValue::NotANumber);
        assert_eq!(FormValue::number(f64::NAN), FormValue::number(f64::NAN));
        assert_ne!(FormValue::NotANumber, FormValue::Null);
    }

    #[test]
    fn finds_sentinels_inside_arrays() {
        let v = FormValue::from(vec![FormValue::Integer(1), FormValue::NotANumber]);
        assert!(v.has_sentinel());
        assert!(!FormValue::from(vec![1i64, 2]).has_sentinel());
    }
}
