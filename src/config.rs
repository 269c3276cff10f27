use serde::Deserialize;

/// What an absent, required boolean resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncheckedBoolean {
    /// Leave the key out, like any other absent field.
    #[default]
    Omit,
    /// Resolve to `false`. Browsers don't submit unchecked checkboxes.
    False,
}

/// Request-time coercion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoerceOptions {
    /// Only applies to boolean fields that are not optional, not nullable and
    /// have no default.
    pub unchecked_boolean: UncheckedBoolean,
}

impl CoerceOptions {
    pub fn checkbox() -> Self {
        CoerceOptions { unchecked_boolean: UncheckedBoolean::False }
    }
}
