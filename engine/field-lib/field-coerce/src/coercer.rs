use field_types::{FieldType, FieldValue, TypeValue};

use crate::literal;

/// Which branch of the coercion decision produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPath {
    /// The field is not declared, so the value was passed through.
    UnknownField,
    /// Only strings are coerced; anything else is already typed.
    NotAString,
    /// `"None"` for a type that admits null.
    NullLiteral,
    /// The type admits a plain string, so no parse was attempted.
    StringPreferred,
    /// The string was a literal and was replaced by its value.
    Parsed,
    /// The string was not a literal and was kept as is.
    Fallback,
}

/// Coerces a raw string destined for a field of type `target`.
///
/// Never fails. When nothing better can be done the string itself comes back,
/// and whether the result actually fits `target` is left to the type check.
pub fn coerce_str(raw: &str, target: &FieldType) -> FieldValue {
    let (parsed, _) = decide(raw, target);
    parsed.unwrap_or_else(|| FieldValue::String(raw.to_string()))
}

/// Same as [`coerce_explained`], without the path.
pub fn coerce(value: FieldValue, target: &FieldType) -> FieldValue {
    coerce_explained(value, target).0
}

/// Coerces `value` for `target` and reports which branch was taken.
///
/// Non-string values pass through untouched, so coercing an already coerced
/// value is a no-op.
pub fn coerce_explained(value: FieldValue, target: &FieldType) -> (FieldValue, CoercionPath) {
    match value {
        FieldValue::String(raw) => {
            let (parsed, path) = decide(&raw, target);
            (parsed.unwrap_or(FieldValue::String(raw)), path)
        }
        other => (other, CoercionPath::NotAString),
    }
}

/// `None` in the returned pair means "keep the raw string".
fn decide(raw: &str, target: &FieldType) -> (Option<FieldValue>, CoercionPath) {
    // Must run before the string check: `string?` given "None" is null.
    if target.has_candidate(TypeValue::Null) && raw == "None" {
        return (Some(FieldValue::Null), CoercionPath::NullLiteral);
    }

    // Phone numbers, ids and the like must not turn into numbers.
    if target.has_candidate(TypeValue::String) {
        return (None, CoercionPath::StringPreferred);
    }

    match literal::parse(raw) {
        Ok(value) => {
            log::debug!(
                "coercing to: {name} :: parsed {current}",
                name = target,
                current = value.r#type()
            );
            (Some(value), CoercionPath::Parsed)
        }
        Err(e) => {
            log::debug!(
                "coercing to: {name} :: not a literal, keeping string ({e})",
                name = target
            );
            (None, CoercionPath::Fallback)
        }
    }
}
