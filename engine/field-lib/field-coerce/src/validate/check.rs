use field_types::{FieldType, FieldValue, TypeValue};

use super::{CheckContext, ValidationError};

/// Strict type check run after coercion.
///
/// No conversions happen here except one widening: an `int` is accepted
/// where a `float` is declared.
pub trait TypeChecker {
    fn check(&self, ctx: &CheckContext, value: &FieldValue) -> Result<(), ValidationError>;
}

impl TypeChecker for TypeValue {
    fn check(&self, ctx: &CheckContext, value: &FieldValue) -> Result<(), ValidationError> {
        let ok = matches!(
            (self, value),
            (TypeValue::String, FieldValue::String(_))
                | (TypeValue::Int, FieldValue::Int(_))
                | (TypeValue::Float, FieldValue::Float(_) | FieldValue::Int(_))
                | (TypeValue::Bool, FieldValue::Bool(_))
                | (TypeValue::Null, FieldValue::Null)
        );
        if ok {
            Ok(())
        } else {
            Err(ctx.error_unexpected_type(&FieldType::Primitive(*self), value))
        }
    }
}

fn check_items(
    ctx: &CheckContext,
    item_type: &FieldType,
    items: &[FieldValue],
) -> Result<(), ValidationError> {
    for (idx, item) in items.iter().enumerate() {
        item_type.check(&ctx.enter_scope(&idx.to_string()), item)?;
    }
    Ok(())
}

impl TypeChecker for FieldType {
    fn check(&self, ctx: &CheckContext, value: &FieldValue) -> Result<(), ValidationError> {
        log::debug!(
            "scope: {scope} :: checking: {name} (current: {current})",
            name = self,
            scope = ctx.display_scope(),
            current = value.r#type()
        );

        match (self, value) {
            (FieldType::Primitive(p), _) => p.check(ctx, value),
            (FieldType::Optional(_), FieldValue::Null) => Ok(()),
            (FieldType::Optional(inner), _) => inner.check(ctx, value),
            (FieldType::Union(options), _) => {
                let mut errors = vec![];
                for option in options {
                    match option.check(ctx, value) {
                        Ok(()) => return Ok(()),
                        Err(e) => errors.push(e),
                    }
                }
                Err(ctx.error_merge_multiple(&format!("No option of {} matched", self), &errors))
            }
            (FieldType::List(item_type), FieldValue::List(items))
            | (FieldType::Set(item_type), FieldValue::Set(items)) => {
                check_items(ctx, item_type, items)
            }
            (FieldType::Tuple(item_types), FieldValue::Tuple(items)) => {
                if item_types.len() != items.len() {
                    return Err(ctx.error_wrong_length(self, item_types.len(), items.len()));
                }
                for (idx, (item_type, item)) in item_types.iter().zip(items).enumerate() {
                    item_type.check(&ctx.enter_scope(&idx.to_string()), item)?;
                }
                Ok(())
            }
            (FieldType::Map(key_type, value_type), FieldValue::Map(entries)) => {
                for (key, entry) in entries {
                    let key_scope = match key {
                        FieldValue::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let entry_ctx = ctx.enter_scope(&key_scope);
                    key_type.check(&entry_ctx, key)?;
                    value_type.check(&entry_ctx, entry)?;
                }
                Ok(())
            }
            _ => Err(ctx.error_unexpected_type(self, value)),
        }
    }
}
