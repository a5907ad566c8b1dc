mod config;
mod schema;

use std::sync::Arc;

use field_types::FieldValue;
use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeMap;

use crate::validate::{CheckContext, TypeChecker, ValidationError};

pub use config::{ExtraFields, ModelConfig};
pub use schema::{FieldDecl, Schema, SchemaBuilder};

/// An instance of a [`Schema`] whose fields are filled from LLM output.
///
/// Every write, at construction and through [`Model::set`], goes through
/// coercion and then the strict type check.
#[derive(Debug, Clone)]
pub struct Model {
    schema: Arc<Schema>,
    values: IndexMap<String, FieldValue>,
}

impl Model {
    /// Builds a model, collecting every field error into one
    /// [`ValidationError`].
    pub fn new<K, V>(
        schema: impl Into<Arc<Schema>>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Model, ValidationError>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let schema = schema.into();
        let ctx = CheckContext::new(schema.name());
        let mut errors = vec![];
        let mut provided: IndexMap<String, FieldValue> = IndexMap::new();
        let mut extras: IndexMap<String, FieldValue> = IndexMap::new();
        // Declared fields that were supplied, valid or not.
        let mut supplied: IndexSet<String> = IndexSet::new();

        for (name, value) in fields {
            let name = name.into();
            let value = value.into();
            if schema.field(&name).is_some() {
                supplied.insert(name.clone());
                match validate_field(&schema, &ctx, &name, value) {
                    Ok(v) => {
                        provided.insert(name, v);
                    }
                    Err(e) => errors.push(e),
                }
                continue;
            }
            match schema.config().extra {
                ExtraFields::Forbid => errors.push(ctx.enter_scope(&name).error_extra_field()),
                ExtraFields::Ignore => {
                    log::debug!("scope: {}.{} :: ignoring extra field", schema.name(), name);
                }
                ExtraFields::Allow => {
                    let value = schema.coerce_field(&name, value);
                    extras.insert(name, value);
                }
            }
        }

        let mut values = IndexMap::new();
        let mut missing = vec![];
        for (name, decl) in schema.fields() {
            match provided.swap_remove(name) {
                Some(v) => {
                    values.insert(name.to_string(), v);
                }
                None if supplied.contains(name) => {}
                None => match &decl.default {
                    Some(default) => {
                        values.insert(name.to_string(), default.clone());
                    }
                    None => missing.push(name),
                },
            }
        }
        if !missing.is_empty() {
            errors.insert(0, ctx.error_missing_required_fields(&missing));
        }

        if !errors.is_empty() {
            let summary = match errors.len() {
                1 => format!("1 validation error for {}", schema.name()),
                n => format!("{} validation errors for {}", n, schema.name()),
            };
            return Err(ctx.error_merge_multiple(&summary, &errors));
        }

        values.extend(extras);
        Ok(Model { schema, values })
    }

    /// Builds a model from a JSON object, typically straight from an LLM
    /// response.
    pub fn from_json(
        schema: impl Into<Arc<Schema>>,
        json: serde_json::Value,
    ) -> Result<Model, ValidationError> {
        let schema = schema.into();
        match json {
            serde_json::Value::Object(fields) => Model::new(schema, fields),
            other => Err(CheckContext::new(schema.name()).error_not_an_object(&other)),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Assigns a field.
    ///
    /// With `validate_assignment` on, the value is coerced and checked and a
    /// failure leaves the previous value in place. Undeclared fields can only
    /// be assigned when extra fields are allowed.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), ValidationError> {
        let value = value.into();
        let ctx = CheckContext::new(self.schema.name());

        if self.schema.field(field).is_none() {
            if self.schema.config().extra != ExtraFields::Allow {
                return Err(ctx.error_no_such_field(field));
            }
            let value = self.schema.coerce_field(field, value);
            self.values.insert(field.to_string(), value);
            return Ok(());
        }

        let value = if self.schema.config().validate_assignment {
            validate_field(&self.schema, &ctx, field, value)?
        } else {
            value
        };
        self.values.insert(field.to_string(), value);
        Ok(())
    }
}

/// Coerce, then check. The coerced value is what gets stored.
fn validate_field(
    schema: &Schema,
    ctx: &CheckContext,
    field: &str,
    value: FieldValue,
) -> Result<FieldValue, ValidationError> {
    let value = schema.coerce_field(field, value);
    if let Some(target) = schema.field_type(field) {
        target.check(&ctx.enter_scope(field), &value)?;
    }
    Ok(value)
}

impl serde::Serialize for Model {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
