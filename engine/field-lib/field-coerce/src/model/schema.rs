use field_types::{FieldType, FieldValue};
use indexmap::IndexMap;

use crate::coercer::{coerce_explained, CoercionPath};

use super::ModelConfig;

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub r#type: FieldType,
    /// Used when the field is absent at construction. Defaults are trusted
    /// and never checked.
    pub default: Option<FieldValue>,
}

/// The declared fields of a model, in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldDecl>,
    config: ModelConfig,
}

impl Schema {
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_string(),
            fields: IndexMap::new(),
            config: ModelConfig::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.get(name)
    }

    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name).map(|f| &f.r#type)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDecl)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Coerces a value written to `field`. Undeclared fields pass through.
    pub fn coerce_field(&self, field: &str, value: FieldValue) -> FieldValue {
        self.coerce_field_explained(field, value).0
    }

    pub fn coerce_field_explained(
        &self,
        field: &str,
        value: FieldValue,
    ) -> (FieldValue, CoercionPath) {
        let Some(target) = self.field_type(field) else {
            log::debug!(
                "scope: {}.{} :: not declared, passing through",
                self.name,
                field
            );
            return (value, CoercionPath::UnknownField);
        };
        log::debug!(
            "scope: {scope}.{field} :: coercing to: {name} (current: {current})",
            scope = self.name,
            name = target,
            current = value.r#type()
        );
        coerce_explained(value, target)
    }
}

pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, FieldDecl>,
    config: ModelConfig,
}

impl SchemaBuilder {
    /// Declares a required field. Redeclaring a name replaces it in place.
    pub fn field(mut self, name: &str, r#type: FieldType) -> Self {
        self.fields.insert(
            name.to_string(),
            FieldDecl {
                r#type,
                default: None,
            },
        );
        self
    }

    pub fn field_with_default(
        mut self,
        name: &str,
        r#type: FieldType,
        default: impl Into<FieldValue>,
    ) -> Self {
        self.fields.insert(
            name.to_string(),
            FieldDecl {
                r#type,
                default: Some(default.into()),
            },
        );
        self
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_unknown_field_passes_through() {
        let schema = Schema::builder("Contact")
            .field("age", FieldType::int())
            .build();
        let (value, path) = schema.coerce_field_explained("shoe_size", FieldValue::from("42"));
        assert_eq!(value, FieldValue::from("42"));
        assert_eq!(path, CoercionPath::UnknownField);

        assert_eq!(
            schema.coerce_field("age", FieldValue::from("42")),
            FieldValue::Int(42)
        );
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let schema = Schema::builder("Contact")
            .field("a", FieldType::int())
            .field("b", FieldType::int())
            .field_with_default("a", FieldType::string(), "x")
            .build();
        let names = schema.fields().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(schema.field_type("a"), Some(&FieldType::string()));
        assert_eq!(
            schema.field("a").and_then(|f| f.default.clone()),
            Some(FieldValue::from("x"))
        );
    }
}
