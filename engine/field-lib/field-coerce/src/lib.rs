#[cfg(test)]
mod tests;

mod coercer;
pub mod literal;
mod model;
mod validate;

pub use coercer::{coerce, coerce_explained, coerce_str, CoercionPath};
pub use field_types::{FieldType, FieldValue, TypeValue};
pub use model::{ExtraFields, FieldDecl, Model, ModelConfig, Schema, SchemaBuilder};
pub use validate::{CheckContext, TypeChecker, ValidationError};
