mod field_type;
mod field_value;

pub use field_type::{FieldType, TypeValue};
pub use field_value::FieldValue;
