use super::{FieldType, TypeValue};

impl FieldType {
    pub fn string() -> Self {
        FieldType::Primitive(TypeValue::String)
    }

    pub fn int() -> Self {
        FieldType::Primitive(TypeValue::Int)
    }

    pub fn float() -> Self {
        FieldType::Primitive(TypeValue::Float)
    }

    pub fn bool() -> Self {
        FieldType::Primitive(TypeValue::Bool)
    }

    pub fn null() -> Self {
        FieldType::Primitive(TypeValue::Null)
    }

    pub fn as_list(self) -> Self {
        FieldType::List(Box::new(self))
    }

    pub fn set(inner: FieldType) -> Self {
        FieldType::Set(Box::new(inner))
    }

    pub fn map(key: FieldType, value: FieldType) -> Self {
        FieldType::Map(Box::new(key), Box::new(value))
    }

    pub fn union(choices: Vec<FieldType>) -> Self {
        FieldType::Union(choices)
    }

    pub fn tuple(choices: Vec<FieldType>) -> Self {
        FieldType::Tuple(choices)
    }

    pub fn as_optional(self) -> Self {
        FieldType::Optional(Box::new(self))
    }
}
